mod cli;
mod commands;
