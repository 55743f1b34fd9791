mod command;
mod locate;
mod state;
