use crate::error::ReceiverError;

use std::str::FromStr;

/// A line typed on the receiver's console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Restart,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "Commands: start, stop, restart (r), status, help, quit (q)";

impl FromStr for ConsoleCommand {
    type Err = ReceiverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" | "r" => Ok(Self::Restart),
            "status" | "s" => Ok(Self::Status),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            _ => Err(ReceiverError::UnknownCommand {
                input: s.trim().to_string(),
            }),
        }
    }
}
