use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiverError {
    #[error("Config error: {0}")]
    Config(#[from] lp_config::ConfigError),

    #[error("Supervisor error: {0}")]
    Supervisor(#[from] lp_supervisor::SupervisorError),

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown command '{input}', type 'help' for the list of commands")]
    UnknownCommand { input: String },
}

impl ReceiverError {
    #[track_caller]
    pub fn logger<S: Into<String>>(message: S) -> Self {
        ReceiverError::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        ReceiverError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReceiverError>;
