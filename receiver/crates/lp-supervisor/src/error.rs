use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Supervisor requires a Tokio runtime: {message} {location}")]
    NoRuntime {
        message: String,
        location: ErrorLocation,
    },

    #[error("Supervisor has already been torn down {location}")]
    AlreadyTornDown { location: ErrorLocation },

    #[error("Supervisor task is no longer running {location}")]
    ActorUnavailable { location: ErrorLocation },

    #[error("Config error: {0}")]
    Config(#[from] lp_config::ConfigError),
}

impl SupervisorError {
    #[track_caller]
    pub(crate) fn no_runtime<S: Into<String>>(message: S) -> Self {
        Self::NoRuntime {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn already_torn_down() -> Self {
        Self::AlreadyTornDown {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn actor_unavailable() -> Self {
        Self::ActorUnavailable {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
