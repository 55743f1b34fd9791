//! Supervision of a single external player process.
//!
//! A [`Supervisor`] owns at most one player process at a time and drives it
//! through the states in [`SupervisorState`]. All commands and process events
//! are serialized on one background task; every state change is delivered to
//! registered [`NotificationSink`]s in registration order.

mod actor;
mod command;
mod error;
mod intent;
mod locate;
mod observer;
mod process;
mod state;
mod supervisor;

#[cfg(test)]
mod tests;

pub use command::PlayerCommand;
pub use error::{Result as SupervisorResult, SupervisorError};
pub use locate::find_executable;
pub use observer::{Notification, NotificationSink, SubscriptionId};
pub use state::{ErrorInfo, ExitInfo, FailureReason, SupervisorState, Termination};
pub use supervisor::Supervisor;
