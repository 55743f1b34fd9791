use std::fmt;

use serde::Serialize;

/// Lifecycle state of the supervised player.
///
/// `Running` is the only state with a live process handle; `Stopping` still
/// owns the handle while termination is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SupervisorState {
    /// Created, nothing started yet
    Idle,
    /// Spawn requested, waiting for the OS to report the outcome
    Starting,
    /// Player process is alive
    Running { pid: u32 },
    /// Termination requested, waiting for the process to go away
    Stopping,
    /// Player is gone; how it ended is in the exit info
    Stopped(ExitInfo),
    /// Player could not be started
    Failed(ErrorInfo),
}

impl SupervisorState {
    /// Short machine-friendly name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running { .. } => "running",
            Self::Stopping => "stopping",
            Self::Stopped(_) => "stopped",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether a user-facing restart control should be enabled.
    pub fn allows_restart(&self) -> bool {
        matches!(self, Self::Stopped(_) | Self::Failed(_))
    }

    /// Whether a process handle is owned in this state.
    pub fn has_live_process(&self) -> bool {
        matches!(self, Self::Running { .. } | Self::Stopping)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: &SupervisorState) -> bool {
        use SupervisorState::*;

        matches!(
            (self, next),
            (Idle | Stopped(_) | Failed(_), Starting)
                | (Starting, Running { .. } | Failed(_))
                | (Running { .. }, Stopping | Stopped(_))
                | (Stopping, Stopped(_))
        )
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running { pid } => write!(f, "running (pid {pid})"),
            Self::Stopped(exit) => write!(f, "stopped ({exit})"),
            Self::Failed(error) => write!(f, "failed ({error})"),
            other => f.write_str(other.name()),
        }
    }
}

/// How a player process came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Exited on its own without a signal
    Normal,
    /// Exited on its own because of a signal
    Crashed,
    /// Stop requested and the process honoured the terminate signal in time.
    /// Never produced on hosts without signals, where every stop is forced
    Graceful,
    /// Stop requested and the process had to be killed
    Forced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<i32>,
    pub termination: Termination,
}

impl ExitInfo {
    pub fn new(code: Option<i32>, signal: Option<i32>, termination: Termination) -> Self {
        Self {
            code,
            signal,
            termination,
        }
    }

    /// True unless the process crashed or had to be killed.
    pub fn graceful(&self) -> bool {
        matches!(self.termination, Termination::Normal | Termination::Graceful)
    }

    pub fn is_crash(&self) -> bool {
        self.termination == Termination::Crashed
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let termination = match self.termination {
            Termination::Normal => "exited",
            Termination::Crashed => "crashed",
            Termination::Graceful => "terminated",
            Termination::Forced => "killed",
        };

        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "{termination}, exit code {code}"),
            (None, Some(signal)) => write!(f, "{termination}, signal {signal}"),
            (None, None) => f.write_str(termination),
        }
    }
}

/// Why a start attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The executable could not be located
    ExecutableNotFound,
    /// The OS refused to create the process
    SpawnFailed,
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExecutableNotFound => "executable not found",
            Self::SpawnFailed => "spawn failed",
            Self::Other => "unknown error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub reason: FailureReason,
    /// Raw OS error text
    pub message: String,
}

impl ErrorInfo {
    pub fn new<S: Into<String>>(reason: FailureReason, message: S) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}
