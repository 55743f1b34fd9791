//! Console rendering of supervisor notifications.

use std::io::Write;
use std::path::Path;

use log::warn;
use lp_config::PlayerConfig;
use lp_supervisor::{
    ErrorInfo, ExitInfo, FailureReason, Notification, NotificationSink, SupervisorState,
    Termination,
};
use serde::Serialize;

const RESTART_HINT: &str = "Type 'restart' (or 'r') to try again.";

/// What the receiver shows for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    /// Whether the restart control is offered
    pub restart_enabled: bool,
}

impl StatusLine {
    pub fn render(state: &SupervisorState, player: &PlayerConfig) -> Self {
        let name = display_name(&player.executable);

        let text = match state {
            SupervisorState::Idle => String::from("Initializing..."),
            SupervisorState::Starting => format!("Attempting to start {name}..."),
            SupervisorState::Running { .. } => format!(
                "{name} running.\nWaiting for stream on UDP port {}...",
                player.network_port
            ),
            SupervisorState::Stopping => format!("Stopping {name}..."),
            SupervisorState::Stopped(exit) => {
                format!("{}\n{RESTART_HINT}", stopped_text(name, exit))
            }
            SupervisorState::Failed(error) => {
                format!("{}\n{RESTART_HINT}", failed_text(name, &player.executable, error))
            }
        };

        Self {
            text,
            restart_enabled: state.allows_restart(),
        }
    }
}

fn display_name(executable: &str) -> &str {
    Path::new(executable)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(executable)
}

fn stopped_text(name: &str, exit: &ExitInfo) -> String {
    let code = match (exit.code, exit.signal) {
        (Some(code), _) => format!("Exit code: {code}"),
        (None, Some(signal)) => format!("Signal: {signal}"),
        (None, None) => String::from("Exit code: unknown"),
    };

    match exit.termination {
        Termination::Crashed => format!("{name} crashed ({code})."),
        Termination::Normal => format!("{name} finished ({code})."),
        Termination::Graceful | Termination::Forced => format!("{name} stopped."),
    }
}

fn failed_text(name: &str, executable: &str, error: &ErrorInfo) -> String {
    match error.reason {
        FailureReason::ExecutableNotFound => format!(
            "Error: '{executable}' not found in PATH.\nInstall FFmpeg (brew install ffmpeg)."
        ),
        FailureReason::SpawnFailed => format!(
            "Error: Failed to start '{executable}'.\nIs FFmpeg installed and in PATH?\n({})",
            error.message
        ),
        FailureReason::Other => format!("{name} Error: {}", error.message),
    }
}

/// Machine-readable form of one notification, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub sequence: u64,
    #[serde(flatten)]
    pub state: &'a SupervisorState,
    pub status: String,
    pub restart_enabled: bool,
}

impl<'a> StatusReport<'a> {
    pub fn new(notification: &'a Notification, player: &PlayerConfig) -> Self {
        let line = StatusLine::render(&notification.state, player);

        Self {
            sequence: notification.sequence,
            state: &notification.state,
            status: line.text,
            restart_enabled: line.restart_enabled,
        }
    }
}

/// Prints every state change to stdout.
pub struct ConsoleSink {
    player: PlayerConfig,
    json: bool,
}

impl ConsoleSink {
    pub fn new(player: PlayerConfig, json: bool) -> Self {
        Self { player, json }
    }

    pub fn format(&self, notification: &Notification) -> Option<String> {
        if self.json {
            match serde_json::to_string(&StatusReport::new(notification, &self.player)) {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!("Failed to serialize status report: {e}");
                    None
                }
            }
        } else {
            let line = StatusLine::render(&notification.state, &self.player);
            Some(line.text)
        }
    }
}

impl NotificationSink for ConsoleSink {
    fn on_notification(&self, notification: &Notification) {
        let Some(output) = self.format(notification) else {
            return;
        };

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{output}").and_then(|()| stdout.flush()) {
            warn!("Failed to write status: {e}");
        }
    }
}
