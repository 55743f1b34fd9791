use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_GRACEFUL_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_KILL_TIMEOUT_MS: u64 = 500;
pub const DEFAULT_SPAWN_CHECK_DELAY_MS: u64 = 100;
pub const DEFAULT_SPAWN_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_RESTART_DELAY_MS: u64 = 100;

pub const MAX_TIMEOUT_MS: u64 = 60_000;
pub const MAX_RESTART_DELAY_MS: u64 = 10_000;

/// Timing bounds for the process supervisor.
///
/// `graceful_timeout_ms + kill_timeout_ms` is the worst case for a stop
/// once the player is running.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Wait after the terminate signal before a forced kill
    pub graceful_timeout_ms: u64,
    /// Best-effort wait after the forced kill
    pub kill_timeout_ms: u64,
    /// Delay before probing for the executable while a spawn is pending
    pub spawn_check_delay_ms: u64,
    /// Give up on a spawn that has not resolved after this long
    pub spawn_timeout_ms: u64,
    /// Pause between the stop and start halves of a restart
    pub restart_delay_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            graceful_timeout_ms: DEFAULT_GRACEFUL_TIMEOUT_MS,
            kill_timeout_ms: DEFAULT_KILL_TIMEOUT_MS,
            spawn_check_delay_ms: DEFAULT_SPAWN_CHECK_DELAY_MS,
            spawn_timeout_ms: DEFAULT_SPAWN_TIMEOUT_MS,
            restart_delay_ms: DEFAULT_RESTART_DELAY_MS,
        }
    }
}

impl SupervisorConfig {
    pub fn graceful_timeout(&self) -> Duration {
        Duration::from_millis(self.graceful_timeout_ms)
    }

    pub fn kill_timeout(&self) -> Duration {
        Duration::from_millis(self.kill_timeout_ms)
    }

    pub fn spawn_check_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_check_delay_ms)
    }

    pub fn spawn_timeout(&self) -> Duration {
        Duration::from_millis(self.spawn_timeout_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        let bounds = [
            ("graceful_timeout_ms", self.graceful_timeout_ms),
            ("kill_timeout_ms", self.kill_timeout_ms),
            ("spawn_check_delay_ms", self.spawn_check_delay_ms),
            ("spawn_timeout_ms", self.spawn_timeout_ms),
        ];

        for (name, value) in bounds {
            if value == 0 || value > MAX_TIMEOUT_MS {
                return Err(ConfigError::supervisor(format!(
                    "supervisor.{name} must be 1-{MAX_TIMEOUT_MS}, got {value}"
                )));
            }
        }

        if self.spawn_timeout_ms < self.spawn_check_delay_ms {
            return Err(ConfigError::supervisor(format!(
                "supervisor.spawn_timeout_ms ({}) must be >= spawn_check_delay_ms ({})",
                self.spawn_timeout_ms, self.spawn_check_delay_ms
            )));
        }

        if self.restart_delay_ms > MAX_RESTART_DELAY_MS {
            return Err(ConfigError::supervisor(format!(
                "supervisor.restart_delay_ms must be 0-{MAX_RESTART_DELAY_MS}, got {}",
                self.restart_delay_ms
            )));
        }

        Ok(())
    }
}
