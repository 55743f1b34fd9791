use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_EXECUTABLE, DEFAULT_FORWARD_OUTPUT,
    DEFAULT_NETWORK_PORT, DEFAULT_WINDOW_TITLE,
};

use serde::Deserialize;

/// Settings for the supervised player process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Player binary. A bare name is resolved through PATH
    pub executable: String,
    /// UDP port the player listens on for the incoming stream
    pub network_port: u16,
    /// Window title, used by screen-capture tooling to find the player
    pub window_title: String,
    /// Additional player arguments, placed before the input argument
    pub extra_args: Vec<String>,
    /// Forward the player's merged stdout/stderr to the log
    pub forward_output: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            executable: String::from(DEFAULT_EXECUTABLE),
            network_port: DEFAULT_NETWORK_PORT,
            window_title: String::from(DEFAULT_WINDOW_TITLE),
            extra_args: Vec::new(),
            forward_output: DEFAULT_FORWARD_OUTPUT,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.executable.trim().is_empty() {
            return Err(ConfigError::player("player.executable cannot be empty"));
        }

        if self.network_port == 0 {
            return Err(ConfigError::player(
                "player.network_port must be 1-65535, got 0",
            ));
        }

        if self.window_title.trim().is_empty() {
            return Err(ConfigError::player("player.window_title cannot be empty"));
        }

        if let Some(arg) = self.extra_args.iter().find(|arg| arg.as_str() == "-i") {
            return Err(ConfigError::player(format!(
                "player.extra_args cannot override the input ('{arg}')"
            )));
        }

        Ok(())
    }
}
