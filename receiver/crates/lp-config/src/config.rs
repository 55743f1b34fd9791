use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    LoggingConfig, PlayerConfig, SupervisorConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub supervisor: SupervisorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the default config directory.
    ///
    /// Loading order:
    /// 1. Check for LP_CONFIG_DIR env var, else use ./.linkplay/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply LP_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Same as [`Config::load`], with an explicit config directory.
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.to_path_buf(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: LP_CONFIG_DIR env var > ./.linkplay/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.player.validate()?;
        self.supervisor.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.logging
            .file
            .as_ref()
            .map(|file| config_dir.join(&self.logging.dir).join(file))
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  player: {} on udp port {} (title: {:?})",
            self.player.executable, self.player.network_port, self.player.window_title
        );

        if !self.player.extra_args.is_empty() {
            info!("  player extra args: {}", self.player.extra_args.join(" "));
        }

        info!(
            "  supervisor: graceful={}ms, kill={}ms, spawn check={}ms/timeout={}ms, restart delay={}ms",
            self.supervisor.graceful_timeout_ms,
            self.supervisor.kill_timeout_ms,
            self.supervisor.spawn_check_delay_ms,
            self.supervisor.spawn_timeout_ms,
            self.supervisor.restart_delay_ms
        );

        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Player
        Self::apply_env_string("LP_PLAYER_EXECUTABLE", &mut self.player.executable);
        Self::apply_env_parse("LP_PLAYER_PORT", &mut self.player.network_port);
        Self::apply_env_string("LP_PLAYER_WINDOW_TITLE", &mut self.player.window_title);
        Self::apply_env_bool(
            "LP_PLAYER_FORWARD_OUTPUT",
            &mut self.player.forward_output,
        );

        // Supervisor
        Self::apply_env_parse(
            "LP_GRACEFUL_TIMEOUT_MS",
            &mut self.supervisor.graceful_timeout_ms,
        );
        Self::apply_env_parse("LP_KILL_TIMEOUT_MS", &mut self.supervisor.kill_timeout_ms);
        Self::apply_env_parse(
            "LP_SPAWN_CHECK_DELAY_MS",
            &mut self.supervisor.spawn_check_delay_ms,
        );
        Self::apply_env_parse(
            "LP_SPAWN_TIMEOUT_MS",
            &mut self.supervisor.spawn_timeout_ms,
        );
        Self::apply_env_parse(
            "LP_RESTART_DELAY_MS",
            &mut self.supervisor.restart_delay_ms,
        );

        // Logging
        Self::apply_env_parse("LP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("LP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("LP_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
