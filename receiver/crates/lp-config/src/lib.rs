mod config;
mod error;
mod log_level;
mod logging_config;
mod player_config;
mod supervisor_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use player_config::PlayerConfig;
pub use supervisor_config::SupervisorConfig;

const CONFIG_DIR_ENV: &str = "LP_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".linkplay";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_EXECUTABLE: &str = "ffplay";
const DEFAULT_NETWORK_PORT: u16 = 5555;
const DEFAULT_WINDOW_TITLE: &str = "LINKPLAY Stream (Capture This Window in OBS)";
const DEFAULT_FORWARD_OUTPUT: bool = true;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
