use std::path::PathBuf;

use clap::Parser;
use lp_config::{Config, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "lp-receiver")]
#[command(about = "Receive a LinkPlay stream and keep the player window running")]
#[command(version)]
pub struct Cli {
    /// UDP port to listen on for the stream
    #[arg(long)]
    pub(crate) port: Option<u16>,

    /// Player window title
    #[arg(long)]
    pub(crate) title: Option<String>,

    /// Player executable (bare names are looked up on PATH)
    #[arg(long)]
    pub(crate) executable: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    pub(crate) log_level: Option<String>,

    /// Config directory (default: LP_CONFIG_DIR, else ./.linkplay)
    #[arg(long)]
    pub(crate) config_dir: Option<PathBuf>,

    /// Print one JSON object per state change instead of status text
    #[arg(long)]
    pub(crate) json: bool,
}

impl Cli {
    /// Flags take precedence over the config file and environment.
    pub(crate) fn apply_to(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.player.network_port = port;
        }

        if let Some(ref title) = self.title {
            config.player.window_title = title.clone();
        }

        if let Some(ref executable) = self.executable {
            config.player.executable = executable.clone();
        }

        if let Some(ref level) = self.log_level {
            config.logging.level = LogLevel::parse_lenient(level);
        }
    }
}
