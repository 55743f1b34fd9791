//! Player command line construction.

use std::fmt;
use std::path::{Path, PathBuf};

use lp_config::PlayerConfig;

/// Executable and argument list for one spawn attempt.
///
/// Built fresh from configuration on every start. The arguments tune the
/// player for an unbuffered live network input:
/// - `-fflags nobuffer` / `-flags low_delay`: no input buffering, low-delay decoding
/// - `-framedrop`: drop frames when decoding falls behind
/// - `-strict experimental`: allow the experimental low-latency options
/// - `-window_title`: stable title for screen-capture tooling
/// - `-infbuf`: unbounded input buffer, trading memory for jitter tolerance
/// - `-i udp://@:<port>`: listen for the stream on every interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl PlayerCommand {
    pub fn from_config(config: &PlayerConfig) -> Self {
        let mut args: Vec<String> = [
            "-fflags",
            "nobuffer",
            "-flags",
            "low_delay",
            "-framedrop",
            "-strict",
            "experimental",
            "-window_title",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        args.push(config.window_title.clone());
        args.push(String::from("-infbuf"));
        args.extend(config.extra_args.iter().cloned());
        args.push(String::from("-i"));
        args.push(Self::input_url(config.network_port));

        Self {
            program: PathBuf::from(&config.executable),
            args,
        }
    }

    /// Listen address for an unprefixed UDP stream on all interfaces.
    pub fn input_url(port: u16) -> String {
        format!("udp://@:{port}")
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;

        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }

        Ok(())
    }
}
