//! lp-receiver - LinkPlay stream receiver
//!
//! Runs the player that displays an incoming LinkPlay stream, reports its
//! state on the console and lets the operator restart it.
//!
//! # Examples
//!
//! ```bash
//! # Listen on the default port (5555)
//! lp-receiver
//!
//! # Another port, machine-readable status
//! lp-receiver --port 6000 --json
//! ```

mod cli;
mod commands;
mod error;
mod logger;
mod status;

#[cfg(test)]
mod tests;

use crate::{
    cli::Cli,
    commands::{ConsoleCommand, HELP},
    error::{ReceiverError, Result as ReceiverResult},
    status::{ConsoleSink, StatusLine},
};

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use lp_config::{Config, PlayerConfig};
use lp_supervisor::Supervisor;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lp-receiver: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ReceiverResult<()> {
    // Load and validate configuration, flags override file and environment
    let config_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => Config::config_dir()?,
    };
    let mut config = Config::load_from(&config_dir)?;
    cli.apply_to(&mut config);
    config.validate()?;

    let log_file_path = config.log_file_path(&config_dir);
    if let Some(log_dir) = log_file_path.as_deref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            ReceiverError::io(format!("creating log directory {}", log_dir.display()), e)
        })?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting lp-receiver v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let supervisor = Supervisor::from_config(&config)?;
    supervisor.subscribe(ConsoleSink::new(config.player.clone(), cli.json));

    install_signal_handler(&supervisor);

    supervisor.start();
    if !cli.json {
        println!("{HELP}");
    }

    let outcome = read_commands(&supervisor, &config.player).await;

    match supervisor.teardown().await {
        Ok(()) => info!("Receiver stopped"),
        Err(e) => warn!("Teardown did not complete: {e}"),
    }

    outcome
}

/// Handle console commands until `quit` or end of input.
async fn read_commands(supervisor: &Supervisor, player: &PlayerConfig) -> ReceiverResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ReceiverError::io("reading console input", e))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            ConsoleCommand::Start => supervisor.start(),
            ConsoleCommand::Stop => supervisor.stop(),
            ConsoleCommand::Restart => {
                if let Err(reason) = request_restart(supervisor) {
                    println!("{reason}");
                }
            }
            ConsoleCommand::Status => {
                println!("{}", StatusLine::render(&supervisor.current_state(), player).text);
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => {
                info!("Quit requested");
                return Ok(());
            }
        }
    }

    info!("Console input closed, shutting down");
    Ok(())
}

/// Restart is only offered once the player has stopped or failed.
fn request_restart(supervisor: &Supervisor) -> Result<(), String> {
    let state = supervisor.current_state();

    if !state.allows_restart() {
        return Err(format!(
            "Restart is available once the player has stopped or failed (currently {state})."
        ));
    }

    info!("Restart requested");
    supervisor.restart();
    Ok(())
}

#[cfg(unix)]
fn install_signal_handler(supervisor: &Supervisor) {
    let supervisor = supervisor.clone();

    let spawned = std::thread::Builder::new()
        .name(String::from("signal-handler"))
        .spawn(move || {
            use signal_hook::consts::{SIGINT, SIGTERM};
            use signal_hook::iterator::Signals;

            let mut signals = match Signals::new([SIGINT, SIGTERM]) {
                Ok(s) => s,
                Err(e) => {
                    error!("Failed to register signal handlers: {e}");
                    return;
                }
            };

            if let Some(sig) = signals.forever().next() {
                info!("Received signal {sig}, shutting down...");

                match supervisor.teardown_blocking() {
                    Ok(()) => {
                        info!("Player stopped due to signal {sig}");
                        std::process::exit(0);
                    }
                    // Quit is already tearing down; let it finish
                    Err(lp_supervisor::SupervisorError::AlreadyTornDown { .. }) => {}
                    Err(e) => {
                        error!("Failed to stop player on signal: {e}");
                        std::process::exit(1);
                    }
                }
            }
        });

    if let Err(e) = spawned {
        error!("Failed to start signal handler thread: {e}");
    }
}

#[cfg(not(unix))]
fn install_signal_handler(supervisor: &Supervisor) {
    let supervisor = supervisor.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, shutting down...");
                if supervisor.teardown().await.is_ok() {
                    std::process::exit(0);
                }
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
        }
    });
}
