#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lp_config::{PlayerConfig, SupervisorConfig};
use lp_supervisor::{Notification, Supervisor, SupervisorState};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

pub const WAIT: Duration = Duration::from_secs(5);
pub const QUIET: Duration = Duration::from_millis(400);

/// Shell script standing in for the player. Lives as long as the value.
pub struct PlayerScript {
    _dir: TempDir,
    path: PathBuf,
}

impl PlayerScript {
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("player.sh");

        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        Self { _dir: dir, path }
    }

    /// Runs until signalled.
    pub fn long_running() -> Self {
        Self::new("exec sleep 30")
    }

    /// Survives SIGTERM, only a kill ends it.
    pub fn ignoring_terminate() -> Self {
        Self::new("trap '' TERM\nwhile :; do sleep 0.1; done")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn player_config(executable: &Path) -> PlayerConfig {
    PlayerConfig {
        executable: executable.display().to_string(),
        forward_output: false,
        ..PlayerConfig::default()
    }
}

pub fn fast_settings() -> SupervisorConfig {
    SupervisorConfig {
        graceful_timeout_ms: 300,
        kill_timeout_ms: 300,
        spawn_check_delay_ms: 100,
        spawn_timeout_ms: 5000,
        restart_delay_ms: 20,
    }
}

/// Every notification a supervisor emits, in delivery order.
pub struct Recording {
    rx: mpsc::UnboundedReceiver<Notification>,
    seen: Vec<Notification>,
}

impl Recording {
    pub fn attach(supervisor: &Supervisor) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        supervisor.subscribe(move |notification: &Notification| {
            tx.send(notification.clone()).ok();
        });

        Self {
            rx,
            seen: Vec::new(),
        }
    }

    /// Receive until `matches` accepts a state; panics after [`WAIT`].
    pub async fn wait_for<F>(&mut self, matches: F) -> SupervisorState
    where
        F: Fn(&SupervisorState) -> bool,
    {
        let deadline = Instant::now() + WAIT;

        loop {
            match timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(notification)) => {
                    let state = notification.state.clone();
                    self.seen.push(notification);
                    if matches(&state) {
                        return state;
                    }
                }
                Ok(None) => panic!("notification channel closed, seen: {:?}", self.names()),
                Err(_) => panic!("timed out waiting for state, seen: {:?}", self.names()),
            }
        }
    }

    pub async fn wait_running(&mut self) -> u32 {
        match self
            .wait_for(|s| matches!(s, SupervisorState::Running { .. }))
            .await
        {
            SupervisorState::Running { pid } => pid,
            other => unreachable!("{other}"),
        }
    }

    /// Collect whatever arrives within `period`.
    pub async fn settle(&mut self, period: Duration) -> Vec<Notification> {
        let deadline = Instant::now() + period;
        let mut arrived = Vec::new();

        while let Ok(Some(notification)) = timeout_at(deadline, self.rx.recv()).await {
            self.seen.push(notification.clone());
            arrived.push(notification);
        }

        arrived
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.seen.iter().map(|n| n.state.name()).collect()
    }

    pub fn seen(&self) -> &[Notification] {
        &self.seen
    }

    /// The recorded notifications form a legal walk from `Idle` with
    /// consecutive sequence numbers.
    pub fn assert_valid_walk(&self) {
        let mut previous = SupervisorState::Idle;
        let mut sequence = 0;

        for notification in &self.seen {
            assert!(
                previous.can_transition_to(&notification.state),
                "illegal transition {previous} -> {}",
                notification.state
            );
            assert_eq!(notification.sequence, sequence + 1);

            previous = notification.state.clone();
            sequence = notification.sequence;
        }
    }
}

/// True once no process with `pid` exists.
pub fn process_gone(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), None).is_err()
}

pub fn send_signal(pid: u32, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), signal).unwrap();
}
