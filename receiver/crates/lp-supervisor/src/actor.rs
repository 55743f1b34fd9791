//! The supervisor task.
//!
//! Every command and every process event is handled here, one at a time, so
//! transitions are strictly ordered. Waits (graceful stop, forced kill,
//! pending spawn, restart delay) race a timer against the process and the
//! command channel; commands arriving mid-operation are coalesced into a
//! single pending request and applied once the operation completes.

use crate::command::PlayerCommand;
use crate::intent::{self, Intent};
use crate::locate;
use crate::observer::{Notification, Observers};
use crate::process;
use crate::state::{ErrorInfo, ExitInfo, FailureReason, SupervisorState, Termination};

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use log::{debug, error, info, warn};
use lp_config::{PlayerConfig, SupervisorConfig};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot, watch};

/// Messages from [`Supervisor`](crate::Supervisor) handles.
pub(crate) enum Command {
    Lifecycle(Intent),
    Teardown(oneshot::Sender<()>),
}

enum Event {
    Command(Option<Command>),
    Exited(io::Result<ExitStatus>),
}

struct TeardownRequest {
    /// None when teardown was triggered by every handle being dropped
    reply: Option<oneshot::Sender<()>>,
}

pub(crate) struct SupervisorActor {
    player: PlayerConfig,
    settings: SupervisorConfig,
    commands: mpsc::UnboundedReceiver<Command>,
    commands_closed: bool,
    state_tx: watch::Sender<SupervisorState>,
    observers: Observers,
    child: Option<Child>,
    pending: Option<Intent>,
    teardown: Option<TeardownRequest>,
    sequence: u64,
}

impl SupervisorActor {
    pub(crate) fn new(
        player: PlayerConfig,
        settings: SupervisorConfig,
        commands: mpsc::UnboundedReceiver<Command>,
        state_tx: watch::Sender<SupervisorState>,
        observers: Observers,
    ) -> Self {
        Self {
            player,
            settings,
            commands,
            commands_closed: false,
            state_tx,
            observers,
            child: None,
            pending: None,
            teardown: None,
            sequence: 0,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!("Supervisor task started");

        loop {
            if let Some(request) = self.teardown.take() {
                self.shutdown(request).await;
                break;
            }

            // Deferred work (the start half of a restart, commands coalesced
            // during the last operation) runs before anything newly queued.
            if let Some(intent) = self.pending.take() {
                self.apply(intent).await;
                continue;
            }

            let event = match self.child.as_mut() {
                Some(child) => tokio::select! {
                    status = child.wait() => Event::Exited(status),
                    command = self.commands.recv(), if !self.commands_closed => {
                        Event::Command(command)
                    }
                },
                None => Event::Command(self.commands.recv().await),
            };

            match event {
                Event::Exited(status) => self.on_exit(status),
                Event::Command(Some(Command::Lifecycle(intent))) => self.apply(intent).await,
                Event::Command(Some(Command::Teardown(reply))) => {
                    self.teardown = Some(TeardownRequest { reply: Some(reply) });
                }
                Event::Command(None) => self.on_commands_closed(),
            }
        }

        debug!("Supervisor task stopped");
    }

    async fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Start => match self.child.as_ref() {
                Some(child) => info!("Player is already running (pid {:?})", child.id()),
                None => self.start_child(Intent::Start).await,
            },
            Intent::Stop => {
                if self.child.is_none() {
                    debug!("Stop requested but no player is running");
                    return;
                }
                self.stop_child(Intent::Stop).await;
            }
            Intent::Restart => {
                if self.child.is_none() {
                    self.start_child(Intent::Restart).await;
                    return;
                }

                info!("Restarting player");
                self.stop_child(Intent::Restart).await;

                // Start on the next loop turn, after Stopped has been
                // delivered. A stop that arrived meanwhile takes precedence.
                self.pending.get_or_insert(Intent::Restart);
            }
        }
    }

    async fn start_child(&mut self, in_flight: Intent) {
        if in_flight == Intent::Restart && !self.settings.restart_delay().is_zero() {
            self.pause(self.settings.restart_delay(), in_flight).await;

            if self.teardown.is_some() || self.pending.is_some_and(|p| !p.wants_running()) {
                debug!("Restart superseded before the player was started");
                return;
            }
        }

        let command = PlayerCommand::from_config(&self.player);

        self.transition(SupervisorState::Starting);
        info!("Starting: {command}");

        let (result_tx, result_rx) = oneshot::channel();
        let spawn_command = command.clone();
        let forward_output = self.player.forward_output;

        // Spawning forks the host process, which can stall; keep it off the
        // supervisor task.
        tokio::task::spawn_blocking(move || {
            result_tx
                .send(process::spawn(&spawn_command, forward_output))
                .ok();
        });

        match self.await_spawn(result_rx, &command, in_flight).await {
            Ok(child) => {
                let pid = child.id().unwrap_or_default();
                self.child = Some(child);
                info!("Player started (pid {pid})");
                self.transition(SupervisorState::Running { pid });
            }
            Err(failure) => {
                error!("Player failed to start: {failure}");
                self.transition(SupervisorState::Failed(failure));
            }
        }
    }

    /// Wait for the spawn result, racing the executable probe and the
    /// spawn deadline. A teardown abandons the attempt; the child, if one
    /// still appears, is killed.
    pub(crate) async fn await_spawn(
        &mut self,
        mut result_rx: oneshot::Receiver<io::Result<Child>>,
        player_command: &PlayerCommand,
        in_flight: Intent,
    ) -> Result<Child, ErrorInfo> {
        let check_delay = self.settings.spawn_check_delay();
        let timeout = self.settings.spawn_timeout();

        let probe = tokio::time::sleep(check_delay);
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(probe, deadline);
        let mut probed = false;

        loop {
            tokio::select! {
                biased;

                result = &mut result_rx => {
                    return match result {
                        Ok(Ok(child)) => Ok(child),
                        Ok(Err(e)) => {
                            Err(locate::classify_spawn_error(player_command.program(), &e))
                        }
                        Err(_) => Err(ErrorInfo::new(
                            FailureReason::Other,
                            "spawn task ended without reporting a result",
                        )),
                    };
                }
                command = self.commands.recv(), if !self.commands_closed => {
                    self.defer(command, in_flight);

                    if self.teardown.is_some() {
                        process::discard_late_spawn(result_rx);
                        return Err(ErrorInfo::new(
                            FailureReason::Other,
                            "start abandoned, supervisor is shutting down",
                        ));
                    }
                }
                _ = &mut probe, if !probed => {
                    probed = true;

                    if locate::find_executable(player_command.program()).is_none() {
                        process::discard_late_spawn(result_rx);
                        return Err(ErrorInfo::new(
                            FailureReason::ExecutableNotFound,
                            format!(
                                "'{}' not found on the search path",
                                player_command.program().display()
                            ),
                        ));
                    }

                    debug!("Spawn still pending after {check_delay:?}, executable is present");
                }
                _ = &mut deadline => {
                    process::discard_late_spawn(result_rx);
                    return Err(ErrorInfo::new(
                        FailureReason::Other,
                        format!("spawn did not complete within {timeout:?}"),
                    ));
                }
            }
        }
    }

    /// Terminate the live player: graceful signal first, forced kill after
    /// the graceful bound, and give up waiting after the kill bound.
    async fn stop_child(&mut self, in_flight: Intent) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        let pid = child.id();
        self.transition(SupervisorState::Stopping);

        if let Err(e) = process::request_termination(&mut child) {
            warn!("Failed to send terminate signal to player (pid {pid:?}): {e}");
        }

        let graceful_timeout = self.settings.graceful_timeout();
        let exit = match self.await_exit(&mut child, graceful_timeout, in_flight).await {
            Some(status) => {
                process::requested_exit(Some(status), process::TERMINATION_ON_REQUEST)
            }
            None => {
                warn!(
                    "Player (pid {pid:?}) did not exit within {graceful_timeout:?}, killing"
                );

                if let Err(e) = process::force_kill(&mut child) {
                    warn!("Failed to kill player (pid {pid:?}): {e}");
                }

                let kill_timeout = self.settings.kill_timeout();
                let status = self.await_exit(&mut child, kill_timeout, in_flight).await;
                if status.is_none() {
                    warn!("Kill of player (pid {pid:?}) not confirmed within {kill_timeout:?}");
                }

                process::requested_exit(status, Termination::Forced)
            }
        };

        // Dropping the handle leaves any unobserved exit to the runtime's reaper
        drop(child);

        info!("Player stopped: {exit}");
        self.transition(SupervisorState::Stopped(exit));
    }

    async fn await_exit(
        &mut self,
        child: &mut Child,
        bound: Duration,
        in_flight: Intent,
    ) -> Option<ExitStatus> {
        let deadline = tokio::time::sleep(bound);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv(), if !self.commands_closed => {
                    self.defer(command, in_flight);
                }
                status = child.wait() => {
                    return match status {
                        Ok(status) => Some(status),
                        Err(e) => {
                            warn!("Failed to wait for player exit: {e}");
                            None
                        }
                    };
                }
                _ = &mut deadline => return None,
            }
        }
    }

    async fn pause(&mut self, duration: Duration, in_flight: Intent) {
        let delay = tokio::time::sleep(duration);
        tokio::pin!(delay);

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv(), if !self.commands_closed => {
                    self.defer(command, in_flight);

                    if self.teardown.is_some() {
                        return;
                    }
                }
                _ = &mut delay => return,
            }
        }
    }

    /// Record a command that arrived while `in_flight` is being carried out.
    fn defer(&mut self, command: Option<Command>, in_flight: Intent) {
        match command {
            Some(Command::Lifecycle(intent)) => {
                self.pending = intent::coalesce(in_flight, intent);
                debug!(
                    "{intent:?} requested during {in_flight:?}, pending: {:?}",
                    self.pending
                );
            }
            Some(Command::Teardown(reply)) => {
                self.teardown = Some(TeardownRequest { reply: Some(reply) });
            }
            None => self.on_commands_closed(),
        }
    }

    fn on_exit(&mut self, status: io::Result<ExitStatus>) {
        self.child = None;

        let exit = match status {
            Ok(status) => process::unrequested_exit(status),
            Err(e) => {
                error!("Lost track of the player process: {e}");
                ExitInfo::new(None, None, Termination::Crashed)
            }
        };

        if exit.is_crash() {
            warn!("Player crashed: {exit}");
        } else {
            info!("Player finished: {exit}");
        }

        self.transition(SupervisorState::Stopped(exit));
    }

    fn on_commands_closed(&mut self) {
        self.commands_closed = true;

        if self.teardown.is_none() {
            info!("All supervisor handles dropped, tearing down");
            self.teardown = Some(TeardownRequest { reply: None });
        }
    }

    async fn shutdown(&mut self, request: TeardownRequest) {
        info!("Tearing down supervisor");

        self.pending = None;
        if self.child.is_some() {
            self.stop_child(Intent::Stop).await;
        }

        if let Some(reply) = request.reply {
            reply.send(()).ok();
        }
    }

    fn transition(&mut self, state: SupervisorState) {
        let previous = self.state_tx.borrow().clone();
        debug_assert!(
            previous.can_transition_to(&state),
            "illegal transition {previous} -> {state}"
        );

        self.sequence += 1;
        debug!("Player state: {previous} -> {state}");

        self.state_tx.send_replace(state.clone());
        self.observers.notify(&Notification {
            sequence: self.sequence,
            state,
        });
    }
}
