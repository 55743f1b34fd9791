use crate::actor::{Command, SupervisorActor};
use crate::error::{Result as SupervisorResult, SupervisorError};
use crate::intent::Intent;
use crate::observer::{NotificationSink, Observers, SubscriptionId};
use crate::state::SupervisorState;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use lp_config::{Config, PlayerConfig, SupervisorConfig};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};

/// Handle to the player supervisor.
///
/// Cheap to clone; all clones drive the same supervisor task. Commands
/// return immediately and their outcome is observed through notifications
/// or [`Supervisor::current_state`]. Dropping every handle tears the
/// supervisor down as if [`Supervisor::teardown`] had been called.
#[derive(Clone)]
pub struct Supervisor {
    commands: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<SupervisorState>,
    observers: Observers,
    torn_down: Arc<AtomicBool>,
}

impl Supervisor {
    /// Create a supervisor in `Idle` and spawn its task on the current
    /// Tokio runtime.
    pub fn new(player: PlayerConfig, settings: SupervisorConfig) -> SupervisorResult<Self> {
        let runtime = Handle::try_current().map_err(|e| SupervisorError::no_runtime(e.to_string()))?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SupervisorState::Idle);
        let observers = Observers::default();

        let actor = SupervisorActor::new(player, settings, command_rx, state_tx, observers.clone());
        runtime.spawn(actor.run());

        Ok(Self {
            commands: command_tx,
            state_rx,
            observers,
            torn_down: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Validate `config` and create a supervisor from it.
    pub fn from_config(config: &Config) -> SupervisorResult<Self> {
        config.validate()?;
        Self::new(config.player.clone(), config.supervisor.clone())
    }

    /// Start the player. No-op while it is starting or running.
    pub fn start(&self) {
        self.send(Command::Lifecycle(Intent::Start));
    }

    /// Stop the player: terminate, then kill if it does not exit in time.
    /// No-op when no player is running.
    pub fn stop(&self) {
        self.send(Command::Lifecycle(Intent::Stop));
    }

    /// Stop the player if it is live, then start a fresh one.
    ///
    /// The new start happens only after the `Stopped` notification has been
    /// delivered. Repeated calls while a restart is in progress do not
    /// queue further restarts.
    pub fn restart(&self) {
        self.send(Command::Lifecycle(Intent::Restart));
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> SupervisorState {
        self.state_rx.borrow().clone()
    }

    /// Receiver that always holds the latest state.
    ///
    /// Intermediate states may be skipped; use [`Supervisor::subscribe`]
    /// to observe every transition.
    pub fn watch_state(&self) -> watch::Receiver<SupervisorState> {
        self.state_rx.clone()
    }

    /// Register a sink for every future transition.
    pub fn subscribe<S: NotificationSink>(&self, sink: S) -> SubscriptionId {
        self.observers.subscribe(Arc::new(sink))
    }

    /// Remove a sink. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered sinks.
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Stop any live player and shut the supervisor down, waiting until
    /// termination has completed or the kill bound has elapsed.
    ///
    /// A start in progress is abandoned and a pending restart delay is cut
    /// short, so the wait is bounded by the graceful and kill timeouts plus
    /// the time to deliver the resulting notifications.
    ///
    /// May be called once per supervisor; later calls (from any clone)
    /// return [`SupervisorError::AlreadyTornDown`].
    pub async fn teardown(&self) -> SupervisorResult<()> {
        let done = self.request_teardown()?;
        done.await.map_err(|_| SupervisorError::actor_unavailable())
    }

    /// Blocking variant of [`Supervisor::teardown`] for shutdown hooks that
    /// run outside the async runtime.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn teardown_blocking(&self) -> SupervisorResult<()> {
        let done = self.request_teardown()?;
        done.blocking_recv()
            .map_err(|_| SupervisorError::actor_unavailable())
    }

    fn request_teardown(&self) -> SupervisorResult<oneshot::Receiver<()>> {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return Err(SupervisorError::already_torn_down());
        }

        let (done_tx, done_rx) = oneshot::channel();
        self.commands
            .send(Command::Teardown(done_tx))
            .map_err(|_| SupervisorError::actor_unavailable())?;

        Ok(done_rx)
    }

    fn send(&self, command: Command) {
        if self.torn_down.load(Ordering::SeqCst) {
            warn!("Supervisor has been torn down, ignoring command");
            return;
        }

        if self.commands.send(command).is_err() {
            warn!("Supervisor task is not running, command dropped");
        }
    }
}
