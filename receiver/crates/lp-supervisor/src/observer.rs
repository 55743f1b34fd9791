//! Notification sinks and their registry.

use crate::state::SupervisorState;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::error;
use serde::Serialize;

/// One state transition, as delivered to sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Increases by one with every transition
    pub sequence: u64,
    pub state: SupervisorState,
}

/// Receiver of supervisor state changes.
///
/// Called on the supervisor's own task, in registration order, once per
/// transition. Implementations must return quickly; they may call back into
/// [`Supervisor`](crate::Supervisor), and such commands are queued behind
/// the current notification.
pub trait NotificationSink: Send + Sync + 'static {
    fn on_notification(&self, notification: &Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(&Notification) + Send + Sync + 'static,
{
    fn on_notification(&self, notification: &Notification) {
        self(notification)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    sinks: Vec<(SubscriptionId, Arc<dyn NotificationSink>)>,
}

#[derive(Clone, Default)]
pub(crate) struct Observers {
    registry: Arc<Mutex<Registry>>,
}

impl Observers {
    pub(crate) fn subscribe(&self, sink: Arc<dyn NotificationSink>) -> SubscriptionId {
        let mut registry = self.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.sinks.push((id, sink));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.lock();
        let before = registry.sinks.len();
        registry.sinks.retain(|(sink_id, _)| *sink_id != id);
        registry.sinks.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().sinks.len()
    }

    /// Deliver to every sink registered at the time of the call.
    ///
    /// The registry lock is not held during delivery, so sinks may
    /// subscribe or unsubscribe from inside a callback.
    pub(crate) fn notify(&self, notification: &Notification) {
        let sinks: Vec<_> = self.lock().sinks.clone();

        for (id, sink) in sinks {
            let delivered =
                catch_unwind(AssertUnwindSafe(|| sink.on_notification(notification)));

            if delivered.is_err() {
                error!(
                    "Notification sink {:?} panicked handling {}",
                    id, notification.state
                );
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
