/// Lifecycle request from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    Start,
    Stop,
    Restart,
}

impl Intent {
    /// Whether the request ends with a running player.
    pub(crate) fn wants_running(self) -> bool {
        !matches!(self, Intent::Stop)
    }
}

/// Decide what remains pending when `incoming` arrives while `in_flight` is
/// being carried out.
///
/// Latest request wins. A request heading to the same end state as the
/// in-flight one is already satisfied, so it clears the pending slot rather
/// than queueing a second cycle.
pub(crate) fn coalesce(in_flight: Intent, incoming: Intent) -> Option<Intent> {
    if in_flight.wants_running() == incoming.wants_running() {
        None
    } else {
        Some(incoming)
    }
}
