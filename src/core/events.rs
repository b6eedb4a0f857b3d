//! Typed in-process event bus replacing the ad hoc cross-view signals.

use tokio::sync::broadcast;

/// Events broadcast across views after state-changing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// An operation changed status or entered the pipeline; boards should
    /// refresh from the server.
    PipelineChanged,
    /// Notification counters should be recomputed.
    NotificationsRefresh,
}

/// Cloneable publish/subscribe handle. Publishing with no subscribers is a
/// no-op, matching fire-and-forget DOM events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        EventBus { sender }
    }

    pub fn publish(&self, event: AppEvent) {
        // A send error only means nobody is listening.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
