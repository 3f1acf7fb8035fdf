/*
[INPUT]:  Connector notifications
[OUTPUT]: Broadcast fan-out to any number of listeners
[POS]:    Connector layer - upward notification channel
[UPDATE]: When changing channel capacity or delivery semantics
*/

use tokio::sync::broadcast;
use tracing::debug;

use crate::types::ConnectorEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Publish/subscribe channel for connector notifications.
///
/// Emission order is preserved; late subscribers see only later events.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: broadcast::Sender<ConnectorEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, event: ConnectorEvent) {
        debug!(event = event.name(), listeners = self.tx.receiver_count(), "connector event");
        // no listeners is not an error
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeEvent;

    #[tokio::test]
    async fn test_events_fan_out_in_order() {
        let channel = EventChannel::new();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        channel.emit(ConnectorEvent::Connected);
        channel.emit(ConnectorEvent::Change(ChangeEvent::chain(137, false)));

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await.unwrap(), ConnectorEvent::Connected);
            assert_eq!(
                rx.recv().await.unwrap(),
                ConnectorEvent::Change(ChangeEvent::chain(137, false))
            );
        }
    }

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let channel = EventChannel::new();
        channel.emit(ConnectorEvent::Connected);

        let mut late = channel.subscribe();
        assert!(late.try_recv().is_err());
    }
}
