//! Delivery of state patches to re-render subscribers.
//!
//! One process-wide broadcast channel carries every `SessionUpdate`. A plain
//! `subscribe()` sees all traffic (useful for dashboards and tests);
//! `subscribe_session(id)` narrows the stream to a single session, which is
//! what the per-viewer WebSocket wants. The registry publishes while it still
//! holds the session's lock, so a subscription observes one session's updates
//! in the exact order they were applied.

use tokio::sync::broadcast;
use uuid::Uuid;
use vitrine_types::session::SessionUpdate;

/// Fan-out channel for session state updates.
///
/// Cheap to clone; all clones feed the same channel. Publishing with no
/// listeners just drops the update.
#[derive(Debug, Clone)]
pub struct UpdateBus {
    sender: broadcast::Sender<SessionUpdate>,
}

impl UpdateBus {
    /// Create a bus whose channel retains up to `capacity` in-flight updates.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to every session's updates.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.sender.subscribe()
    }

    /// Subscribe to a single session's updates.
    pub fn subscribe_session(&self, session_id: Uuid) -> SessionSubscription {
        SessionSubscription {
            session_id,
            rx: self.sender.subscribe(),
        }
    }

    /// Send an update to whoever is listening.
    pub fn publish(&self, update: SessionUpdate) {
        let _ = self.sender.send(update);
    }
}

/// A receiver narrowed to one session.
///
/// Wraps a broadcast receiver and discards updates belonging to other
/// sessions, so callers never filter by hand.
pub struct SessionSubscription {
    session_id: Uuid,
    rx: broadcast::Receiver<SessionUpdate>,
}

impl SessionSubscription {
    /// The session this subscription follows.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Receive the next update for this session.
    ///
    /// Other sessions' updates are skipped silently. A lagged receiver logs
    /// the gap and keeps going. `None` means the bus closed (server
    /// shutdown).
    pub async fn recv(&mut self) -> Option<SessionUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(update) if update.session_id == self.session_id => return Some(update),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        session_id = %self.session_id,
                        skipped = n,
                        "re-render subscriber lagged, updates dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_types::session::SessionPatch;

    fn update_for(session_id: Uuid, counter: i64) -> SessionUpdate {
        SessionUpdate {
            session_id,
            patch: SessionPatch::counter(counter),
        }
    }

    #[tokio::test]
    async fn session_subscription_skips_other_sessions() {
        let bus = UpdateBus::new(16);
        let mine = Uuid::now_v7();
        let theirs = Uuid::now_v7();
        let mut sub = bus.subscribe_session(mine);

        bus.publish(update_for(theirs, 7));
        bus.publish(update_for(mine, 1));

        let update = sub.recv().await.unwrap();
        assert_eq!(update.session_id, mine);
        assert_eq!(update.patch.counter, Some(1));
    }

    #[tokio::test]
    async fn session_subscription_preserves_publish_order() {
        let bus = UpdateBus::new(16);
        let id = Uuid::now_v7();
        let mut sub = bus.subscribe_session(id);

        for counter in 1..=5 {
            bus.publish(update_for(id, counter));
        }

        for expected in 1..=5 {
            assert_eq!(sub.recv().await.unwrap().patch.counter, Some(expected));
        }
    }

    #[tokio::test]
    async fn recv_returns_none_once_bus_is_gone() {
        let bus = UpdateBus::new(16);
        let mut sub = bus.subscribe_session(Uuid::now_v7());
        drop(bus);

        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn lagged_subscription_recovers() {
        let bus = UpdateBus::new(2);
        let id = Uuid::now_v7();
        let mut sub = bus.subscribe_session(id);

        // Overflow the channel; older updates are evicted
        for counter in 1..=10 {
            bus.publish(update_for(id, counter));
        }

        // The subscription logs the gap and still yields a retained update
        let update = sub.recv().await.unwrap();
        assert_eq!(update.session_id, id);
    }

    #[tokio::test]
    async fn plain_subscriber_sees_all_sessions() {
        let bus = UpdateBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(update_for(Uuid::now_v7(), 1));
        bus.publish(update_for(Uuid::now_v7(), 2));

        assert!(rx.recv().await.is_ok());
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn publish_without_listeners_is_a_noop() {
        let bus = UpdateBus::new(16);
        bus.publish(update_for(Uuid::now_v7(), 1));
    }

    #[test]
    fn clones_feed_the_same_channel() {
        let bus = UpdateBus::new(16);
        let id = Uuid::now_v7();
        let mut sub = bus.subscribe_session(id);

        bus.clone().publish(update_for(id, 3));

        assert!(sub.rx.try_recv().is_ok());
    }
}
