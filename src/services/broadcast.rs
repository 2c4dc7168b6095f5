// SPDX-License-Identifier: MIT

//! Live fan-out of newly created activities.
//!
//! The hub owns the subscriber registry; there is no backlog, so a
//! subscriber only sees activities published after it registered.
//! Delivery is fire-and-forget per subscriber: a send failure closes
//! that one subscriber and is never surfaced to the publisher.

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures_util::Stream;
use tokio::sync::mpsc;

use crate::models::Activity;

struct HubInner {
    subscribers: DashMap<u64, mpsc::UnboundedSender<Activity>>,
    next_id: AtomicU64,
}

/// Registry of live activity subscribers.
#[derive(Clone)]
pub struct BroadcastHub {
    inner: Arc<HubInner>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                subscribers: DashMap::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a new subscriber.
    ///
    /// The returned subscription receives every activity published
    /// while it is alive and unregisters itself on drop.
    pub fn subscribe(&self) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.subscribers.insert(id, tx);

        tracing::debug!(subscriber_id = id, "Subscriber registered");
        Subscription {
            id,
            rx,
            hub: Arc::clone(&self.inner),
        }
    }

    /// Deliver `activity` to every active subscriber.
    ///
    /// Returns the number of subscribers the activity was handed to.
    /// Subscribers whose receiving end has gone away are dropped from
    /// the registry.
    pub fn publish(&self, activity: &Activity) -> usize {
        let mut delivered = 0;
        let mut stale = Vec::new();

        for entry in self.inner.subscribers.iter() {
            if entry.value().send(activity.clone()).is_ok() {
                delivered += 1;
            } else {
                stale.push(*entry.key());
            }
        }

        // Removal happens outside the iteration to avoid holding a
        // shard lock while mutating the map.
        for id in stale {
            self.inner.subscribers.remove(&id);
            tracing::debug!(subscriber_id = id, "Dropped closed subscriber");
        }

        tracing::debug!(activity_id = activity.id, delivered, "Activity broadcast");
        delivered
    }

    /// Remove a subscriber; a no-op if it is already gone.
    pub fn unsubscribe(&self, id: u64) {
        self.inner.subscribers.remove(&id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one live subscriber.
///
/// Streams activities published after registration; dropping it
/// unregisters the subscriber.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<Activity>,
    hub: Arc<HubInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receive the next published activity, or `None` once closed.
    pub async fn recv(&mut self) -> Option<Activity> {
        self.rx.recv().await
    }
}

impl Stream for Subscription {
    type Item = Activity;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Activity>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.subscribers.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use futures_util::FutureExt;

    fn activity(id: i64) -> Activity {
        Activity {
            id,
            customer_name: "Sarah".to_string(),
            location: "Chelsea".to_string(),
            action_type: "signup".to_string(),
            action_text: "joined".to_string(),
            timestamp: Utc::now(),
            verified: true,
            displayed: false,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_publish_exactly_once() {
        let hub = BroadcastHub::new();
        let mut sub = hub.subscribe();

        assert_eq!(hub.publish(&activity(1)), 1);

        let received = sub.recv().await.unwrap();
        assert_eq!(received.id, 1);
        // Exactly one delivery
        assert!(sub.recv().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_no_backlog_for_late_subscribers() {
        let hub = BroadcastHub::new();
        assert_eq!(hub.publish(&activity(1)), 0);

        let mut sub = hub.subscribe();
        assert!(sub.recv().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_unsubscribed_receives_nothing() {
        let hub = BroadcastHub::new();
        let sub = hub.subscribe();
        let id = sub.id();

        hub.unsubscribe(id);
        assert_eq!(hub.publish(&activity(1)), 0);

        // Idempotent: unsubscribing again is a no-op
        hub.unsubscribe(id);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_unregisters() {
        let hub = BroadcastHub::new();
        {
            let _sub = hub.subscribe();
            assert_eq!(hub.subscriber_count(), 1);
        }
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_each_active_subscriber_gets_its_own_copy() {
        let hub = BroadcastHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        assert_eq!(hub.publish(&activity(7)), 2);

        assert_eq!(a.recv().await.unwrap().id, 7);
        assert_eq!(b.recv().await.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_closed_receiver_is_pruned_without_failing_others() {
        let hub = BroadcastHub::new();
        let mut alive = hub.subscribe();

        // Simulate a connection whose receiving side died without a
        // clean unsubscribe: close the channel while the sender is
        // still registered.
        let mut dead = hub.subscribe();
        let dead_id = dead.id();
        dead.rx.close();

        assert_eq!(hub.publish(&activity(3)), 1);
        assert_eq!(alive.recv().await.unwrap().id, 3);
        assert!(!hub.inner.subscribers.contains_key(&dead_id));
    }
}
