//! In-memory subscriber set for the daily verse broadcast.
//!
//! Membership lives for the process lifetime only; loss on restart is a
//! stated non-goal boundary.

use std::collections::HashSet;

use tokio::sync::Mutex;
use tracing::info;

use crate::domain::RecipientId;

#[derive(Default)]
pub struct SubscriptionRegistry {
    members: Mutex<HashSet<RecipientId>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: inserting an existing id is a no-op. Returns whether the
    /// id was newly added, decided under the same lock as the insert.
    pub async fn subscribe(&self, id: RecipientId) -> bool {
        let mut members = self.members.lock().await;
        let added = members.insert(id.clone());
        if added {
            info!(recipient = %id, total = members.len(), "subscribed");
        }
        added
    }

    /// Idempotent: removing an absent id is a no-op.
    pub async fn unsubscribe(&self, id: &RecipientId) {
        let mut members = self.members.lock().await;
        if members.remove(id) {
            info!(recipient = %id, total = members.len(), "unsubscribed");
        }
    }

    pub async fn is_subscribed(&self, id: &RecipientId) -> bool {
        self.members.lock().await.contains(id)
    }

    pub async fn count(&self) -> usize {
        self.members.lock().await.len()
    }

    /// Stable snapshot of the current membership, sorted by id.
    ///
    /// Broadcast fan-out iterates this snapshot so concurrent
    /// subscribe/unsubscribe calls cannot affect an in-flight cycle.
    pub async fn snapshot(&self) -> Vec<RecipientId> {
        let mut members: Vec<RecipientId> = self.members.lock().await.iter().cloned().collect();
        members.sort();
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RecipientId {
        RecipientId(s.to_string())
    }

    #[tokio::test]
    async fn subscribe_then_is_subscribed() {
        let reg = SubscriptionRegistry::new();
        reg.subscribe(id("a")).await;
        assert!(reg.is_subscribed(&id("a")).await);
        assert!(!reg.is_subscribed(&id("b")).await);
    }

    #[tokio::test]
    async fn unsubscribe_removes_and_is_idempotent() {
        let reg = SubscriptionRegistry::new();
        reg.subscribe(id("a")).await;
        reg.unsubscribe(&id("a")).await;
        assert!(!reg.is_subscribed(&id("a")).await);
        reg.unsubscribe(&id("a")).await; // no-op
        assert_eq!(reg.count().await, 0);
    }

    #[tokio::test]
    async fn double_subscribe_leaves_count_unchanged() {
        let reg = SubscriptionRegistry::new();
        assert!(reg.subscribe(id("a")).await);
        assert!(!reg.subscribe(id("a")).await);
        assert_eq!(reg.count().await, 1);
    }

    #[tokio::test]
    async fn snapshot_is_sorted_and_complete() {
        let reg = SubscriptionRegistry::new();
        for name in ["c", "a", "b"] {
            reg.subscribe(id(name)).await;
        }
        assert_eq!(reg.snapshot().await, vec![id("a"), id("b"), id("c")]);
    }
}
