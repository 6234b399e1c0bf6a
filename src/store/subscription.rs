//! Subscribed queries replayed on every new block

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options kept with a subscription for its replays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOptions {
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    pub options: ReplayOptions,
    pub params: Value,
    pub query: Value,
}

/// A recorded (action, payload) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Action label, e.g. `QueryDepositAll`
    pub action: String,
    pub payload: SubscriptionPayload,
}

impl Subscription {
    pub fn new(action: impl Into<String>, params: Value, query: Value, all: bool) -> Self {
        Self {
            action: action.into(),
            payload: SubscriptionPayload {
                options: ReplayOptions { all },
                params,
                query,
            },
        }
    }

    /// Identity of the subscription; equal keys are the same subscription
    pub fn key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.action.clone())
    }
}

/// Insertion-ordered set of subscriptions
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    entries: RwLock<Vec<(String, Subscription)>>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a subscription; returns false when it was already present
    pub fn add(&self, subscription: Subscription) -> bool {
        let key = subscription.key();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|(existing, _)| *existing == key) {
            return false;
        }
        entries.push((key, subscription));
        true
    }

    /// Forget a subscription; returns whether it was present
    pub fn remove(&self, subscription: &Subscription) -> bool {
        let key = subscription.key();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != key);
        entries.len() != before
    }

    /// Copy of the current subscriptions, in insertion order
    pub fn snapshot(&self) -> Vec<Subscription> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, sub)| sub.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_matches_stored_shape() {
        let sub = Subscription::new("QueryDeposit", json!({ "id": "4" }), Value::Null, false);
        assert_eq!(
            sub.key(),
            r#"{"action":"QueryDeposit","payload":{"options":{"all":false},"params":{"id":"4"},"query":null}}"#
        );
    }

    #[test]
    fn test_duplicates_stored_once_in_order() {
        let set = SubscriptionSet::new();
        let a = Subscription::new("QueryParams", json!({}), Value::Null, false);
        let b = Subscription::new("QueryDepositAll", json!({}), Value::Null, true);
        assert!(set.add(a.clone()));
        assert!(set.add(b.clone()));
        assert!(!set.add(a.clone()));
        assert_eq!(set.snapshot(), vec![a.clone(), b.clone()]);

        assert!(set.remove(&a));
        assert!(!set.remove(&a));
        assert_eq!(set.snapshot(), vec![b]);
        set.clear();
        assert!(set.is_empty());
    }
}
