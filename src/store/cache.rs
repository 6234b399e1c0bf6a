//! Query result cache
//!
//! Results are stored per query name under the JSON serialization of
//! `{"params": .., "query": ..}`. Each fetch draws a ticket before it starts;
//! a commit only lands when its ticket is newer than the stored one, so a slow
//! response can never replace the result of a request started after it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct CacheEntry {
    ticket: u64,
    value: Value,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<String, HashMap<String, CacheEntry>>>,
    tickets: AtomicU64,
}

/// Cache key for a request
///
/// Absent params serialize as `{}` and absent query as `null`.
pub fn cache_key(params: &Value, query: &Value) -> String {
    let params = if params.is_null() { json!({}) } else { params.clone() };
    json!({ "params": params, "query": query }).to_string()
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the ordering slot for a request about to start
    pub fn ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `value` unless a newer request already committed
    ///
    /// Returns whether the value was stored.
    pub fn commit(&self, query: &str, key: &str, ticket: u64, value: Value) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let slot = entries.entry(query.to_string()).or_default();
        match slot.get(key) {
            Some(existing) if existing.ticket > ticket => false,
            _ => {
                slot.insert(key.to_string(), CacheEntry { ticket, value });
                true
            }
        }
    }

    pub fn get(&self, query: &str, key: &str) -> Option<Value> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(query)
            .and_then(|slot| slot.get(key))
            .map(|entry| entry.value.clone())
    }

    /// Number of cached results for a query name
    pub fn len(&self, query: &str) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(query).map_or(0, HashMap::len)
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

    #[test]
    fn test_cache_key_shape() {
        assert_eq!(
            cache_key(&json!({ "id": "1" }), &Value::Null),
            r#"{"params":{"id":"1"},"query":null}"#
        );
        assert_eq!(cache_key(&Value::Null, &Value::Null), r#"{"params":{},"query":null}"#);
    }

    #[test]
    fn test_sequential_commits_overwrite() {
        let cache = QueryCache::new();
        let key = cache_key(&json!({}), &Value::Null);
        let first = cache.ticket();
        assert!(cache.commit("Params", &key, first, json!({ "v": 1 })));
        let second = cache.ticket();
        assert!(cache.commit("Params", &key, second, json!({ "v": 2 })));
        assert_eq!(cache.get("Params", &key), Some(json!({ "v": 2 })));
        assert_eq!(cache.len("Params"), 1);
    }

    #[test]
    fn test_stale_commit_rejected() {
        let cache = QueryCache::new();
        let key = cache_key(&json!({}), &Value::Null);
        let older = cache.ticket();
        let newer = cache.ticket();
        assert!(cache.commit("Params", &key, newer, json!("new")));
        assert!(!cache.commit("Params", &key, older, json!("old")));
        assert_eq!(cache.get("Params", &key), Some(json!("new")));

        cache.clear();
        assert!(cache.get("Params", &key).is_none());
    }
}
