//! Per-module query cache and subscription store

pub mod cache;
pub mod error;
pub mod merge;
pub mod module;
pub mod routes;
pub mod subscription;

pub use cache::{cache_key, QueryCache};
pub use error::{StoreError, StoreResult};
pub use merge::{merge_results, next_key};
pub use module::{BlockTick, QueryOptions, StoreModule};
pub use routes::{query_pairs, ModuleSpec, QueryRoute, INTERGAMM, QBANK, QORACLE};
pub use subscription::{ReplayOptions, Subscription, SubscriptionPayload, SubscriptionSet};
