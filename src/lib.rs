//! Quasar chain tooling: a schema-driven protobuf codec for the quasarnode
//! modules, a per-module query cache with block-driven subscriptions, and the
//! pieces of a polling terminal monitor.

pub mod app;
pub mod chain;
pub mod codec;
pub mod config;
pub mod core;
pub mod logging;
pub mod monitor;
pub mod proto;
pub mod store;
pub mod ui;
