//! Polling monitor: runtime bridge, pollers and panel state

pub mod bridge;
pub mod panel;
pub mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent, StoreSnapshot, WorkerSettings};
pub use panel::{PanelKind, PanelState, TabId, LOADING};
