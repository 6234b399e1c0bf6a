//! Chain access over the REST gateway

pub mod bank;
pub mod blocks;
pub mod client;
pub mod tx;
pub mod wasm;

pub use blocks::BlockWatcher;
pub use client::{QueryClient, RestClient};
pub use tx::{BroadcastResult, Coin, RestTxClient, Signer, StdFee, TxClient};
