//! Labeled store errors

use thiserror::Error;

use crate::codec::CodecError;

/// Failures surfaced by store actions
///
/// Every remote failure is caught at the action boundary and re-raised with
/// the label of the action that failed, e.g. `QueryClient:QueryDeposit` or
/// `TxClient:MsgRequestDeposit:Send`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No signing client was configured
    #[error("{operation}: Could not initialize signing client. Wallet is required.")]
    WalletMissing { operation: String },

    /// Message construction or submission failed
    #[error("{operation}: {message}")]
    Broadcast { operation: String, message: String },

    /// A remote query failed
    #[error("{operation}: API Node Unavailable. Could not perform query: {message}")]
    Query { operation: String, message: String },

    /// Replaying a subscription failed
    #[error("Subscriptions: {message}")]
    Subscription { message: String },

    /// The module defines no query route with this name
    #[error("unknown query route {0}")]
    UnknownRoute(String),

    /// The module defines no message with this name
    #[error("unknown message type {0}")]
    UnknownMessage(String),

    /// A cached result does not match its response schema
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError {
    /// Action label, when the error carries one
    pub fn operation(&self) -> Option<&str> {
        match self {
            StoreError::WalletMissing { operation }
            | StoreError::Broadcast { operation, .. }
            | StoreError::Query { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
