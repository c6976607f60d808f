//! Error types for the HALO protocol
//!
//! These cover the transport/gateway edge. Engine-level rejections are not
//! errors; they are [`crate::ApplyOutcome::Rejected`] outcomes, logged and
//! dropped without surfacing to the caller.

use thiserror::Error;

/// Gateway and transport errors
#[derive(Error, Debug)]
pub enum HaloError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    #[error("Broadcast channel closed")]
    BroadcastClosed,
}

/// Result type for HALO operations
pub type HaloResult<T> = Result<T, HaloError>;
