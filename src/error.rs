//! Hub error types
//!
//! Registry and routing operations are infallible by design: malformed
//! input degrades to a no-op rather than aborting the surrounding request.
//! Errors only arise at the serialization edges.

use thiserror::Error;

/// Error type for hub operations
#[derive(Debug, Error)]
pub enum HubError {
    /// An inbound event could not be decoded from JSON
    #[error("malformed inbound event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    /// An outbound envelope could not be encoded
    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result alias for hub operations
pub type Result<T> = std::result::Result<T, HubError>;
