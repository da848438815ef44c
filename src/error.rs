//! Error taxonomy for the bridge client
//!
//! Transport and decode errors are recovered where they occur (retry timer,
//! generic display). None of them is fatal to a running client.

use thiserror::Error;

/// Errors produced by the client core
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, dropped, or a failed frame write
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// Inbound frame is not valid JSON or its payload does not match its key
    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// Result envelope carrying a key outside the dispatch table
    #[error("unknown result key: {0}")]
    UnknownKey(String),

    /// Envelope whose `Type` is neither a result nor a digital input event
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Configuration rejected before the client started
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The client actor has shut down and no longer answers queries
    #[error("client is no longer running")]
    Stopped,
}
