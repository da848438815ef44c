//! Channel supervision
//!
//! The supervisor owns the single transport handle to the bridge. Each
//! connection attempt gets a new generation number; events from older
//! generations are ignored so a stale socket can never flip the state.

mod supervisor;
mod websocket;

pub use supervisor::ChannelSupervisor;
pub use websocket::WebSocketTransport;

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Connection state of the bridge channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// What happened on a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEventKind {
    Opened,
    Frame(String),
    Error(String),
    Closed,
}

/// Event reported by the transport for one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    pub generation: u64,
    pub kind: ChannelEventKind,
}

/// Callback through which transports report channel events
pub type ChannelCallback = Arc<dyn Fn(ChannelEvent) + Send + Sync>;

/// Sending side of one open channel
///
/// Dropping the outbound sender asks the transport task to close the socket.
pub struct ChannelHandle {
    outbound: mpsc::UnboundedSender<String>,
}

impl ChannelHandle {
    pub fn new(outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { outbound }
    }

    /// Queue a text frame; returns false when the channel task is gone
    pub fn send(&self, text: String) -> bool {
        self.outbound.send(text).is_ok()
    }

    /// Close the channel
    ///
    /// The transport task sends a close frame and exits on its own; any
    /// events it still reports carry a stale generation.
    pub fn close(self) {
        drop(self.outbound);
    }
}

/// Opens channels to the bridge
pub trait Transport: Send + 'static {
    /// Start a connection attempt and return its handle immediately
    ///
    /// Progress is reported through `on_event`, tagged with `generation`.
    /// A failed attempt reports `Error` followed by `Closed`.
    fn open(&self, url: &str, generation: u64, on_event: ChannelCallback) -> ChannelHandle;
}
