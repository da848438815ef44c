//! ChannelSupervisor - single-connection lifecycle with fixed-interval retry

use tracing::{debug, info, warn};

use super::{
    ChannelCallback, ChannelEvent, ChannelEventKind, ChannelHandle, ConnectionState, Transport,
};
use crate::protocol::OutboundCommand;
use crate::sink::{error_line, DisplaySink};

/// Owns the transport handle and the connection state
///
/// Retrying is driven from outside: the owner calls [`ensure_connected`]
/// on a fixed timer regardless of state.
///
/// [`ensure_connected`]: ChannelSupervisor::ensure_connected
pub struct ChannelSupervisor {
    url: String,
    transport: Box<dyn Transport>,
    on_event: ChannelCallback,
    state: ConnectionState,
    generation: u64,
    handle: Option<ChannelHandle>,
}

impl ChannelSupervisor {
    pub fn new(
        url: impl Into<String>,
        transport: Box<dyn Transport>,
        on_event: ChannelCallback,
    ) -> Self {
        Self {
            url: url.into(),
            transport,
            on_event,
            state: ConnectionState::Disconnected,
            generation: 0,
            handle: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Generation of the most recent connection attempt (0 before the first)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Open a new channel unless one is connected or still connecting
    ///
    /// Returns whether a new attempt was started.
    pub fn ensure_connected(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }

        if let Some(stale) = self.handle.take() {
            stale.close();
        }

        self.generation += 1;
        self.state = ConnectionState::Connecting;
        debug!("⏳ Bridge connect #{} to {}", self.generation, self.url);
        let handle = self
            .transport
            .open(&self.url, self.generation, self.on_event.clone());
        self.handle = Some(handle);
        true
    }

    /// Apply a channel event
    ///
    /// Returns the frame text when the event is an inbound frame from the
    /// current channel; stale-generation events are dropped.
    pub fn handle_event(
        &mut self,
        event: ChannelEvent,
        sink: &mut dyn DisplaySink,
    ) -> Option<String> {
        if event.generation != self.generation {
            debug!(
                "Ignoring event from stale channel #{} (current #{})",
                event.generation, self.generation
            );
            return None;
        }

        match event.kind {
            ChannelEventKind::Opened => {
                self.state = ConnectionState::Connected;
                info!("✅ Bridge connected: {}", self.url);
                sink.show_connected("CONNECTED");
                None
            },
            ChannelEventKind::Closed => {
                if self.state != ConnectionState::Disconnected {
                    self.state = ConnectionState::Disconnected;
                    info!("🔌 Bridge disconnected");
                    sink.notify("DISCONNECTED");
                }
                None
            },
            ChannelEventKind::Error(description) => {
                warn!("Bridge channel error: {}", description);
                sink.notify(&error_line(&description));
                None
            },
            ChannelEventKind::Frame(text) => Some(text),
        }
    }

    /// Send a command on the live channel; fire-and-forget
    ///
    /// Returns whether the command was handed to the transport. Sends while
    /// not connected are dropped.
    pub fn send(&self, command: &OutboundCommand) -> bool {
        let handle = match (&self.handle, self.state) {
            (Some(handle), ConnectionState::Connected) => handle,
            _ => {
                debug!("Dropping {:?} request: bridge not connected", command.key);
                return false;
            },
        };

        match command.to_json() {
            Ok(text) => handle.send(text),
            Err(e) => {
                warn!("Failed to serialize {:?} request: {}", command.key, e);
                false
            },
        }
    }

    /// Close the live channel, if any
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.close();
        }
        self.state = ConnectionState::Disconnected;
    }
}
