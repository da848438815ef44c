//! ClientHandle - public API for the client actor
//!
//! Fire-and-forget methods for user intents, plus an async snapshot query.

use tokio::sync::{mpsc, oneshot};

use super::commands::{ClientCommand, ClientEvent, ClientSnapshot};
use crate::error::ClientError;
use crate::protocol::RemoteSettingRequest;

/// Handle for interacting with the client actor
#[derive(Clone)]
pub struct ClientHandle {
    event_tx: mpsc::UnboundedSender<ClientEvent>,
}

impl ClientHandle {
    pub(super) fn new(event_tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { event_tx }
    }

    fn command(&self, command: ClientCommand) {
        let _ = self.event_tx.send(ClientEvent::Command(command));
    }

    pub fn start_polling(&self) {
        self.command(ClientCommand::StartPolling);
    }

    /// Stop polling; takes effect at the next poll tick
    pub fn stop_polling(&self) {
        self.command(ClientCommand::StopPolling);
    }

    pub fn request_device_ids(&self) {
        self.command(ClientCommand::RequestDeviceIds);
    }

    pub fn request_play_area(&self) {
        self.command(ClientCommand::RequestPlayArea);
    }

    pub fn request_application_info(&self) {
        self.command(ClientCommand::RequestApplicationInfo);
    }

    pub fn request_properties(&self) {
        self.command(ClientCommand::RequestProperties);
    }

    /// Send a remote setting change once its password hash resolves
    pub fn send_remote_setting(&self, request: RemoteSettingRequest) {
        self.command(ClientCommand::SendRemoteSetting(request));
    }

    /// Current connection state, polling flag and state tables
    pub async fn snapshot(&self) -> Result<ClientSnapshot, ClientError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.event_tx
            .send(ClientEvent::Command(ClientCommand::Snapshot {
                response: response_tx,
            }))
            .map_err(|_| ClientError::Stopped)?;

        response_rx.await.map_err(|_| ClientError::Stopped)
    }

    pub fn shutdown(&self) {
        self.command(ClientCommand::Shutdown);
    }

    /// Whether the actor has stopped
    pub fn is_closed(&self) -> bool {
        self.event_tx.is_closed()
    }
}
