//! ClientActor - the single logical thread of the client
//!
//! Owns the channel supervisor, the poll scheduler, the state tables and the
//! display sink, and processes every [`ClientEvent`] sequentially from one
//! queue. Nothing here is shared, so nothing here is locked.
//!
//! ```text
//!   reconnect Ticker ─┐
//!   poll Ticker ──────┤
//!   transport task ───┼──> event_rx ──> ClientActor ──> ChannelSupervisor ──> transport
//!   ClientHandle ─────┤                    │
//!   hash task ────────┘                    └──> router ──> StateTables / DisplaySink
//! ```

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::commands::{ClientCommand, ClientEvent, ClientSnapshot};
use super::handle::ClientHandle;
use crate::config::AppConfig;
use crate::connection::{ChannelCallback, ChannelSupervisor, Transport};
use crate::error::ClientError;
use crate::protocol::{credential, OutboundCommand, RemoteSettingRequest};
use crate::router;
use crate::scheduler::{PollScheduler, TickCallback, Ticker, TimerKind};
use crate::sink::DisplaySink;
use crate::state::StateTables;

/// Actor driving one bridge session
pub struct ClientActor {
    config: AppConfig,
    supervisor: ChannelSupervisor,
    poller: PollScheduler,
    tables: StateTables,
    sink: Box<dyn DisplaySink>,
    on_tick: TickCallback,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
    event_rx: mpsc::UnboundedReceiver<ClientEvent>,
}

impl ClientActor {
    /// Spawn the actor and return a handle plus its task
    ///
    /// The first connection attempt happens after the configured startup
    /// delay, then every reconnect interval for as long as the actor runs.
    /// Fails without spawning anything when the configuration is invalid.
    pub fn spawn<T, S>(
        config: AppConfig,
        transport: T,
        sink: S,
    ) -> Result<(ClientHandle, JoinHandle<()>), ClientError>
    where
        T: Transport,
        S: DisplaySink + 'static,
    {
        config
            .validate()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let channel_tx = event_tx.clone();
        let on_channel: ChannelCallback = Arc::new(move |event| {
            let _ = channel_tx.send(ClientEvent::Channel(event));
        });

        let tick_tx = event_tx.clone();
        let on_tick: TickCallback = Arc::new(move |kind| {
            let _ = tick_tx.send(ClientEvent::Tick(kind));
        });

        let actor = Self {
            supervisor: ChannelSupervisor::new(config.url(), Box::new(transport), on_channel),
            poller: PollScheduler::new(config.poll_interval(), on_tick.clone()),
            tables: StateTables::new(),
            sink: Box::new(sink),
            on_tick,
            event_tx: event_tx.clone(),
            event_rx,
            config,
        };

        let task = tokio::spawn(actor.run());
        Ok((ClientHandle::new(event_tx), task))
    }

    async fn run(mut self) {
        info!("Starting bridge client for {}", self.supervisor.url());

        let _reconnect = Ticker::spawn(
            TimerKind::Reconnect,
            self.config.startup_delay(),
            self.config.reconnect_interval(),
            self.on_tick.clone(),
        );

        if self.config.timing.poll_on_start {
            self.poller.start();
        }

        while let Some(event) = self.event_rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }

        self.supervisor.shutdown();
        info!("Bridge client stopped");
    }

    /// Process one event to completion; returns false on shutdown
    fn handle_event(&mut self, event: ClientEvent) -> bool {
        match event {
            ClientEvent::Tick(TimerKind::Reconnect) => {
                self.supervisor.ensure_connected();
            },
            ClientEvent::Tick(TimerKind::Poll) => {
                let requests = self.poller.on_tick(self.supervisor.is_connected());
                for command in &requests {
                    self.supervisor.send(command);
                }
            },
            ClientEvent::Channel(event) => {
                if let Some(frame) = self.supervisor.handle_event(event, self.sink.as_mut()) {
                    router::route_frame(&frame, &mut self.tables, self.sink.as_mut());
                }
            },
            ClientEvent::CredentialHashed(command) => {
                self.supervisor.send(&command);
            },
            ClientEvent::Command(command) => return self.handle_command(command),
        }
        true
    }

    fn handle_command(&mut self, command: ClientCommand) -> bool {
        match command {
            ClientCommand::StartPolling => self.poller.start(),
            ClientCommand::StopPolling => self.poller.stop(),
            ClientCommand::RequestDeviceIds => {
                self.supervisor.send(&OutboundCommand::device_ids());
            },
            ClientCommand::RequestPlayArea => {
                self.supervisor.send(&OutboundCommand::play_area());
            },
            ClientCommand::RequestApplicationInfo => {
                self.supervisor.send(&OutboundCommand::application_info());
            },
            ClientCommand::RequestProperties => {
                let requests = OutboundCommand::property_requests(
                    self.tables.device_ids(),
                    &self.config.property_name,
                );
                debug!("Requesting {} for {} devices", self.config.property_name, requests.len());
                for command in &requests {
                    self.supervisor.send(command);
                }
            },
            ClientCommand::SendRemoteSetting(request) => self.spawn_remote_setting(request),
            ClientCommand::Snapshot { response } => {
                let _ = response.send(ClientSnapshot {
                    connection: self.supervisor.state(),
                    polling: self.poller.is_running(),
                    tables: self.tables.clone(),
                });
            },
            ClientCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            },
        }
        true
    }

    /// Hash the credential on a detached task, then queue the command
    ///
    /// There is deliberately no timeout: if hashing never completes the
    /// command is never sent and nothing is reported.
    fn spawn_remote_setting(&self, request: RemoteSettingRequest) {
        debug!(?request, "Hashing credential for remote setting");
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            if let Some(hash) = credential::hash_password_async(request.password.clone()).await {
                let command = OutboundCommand::remote_setting(&request, hash);
                let _ = event_tx.send(ClientEvent::CredentialHashed(command));
            }
        });
    }
}
