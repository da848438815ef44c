//! Events and commands processed by the client actor
//!
//! Every source of work (timers, the transport, user intents, finished
//! credential hashes) is funnelled into one [`ClientEvent`] queue so the
//! actor handles them one at a time, in arrival order.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::connection::{ChannelEvent, ConnectionState};
use crate::protocol::{OutboundCommand, RemoteSettingRequest};
use crate::scheduler::TimerKind;
use crate::state::StateTables;

/// Everything the actor reacts to
pub enum ClientEvent {
    /// A timer fired
    Tick(TimerKind),
    /// The transport reported progress on a channel
    Channel(ChannelEvent),
    /// A user intent from a [`super::ClientHandle`]
    Command(ClientCommand),
    /// A remote setting command whose credential hash has resolved
    CredentialHashed(OutboundCommand),
}

/// User intents
pub enum ClientCommand {
    StartPolling,
    StopPolling,
    RequestDeviceIds,
    RequestPlayArea,
    RequestApplicationInfo,
    /// One property request per headset and controller in the current device ids
    RequestProperties,
    /// Hash the password, then send the remote setting command
    SendRemoteSetting(RemoteSettingRequest),
    Snapshot {
        response: oneshot::Sender<ClientSnapshot>,
    },
    Shutdown,
}

/// Point-in-time view of the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSnapshot {
    pub connection: ConnectionState,
    pub polling: bool,
    pub tables: StateTables,
}
