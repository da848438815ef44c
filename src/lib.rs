//! OpenVR2WS bridge client
//!
//! Keeps one WebSocket channel to the bridge alive, polls analog and pose
//! state on demand, and folds inbound results into per-session tables shown
//! through a display sink.

pub mod cli;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod router;
pub mod scheduler;
pub mod sink;
pub mod state;

pub use client::{ClientActor, ClientHandle, ClientSnapshot};
pub use config::AppConfig;
pub use error::ClientError;
