//! Bridge client - actor, commands and handle
//!
//! The actor is the only owner of connection, scheduling and table state;
//! callers interact with it through a cloneable [`ClientHandle`].

mod actor;
mod commands;
mod handle;

pub use actor::ClientActor;
pub use commands::{ClientCommand, ClientEvent, ClientSnapshot};
pub use handle::ClientHandle;
