//! State aggregation - tables folded from routed bridge messages
//!
//! The tables are owned by the client actor and only mutated through the
//! merge/replace accessors.

mod tables;

pub use tables::StateTables;
