//! HALO Sync - Synchronization engine and broadcast policy
//!
//! This crate implements the merge/update protocol applied to incoming
//! participant events and the fan-out policy that republishes a consistent
//! snapshot to every subscriber after each successful mutation:
//! - Register handling (new participant / reconnect migration)
//! - Update merging
//! - Disconnect cleanup
//! - Directed event relay

pub mod broadcast;
pub mod engine;

pub use broadcast::*;
pub use engine::*;
