//! HALO Gateway - WebSocket transport collaborator
//!
//! This crate implements the transport side of the protocol:
//! - One WebSocket connection per client, one fresh session id each
//! - Decoding client envelopes into typed events for the sync engine
//! - Fan-out of engine publishes over a broadcast channel
//! - Liveness probe (`GET /api/hello`) and CORS for browser clients
//!
//! The engine never blocks on this crate: publishes go into a
//! [`tokio::sync::broadcast`] channel and slow clients lag and skip
//! ahead rather than applying backpressure.

pub mod channel;
pub mod config;
pub mod envelope;
pub mod server;
pub mod state;
pub mod ws;

pub use channel::*;
pub use config::*;
pub use envelope::*;
pub use server::*;
pub use state::*;
