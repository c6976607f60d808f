//! Shared gateway state
//!
//! One [`GatewayState`] per process: the sync engine (with its channel
//! gateway) plus the session id allocator. Session ids come from a
//! monotonic counter, so an id is never reused after its connection
//! closes.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use halo_core::SessionId;
use halo_sync::SyncEngine;

use crate::{ChannelGateway, ClientEnvelope, GatewayConfig};

/// Shared state behind every connection task
pub struct GatewayState {
    engine: SyncEngine<ChannelGateway>,
    next_session: AtomicU64,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig) -> Self {
        GatewayState {
            engine: SyncEngine::new(ChannelGateway::new(config.broadcast_capacity)),
            next_session: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &SyncEngine<ChannelGateway> {
        &self.engine
    }

    /// Allocate a fresh session id for a new connection.
    pub fn allocate_session(&self) -> SessionId {
        SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed))
    }

    /// Decode one client message and feed it to the engine.
    ///
    /// Register events take the connection's own session; updates and
    /// interactions carry the participant identity themselves.
    pub fn dispatch(&self, session: SessionId, text: &str) {
        match ClientEnvelope::decode(text) {
            Ok(ClientEnvelope::Register { profile }) => {
                self.engine.handle_register(profile, session);
            }
            Ok(ClientEnvelope::Update { profile }) => {
                self.engine.handle_update(profile);
            }
            Ok(ClientEnvelope::Interact { event }) => {
                self.engine.handle_directed(event);
            }
            Err(e) => {
                warn!("dropping undecodable message on session {}: {}", session, e);
            }
        }
    }
}
