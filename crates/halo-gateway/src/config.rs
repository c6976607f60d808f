//! Gateway configuration

use std::net::SocketAddr;

/// Gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Address the WebSocket server binds to.
    pub bind_addr: SocketAddr,
    /// Capacity of the fan-out broadcast channel. A subscriber that falls
    /// behind by more than this many frames skips ahead to the newest.
    pub broadcast_capacity: usize,
    /// Origin allowed by the CORS layer; `None` allows any origin.
    pub allowed_origin: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            bind_addr: ([127, 0, 0, 1], 8080).into(),
            broadcast_capacity: 256,
            allowed_origin: Some("http://localhost:5173".to_owned()),
        }
    }
}
