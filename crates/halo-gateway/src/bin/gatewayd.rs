//! HALO gateway daemon

use std::sync::Arc;

use halo_core::HaloResult;
use halo_gateway::{init_tracing, serve, GatewayConfig, GatewayState};

#[tokio::main]
async fn main() -> HaloResult<()> {
    init_tracing();

    let config = GatewayConfig::default();
    let state = Arc::new(GatewayState::new(&config));

    serve(config, state).await
}
