//! Broadcast fan-out over a tokio broadcast channel
//!
//! [`ChannelGateway`] is the [`BroadcastGateway`] implementation handed to
//! the engine. Each publish is serialized once into a wire frame and sent
//! to every subscribed connection task.

use tokio::sync::broadcast;
use tracing::warn;

use halo_sync::{BroadcastGateway, BroadcastPayload};

/// One outbound wire frame, pre-serialized
#[derive(Clone, Debug)]
pub struct OutboundFrame {
    /// Logical topic the frame was published on.
    pub topic: String,
    /// Complete JSON text message ready to hand to the socket.
    pub text: String,
}

/// Broadcast gateway backed by `tokio::sync::broadcast`
///
/// Publishing never blocks: with no subscribers the frame is dropped, and
/// a lagging subscriber skips ahead in its own task.
#[derive(Clone, Debug)]
pub struct ChannelGateway {
    tx: broadcast::Sender<OutboundFrame>,
}

impl ChannelGateway {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        ChannelGateway { tx }
    }

    /// Subscribe a connection task to all future frames.
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundFrame> {
        self.tx.subscribe()
    }

    /// Number of currently subscribed connections.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl BroadcastGateway for ChannelGateway {
    fn publish(&self, topic: &str, payload: BroadcastPayload) {
        let body = match &payload {
            BroadcastPayload::Snapshot(snapshot) => serde_json::to_value(snapshot),
            BroadcastPayload::Directed(event) => serde_json::to_value(event),
        };

        let body = match body {
            Ok(body) => body,
            Err(e) => {
                warn!("dropping broadcast on {}: serialization failed: {}", topic, e);
                return;
            }
        };

        let frame = serde_json::json!({ "topic": topic, "payload": body });

        // Err means no live subscriber, which is fine: the next subscriber
        // gets a fresh snapshot on its own register.
        let _ = self.tx.send(OutboundFrame {
            topic: topic.to_owned(),
            text: frame.to_string(),
        });
    }
}
