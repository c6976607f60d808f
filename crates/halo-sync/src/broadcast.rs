//! Broadcast gateway seam
//!
//! The engine does not deliver anything itself; it hands value copies to a
//! [`BroadcastGateway`] and the transport fans them out to every
//! subscriber on the named topic.

use halo_core::{DirectedEvent, ParticipantState};

/// Topic carrying the full participant snapshot after every successful
/// mutation.
pub const PARTICIPANTS_TOPIC: &str = "/topic/participants";

/// Topic carrying discrete directed interaction events.
pub const INTERACTIONS_TOPIC: &str = "/topic/interactions";

/// Payload handed to the gateway for one publish
#[derive(Clone, Debug, PartialEq)]
pub enum BroadcastPayload {
    /// Point-in-time copy of every participant's current state.
    Snapshot(Vec<ParticipantState>),
    /// Directed interaction relayed verbatim.
    Directed(DirectedEvent),
}

/// Fan-out collaborator consumed, not implemented, by the engine
///
/// `publish` is invoked after the mutation is already durable in memory,
/// with no registry lock held; the payload is a value copy safe to
/// transmit while the registry keeps mutating.
pub trait BroadcastGateway: Send + Sync {
    fn publish(&self, topic: &str, payload: BroadcastPayload);
}
