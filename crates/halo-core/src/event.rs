//! Inbound event model
//!
//! The transport decodes one event per client message and hands it to the
//! synchronization engine. Events are fire-and-forget: a rejected event is
//! logged and dropped, never retried, because the next periodic update
//! supersedes it.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// Point-to-point flavored notification (e.g. a hit) relayed verbatim to
/// all subscribers without touching the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectedEvent {
    pub from_id: ParticipantId,
    pub target_id: ParticipantId,
    /// Opaque to the engine; whatever the sender attached is forwarded.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Result of applying one inbound event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// State mutated (or relayed) and a broadcast was published.
    Applied,
    /// Event dropped with a diagnostic; no mutation, no broadcast.
    Rejected(RejectReason),
}

impl ApplyOutcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

/// Why an inbound event was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Register/update/directed event with a null or empty participant id.
    MissingIdentity,
    /// Update for an id never registered; updates never create entries.
    UnknownParticipant,
}
