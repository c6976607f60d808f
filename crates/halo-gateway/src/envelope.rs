//! Client envelope decoding
//!
//! Each WebSocket text message carries exactly one event, tagged by
//! `type`. Undecodable messages are dropped with a diagnostic; they never
//! reach the engine.

use serde::Deserialize;

use halo_core::{DirectedEvent, HaloResult, ParticipantProfile};

/// One decoded client message
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEnvelope {
    /// First registration or reconnect of the sender's participant.
    Register {
        #[serde(flatten)]
        profile: ParticipantProfile,
    },
    /// Periodic state report for the sender's participant.
    Update {
        #[serde(flatten)]
        profile: ParticipantProfile,
    },
    /// Directed interaction to relay (e.g. a hit notice).
    Interact {
        #[serde(flatten)]
        event: DirectedEvent,
    },
}

impl ClientEnvelope {
    pub fn decode(text: &str) -> HaloResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
