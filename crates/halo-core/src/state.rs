//! Participant state model
//!
//! A participant's state is the unit of synchronization: a mutable record
//! keyed by its stable id, rebroadcast to every subscriber whenever any
//! field changes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, SessionId};

/// World position of a participant
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z }
    }
}

/// Named animation states currently active for a participant
///
/// Flags are mutually non-exclusive (a participant can be walking and
/// punching at once) and carried opaquely: no combination is validated
/// here. Serialized as a sorted array of active flag names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationFlags(pub BTreeSet<String>);

impl AnimationFlags {
    pub fn new() -> Self {
        AnimationFlags::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnimationFlags(names.into_iter().map(Into::into).collect())
    }

    pub fn set(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn clear(&mut self, name: &str) {
        self.0.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Authoritative state of one participant
///
/// `session_id` is absent only before first registration; once the
/// participant is in the registry it always carries the session that
/// last registered it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantState {
    pub id: ParticipantId,
    pub session_id: Option<SessionId>,
    pub display_name: String,
    pub position: Position,
    pub facing_angle: f64,
    pub animation_flags: AnimationFlags,
}

impl ParticipantState {
    /// Overwrite the participant-owned fields with the incoming profile.
    ///
    /// Events arrive fully populated except for `animation_flags`, which
    /// may be absent; absence keeps the previous value rather than
    /// clearing it.
    pub fn apply_profile(&mut self, profile: &ParticipantProfile) {
        self.display_name = profile.display_name.clone();
        self.position = profile.position;
        self.facing_angle = profile.facing_angle;
        if let Some(flags) = &profile.animation_flags {
            self.animation_flags = flags.clone();
        }
    }
}

/// Participant-owned fields carried by register and update events
///
/// This is the wire shape the transport decodes; the engine turns it into
/// (or merges it into) a [`ParticipantState`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantProfile {
    pub id: ParticipantId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub facing_angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_flags: Option<AnimationFlags>,
}

impl ParticipantProfile {
    /// Materialize a full state for a first-time registration.
    pub fn into_state(self, session_id: SessionId) -> ParticipantState {
        ParticipantState {
            id: self.id,
            session_id: Some(session_id),
            display_name: self.display_name,
            position: self.position,
            facing_angle: self.facing_angle,
            animation_flags: self.animation_flags.unwrap_or_default(),
        }
    }
}
