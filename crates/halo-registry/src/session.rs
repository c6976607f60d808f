//! Session index - transport session to participant binding

use dashmap::DashMap;

use halo_core::{ParticipantId, SessionId};

/// Bidirectional association from live transport sessions to participants
///
/// One entry per live connection. A reconnecting participant gets a fresh
/// session, and registration removes the stale binding as part of the
/// migration, so no dangling session entries remain.
#[derive(Debug, Default)]
pub struct SessionIndex {
    sessions: DashMap<SessionId, ParticipantId>,
}

impl SessionIndex {
    pub fn new() -> Self {
        SessionIndex::default()
    }

    /// Bind a session to a participant, overwriting any prior binding.
    pub fn bind(&self, session: SessionId, participant: ParticipantId) {
        self.sessions.insert(session, participant);
    }

    /// Resolve a session to its participant, if bound.
    pub fn lookup(&self, session: SessionId) -> Option<ParticipantId> {
        self.sessions.get(&session).map(|r| r.value().clone())
    }

    /// Remove and return a session's binding.
    ///
    /// Idempotent: unbinding an unknown or already-removed session returns
    /// `None`, it is not an error (double disconnects happen).
    pub fn unbind(&self, session: SessionId) -> Option<ParticipantId> {
        self.sessions.remove(&session).map(|(_, id)| id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
