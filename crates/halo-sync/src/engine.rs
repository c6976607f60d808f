//! Synchronization engine
//!
//! Applies decoded transport events to the registry and session index
//! under per-key atomicity, then republishes the global snapshot. Every
//! transport connection drives this engine from its own task, so all
//! handlers take `&self` and rely on the stores' striped locking.

use tracing::{debug, info, warn};

use halo_core::{
    ApplyOutcome, DirectedEvent, ParticipantProfile, RejectReason, SessionId,
};
use halo_registry::{ParticipantRegistry, SessionIndex};

use crate::{BroadcastGateway, BroadcastPayload, INTERACTIONS_TOPIC, PARTICIPANTS_TOPIC};

/// The participant synchronization engine
///
/// Owns the two stores and the broadcast seam. Rejected events are logged
/// and dropped; they never surface as errors because the next periodic
/// update supersedes them.
pub struct SyncEngine<G> {
    registry: ParticipantRegistry,
    sessions: SessionIndex,
    gateway: G,
}

impl<G: BroadcastGateway> SyncEngine<G> {
    pub fn new(gateway: G) -> Self {
        SyncEngine {
            registry: ParticipantRegistry::new(),
            sessions: SessionIndex::new(),
            gateway,
        }
    }

    /// The participant registry (shared with tests and the liveness probe).
    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    /// The session index.
    pub fn sessions(&self) -> &SessionIndex {
        &self.sessions
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Handle a register event from `session`.
    ///
    /// An unseen id is inserted as a new participant. A known id is a
    /// reconnect: the participant-owned fields are fully replaced, the
    /// session migrates, and the stale session binding is removed. Either
    /// way the session index gains `session -> id` and the full snapshot
    /// is republished.
    pub fn handle_register(&self, profile: ParticipantProfile, session: SessionId) -> ApplyOutcome {
        if profile.id.is_empty() {
            warn!("register event dropped: null or empty participant id");
            return ApplyOutcome::Rejected(RejectReason::MissingIdentity);
        }

        let id = profile.id.clone();
        let mut prior_session = None;

        self.registry.upsert_with(
            id.clone(),
            || profile.clone().into_state(session),
            |existing| {
                prior_session = existing.session_id;
                existing.apply_profile(&profile);
                existing.session_id = Some(session);
            },
        );

        match prior_session {
            // Reconnect on a new session: drop the stale binding so no
            // dangling session entry survives the migration.
            Some(old) if old != session => {
                if self.sessions.unbind(old).is_some() {
                    debug!("removed stale session binding {} for participant {}", old, id);
                }
                info!(
                    "participant {} re-registered: session {} -> {}",
                    id, old, session
                );
            }
            Some(_) => {
                info!("participant {} re-registered on session {}", id, session);
            }
            None => {
                info!("new participant {} registered on session {}", id, session);
            }
        }

        self.sessions.bind(session, id);
        self.publish_snapshot();
        ApplyOutcome::Applied
    }

    /// Handle a state update. Updates never create participants.
    pub fn handle_update(&self, profile: ParticipantProfile) -> ApplyOutcome {
        if profile.id.is_empty() {
            warn!("update event dropped: null or empty participant id");
            return ApplyOutcome::Rejected(RejectReason::MissingIdentity);
        }

        let updated = self
            .registry
            .update_if_present(&profile.id, |state| state.apply_profile(&profile));

        match updated {
            Some(state) => {
                debug!(
                    "updated participant {} (pos {:?}, facing {})",
                    state.id, state.position, state.facing_angle
                );
                self.publish_snapshot();
                ApplyOutcome::Applied
            }
            None => {
                warn!("update dropped for unknown participant {}", profile.id);
                ApplyOutcome::Rejected(RejectReason::UnknownParticipant)
            }
        }
    }

    /// Handle a transport disconnect for `session`.
    ///
    /// Idempotent: an unknown session is a no-op, not an error. A departed
    /// participant is removed entirely, but only while its registry entry
    /// still points at this session - a racing re-registration on a newer
    /// session must survive. The snapshot is republished regardless so
    /// clients converge even on redundant notifications.
    pub fn handle_disconnect(&self, session: SessionId) {
        match self.sessions.unbind(session) {
            Some(id) => {
                let removed = self
                    .registry
                    .remove_if(&id, |state| state.session_id == Some(session));
                if removed.is_some() {
                    info!("participant {} removed (session {} disconnected)", id, session);
                } else {
                    debug!(
                        "session {} disconnected but participant {} already migrated",
                        session, id
                    );
                }
            }
            None => {
                debug!("disconnect for unknown session {} (already handled)", session);
            }
        }

        self.publish_snapshot();
    }

    /// Relay a directed interaction to all subscribers.
    ///
    /// No registry mutation; the event is forwarded verbatim on the
    /// interactions topic. Events naming an unregistered participant are
    /// stale references and are dropped.
    pub fn handle_directed(&self, event: DirectedEvent) -> ApplyOutcome {
        if event.from_id.is_empty() || event.target_id.is_empty() {
            warn!("directed event dropped: null or empty participant id");
            return ApplyOutcome::Rejected(RejectReason::MissingIdentity);
        }

        if !self.registry.contains(&event.from_id) || !self.registry.contains(&event.target_id) {
            warn!(
                "directed event dropped: unknown participant ({} -> {})",
                event.from_id, event.target_id
            );
            return ApplyOutcome::Rejected(RejectReason::UnknownParticipant);
        }

        debug!("relaying directed event {} -> {}", event.from_id, event.target_id);
        self.gateway
            .publish(INTERACTIONS_TOPIC, BroadcastPayload::Directed(event));
        ApplyOutcome::Applied
    }

    /// Publish a point-in-time copy of the whole registry.
    ///
    /// Called after the mutation has completed, so the copy never exposes
    /// a half-applied record and no lock is held during transmission.
    fn publish_snapshot(&self) {
        self.gateway.publish(
            PARTICIPANTS_TOPIC,
            BroadcastPayload::Snapshot(self.registry.snapshot()),
        );
    }
}
