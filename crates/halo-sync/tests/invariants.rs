//! Property tests: the registry/session invariants hold under arbitrary
//! event sequences, checked against a sequential model.

use std::collections::HashMap;

use proptest::prelude::*;

use halo_core::{ParticipantId, ParticipantProfile, Position, SessionId};
use halo_sync::{BroadcastGateway, BroadcastPayload, SyncEngine};

/// Gateway that discards everything; these tests only inspect the stores.
struct NullGateway;

impl BroadcastGateway for NullGateway {
    fn publish(&self, _topic: &str, _payload: BroadcastPayload) {}
}

#[derive(Clone, Debug)]
enum Op {
    /// Register participant `p` on a fresh session.
    Register(u8),
    /// Update participant `p`'s position.
    Update(u8, i32),
    /// Disconnect the `n`-th session issued so far (possibly twice).
    Disconnect(u8),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (0u8..4).prop_map(Op::Register),
            ((0u8..4), any::<i32>()).prop_map(|(p, x)| Op::Update(p, x)),
            (0u8..16).prop_map(Op::Disconnect),
        ],
        1..60,
    )
}

fn pid(p: u8) -> ParticipantId {
    ParticipantId::new(format!("p{p}"))
}

fn profile(p: u8, x: f64) -> ParticipantProfile {
    ParticipantProfile {
        id: pid(p),
        display_name: format!("p{p}"),
        position: Position::new(x, 0.0, 0.0),
        facing_angle: 0.0,
        animation_flags: None,
    }
}

/// Sequential model of the registry + session index semantics.
#[derive(Default)]
struct Model {
    participants: HashMap<ParticipantId, (SessionId, f64)>,
    sessions: HashMap<SessionId, ParticipantId>,
}

impl Model {
    fn register(&mut self, p: u8, session: SessionId) {
        let id = pid(p);
        if let Some((old, _)) = self.participants.get(&id).copied() {
            if old != session {
                self.sessions.remove(&old);
            }
        }
        self.participants.insert(id.clone(), (session, 0.0));
        self.sessions.insert(session, id);
    }

    fn update(&mut self, p: u8, x: f64) {
        if let Some(entry) = self.participants.get_mut(&pid(p)) {
            entry.1 = x;
        }
    }

    fn disconnect(&mut self, session: SessionId) {
        if let Some(id) = self.sessions.remove(&session) {
            if self.participants.get(&id).is_some_and(|(s, _)| *s == session) {
                self.participants.remove(&id);
            }
        }
    }
}

proptest! {
    #[test]
    fn registry_matches_model_under_arbitrary_events(ops in ops()) {
        let engine = SyncEngine::new(NullGateway);
        let mut model = Model::default();
        let mut issued: Vec<SessionId> = Vec::new();
        let mut next_session = 0u64;

        for op in ops {
            match op {
                Op::Register(p) => {
                    // Sessions are transport-issued and never reused.
                    next_session += 1;
                    let session = SessionId::new(next_session);
                    issued.push(session);
                    engine.handle_register(profile(p, 0.0), session);
                    model.register(p, session);
                }
                Op::Update(p, x) => {
                    engine.handle_update(profile(p, f64::from(x)));
                    model.update(p, f64::from(x));
                }
                Op::Disconnect(n) => {
                    if issued.is_empty() {
                        continue;
                    }
                    let session = issued[n as usize % issued.len()];
                    engine.handle_disconnect(session);
                    model.disconnect(session);
                }
            }
        }

        // Registry contents match the model exactly (identity uniqueness
        // is structural: one entry per id).
        prop_assert_eq!(engine.registry().len(), model.participants.len());
        for (id, (session, x)) in &model.participants {
            let state = engine.registry().get(id);
            prop_assert!(state.is_some());
            let state = state.unwrap();
            prop_assert_eq!(state.session_id, Some(*session));
            prop_assert_eq!(state.position.x, *x);
        }

        // Session exclusivity: every live binding agrees with its
        // participant's recorded session, and dead sessions stay dead.
        prop_assert_eq!(engine.sessions().len(), model.sessions.len());
        for session in &issued {
            let bound = engine.sessions().lookup(*session);
            prop_assert_eq!(bound.as_ref(), model.sessions.get(session));
            if let Some(id) = bound {
                let state = engine.registry().get(&id).unwrap();
                prop_assert_eq!(state.session_id, Some(*session));
            }
        }
    }

    #[test]
    fn reconnect_always_migrates(p in 0u8..4, s1 in 1u64..1000, offset in 1u64..1000) {
        let engine = SyncEngine::new(NullGateway);
        let s1 = SessionId::new(s1);
        let s2 = SessionId::new(s1.0 + offset);

        engine.handle_register(profile(p, 0.0), s1);
        engine.handle_register(profile(p, 1.0), s2);

        prop_assert_eq!(engine.registry().len(), 1);
        prop_assert_eq!(engine.registry().get(&pid(p)).unwrap().session_id, Some(s2));
        prop_assert_eq!(engine.sessions().lookup(s1), None);
        prop_assert_eq!(engine.sessions().lookup(s2), Some(pid(p)));
    }
}
