//! Participant registry - authoritative state store

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use halo_core::{ParticipantId, ParticipantState};

/// Concurrency-safe store of `ParticipantId -> ParticipantState`
///
/// Backed by a lock-striped map, so read-modify-write on one participant
/// never blocks operations on another. Accessors hand out value copies,
/// never references into live records.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: DashMap<ParticipantId, ParticipantState>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        ParticipantRegistry::default()
    }

    /// Per-key atomic read-modify-write.
    ///
    /// Creates the entry with `insert` when absent, otherwise mutates the
    /// existing record in place with `update`. The closure runs inside the
    /// key's critical section, so concurrent callers for the same id are
    /// serialized and each sees the other's completed write.
    pub fn upsert_with<I, U>(&self, id: ParticipantId, insert: I, update: U) -> ParticipantState
    where
        I: FnOnce() -> ParticipantState,
        U: FnOnce(&mut ParticipantState),
    {
        match self.participants.entry(id) {
            Entry::Occupied(mut occupied) => {
                update(occupied.get_mut());
                occupied.get().clone()
            }
            Entry::Vacant(vacant) => vacant.insert(insert()).clone(),
        }
    }

    /// Mutate an existing entry in place; absent ids are left untouched.
    ///
    /// Returns a copy of the record after mutation, or `None` when no
    /// entry exists (updates never create participants).
    pub fn update_if_present<U>(&self, id: &ParticipantId, update: U) -> Option<ParticipantState>
    where
        U: FnOnce(&mut ParticipantState),
    {
        let mut entry = self.participants.get_mut(id)?;
        update(entry.value_mut());
        Some(entry.value().clone())
    }

    /// Copy out a participant's current state.
    pub fn get(&self, id: &ParticipantId) -> Option<ParticipantState> {
        self.participants.get(id).map(|r| r.value().clone())
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.contains_key(id)
    }

    /// Remove a participant unconditionally.
    pub fn remove(&self, id: &ParticipantId) -> Option<ParticipantState> {
        self.participants.remove(id).map(|(_, state)| state)
    }

    /// Remove a participant only while `pred` holds under the key's lock.
    ///
    /// Used by disconnect handling: between resolving a session to an id
    /// and removing the entry, the participant may have re-registered on a
    /// new session, and that newer registration must survive.
    pub fn remove_if<P>(&self, id: &ParticipantId, pred: P) -> Option<ParticipantState>
    where
        P: FnOnce(&ParticipantState) -> bool,
    {
        self.participants
            .remove_if(id, |_, state| pred(state))
            .map(|(_, state)| state)
    }

    /// Point-in-time copy of all current participant states.
    ///
    /// Safe to hand to the broadcast path: no lock is held by the caller
    /// afterwards and later mutation cannot reach the copies.
    pub fn snapshot(&self) -> Vec<ParticipantState> {
        self.participants.iter().map(|r| r.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use halo_core::{ParticipantProfile, Position, SessionId};

    use super::*;

    fn state(id: &str, session: u64) -> ParticipantState {
        ParticipantProfile {
            id: ParticipantId::new(id),
            display_name: id.to_owned(),
            position: Position::default(),
            facing_angle: 0.0,
            animation_flags: None,
        }
        .into_state(SessionId::new(session))
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let registry = ParticipantRegistry::new();
        let id = ParticipantId::new("p1");

        let first = registry.upsert_with(id.clone(), || state("p1", 1), |_| unreachable!());
        assert_eq!(first.session_id, Some(SessionId::new(1)));
        assert_eq!(registry.len(), 1);

        let second = registry.upsert_with(
            id.clone(),
            || unreachable!(),
            |s| s.session_id = Some(SessionId::new(2)),
        );
        assert_eq!(second.session_id, Some(SessionId::new(2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_if_present_never_creates() {
        let registry = ParticipantRegistry::new();
        let missing = registry.update_if_present(&ParticipantId::new("ghost"), |s| {
            s.facing_angle = 1.0;
        });
        assert!(missing.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_if_respects_predicate() {
        let registry = ParticipantRegistry::new();
        let id = ParticipantId::new("p1");
        registry.upsert_with(id.clone(), || state("p1", 5), |_| {});

        // Predicate fails: entry survives.
        let kept = registry.remove_if(&id, |s| s.session_id == Some(SessionId::new(9)));
        assert!(kept.is_none());
        assert!(registry.contains(&id));

        // Predicate holds: entry removed.
        let gone = registry.remove_if(&id, |s| s.session_id == Some(SessionId::new(5)));
        assert!(gone.is_some());
        assert!(!registry.contains(&id));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let registry = ParticipantRegistry::new();
        let id = ParticipantId::new("p1");
        registry.upsert_with(id.clone(), || state("p1", 1), |_| {});

        let snap = registry.snapshot();
        registry.update_if_present(&id, |s| s.facing_angle = 3.0);

        assert_eq!(snap[0].facing_angle, 0.0);
        assert_eq!(registry.get(&id).unwrap().facing_angle, 3.0);
    }

    #[test]
    fn test_concurrent_distinct_keys() {
        let registry = Arc::new(ParticipantRegistry::new());

        let handles: Vec<_> = (0..8u64)
            .map(|n| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let id = format!("p{n}");
                    for round in 0..100u64 {
                        registry.upsert_with(
                            ParticipantId::new(id.as_str()),
                            || state(&id, n),
                            |s| s.facing_angle = round as f64,
                        );
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
        for n in 0..8 {
            let got = registry.get(&ParticipantId::new(format!("p{n}"))).unwrap();
            assert_eq!(got.facing_angle, 99.0);
        }
    }

    #[test]
    fn test_concurrent_same_key_last_writer_wins() {
        let registry = Arc::new(ParticipantRegistry::new());
        let id = ParticipantId::new("shared");

        let handles: Vec<_> = (0..4u64)
            .map(|n| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                thread::spawn(move || {
                    registry.upsert_with(
                        id,
                        || state("shared", n),
                        |s| s.session_id = Some(SessionId::new(n)),
                    );
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Exactly one entry; whichever writer finished last, the record is whole.
        assert_eq!(registry.len(), 1);
        let got = registry.get(&id).unwrap();
        assert!(got.session_id.is_some());
        assert_eq!(got.display_name, "shared");
    }
}
