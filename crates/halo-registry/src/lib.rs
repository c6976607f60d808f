//! HALO Registry - Concurrency-safe participant and session stores
//!
//! This crate implements the two shared stores behind the synchronization
//! engine:
//! - [`ParticipantRegistry`] - participant id to authoritative state
//! - [`SessionIndex`] - ephemeral transport session to participant id
//!
//! Both are lock-striped concurrent maps: operations on the same key are
//! serialized, operations on different keys do not contend, and no reader
//! ever observes a half-written record.

pub mod registry;
pub mod session;

pub use registry::*;
pub use session::*;
