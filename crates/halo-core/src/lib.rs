//! HALO Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the HALO protocol:
//! - Identifiers (ParticipantId, SessionId)
//! - Participant state model (position, facing angle, animation flags)
//! - Inbound event model and apply outcomes
//! - Error taxonomy

pub mod id;
pub mod state;
pub mod event;
pub mod error;

pub use id::*;
pub use state::*;
pub use event::*;
pub use error::*;
