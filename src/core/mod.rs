//! Core primitives.
//!
//! Player identity, roster rules, and deterministic state hashing.
//! Nothing here knows about turns or matches.

pub mod roster;
pub mod hash;

// Re-export core types
pub use roster::{PlayerId, RosterError, validate_roster, MIN_PLAYERS, MAX_PLAYERS};
pub use hash::{StateHash, StateHasher, hash_hex};
