//! Player Identity and Roster Validation
//!
//! A roster is the seating fixed at match start: 3 to 5 distinct players.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Fewest players a match can start with.
pub const MIN_PLAYERS: usize = 3;

/// Most players a match can start with.
pub const MAX_PLAYERS: usize = 5;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Player identifier (display name as entered by the operator).
///
/// Implements Ord so sets of players iterate deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// ROSTER VALIDATION
// =============================================================================

/// Why a proposed seating was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Fewer than [`MIN_PLAYERS`].
    #[error("need at least {min} players, got {count}")]
    TooFew {
        /// Players supplied.
        count: usize,
        /// Required minimum.
        min: usize,
    },

    /// More than [`MAX_PLAYERS`].
    #[error("at most {max} players allowed, got {count}")]
    TooMany {
        /// Players supplied.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// Same player seated twice.
    #[error("player {0} appears more than once")]
    Duplicate(PlayerId),

    /// Empty or whitespace-only name.
    #[error("player names must not be blank")]
    BlankName,
}

/// Check that `order` is a legal match-start seating.
pub fn validate_roster(order: &[PlayerId]) -> Result<(), RosterError> {
    if order.len() < MIN_PLAYERS {
        return Err(RosterError::TooFew { count: order.len(), min: MIN_PLAYERS });
    }
    if order.len() > MAX_PLAYERS {
        return Err(RosterError::TooMany { count: order.len(), max: MAX_PLAYERS });
    }

    for (i, player) in order.iter().enumerate() {
        if player.as_str().trim().is_empty() {
            return Err(RosterError::BlankName);
        }
        // n <= 5, a quadratic scan is fine
        if order[..i].contains(player) {
            return Err(RosterError::Duplicate(player.clone()));
        }
    }

    Ok(())
}
