//! Turn Errors
//!
//! Every variant is a precondition failure detected before any mutation.

use thiserror::Error;

use crate::core::roster::RosterError;

/// Errors returned by turn transitions and table operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    /// Proposed seating is not a valid roster.
    #[error("Invalid roster: {0}")]
    InvalidRosterSize(#[from] RosterError),

    /// `start` called while a match is running.
    #[error("A match is already active")]
    MatchAlreadyActive,

    /// Outcome reported while no match is running.
    #[error("No active match")]
    NoActiveMatch,

    /// Player (or seat) is not part of the current order.
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    /// A transition was applied for a seat that does not hold the turn.
    #[error("Seat {acting} acted out of turn (seat {current} holds the turn)")]
    OutOfTurn {
        /// Seat that tried to act.
        acting: usize,
        /// Seat holding the turn.
        current: usize,
    },

    /// Undo requested with no recorded action in the current match.
    #[error("Nothing to undo")]
    NothingToUndo,
}
