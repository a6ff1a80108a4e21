//! Turn Events
//!
//! Emitted by transitions so callers can log, describe, and broadcast
//! what happened without diffing states.

use serde::{Serialize, Deserialize};
use crate::core::roster::PlayerId;

/// Something a transition did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A match was seated and started.
    MatchStarted {
        /// Match being started.
        match_number: u32,
        /// Seating for the match.
        order: Vec<PlayerId>,
    },

    /// Player failed a shot.
    PlayerErrored {
        /// Player who missed.
        player: PlayerId,
        /// Player swapped ahead and granted a replay, if any.
        beneficiary: Option<PlayerId>,
        /// Breaker's opening shot (never swaps).
        opening_break: bool,
    },

    /// Player completed a shot.
    PlayerSucceeded {
        /// Player who scored.
        player: PlayerId,
        /// Synthesized by fast-forward rather than reported.
        auto_filled: bool,
    },

    /// Every seat acted; a new round began.
    RoundCompleted {
        /// Round that just ended.
        completed_round: u32,
        /// Player holding the turn as the new round begins.
        next_starter: PlayerId,
    },

    /// Player won; next match seating computed.
    MatchWon {
        /// Winning player.
        winner: PlayerId,
        /// Match that was won.
        match_number: u32,
        /// Seating for the next match.
        next_order: Vec<PlayerId>,
    },
}

impl TurnEvent {
    /// Player this event is about, if any.
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            TurnEvent::PlayerErrored { player, .. } => Some(player),
            TurnEvent::PlayerSucceeded { player, .. } => Some(player),
            TurnEvent::RoundCompleted { next_starter, .. } => Some(next_starter),
            TurnEvent::MatchWon { winner, .. } => Some(winner),
            TurnEvent::MatchStarted { .. } => None,
        }
    }

    /// One-line human description.
    pub fn describe(&self) -> String {
        match self {
            TurnEvent::MatchStarted { match_number, order } => {
                format!("match {} started: {}", match_number, join(order))
            }
            TurnEvent::PlayerErrored { player, opening_break: true, .. } => {
                format!("{} errored (opening break)", player)
            }
            TurnEvent::PlayerErrored { player, beneficiary: Some(prev), .. } => {
                format!("{} errored, {} replays", player, prev)
            }
            TurnEvent::PlayerErrored { player, beneficiary: None, .. } => {
                format!("{} errored", player)
            }
            TurnEvent::PlayerSucceeded { player, auto_filled: false } => {
                format!("{} succeeded", player)
            }
            TurnEvent::PlayerSucceeded { player, auto_filled: true } => {
                format!("{} succeeded (auto)", player)
            }
            TurnEvent::RoundCompleted { completed_round, next_starter } => {
                format!("round {} complete, {} opens round {}", completed_round, next_starter, completed_round + 1)
            }
            TurnEvent::MatchWon { winner, match_number, next_order } => {
                format!("{} won match {}, next: {}", winner, match_number, join(next_order))
            }
        }
    }
}

fn join(order: &[PlayerId]) -> String {
    order.iter().map(PlayerId::as_str).collect::<Vec<_>>().join(" ")
}
