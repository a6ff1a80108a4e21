//! Turn State Definitions
//!
//! The single value every transition reads and writes.
//! Uses BTreeSet for deterministic iteration order.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::core::roster::PlayerId;

// =============================================================================
// TURN STATE
// =============================================================================

/// Complete turn-order state of one table.
///
/// Invariants while `is_active`:
/// - `order` is a permutation of the roster fixed at match start
/// - `current_index < order.len()`
/// - `acted_this_round.len() < order.len()` between transitions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Seating and current ranking.
    pub order: Vec<PlayerId>,

    /// Seat holding the turn.
    pub current_index: usize,

    /// Round within the current match (starts at 1).
    pub round_number: u32,

    /// Match counter (starts at 1, incremented on win).
    pub match_number: u32,

    /// Actions taken in the current match.
    pub moves_count: u32,

    /// Players who acted since the round began.
    pub acted_this_round: BTreeSet<PlayerId>,

    /// Players carrying an uncured error mark.
    pub errored_this_round: BTreeSet<PlayerId>,

    /// Player who opened the match.
    pub breaker_player: Option<PlayerId>,

    /// Player who most recently completed an action.
    pub last_acted_player: Option<PlayerId>,

    /// Player holding the turn when the current round began.
    pub round_starter: Option<PlayerId>,

    /// Is a match in progress?
    pub is_active: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            current_index: 0,
            round_number: 1,
            match_number: 1,
            moves_count: 0,
            acted_this_round: BTreeSet::new(),
            errored_this_round: BTreeSet::new(),
            breaker_player: None,
            last_acted_player: None,
            round_starter: None,
            is_active: false,
        }
    }
}

impl TurnState {
    /// Inactive, zeroed state.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Seat `order` for a fresh match and mark it active.
    ///
    /// Leaves `match_number` untouched; the caller decides numbering.
    /// `order` must be non-empty.
    pub fn begin_match(&mut self, order: Vec<PlayerId>) {
        let breaker = order.first().cloned();
        self.order = order;
        self.current_index = 0;
        self.round_number = 1;
        self.moves_count = 0;
        self.acted_this_round.clear();
        self.errored_this_round.clear();
        self.breaker_player = breaker.clone();
        self.last_acted_player = None;
        self.round_starter = breaker;
        self.is_active = true;
    }

    /// Return to the inactive, zeroed state.
    pub fn reset_to_inactive(&mut self) {
        *self = Self::default();
    }

    /// Number of seats.
    #[inline]
    pub fn player_count(&self) -> usize {
        self.order.len()
    }

    /// Player holding the turn.
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.order.get(self.current_index)
    }

    /// Seat of a player by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|p| p.as_str() == name)
    }

    /// Seat after `index`, wrapping.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.order.len()
    }

    /// Seat before `index`, wrapping.
    #[inline]
    pub fn prev_index(&self, index: usize) -> usize {
        let n = self.order.len();
        (index + n - 1) % n
    }

    /// Has `player` acted this round?
    pub fn has_acted(&self, player: &PlayerId) -> bool {
        self.acted_this_round.contains(player)
    }

    /// Does `player` carry an error mark?
    pub fn has_errored(&self, player: &PlayerId) -> bool {
        self.errored_this_round.contains(player)
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_turn_state();

        hasher.update_str_seq(self.order.iter().map(PlayerId::as_str));
        hasher.update_u64(self.current_index as u64);
        hasher.update_u32(self.round_number);
        hasher.update_u32(self.match_number);
        hasher.update_u32(self.moves_count);

        // BTreeSet iteration is sorted
        hasher.update_str_seq(self.acted_this_round.iter().map(PlayerId::as_str));
        hasher.update_str_seq(self.errored_this_round.iter().map(PlayerId::as_str));

        hasher.update_opt_str(self.breaker_player.as_ref().map(PlayerId::as_str));
        hasher.update_opt_str(self.last_acted_player.as_ref().map(PlayerId::as_str));
        hasher.update_opt_str(self.round_starter.as_ref().map(PlayerId::as_str));
        hasher.update_bool(self.is_active);

        hasher.finalize()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn five() -> Vec<PlayerId> {
        ["A", "B", "C", "D", "E"].into_iter().map(PlayerId::from).collect()
    }

    #[test]
    fn test_default_is_inactive_and_zeroed() {
        let state = TurnState::default();
        assert!(!state.is_active);
        assert!(state.order.is_empty());
        assert_eq!(state.round_number, 1);
        assert_eq!(state.match_number, 1);
        assert_eq!(state.current_player(), None);
    }

    #[test]
    fn test_begin_match_seeds_breaker() {
        let mut state = TurnState::default();
        state.match_number = 4;
        state.begin_match(five());

        assert!(state.is_active);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.breaker_player, Some(PlayerId::from("A")));
        assert_eq!(state.round_starter, Some(PlayerId::from("A")));
        assert_eq!(state.match_number, 4);
    }

    #[test]
    fn test_wraparound_indexing() {
        let mut state = TurnState::default();
        state.begin_match(five());

        assert_eq!(state.prev_index(0), 4);
        assert_eq!(state.next_index(4), 0);
        assert_eq!(state.index_of("C"), Some(2));
        assert_eq!(state.index_of("Z"), None);
    }

    #[test]
    fn test_hash_tracks_changes() {
        let mut state1 = TurnState::default();
        state1.begin_match(five());
        let state2 = state1.clone();

        assert_eq!(state1.compute_hash(), state2.compute_hash());

        state1.acted_this_round.insert(PlayerId::from("A"));
        assert_ne!(state1.compute_hash(), state2.compute_hash());
    }

    #[test]
    fn test_hash_ignores_set_insertion_order() {
        let mut state1 = TurnState::default();
        let mut state2 = TurnState::default();
        state1.errored_this_round.insert(PlayerId::from("B"));
        state1.errored_this_round.insert(PlayerId::from("A"));
        state2.errored_this_round.insert(PlayerId::from("A"));
        state2.errored_this_round.insert(PlayerId::from("B"));

        assert_eq!(state1.compute_hash(), state2.compute_hash());
    }
}
