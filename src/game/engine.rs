//! Turn Transitions
//!
//! The rules of the game as pure functions over [`TurnState`].
//! No I/O, no clocks, no identity: given the same state and rules,
//! every call produces the same result.
//!
//! Every function validates its preconditions before touching the state,
//! so a rejected call leaves the state exactly as it was.

use crate::core::roster::{PlayerId, RosterError};
use crate::game::error::TurnError;
use crate::game::events::TurnEvent;
use crate::game::rules::{ErrorMemory, RuleConfig, WinReorder, AfterWin};
use crate::game::state::TurnState;

/// Result of a single transition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Events generated by this transition
    pub events: Vec<TurnEvent>,
    /// Whether the round advanced during this transition
    pub round_completed: bool,
}

/// Outcome an operator can report for a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Shot made.
    Success,
    /// Shot failed.
    Error,
    /// Match won.
    Win,
}

impl Outcome {
    /// Apply the matching transition for the seat holding the turn.
    pub fn apply(
        self,
        state: &mut TurnState,
        acting_index: usize,
        rules: &RuleConfig,
    ) -> Result<StepResult, TurnError> {
        match self {
            Outcome::Success => apply_success(state, acting_index, rules),
            Outcome::Error => apply_error(state, acting_index, rules),
            Outcome::Win => apply_win(state, acting_index, rules),
        }
    }
}

/// Check that `acting_index` may act now.
fn check_turn(state: &TurnState, acting_index: usize) -> Result<(), TurnError> {
    if !state.is_active {
        return Err(TurnError::NoActiveMatch);
    }
    if acting_index >= state.player_count() {
        return Err(TurnError::UnknownPlayer(format!("seat {}", acting_index)));
    }
    if acting_index != state.current_index {
        return Err(TurnError::OutOfTurn {
            acting: acting_index,
            current: state.current_index,
        });
    }
    Ok(())
}

// =============================================================================
// ERROR
// =============================================================================

/// Player at `acting_index` failed a shot.
///
/// The seat before the actor is swapped ahead and replays immediately,
/// unless it already carries an error mark, or this is the breaker's
/// opening shot. Otherwise the turn simply passes on.
pub fn apply_error(
    state: &mut TurnState,
    acting_index: usize,
    rules: &RuleConfig,
) -> Result<StepResult, TurnError> {
    check_turn(state, acting_index)?;
    let n = state.player_count();
    if n < 2 {
        return Err(RosterError::TooFew { count: n, min: 2 }.into());
    }

    let player = state.order[acting_index].clone();
    state.acted_this_round.insert(player.clone());
    state.errored_this_round.insert(player.clone());
    state.moves_count += 1;

    // Nobody shot before the breaker's opening, so nobody can benefit
    let opening_break = state.breaker_player.as_ref() == Some(&player)
        && state.round_number == 1
        && state.acted_this_round.len() == 1;

    let mut beneficiary = None;
    if opening_break {
        state.current_index = state.next_index(acting_index);
    } else {
        let prev_index = state.prev_index(acting_index);
        let prev = state.order[prev_index].clone();

        if state.has_errored(&prev) {
            // Already errored: cannot benefit twice
            state.current_index = state.next_index(acting_index);
        } else {
            // current_index now addresses prev, who replays
            state.order.swap(prev_index, acting_index);
            beneficiary = Some(prev);
        }
    }

    state.last_acted_player = Some(player.clone());

    let mut result = StepResult::default();
    result.events.push(TurnEvent::PlayerErrored {
        player,
        beneficiary,
        opening_break,
    });
    complete_round_if_done(state, rules, &mut result);
    Ok(result)
}

// =============================================================================
// SUCCESS
// =============================================================================

/// Player at `acting_index` made a shot. Cures their error mark and
/// passes the turn on. Never reorders seats.
pub fn apply_success(
    state: &mut TurnState,
    acting_index: usize,
    rules: &RuleConfig,
) -> Result<StepResult, TurnError> {
    succeed(state, acting_index, rules, false)
}

/// Shared by reported and auto-filled successes.
pub(crate) fn succeed(
    state: &mut TurnState,
    acting_index: usize,
    rules: &RuleConfig,
    auto_filled: bool,
) -> Result<StepResult, TurnError> {
    check_turn(state, acting_index)?;

    let player = state.order[acting_index].clone();
    state.acted_this_round.insert(player.clone());
    state.errored_this_round.remove(&player);
    state.moves_count += 1;
    state.last_acted_player = Some(player.clone());
    state.current_index = state.next_index(acting_index);

    let mut result = StepResult::default();
    result.events.push(TurnEvent::PlayerSucceeded { player, auto_filled });
    complete_round_if_done(state, rules, &mut result);
    Ok(result)
}

// =============================================================================
// ROUND COMPLETION
// =============================================================================

/// Advance the round once every seat has acted.
fn complete_round_if_done(state: &mut TurnState, rules: &RuleConfig, result: &mut StepResult) {
    if state.acted_this_round.len() < state.player_count() {
        return;
    }

    let completed_round = state.round_number;
    state.round_number += 1;
    state.acted_this_round.clear();
    if rules.error_memory == ErrorMemory::ClearEachRound {
        state.errored_this_round.clear();
    }

    let next_starter = state.order[state.current_index].clone();
    state.round_starter = Some(next_starter.clone());

    result.round_completed = true;
    result.events.push(TurnEvent::RoundCompleted {
        completed_round,
        next_starter,
    });
}

// =============================================================================
// WIN
// =============================================================================

/// Player at `winner_index` won. Seats the next match per
/// `rules.win_reorder` and resets all per-match counters.
pub fn apply_win(
    state: &mut TurnState,
    winner_index: usize,
    rules: &RuleConfig,
) -> Result<StepResult, TurnError> {
    check_turn(state, winner_index)?;

    let winner = state.order[winner_index].clone();
    let finished_match = state.match_number;
    let next_order = next_match_order(
        &state.order,
        winner_index,
        state.round_number,
        rules.win_reorder,
    );

    state.begin_match(next_order.clone());
    state.match_number = finished_match + 1;
    state.is_active = rules.after_win == AfterWin::AutoContinue;

    Ok(StepResult {
        events: vec![TurnEvent::MatchWon {
            winner,
            match_number: finished_match,
            next_order,
        }],
        round_completed: false,
    })
}

/// Seating for the match after `order[winner_index]` wins.
pub fn next_match_order(
    order: &[PlayerId],
    winner_index: usize,
    round_number: u32,
    policy: WinReorder,
) -> Vec<PlayerId> {
    let n = order.len();
    if n == 0 {
        return Vec::new();
    }
    let winner_index = winner_index % n;

    match policy {
        WinReorder::Rotate => {
            let mut next = order[winner_index..].to_vec();
            next.extend_from_slice(&order[..winner_index]);
            next
        }
        WinReorder::WinnerLoserWaiter => {
            // Breaker ran the table in round 1: nothing changes
            if round_number == 1 && winner_index == 0 {
                return order.to_vec();
            }

            let loser_index = (winner_index + n - 1) % n;
            let waiter_index = (winner_index + 1) % n;

            let mut seats = vec![winner_index];
            for idx in [loser_index, waiter_index] {
                if !seats.contains(&idx) {
                    seats.push(idx);
                }
            }

            // Farthest from the winner (counting backwards) first
            let mut rest: Vec<usize> = (0..n).filter(|i| !seats.contains(i)).collect();
            rest.sort_by_key(|&i| std::cmp::Reverse((winner_index + n - i) % n));
            seats.extend(rest);

            seats.into_iter().map(|i| order[i].clone()).collect()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
