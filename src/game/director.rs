//! Fast-Forward (Auto-Fill)
//!
//! Lets an operator report an outcome for any seat. Every seat between the
//! pointer and the target that has not acted this round is credited with a
//! success; seats that already acted are stepped over untouched.

use crate::core::roster::PlayerId;
use crate::game::engine::succeed;
use crate::game::error::TurnError;
use crate::game::events::TurnEvent;
use crate::game::rules::RuleConfig;
use crate::game::state::TurnState;

/// One synthesized success, with snapshots for the history log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoFill {
    /// Player credited with the success.
    pub player: PlayerId,
    /// State before the synthesized success.
    pub before: TurnState,
    /// State after the synthesized success.
    pub after: TurnState,
    /// Events the success produced.
    pub events: Vec<TurnEvent>,
}

/// Walk the pointer forward until `target_index` holds the turn.
///
/// Returns one [`AutoFill`] per synthesized success, in order. A target
/// already holding the turn is a no-op. The walk runs on a copy and is
/// committed only when it reaches the target.
pub fn fast_forward_to(
    state: &mut TurnState,
    target_index: usize,
    rules: &RuleConfig,
) -> Result<Vec<AutoFill>, TurnError> {
    if !state.is_active {
        return Err(TurnError::NoActiveMatch);
    }
    let n = state.player_count();
    if target_index >= n {
        return Err(TurnError::UnknownPlayer(format!("seat {}", target_index)));
    }

    let mut working = state.clone();
    let mut fills = Vec::new();
    let mut steps = 0;

    while working.current_index != target_index {
        // Each step moves the pointer one seat; n + 1 steps means a loop
        if steps > n {
            return Err(TurnError::UnknownPlayer(format!("seat {}", target_index)));
        }
        steps += 1;

        let seat = working.current_index;
        let player = working.order[seat].clone();

        if working.has_acted(&player) {
            working.current_index = working.next_index(seat);
            continue;
        }

        let before = working.clone();
        let step = succeed(&mut working, seat, rules, true)?;
        fills.push(AutoFill {
            player,
            before,
            after: working.clone(),
            events: step.events,
        });
    }

    *state = working;
    Ok(fills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::apply_error;
    use std::collections::BTreeSet;

    fn started(names: &[&str]) -> TurnState {
        let mut state = TurnState::default();
        state.begin_match(names.iter().map(|n| PlayerId::from(*n)).collect());
        state
    }

    #[test]
    fn test_target_is_current_is_noop() {
        let mut state = started(&["A", "B", "C", "D", "E"]);
        let before = state.clone();

        let fills = fast_forward_to(&mut state, 0, &RuleConfig::default()).unwrap();

        assert!(fills.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_fills_skipped_players_with_success() {
        let mut state = started(&["A", "B", "C", "D", "E"]);

        let fills = fast_forward_to(&mut state, 3, &RuleConfig::default()).unwrap();

        let filled: Vec<_> = fills.iter().map(|f| f.player.as_str()).collect();
        assert_eq!(filled, vec!["A", "B", "C"]);
        assert_eq!(state.current_index, 3);
        assert_eq!(state.moves_count, 3);
        assert_eq!(state.acted_this_round.len(), 3);
        assert!(fills.iter().all(|f| matches!(
            f.events[0],
            TurnEvent::PlayerSucceeded { auto_filled: true, .. }
        )));

        // Snapshots chain together
        assert_eq!(fills[0].after, fills[1].before);
        assert_eq!(fills[2].after, state);
    }

    #[test]
    fn test_fill_across_round_boundary() {
        let mut state = started(&["A", "B", "C", "D", "E"]);
        let rules = RuleConfig::default();
        // A opens with an error: pointer on B, A already acted
        apply_error(&mut state, 0, &rules).unwrap();
        // Filling B..E completes round 1 just as the pointer wraps to A
        let fills = fast_forward_to(&mut state, 0, &rules).unwrap();

        assert_eq!(fills.len(), 4);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.round_number, 2);
        assert!(state.acted_this_round.is_empty());
    }

    #[test]
    fn test_skips_acted_without_counting() {
        let mut state = started(&["A", "B", "C", "D", "E"]);
        state.round_number = 2;
        state.current_index = 1;
        state.acted_this_round = ["B", "C"].into_iter().map(PlayerId::from).collect::<BTreeSet<_>>();

        let fills = fast_forward_to(&mut state, 4, &RuleConfig::default()).unwrap();

        // B and C stepped over, only D filled
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].player, PlayerId::from("D"));
        assert_eq!(state.moves_count, 1);
        assert_eq!(state.current_index, 4);
    }

    #[test]
    fn test_invalid_target_leaves_state_untouched() {
        let mut state = started(&["A", "B", "C"]);
        let before = state.clone();

        let err = fast_forward_to(&mut state, 9, &RuleConfig::default()).unwrap_err();

        assert!(matches!(err, TurnError::UnknownPlayer(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_inactive_rejected() {
        let mut state = TurnState::default();
        assert_eq!(
            fast_forward_to(&mut state, 0, &RuleConfig::default()),
            Err(TurnError::NoActiveMatch)
        );
    }
}
