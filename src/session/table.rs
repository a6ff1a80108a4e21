//! Turn Table
//!
//! Owns the live [`TurnState`] of one table and exposes the operator
//! operations: start, report an outcome, win, reset, undo. Each operation
//! runs the pure engine on a copy, then commits, records history, and
//! broadcasts. A rejected operation changes nothing.

use std::time::Duration;
use chrono::{DateTime, Utc};
use tracing::{info, debug, warn, instrument};

use crate::core::hash::hash_hex;
use crate::core::roster::{PlayerId, validate_roster};
use crate::game::director::{fast_forward_to, AutoFill};
use crate::game::engine::{Outcome, StepResult};
use crate::game::error::TurnError;
use crate::game::events::TurnEvent;
use crate::game::rules::RuleConfig;
use crate::game::state::TurnState;
use crate::session::broadcast::{Broadcaster, TurnUpdate};
use crate::session::history::{EventType, HistoryEntry, HistoryStore, MemoryHistory};

/// Unique table identifier.
pub type TableId = [u8; 16];

/// Message sent to observers when an idle table is reset.
pub const IDLE_TIMEOUT_MESSAGE: &str = "Match ended automatically after a long period without activity";

/// Configuration for a table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Inactivity after which an active match is reset.
    pub idle_timeout: Duration,
    /// Maximum stored history entries (0 = unbounded).
    pub history_capacity: usize,
    /// Per-subscriber broadcast buffer.
    pub broadcast_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(crate::DEFAULT_IDLE_TIMEOUT_SECS),
            history_capacity: 500,
            broadcast_capacity: 256,
        }
    }
}

impl TableConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            idle_timeout: env_number("DANH_DEN_IDLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            history_capacity: env_number("DANH_DEN_HISTORY_CAPACITY")
                .map(|v| v as usize)
                .unwrap_or(defaults.history_capacity),
            broadcast_capacity: env_number("DANH_DEN_BROADCAST_CAPACITY")
                .map(|v| v as usize)
                .unwrap_or(defaults.broadcast_capacity),
        }
    }
}

fn env_number(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{}: {:?} is not a number ({}), using default", key, raw, err);
            None
        }
    }
}

/// One table: live state, its rules, history, and observers.
pub struct TurnTable<H = MemoryHistory> {
    /// Table identifier.
    pub id: TableId,
    state: TurnState,
    rules: RuleConfig,
    config: TableConfig,
    history: H,
    updates: Broadcaster,
    next_action_id: u64,
    last_activity: DateTime<Utc>,
}

impl TurnTable<MemoryHistory> {
    /// Create a table with an in-memory history log.
    pub fn new(id: TableId, rules: RuleConfig, config: TableConfig) -> Self {
        let history = MemoryHistory::with_capacity(config.history_capacity);
        Self::with_history(id, rules, config, history)
    }
}

impl<H: HistoryStore> TurnTable<H> {
    /// Create a table recording into `history`.
    pub fn with_history(id: TableId, rules: RuleConfig, config: TableConfig, history: H) -> Self {
        let updates = Broadcaster::new(config.broadcast_capacity);
        Self {
            id,
            state: TurnState::inactive(),
            rules,
            config,
            history,
            updates,
            next_action_id: 1,
            last_activity: Utc::now(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Rules in force.
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// History log.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Subscribe to state broadcasts.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<TurnUpdate> {
        self.updates.subscribe()
    }

    /// When the table last changed.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Seat a new match.
    #[instrument(skip(self, order), fields(table = %hex::encode(&self.id[..4])))]
    pub fn start(&mut self, order: Vec<PlayerId>) -> Result<TurnState, TurnError> {
        if self.state.is_active {
            return Err(TurnError::MatchAlreadyActive);
        }
        validate_roster(&order)?;

        let before = self.state.clone();
        let mut after = before.clone();
        after.begin_match(order.clone());

        let event = TurnEvent::MatchStarted {
            match_number: after.match_number,
            order,
        };
        let action_id = self.next_action();
        self.record(action_id, EventType::Start, None, before, after.clone(), &event, false);

        info!("{}", event.describe());
        self.commit(after);
        Ok(self.state.clone())
    }

    /// Player failed a shot.
    pub fn report_error(&mut self, player: &str) -> Result<TurnState, TurnError> {
        self.report(player, Outcome::Error)
    }

    /// Player made a shot.
    pub fn report_success(&mut self, player: &str) -> Result<TurnState, TurnError> {
        self.report(player, Outcome::Success)
    }

    /// Player won the match.
    pub fn report_win(&mut self, player: &str) -> Result<TurnState, TurnError> {
        self.report(player, Outcome::Win)
    }

    /// Fast-forward to `player`, then apply `outcome` for them.
    #[instrument(skip(self), fields(table = %hex::encode(&self.id[..4])))]
    pub fn report(&mut self, player: &str, outcome: Outcome) -> Result<TurnState, TurnError> {
        if !self.state.is_active {
            return Err(TurnError::NoActiveMatch);
        }
        let seat = self
            .state
            .index_of(player)
            .ok_or_else(|| TurnError::UnknownPlayer(player.to_string()))?;

        // Everything below runs on a copy until it has fully succeeded
        let mut working = self.state.clone();
        let fills = fast_forward_to(&mut working, seat, &self.rules)?;
        let before = working.clone();
        let step = outcome.apply(&mut working, seat, &self.rules)?;

        let action_id = self.next_action();
        let finished_match = before.match_number;
        for fill in fills {
            self.record_fill(action_id, fill);
        }

        let actor = before.order[seat].clone();
        let event_type = match outcome {
            Outcome::Success => EventType::Success,
            Outcome::Error => EventType::Error,
            Outcome::Win => EventType::Win,
        };
        if let Some(event) = step.events.first() {
            info!("{}", event.describe());
            self.record(action_id, event_type, Some(actor.clone()), before, working.clone(), event, false);
        }
        log_round(&step);

        if outcome == Outcome::Win {
            // A finished match cannot be undone
            self.history.clear_match(finished_match);
            self.commit(working);
            self.updates.publish(TurnUpdate::MatchWon {
                winner: actor,
                match_number: finished_match,
            });
        } else {
            self.commit(working);
        }

        Ok(self.state.clone())
    }

    /// Revert the most recent operator action of the current match.
    #[instrument(skip(self), fields(table = %hex::encode(&self.id[..4])))]
    pub fn undo(&mut self) -> Result<TurnState, TurnError> {
        let entries = self.history.take_last_action(self.state.match_number);
        let (first, last) = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TurnError::NothingToUndo),
        };

        if last.state_after != self.state {
            debug!(
                "Undo from {} but log ends at {}",
                hash_hex(&self.state.compute_hash()),
                hash_hex(&last.state_after.compute_hash()),
            );
        }

        let restored = first.state_before.clone();
        info!(
            "Undo {} entries ({}), restored {}",
            entries.len(),
            last.description,
            hash_hex(&restored.compute_hash()),
        );
        self.commit(restored);
        Ok(self.state.clone())
    }

    /// Unconditionally return to the inactive state, clearing history.
    #[instrument(skip(self), fields(table = %hex::encode(&self.id[..4])))]
    pub fn reset(&mut self) -> TurnState {
        self.history.clear_all();
        self.commit(TurnState::inactive());
        info!("Table reset");
        self.state.clone()
    }

    /// Idempotent reset for timeout collaborators.
    pub fn reset_to_inactive(&mut self) {
        if self.state == TurnState::inactive() {
            return;
        }
        self.reset();
    }

    /// Reset if a match has been idle for longer than the configured timeout.
    /// Returns whether a reset happened.
    pub fn reset_if_idle(&mut self, now: DateTime<Utc>) -> bool {
        if !self.state.is_active {
            return false;
        }
        let idle = now
            .signed_duration_since(self.last_activity)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if idle < self.config.idle_timeout {
            return false;
        }

        info!("Table idle for {}s, resetting", idle.as_secs());
        self.reset_to_inactive();
        self.updates.publish(TurnUpdate::IdleTimeout {
            message: IDLE_TIMEOUT_MESSAGE.to_string(),
        });
        true
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn next_action(&mut self) -> u64 {
        let id = self.next_action_id;
        self.next_action_id += 1;
        id
    }

    fn commit(&mut self, state: TurnState) {
        self.state = state;
        self.last_activity = Utc::now();
        self.updates.publish_state(&self.state);
    }

    fn record_fill(&mut self, action_id: u64, fill: AutoFill) {
        if let Some(event) = fill.events.first() {
            debug!("{}", event.describe());
            self.record(action_id, EventType::Success, Some(fill.player.clone()), fill.before, fill.after, event, true);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        action_id: u64,
        event_type: EventType,
        player_name: Option<PlayerId>,
        state_before: TurnState,
        state_after: TurnState,
        event: &TurnEvent,
        auto_filled: bool,
    ) {
        let match_number = state_before.match_number;
        self.history.append(HistoryEntry {
            action_id,
            event_type,
            player_name,
            state_before,
            state_after,
            description: event.describe(),
            match_number,
            auto_filled,
            timestamp: Utc::now(),
        });
    }
}

fn log_round(step: &StepResult) {
    for event in step.events.iter().skip(1) {
        if let TurnEvent::RoundCompleted { .. } = event {
            info!("{}", event.describe());
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
