//! State Broadcast
//!
//! Pushes every committed state to observers over a tokio broadcast
//! channel. Messages are serialized as JSON with a `type` tag.

use serde::{Serialize, Deserialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::core::hash::hash_hex;
use crate::core::roster::PlayerId;
use crate::game::state::TurnState;

/// Messages sent to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnUpdate {
    /// New authoritative state.
    State(StateSnapshot),

    /// A match was won.
    MatchWon {
        /// Winning player.
        winner: PlayerId,
        /// Match that was won.
        match_number: u32,
    },

    /// The table was reset after a long idle period.
    IdleTimeout {
        /// Notice for observers.
        message: String,
    },
}

/// State plus its integrity hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// The state.
    pub state: TurnState,
    /// Hex SHA-256 of the state.
    pub state_hash: String,
}

impl StateSnapshot {
    /// Snapshot `state` with its hash.
    pub fn of(state: &TurnState) -> Self {
        Self {
            state: state.clone(),
            state_hash: hash_hex(&state.compute_hash()),
        }
    }
}

impl TurnUpdate {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Fan-out of [`TurnUpdate`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<TurnUpdate>,
}

impl Broadcaster {
    /// Create with a per-subscriber buffer of `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future updates.
    pub fn subscribe(&self) -> broadcast::Receiver<TurnUpdate> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Send to every subscriber. Having none is not an error.
    pub fn publish(&self, update: TurnUpdate) {
        match self.tx.send(update) {
            Ok(n) => debug!("Broadcast to {} subscribers", n),
            Err(_) => debug!("Broadcast dropped, no subscribers"),
        }
    }

    /// Publish the current state.
    pub fn publish_state(&self, state: &TurnState) {
        self.publish(TurnUpdate::State(StateSnapshot::of(state)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_tagging() {
        let update = TurnUpdate::MatchWon {
            winner: PlayerId::from("An"),
            match_number: 3,
        };
        let json = update.to_json().unwrap();
        assert_eq!(json, r#"{"type":"match_won","winner":"An","match_number":3}"#);
    }

    #[test]
    fn test_state_round_trip_keeps_hash() {
        let mut state = TurnState::default();
        state.begin_match(vec!["A".into(), "B".into(), "C".into()]);

        let json = TurnUpdate::State(StateSnapshot::of(&state)).to_json().unwrap();
        assert!(json.starts_with(r#"{"type":"state""#));

        match TurnUpdate::from_json(&json).unwrap() {
            TurnUpdate::State(snapshot) => {
                assert_eq!(snapshot.state, state);
                assert_eq!(snapshot.state_hash, hash_hex(&state.compute_hash()));
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let broadcaster = Broadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 1);

        broadcaster.publish(TurnUpdate::IdleTimeout { message: "idle".into() });

        match rx.recv().await.unwrap() {
            TurnUpdate::IdleTimeout { message } => assert_eq!(message, "idle"),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let broadcaster = Broadcaster::new(8);
        broadcaster.publish_state(&TurnState::default());
        // Should not panic
    }
}
