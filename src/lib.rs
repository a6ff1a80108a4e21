//! # Đánh Đền Turn Server
//!
//! Turn-order engine for the đánh đền billiards game, with table sessions
//! that record history and broadcast every state change.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DANH DEN SERVER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── roster.rs   - Player identity and roster rules          │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Turn rules (deterministic)                │
//! │  ├── state.rs    - Turn state                                │
//! │  ├── rules.rs    - Deployment policies                       │
//! │  ├── engine.rs   - Error / success / win transitions         │
//! │  ├── director.rs - Fast-forward to any seat                  │
//! │  ├── events.rs   - Transition events                         │
//! │  └── error.rs    - Rejected operations                       │
//! │                                                              │
//! │  session/        - Tables (non-deterministic)                │
//! │  ├── table.rs    - Operator operations, undo, idle reset     │
//! │  ├── history.rs  - Action log                                │
//! │  ├── broadcast.rs- State fan-out                             │
//! │  └── manager.rs  - Table registry and idle sweep             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are deterministic:
//! - No HashMap (uses BTreeSet for sorted iteration)
//! - No system time dependencies
//! - No randomness
//!
//! Given the same state, rules, and reported outcome, a transition
//! produces the same state and the same hash on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use core::roster::{PlayerId, RosterError, MIN_PLAYERS, MAX_PLAYERS};
pub use game::{TurnState, TurnError, TurnEvent, RuleConfig, Outcome};
pub use session::{TableConfig, TableManager, TurnTable, TurnUpdate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default idle timeout before an active match is reset (seconds)
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 2 * 60 * 60;
