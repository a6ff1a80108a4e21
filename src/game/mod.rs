//! Game Logic Module
//!
//! Turn-order rules. Pure and deterministic: no I/O, no clocks.
//!
//! ## Module Structure
//!
//! - `state`: The turn state value
//! - `rules`: Deployment policies
//! - `engine`: Error / success / win transitions
//! - `director`: Fast-forward (auto-fill) to an arbitrary seat
//! - `events`: Events emitted by transitions
//! - `error`: Precondition failures

pub mod state;
pub mod rules;
pub mod engine;
pub mod director;
pub mod events;
pub mod error;

// Re-export key types
pub use state::TurnState;
pub use rules::{RuleConfig, ErrorMemory, WinReorder, AfterWin};
pub use engine::{apply_error, apply_success, apply_win, next_match_order, Outcome, StepResult};
pub use director::{fast_forward_to, AutoFill};
pub use events::TurnEvent;
pub use error::TurnError;
