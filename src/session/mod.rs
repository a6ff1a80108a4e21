//! Table sessions (non-deterministic)
//!
//! Wraps the pure engine with clocks, history, and observers.

pub mod broadcast;
pub mod history;
pub mod manager;
pub mod table;

pub use broadcast::{Broadcaster, StateSnapshot, TurnUpdate};
pub use history::{EventType, HistoryEntry, HistoryError, HistoryStore, MemoryHistory};
pub use manager::TableManager;
pub use table::{TableConfig, TableId, TurnTable, IDLE_TIMEOUT_MESSAGE};
