//! Rule Policies
//!
//! Deployment choices that change how the engine behaves. Each transition
//! consults exactly one variant of each policy.

use std::str::FromStr;
use serde::{Serialize, Deserialize};
use tracing::warn;

/// What happens to error marks when a round advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMemory {
    /// Error marks survive the round boundary. Only the player's own
    /// success or a new match clears them.
    #[default]
    CarryAcrossRounds,
    /// Error marks are wiped together with the acted set.
    ClearEachRound,
}

/// How seating is rebuilt for the next match after a win.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReorder {
    /// Winner first, then loser (seat before winner), waiter (seat after),
    /// then the rest farthest-from-winner first. A breaker who wins in
    /// round 1 keeps the order unchanged.
    #[default]
    WinnerLoserWaiter,
    /// Rotate so the winner is first; everyone else keeps relative order.
    Rotate,
}

/// Whether the next match starts by itself after a win.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterWin {
    /// Next match is seeded and active immediately.
    #[default]
    AutoContinue,
    /// Next seating is stored but the table goes inactive until `start`.
    ManualRestart,
}

impl FromStr for ErrorMemory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry" | "carry_across_rounds" => Ok(Self::CarryAcrossRounds),
            "clear" | "clear_each_round" => Ok(Self::ClearEachRound),
            other => Err(format!("unknown error memory policy: {other}")),
        }
    }
}

impl FromStr for WinReorder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winner_loser_waiter" | "heuristic" => Ok(Self::WinnerLoserWaiter),
            "rotate" => Ok(Self::Rotate),
            other => Err(format!("unknown win reorder policy: {other}")),
        }
    }
}

impl FromStr for AfterWin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "auto_continue" => Ok(Self::AutoContinue),
            "manual" | "manual_restart" => Ok(Self::ManualRestart),
            other => Err(format!("unknown after-win policy: {other}")),
        }
    }
}

/// Complete rule set for one table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Error-mark clearing policy.
    pub error_memory: ErrorMemory,
    /// Next-match seating policy.
    pub win_reorder: WinReorder,
    /// Auto-continue vs manual restart after a win.
    pub after_win: AfterWin,
}

impl RuleConfig {
    /// Create config from environment variables.
    ///
    /// Reads `DANH_DEN_ERROR_MEMORY`, `DANH_DEN_WIN_REORDER` and
    /// `DANH_DEN_AFTER_WIN`. Missing or unparsable values fall back to
    /// the default variant.
    pub fn from_env() -> Self {
        Self {
            error_memory: env_policy("DANH_DEN_ERROR_MEMORY"),
            win_reorder: env_policy("DANH_DEN_WIN_REORDER"),
            after_win: env_policy("DANH_DEN_AFTER_WIN"),
        }
    }
}

fn env_policy<T>(key: &str) -> T
where
    T: FromStr<Err = String> + Default,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|err| {
            warn!("{}: {}, using default", key, err);
            T::default()
        }),
        Err(_) => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RuleConfig::default();
        assert_eq!(rules.error_memory, ErrorMemory::CarryAcrossRounds);
        assert_eq!(rules.win_reorder, WinReorder::WinnerLoserWaiter);
        assert_eq!(rules.after_win, AfterWin::AutoContinue);
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("clear".parse::<ErrorMemory>(), Ok(ErrorMemory::ClearEachRound));
        assert_eq!(" Rotate ".parse::<WinReorder>(), Ok(WinReorder::Rotate));
        assert_eq!("manual_restart".parse::<AfterWin>(), Ok(AfterWin::ManualRestart));
        assert!("sometimes".parse::<AfterWin>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RuleConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"{"error_memory":"carry_across_rounds","win_reorder":"winner_loser_waiter","after_win":"auto_continue"}"#
        );
    }
}
