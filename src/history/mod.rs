//! Battle history
//!
//! An ordered, append-only record of every admin batch that changed at least
//! one rating.

pub mod log;

pub use log::{BattleBatch, BattleEvent, BattleLog, BattleLogEntry};
