//! Beat Battle ELO - rating tracker for beat battle competitions
//!
//! This crate keeps a roster of participants, applies per-battle grades and
//! rank decay, classifies ratings into named tiers, and imports or exports
//! the roster as CSV. An HTTP service exposes the leaderboard publicly and
//! gates every mutation behind an admin password.

pub mod config;
pub mod error;
pub mod history;
pub mod import;
pub mod metrics;
pub mod rating;
pub mod roster;
pub mod service;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{EloError, EloResult, Result};
pub use types::*;

// Re-export key components
pub use history::{BattleEvent, BattleLog, BattleLogEntry};
pub use rating::{RatingEngine, TierBand, TierClassifier};
pub use roster::RosterStore;
pub use session::{ActionFailure, BatchOutcome, EloSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
