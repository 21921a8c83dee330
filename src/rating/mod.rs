//! Rating rules
//!
//! Tier classification and the rating engine that applies grades and decay
//! to roster records.

pub mod engine;
pub mod tier;

// Re-export commonly used types
pub use engine::RatingEngine;
pub use tier::{TierBand, TierClassifier, UNRANKED};
