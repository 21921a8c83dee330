//! Metrics and monitoring for the beat-battle-elo service
//!
//! Prometheus counters and gauges for grades, decay, committed battles,
//! imports and admin authentication.

pub mod collector;

pub use collector::{MetricsCollector, RatingMetrics, RosterMetrics};
