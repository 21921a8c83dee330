//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the beat-battle-elo service
//! using Prometheus metrics.

use crate::session::BatchOutcome;
use crate::types::Adjustment;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use std::time::Duration;

/// Main metrics collector for the rating service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Rating-related metrics
    rating_metrics: RatingMetrics,

    /// Roster and history metrics
    roster_metrics: RosterMetrics,
}

/// Rating-related metrics
#[derive(Clone)]
pub struct RatingMetrics {
    /// Grades applied, by grade label
    pub grades_applied_total: IntCounterVec,

    /// Individual decay steps applied
    pub decays_applied_total: IntCounter,

    /// Rejected admin actions, by error kind
    pub failed_actions_total: IntCounterVec,

    /// Time spent applying one admin batch
    pub batch_duration_seconds: Histogram,
}

/// Roster and history metrics
#[derive(Clone)]
pub struct RosterMetrics {
    /// Participants currently on the roster
    pub participants: IntGauge,

    /// Battles committed to the log
    pub battles_committed_total: IntCounter,

    /// Import operations, by kind (csv, names) and result
    pub imports_total: IntCounterVec,

    /// Rejected admin authentication attempts
    pub auth_failures_total: IntCounter,
}

impl RatingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let grades_applied_total = IntCounterVec::new(
            Opts::new("elo_grades_applied_total", "Grades applied to participants"),
            &["grade"],
        )?;
        let decays_applied_total = IntCounter::new(
            "elo_decays_applied_total",
            "Decay steps applied to participants",
        )?;
        let failed_actions_total = IntCounterVec::new(
            Opts::new("elo_failed_actions_total", "Admin actions that were rejected"),
            &["kind"],
        )?;
        let batch_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "elo_batch_duration_seconds",
                "Time spent applying an admin batch",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;

        registry.register(Box::new(grades_applied_total.clone()))?;
        registry.register(Box::new(decays_applied_total.clone()))?;
        registry.register(Box::new(failed_actions_total.clone()))?;
        registry.register(Box::new(batch_duration_seconds.clone()))?;

        Ok(Self {
            grades_applied_total,
            decays_applied_total,
            failed_actions_total,
            batch_duration_seconds,
        })
    }
}

impl RosterMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let participants = IntGauge::new("elo_participants", "Participants on the roster")?;
        let battles_committed_total = IntCounter::new(
            "elo_battles_committed_total",
            "Battles committed to the battle log",
        )?;
        let imports_total = IntCounterVec::new(
            Opts::new("elo_imports_total", "Roster import operations"),
            &["kind", "result"],
        )?;
        let auth_failures_total = IntCounter::new(
            "elo_auth_failures_total",
            "Rejected admin authentication attempts",
        )?;

        registry.register(Box::new(participants.clone()))?;
        registry.register(Box::new(battles_committed_total.clone()))?;
        registry.register(Box::new(imports_total.clone()))?;
        registry.register(Box::new(auth_failures_total.clone()))?;

        Ok(Self {
            participants,
            battles_committed_total,
            imports_total,
            auth_failures_total,
        })
    }
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let rating_metrics = RatingMetrics::new(&registry)?;
        let roster_metrics = RosterMetrics::new(&registry)?;

        Ok(Self {
            registry,
            rating_metrics,
            roster_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn rating(&self) -> &RatingMetrics {
        &self.rating_metrics
    }

    pub fn roster(&self) -> &RosterMetrics {
        &self.roster_metrics
    }

    /// Record everything an admin batch did
    pub fn record_batch(&self, outcome: &BatchOutcome, elapsed: Duration) {
        for entry in &outcome.applied {
            match entry.adjustment {
                Adjustment::Grade(grade) => self
                    .rating_metrics
                    .grades_applied_total
                    .with_label_values(&[grade.as_str()])
                    .inc(),
                Adjustment::Decay => self.rating_metrics.decays_applied_total.inc(),
            }
        }

        for failure in &outcome.failures {
            self.rating_metrics
                .failed_actions_total
                .with_label_values(&[failure.kind])
                .inc();
        }

        if outcome.battle.is_some() {
            self.roster_metrics.battles_committed_total.inc();
        }

        self.rating_metrics
            .batch_duration_seconds
            .observe(elapsed.as_secs_f64());
    }

    /// Record an import attempt
    pub fn record_import(&self, kind: &str, success: bool) {
        let result = if success { "success" } else { "error" };
        self.roster_metrics
            .imports_total
            .with_label_values(&[kind, result])
            .inc();
    }

    pub fn set_participants(&self, count: usize) {
        self.roster_metrics.participants.set(count as i64);
    }

    pub fn record_auth_failure(&self) {
        self.roster_metrics.auth_failures_total.inc();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
