//! Main application state and service coordination
//!
//! [`AppState`] wraps the rating session behind a single lock. Every admin
//! batch and import holds the write lock for its whole duration, so readers
//! of the leaderboard or battle history never see a half-applied change.

use crate::config::AppConfig;
use crate::error::EloResult;
use crate::history::BattleEvent;
use crate::metrics::MetricsCollector;
use crate::session::{BatchOutcome, EloSession};
use crate::types::{BattleResult, LeaderboardRow, ParticipantName};
use crate::utils::{current_timestamp, password_matches};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Roster, battle log and rating engine
    session: Arc<RwLock<EloSession>>,

    /// Prometheus metrics
    metrics: Arc<MetricsCollector>,

    started_at: DateTime<Utc>,
}

impl AppState {
    /// Initialize the application with an empty roster
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        let session = EloSession::with_config(config.rating.clone()).map_err(|e| {
            ServiceError::Configuration {
                message: e.to_string(),
            }
        })?;
        Self::with_session(config, session)
    }

    /// Initialize the application around an existing session
    pub fn with_session(config: AppConfig, session: EloSession) -> Result<Self, ServiceError> {
        info!(
            "Initializing {} with {} participants",
            config.service.name,
            session.roster().len()
        );

        let metrics = MetricsCollector::new().map_err(|e| ServiceError::Initialization {
            message: format!("Failed to create metrics collector: {}", e),
        })?;
        metrics.set_participants(session.roster().len());

        Ok(Self {
            config,
            session: Arc::new(RwLock::new(session)),
            metrics: Arc::new(metrics),
            started_at: current_timestamp(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> Arc<RwLock<EloSession>> {
        self.session.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Check an admin password attempt against the configured secret
    pub fn authorize_admin(&self, attempt: Option<&str>) -> bool {
        let authorized = attempt
            .map(|attempt| password_matches(attempt, &self.config.service.admin_password))
            .unwrap_or(false);

        if !authorized {
            warn!("Rejected admin request with missing or invalid password");
            self.metrics.record_auth_failure();
        }
        authorized
    }

    /// Apply a battle batch under the write lock
    pub async fn run_battle(&self, results: &[BattleResult], decay: bool) -> BatchOutcome {
        let start_time = Instant::now();
        let mut session = self.session.write().await;

        let outcome = session.run_battle(results, decay);
        let elapsed = start_time.elapsed();

        info!(
            "Battle batch processed - results: {}, decay: {}, applied: {}, failed: {}, battle: {:?}, time: {:.2}ms",
            results.len(),
            decay,
            outcome.applied.len(),
            outcome.failures.len(),
            outcome.battle,
            elapsed.as_secs_f64() * 1000.0
        );

        self.metrics.record_batch(&outcome, elapsed);
        outcome
    }

    /// Replace the roster from CSV text
    pub async fn import_csv(&self, text: &str) -> EloResult<usize> {
        let mut session = self.session.write().await;
        let result = session.import_csv(text.as_bytes());

        self.metrics.record_import("csv", result.is_ok());
        self.metrics.set_participants(session.roster().len());
        result
    }

    /// Add participants from extracted text
    pub async fn import_names(&self, text: &str) -> Vec<ParticipantName> {
        let mut session = self.session.write().await;
        let added = session.import_extracted_text(text);

        self.metrics.record_import("names", true);
        self.metrics.set_participants(session.roster().len());
        added
    }

    pub async fn export_csv(&self) -> anyhow::Result<String> {
        self.session.read().await.export_csv()
    }

    pub async fn leaderboard(&self) -> Vec<LeaderboardRow> {
        self.session.read().await.leaderboard()
    }

    pub async fn battles(&self) -> Vec<BattleEvent> {
        self.session.read().await.log().events().to_vec()
    }

    /// Look up one battle by its sequence number
    pub async fn battle(&self, sequence: u64) -> Option<BattleEvent> {
        let session = self.session.read().await;
        let index = usize::try_from(sequence.checked_sub(1)?).ok()?;
        session.log().events().get(index).cloned()
    }
}
