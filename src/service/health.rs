//! Health check reporting
//!
//! Liveness plus a small snapshot of roster and battle counts.

use crate::service::app::AppState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Session busy with an admin batch; stats omitted
    Degraded,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
        }
    }
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Participants on the roster
    pub participants: usize,
    /// Battles committed to the log
    pub battles_recorded: usize,
    /// Seconds since the service started
    pub uptime_seconds: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Roster snapshot, absent while an admin batch holds the session
    pub stats: Option<ServiceStats>,
}

impl HealthCheck {
    /// Build a health report without waiting on in-flight admin batches
    pub fn check(app_state: &AppState) -> Self {
        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_state.started_at()).num_seconds();
        let session = app_state.session();

        let (status, stats) = match session.try_read() {
            Ok(session) => (
                HealthStatus::Healthy,
                Some(ServiceStats {
                    participants: session.roster().len(),
                    battles_recorded: session.log().len(),
                    uptime_seconds,
                }),
            ),
            Err(_) => {
                debug!("Session busy during health check");
                (HealthStatus::Degraded, None)
            }
        };

        HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: now,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }

    #[tokio::test]
    async fn test_health_check_reports_counts() {
        let state = AppState::new(AppConfig::default()).unwrap();
        state.import_names("Alice\nBob").await;

        let health = HealthCheck::check(&state);
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.service, "beat-battle-elo");

        let stats = health.stats.unwrap();
        assert_eq!(stats.participants, 2);
        assert_eq!(stats.battles_recorded, 0);
    }

    #[tokio::test]
    async fn test_health_check_degraded_while_locked() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let session = state.session();
        let _guard = session.write().await;

        let health = HealthCheck::check(&state);
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(health.stats.is_none());
    }
}
