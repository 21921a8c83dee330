//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! beat-battle-elo service, including environment variable loading, TOML
//! file loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Host to bind the HTTP server to
    pub host: String,
    /// Port for the leaderboard/admin HTTP server
    pub http_port: u16,
    /// Shared secret for admin routes
    pub admin_password: String,
    /// Title shown alongside the leaderboard
    pub season_title: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "beat-battle-elo".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            admin_password: "admin123".to_string(),
            season_title: "SEASON 0 - INIT PRESET (OPEN BETA)".to_string(),
            shutdown_timeout_seconds: 30,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            self.service.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = parse_var("HTTP_PORT", &port)?;
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            self.service.admin_password = password;
        }
        if let Ok(title) = env::var("SEASON_TITLE") {
            self.service.season_title = title;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds =
                parse_var("SHUTDOWN_TIMEOUT_SECONDS", &timeout)?;
        }

        // Rating settings
        if let Ok(rating) = env::var("DEFAULT_RATING") {
            self.rating.default_rating = parse_var("DEFAULT_RATING", &rating)?;
        }
        if let Ok(placements) = env::var("DEFAULT_PLACEMENTS") {
            self.rating.default_placements = parse_var("DEFAULT_PLACEMENTS", &placements)?;
        }
        if let Ok(amount) = env::var("DECAY_AMOUNT") {
            self.rating.decay_amount = parse_var("DECAY_AMOUNT", &amount)?;
        }
        if let Ok(cap) = env::var("DECAY_CAP") {
            self.rating.decay_cap = parse_var("DECAY_CAP", &cap)?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.http_port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.service.admin_password.is_empty() {
        return Err(anyhow!("Admin password cannot be empty"));
    }

    config.rating.validate()?;

    Ok(())
}
