//! Service layer for the beat-battle-elo service
//!
//! This module contains the shared application state, health reporting and
//! the HTTP routes served by the production binary.

pub mod app;
pub mod health;
pub mod routes;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use routes::{create_router, ADMIN_PASSWORD_HEADER};
