//! Utility functions for the rating service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique battle batch ID
pub fn generate_batch_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Constant-time comparison of an admin password attempt against the secret
pub fn password_matches(attempt: &str, secret: &str) -> bool {
    let (a, b) = (attempt.as_bytes(), secret.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
