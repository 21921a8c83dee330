//! Error types for the rating service
//!
//! Domain failures are typed with thiserror so callers can report the
//! specific action that failed and keep going. Application plumbing uses
//! anyhow for consistent error handling.

/// Result type alias for application-level code
pub type Result<T> = anyhow::Result<T>;

/// Result type alias for core roster and rating operations
pub type EloResult<T> = std::result::Result<T, EloError>;

/// Recoverable failures raised by the roster, rating engine and import adapters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EloError {
    #[error("Unknown participant: {name}")]
    UnknownParticipant { name: String },

    #[error("Invalid grade: {grade}")]
    InvalidGrade { grade: String },

    #[error("Malformed import row {line}: {reason}")]
    MalformedImportRow { line: usize, reason: String },

    #[error("Participant already exists: {name}")]
    DuplicateParticipant { name: String },

    #[error("Participant name cannot be empty or padded with whitespace")]
    InvalidParticipantName,

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl EloError {
    /// Short machine-readable label, used for metrics and API responses
    pub fn kind(&self) -> &'static str {
        match self {
            EloError::UnknownParticipant { .. } => "unknown_participant",
            EloError::InvalidGrade { .. } => "invalid_grade",
            EloError::MalformedImportRow { .. } => "malformed_import_row",
            EloError::DuplicateParticipant { .. } => "duplicate_participant",
            EloError::InvalidParticipantName => "invalid_participant_name",
            EloError::ConfigurationError { .. } => "configuration_error",
        }
    }
}
