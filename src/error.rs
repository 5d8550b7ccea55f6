//! Error types for the onboarding service.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures reported by a persistence sink.
///
/// These never reach the flow controller; the dispatched save task logs them.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Store rejected profile: {0}")]
    Database(#[from] DatabaseError),

    #[error("Sink {sink} unavailable: {reason}")]
    Unavailable { sink: String, reason: String },
}

/// Place lookup (autocomplete) errors.
#[derive(Debug, thiserror::Error)]
pub enum PlaceLookupError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited")]
    RateLimited { provider: String },
}

/// Validation errors reported by profile edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("Bio exceeds maximum length: {length} > {max} characters")]
    BioTooLong { length: usize, max: usize },

    #[error("Invalid affiliation: {reason}")]
    InvalidAffiliation { reason: &'static str },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
