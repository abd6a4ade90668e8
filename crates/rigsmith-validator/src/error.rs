//! # Validator Error Types
//!
//! Errors raised while setting the validator up.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidatorError                                                         │
//! │  ├── Configuration: InvalidConfig, ConfigLoadFailed, ProfileLoadFailed │
//! │  ├── Registry:      Core(CoreError)                                    │
//! │  └── Storage:       Database(DbError)                                  │
//! │                                                                         │
//! │  validate_configuration itself never fails: repository problems       │
//! │  become a single advisory warning in the result.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rigsmith_core::CoreError;
use rigsmith_db::DbError;
use thiserror::Error;

/// Result type alias for validator setup.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

#[derive(Debug, Error)]
pub enum ValidatorError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid validator configuration.
    #[error("Invalid validator configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to read or parse a profile file.
    #[error("Failed to load profiles from {path}: {reason}")]
    ProfileLoadFailed { path: String, reason: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Profiles were readable but don't form a valid registry.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Opening the catalog database failed.
    #[error("Catalog database error: {0}")]
    Database(#[from] DbError),
}

impl From<std::io::Error> for ValidatorError {
    fn from(err: std::io::Error) -> Self {
        ValidatorError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ValidatorError {
    fn from(err: toml::de::Error) -> Self {
        ValidatorError::ConfigLoadFailed(err.to_string())
    }
}

impl ValidatorError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ValidatorError::InvalidConfig(_)
                | ValidatorError::ConfigLoadFailed(_)
                | ValidatorError::ProfileLoadFailed { .. }
        )
    }
}
