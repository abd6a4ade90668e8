//! # rigsmith-validator: Async Validation Service for Rigsmith
//!
//! Wires the catalog repository, the tag registry and the pure engine into
//! one call: `validate_configuration(&Configuration) -> ValidationResult`.
//!
//! ## Module Organization
//!
//! - [`config`] - `ValidatorConfig` (defaults → TOML → environment)
//! - [`validator`] - `ConfigurationValidator`, concurrent catalog reads
//! - [`error`] - setup errors
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rigsmith_core::{ComponentEntry, Configuration};
//! use rigsmith_db::InMemoryCatalog;
//! use rigsmith_validator::{ConfigurationValidator, ValidatorConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let validator =
//!     ConfigurationValidator::from_config(Arc::new(InMemoryCatalog::new()), ValidatorConfig::default())?;
//!
//! let build = Configuration::new()
//!     .with("processors", ComponentEntry::new("c1", "Ryzen 7 7800X3D").spec("Socket", "AM5"))
//!     .with("motherboards", ComponentEntry::new("m1", "B550 board").spec("Socket", "AM4"));
//!
//! let result = validator.validate_configuration(&build).await;
//! assert!(!result.is_valid);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod validator;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ValidatorConfig;
pub use error::{ValidatorError, ValidatorResult};
pub use validator::{ConfigurationValidator, RULES_UNAVAILABLE};
