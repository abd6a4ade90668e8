//! # rigsmith-core: Pure Compatibility Logic for Rigsmith
//!
//! This crate is the **heart** of Rigsmith. It decides whether a set of PC
//! components can be assembled into a working build, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rigsmith Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Storefront / Configurator UI                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Configuration (JSON)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               rigsmith-validator (async orchestration)          │   │
//! │  │    fetch tags/rules/specs concurrently, timeouts, config        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ EvaluationInput                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ rigsmith-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ ┌───────┐  │   │
//! │  │   │normalize │ │   tags   │ │  compat  │ │ power  │ │result │  │   │
//! │  │   │ raw →    │ │ profiles │ │ matrix   │ │ budget │ │ merge │  │   │
//! │  │   │ typed    │ │ registry │ │ physical │ │ supply │ │       │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                rigsmith-db (catalog repository)                 │   │
//! │  │         category tags, authored rules, stored specifications    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Configuration input, Issue and ValidationResult output
//! - [`value`] - Typed specification values
//! - [`hardware`] - Socket, chipset and memory reference tables
//! - [`normalize`] - Raw value normalization
//! - [`tags`] - Capability tags, profiles and the registry
//! - [`compat`] - Compatibility rule engine
//! - [`power`] - Power budget and supply validation
//! - [`result`] - Result aggregation
//! - [`pipeline`] - End-to-end synchronous evaluation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rigsmith_core::pipeline::{evaluate_configuration, EvaluationInput};
//! use rigsmith_core::tags::TagRegistry;
//! use rigsmith_core::{ComponentEntry, Configuration};
//!
//! let registry = TagRegistry::builtin().unwrap();
//! let config = Configuration::new()
//!     .with("processor", ComponentEntry::new("c1", "Ryzen 7 7800X3D").spec("socket", "AM5"))
//!     .with("motherboard", ComponentEntry::new("m1", "B550 board").spec("socket", "AM4"));
//!
//! let result = evaluate_configuration(&registry, &config, &EvaluationInput::default());
//! assert!(!result.is_valid);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compat;
pub mod error;
pub mod hardware;
pub mod normalize;
pub mod pipeline;
pub mod power;
pub mod result;
pub mod tags;
pub mod types;
pub mod value;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use compat::{CompatibilityRule, EvaluationMode};
pub use error::{CoreError, CoreResult, ValidationError};
pub use pipeline::{ConfigurationPipeline, EvaluationInput};
pub use power::{PowerPolicy, Watts};
pub use tags::{CapabilityTag, ComponentRole, TagRegistry, TagSet};
pub use types::*;
pub use value::{RawValue, SpecMap, SpecificationValue, ValueKind};
