//! # Repository Module
//!
//! Read access to the catalog data the compatibility engine consumes.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Repository                                   │
//! │                                                                         │
//! │  ConfigurationValidator                                                │
//! │       │                                                                 │
//! │       │  repo.tags_for_category("cpu")                                 │
//! │       ▼                                                                 │
//! │  dyn CatalogRepository                                                 │
//! │  ├── tags_for_category(slug)          → TagSet                         │
//! │  ├── rules_by_kind(kind)              → Vec<CompatibilityRule>         │
//! │  └── component_specifications(id)     → Vec<RawSpecification>          │
//! │       │                                         │                       │
//! │       ▼                                         ▼                       │
//! │  SqliteCatalog (sqlx)                  InMemoryCatalog (tests, demos)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryTagRepository`] - capability tags per category
//! - [`RuleRepository`] - authored compatibility rules
//! - [`SpecificationRepository`] - stored raw specifications
//! - [`SqliteCatalog`] / [`InMemoryCatalog`] - [`CatalogRepository`] implementations

use async_trait::async_trait;
use rigsmith_core::{CompatibilityRule, RawSpecification, TagSet};

use crate::error::DbResult;

pub mod catalog;
pub mod memory;
pub mod rules;
pub mod specifications;
pub mod tags;

pub use catalog::SqliteCatalog;
pub use memory::InMemoryCatalog;
pub use rules::RuleRepository;
pub use specifications::SpecificationRepository;
pub use tags::CategoryTagRepository;

/// Rule kinds accepted by [`CatalogRepository::rules_by_kind`].
pub const RULE_KINDS: [&str; 3] = ["exact_match", "derived_lookup", "numeric_bound"];

/// Everything the engine reads from the catalog.
///
/// All methods are read-only. An unknown slug or component yields an empty
/// result, never an error.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Capability tags assigned to a category slug.
    async fn tags_for_category(&self, slug: &str) -> DbResult<TagSet>;

    /// Authored rules whose comparison mode is `kind` (see [`RULE_KINDS`]).
    async fn rules_by_kind(&self, kind: &str) -> DbResult<Vec<CompatibilityRule>>;

    /// Stored raw specifications of a catalog component, in entry order.
    async fn component_specifications(&self, component_id: &str)
        -> DbResult<Vec<RawSpecification>>;
}
