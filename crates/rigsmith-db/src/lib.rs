//! # rigsmith-db: Catalog Repository for Rigsmith
//!
//! Read access to the catalog data the compatibility engine consumes:
//! capability tags per category, authored compatibility rules, and stored
//! raw component specifications.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rigsmith Data Flow                               │
//! │                                                                         │
//! │  ConfigurationValidator (rigsmith-validator)                           │
//! │       │  Arc<dyn CatalogRepository>                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   rigsmith-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐    ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │    │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                  │    │ (embedded) │  │   │
//! │  │   │               │    │ CategoryTagRepo  │    │            │  │   │
//! │  │   │ SqlitePool    │◄───│ RuleRepo         │    │ 001_init   │  │   │
//! │  │   │               │    │ SpecificationRepo│    │            │  │   │
//! │  │   └───────────────┘    └──────────────────┘    └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   InMemoryCatalog ── same trait, no database                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rigsmith_db::{CatalogRepository, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("catalog.db").read_only()).await?;
//! let tags = db.catalog().tags_for_category("processors").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{CatalogLocation, Database, DbConfig};

pub use repository::{
    CatalogRepository, CategoryTagRepository, InMemoryCatalog, RuleRepository,
    SpecificationRepository, SqliteCatalog, RULE_KINDS,
};
