//! # Catalog Connection
//!
//! Opens the SQLite catalog either for authoring (seed, rule tools) or for
//! validation, which only ever reads.
//!
//! ```text
//!   seed / authoring                     validator
//!   DbConfig::new(path)                  DbConfig::new(path).read_only()
//!        │ creates file, migrates             │ file must exist, no DDL
//!        ▼                                    ▼
//!   SQLite serialises the writes        `readers` connections, one per
//!                                        concurrent fan-out query
//!                                        (tags per slug, rules per kind)
//! ```
//!
//! Readers wait up to `busy_timeout` when an authoring tool holds the write
//! lock instead of failing the lookup outright.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::SqliteCatalog;
use crate::repository::rules::RuleRepository;
use crate::repository::specifications::SpecificationRepository;
use crate::repository::tags::CategoryTagRepository;

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    File(PathBuf),
    /// Private database bound to a single connection; used by tests.
    Memory,
}

/// How to open the catalog.
///
/// ```rust
/// use rigsmith_db::DbConfig;
///
/// let config = DbConfig::new("/var/lib/rigsmith/catalog.db").read_only().readers(8);
/// assert!(config.read_only);
/// assert!(!config.migrates());
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: CatalogLocation,
    /// Open without write access. Implies no migrations.
    pub read_only: bool,
    /// Connections available to concurrent lookups.
    pub readers: u32,
    /// How long a lookup waits on a held write lock.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Writable catalog file, created and migrated on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: CatalogLocation::File(path.into()),
            read_only: false,
            readers: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Fresh migrated in-memory catalog.
    pub fn in_memory() -> Self {
        DbConfig {
            location: CatalogLocation::Memory,
            read_only: false,
            readers: 1,
            busy_timeout: Duration::from_secs(1),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn readers(mut self, readers: u32) -> Self {
        self.readers = readers.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == CatalogLocation::Memory
    }

    /// Schema is applied on open only when the catalog can be written.
    pub fn migrates(&self) -> bool {
        !self.read_only
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            CatalogLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            CatalogLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(!self.read_only)
                .read_only(self.read_only),
        };
        Ok(options.foreign_keys(true).busy_timeout(self.busy_timeout))
    }

    fn display_path(&self) -> &Path {
        match &self.location {
            CatalogLocation::File(path) => path,
            CatalogLocation::Memory => Path::new(":memory:"),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle on the catalog; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the catalog described by `config`.
    ///
    /// ## Errors
    /// `ConnectionFailed` when the file cannot be opened (a read-only open
    /// never creates one), `MigrationFailed` when a writable catalog cannot
    /// be brought up to the embedded schema.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let path = config.display_path().display().to_string();
        debug!(path = %path, read_only = config.read_only, "Opening catalog");

        // A memory database lives exactly as long as its only connection.
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.readers)
        };

        let pool = pool_options
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{}: {}", path, e)))?;

        let db = Database { pool };
        if config.migrates() {
            migrations::migrate(&db.pool).await?;
        } else {
            let status = migrations::schema_status(&db.pool).await?;
            if !status.is_current() {
                warn!(
                    path = %path,
                    applied = status.applied,
                    embedded = status.embedded,
                    "Catalog schema is behind, run the seed tool against it"
                );
            }
        }

        info!(path = %path, read_only = config.read_only, readers = config.readers, "Catalog open");
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn category_tags(&self) -> CategoryTagRepository {
        CategoryTagRepository::new(self.pool.clone())
    }

    pub fn rules(&self) -> RuleRepository {
        RuleRepository::new(self.pool.clone())
    }

    pub fn specifications(&self) -> SpecificationRepository {
        SpecificationRepository::new(self.pool.clone())
    }

    /// The three repositories behind [`CatalogRepository`](crate::CatalogRepository).
    pub fn catalog(&self) -> SqliteCatalog {
        SqliteCatalog::new(self)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// `true` while the catalog answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
