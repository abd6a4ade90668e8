//! # Specification Repository
//!
//! Raw specification values stored per catalog component.
//!
//! Values are kept exactly as entered, JSON-encoded (`"AM5"`, `3.2`,
//! `true`), and only normalized by the engine at validation time.

use rigsmith_core::{RawSpecification, RawValue};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, FromRow)]
struct SpecificationRow {
    name: String,
    raw_value: String,
}

impl SpecificationRow {
    fn decode(self) -> DbResult<RawSpecification> {
        let raw_value: RawValue = serde_json::from_str(&self.raw_value).map_err(|_| {
            DbError::decode("component_specifications", "raw_value", &self.raw_value)
        })?;
        Ok(RawSpecification {
            name: self.name,
            raw_value,
        })
    }
}

/// Repository for `component_specifications`.
#[derive(Debug, Clone)]
pub struct SpecificationRepository {
    pool: SqlitePool,
}

impl SpecificationRepository {
    /// Creates a new SpecificationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SpecificationRepository { pool }
    }

    /// Specifications of a component in entry order.
    ///
    /// ## Errors
    /// `Decode` when a stored value is not valid JSON for a raw value.
    pub async fn for_component(&self, component_id: &str) -> DbResult<Vec<RawSpecification>> {
        let rows: Vec<SpecificationRow> = sqlx::query_as(
            r#"
            SELECT name, raw_value
            FROM component_specifications
            WHERE component_id = ?1
            ORDER BY position ASC
            "#,
        )
        .bind(component_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(component = %component_id, count = rows.len(), "Loaded specifications");
        rows.into_iter().map(SpecificationRow::decode).collect()
    }

    /// Replaces every stored specification of a component in one
    /// transaction.
    pub async fn replace(&self, component_id: &str, specs: &[RawSpecification]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM component_specifications WHERE component_id = ?1")
            .bind(component_id)
            .execute(&mut *tx)
            .await?;

        for (position, spec) in specs.iter().enumerate() {
            let raw_value = serde_json::to_string(&spec.raw_value)
                .map_err(|e| DbError::Internal(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO component_specifications (component_id, position, name, raw_value)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(component_id)
            .bind(position as i64)
            .bind(&spec.name)
            .bind(raw_value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(component = %component_id, count = specs.len(), "Replaced specifications");
        Ok(())
    }
}
