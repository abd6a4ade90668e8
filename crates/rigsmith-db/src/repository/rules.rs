//! # Rule Repository
//!
//! Authored compatibility rules.
//!
//! ## Storage Format
//! ```text
//! ┌──────────┬────────────────┬───────────────────────┬──────────────────────────────┐
//! │ kind     │ primary_target │ secondary_target      │ comparison                   │
//! ├──────────┼────────────────┼───────────────────────┼──────────────────────────────┤
//! │ numeric_ │ tag:provides_  │ category:case         │ numeric_bound:at_most        │
//! │ bound    │ graphics       │                       │                              │
//! └──────────┴────────────────┴───────────────────────┴──────────────────────────────┘
//! ```
//! Keys are decoded with the parsers in `rigsmith_core::compat`. A row that
//! doesn't decode is skipped with a warning; the rest of the rule set stays
//! usable.

use chrono::{DateTime, Utc};
use rigsmith_core::compat::rule::{ComparisonMode, RuleSeverity, RuleTarget};
use rigsmith_core::CompatibilityRule;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// One `compatibility_rules` row as stored.
#[derive(Debug, Clone, FromRow)]
struct RuleRow {
    id: String,
    primary_target: String,
    primary_field: String,
    secondary_target: String,
    secondary_field: String,
    comparison: String,
    severity: String,
    message: Option<String>,
}

impl RuleRow {
    fn decode(self) -> DbResult<CompatibilityRule> {
        let primary = RuleTarget::parse(&self.primary_target).ok_or_else(|| {
            DbError::decode("compatibility_rules", "primary_target", &self.primary_target)
        })?;
        let secondary = RuleTarget::parse(&self.secondary_target).ok_or_else(|| {
            DbError::decode("compatibility_rules", "secondary_target", &self.secondary_target)
        })?;
        let comparison = ComparisonMode::parse(&self.comparison).ok_or_else(|| {
            DbError::decode("compatibility_rules", "comparison", &self.comparison)
        })?;
        let severity = RuleSeverity::parse(&self.severity)
            .ok_or_else(|| DbError::decode("compatibility_rules", "severity", &self.severity))?;

        Ok(CompatibilityRule {
            id: self.id,
            primary,
            primary_field: self.primary_field,
            secondary,
            secondary_field: self.secondary_field,
            comparison,
            severity,
            message: self.message.filter(|m| !m.trim().is_empty()),
        })
    }
}

/// Repository for `compatibility_rules`.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    pool: SqlitePool,
}

impl RuleRepository {
    /// Creates a new RuleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RuleRepository { pool }
    }

    /// Rules of one comparison kind, oldest first.
    pub async fn by_kind(&self, kind: &str) -> DbResult<Vec<CompatibilityRule>> {
        let rows: Vec<RuleRow> = sqlx::query_as(
            r#"
            SELECT
                id,
                primary_target,
                primary_field,
                secondary_target,
                secondary_field,
                comparison,
                severity,
                message
            FROM compatibility_rules
            WHERE kind = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match row.decode() {
                Ok(rule) => rules.push(rule),
                Err(err) => warn!(rule = %id, error = %err, "Skipping undecodable rule"),
            }
        }

        debug!(kind = %kind, count = rules.len(), "Loaded compatibility rules");
        Ok(rules)
    }

    /// Stores a rule and returns its id.
    ///
    /// A blank `rule.id` is replaced by a fresh UUID.
    ///
    /// ## Errors
    /// `UniqueViolation` when the id is already taken.
    pub async fn insert(&self, rule: &CompatibilityRule) -> DbResult<String> {
        let id = if rule.id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            rule.id.clone()
        };
        let created_at: DateTime<Utc> = Utc::now();

        debug!(rule = %id, kind = rule.kind(), "Inserting compatibility rule");

        sqlx::query(
            r#"
            INSERT INTO compatibility_rules (
                id, kind, primary_target, primary_field,
                secondary_target, secondary_field, comparison,
                severity, message, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&id)
        .bind(rule.kind())
        .bind(rule.primary.to_string())
        .bind(&rule.primary_field)
        .bind(rule.secondary.to_string())
        .bind(&rule.secondary_field)
        .bind(rule.comparison.as_key())
        .bind(rule.severity.as_str())
        .bind(&rule.message)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Total stored rules, decodable or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM compatibility_rules")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
