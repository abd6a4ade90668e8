//! # In-Memory Catalog
//!
//! A [`CatalogRepository`] over plain maps, for tests and for running the
//! validator against a JSON catalog without a database.
//!
//! ```rust
//! use rigsmith_core::{CapabilityTag, RawSpecification};
//! use rigsmith_db::InMemoryCatalog;
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_tags("psu", [CapabilityTag::ProvidesPower])
//!     .with_specifications("psu-1", vec![RawSpecification::new("Wattage", "750W")]);
//! assert_eq!(catalog.category_count(), 1);
//! ```

use async_trait::async_trait;
use rigsmith_core::{CapabilityTag, CompatibilityRule, RawSpecification, TagSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CatalogRepository;
use crate::error::DbResult;

/// Catalog data held in memory.
///
/// Serializable, so a whole catalog can be loaded from one JSON document:
///
/// ```json
/// {
///   "tags": { "processors": ["provides_compute", "requires_socket"] },
///   "rules": [],
///   "specifications": { "cpu-1": [{ "name": "Socket", "rawValue": "AM5" }] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    tags: BTreeMap<String, TagSet>,
    #[serde(default)]
    rules: Vec<CompatibilityRule>,
    #[serde(default)]
    specifications: BTreeMap<String, Vec<RawSpecification>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tags to a category.
    pub fn with_tags(
        mut self,
        slug: impl Into<String>,
        tags: impl IntoIterator<Item = CapabilityTag>,
    ) -> Self {
        self.tags.entry(slug.into()).or_default().extend(tags);
        self
    }

    pub fn with_rule(mut self, rule: CompatibilityRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_specifications(
        mut self,
        component_id: impl Into<String>,
        specs: Vec<RawSpecification>,
    ) -> Self {
        self.specifications.insert(component_id.into(), specs);
        self
    }

    pub fn category_count(&self) -> usize {
        self.tags.len()
    }

    pub fn rules(&self) -> &[CompatibilityRule] {
        &self.rules
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn tags_for_category(&self, slug: &str) -> DbResult<TagSet> {
        Ok(self.tags.get(slug).cloned().unwrap_or_default())
    }

    async fn rules_by_kind(&self, kind: &str) -> DbResult<Vec<CompatibilityRule>> {
        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.kind() == kind)
            .cloned()
            .collect())
    }

    async fn component_specifications(
        &self,
        component_id: &str,
    ) -> DbResult<Vec<RawSpecification>> {
        Ok(self
            .specifications
            .get(component_id)
            .cloned()
            .unwrap_or_default())
    }
}
