//! SQLite-backed [`CatalogRepository`].

use async_trait::async_trait;
use rigsmith_core::{CompatibilityRule, RawSpecification, TagSet};

use super::{CatalogRepository, CategoryTagRepository, RuleRepository, SpecificationRepository};
use crate::error::DbResult;
use crate::pool::Database;

/// The three catalog repositories sharing one pool.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    tags: CategoryTagRepository,
    rules: RuleRepository,
    specifications: SpecificationRepository,
}

impl SqliteCatalog {
    pub fn new(db: &Database) -> Self {
        SqliteCatalog {
            tags: db.category_tags(),
            rules: db.rules(),
            specifications: db.specifications(),
        }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalog {
    async fn tags_for_category(&self, slug: &str) -> DbResult<TagSet> {
        self.tags.for_category(slug).await
    }

    async fn rules_by_kind(&self, kind: &str) -> DbResult<Vec<CompatibilityRule>> {
        self.rules.by_kind(kind).await
    }

    async fn component_specifications(
        &self,
        component_id: &str,
    ) -> DbResult<Vec<RawSpecification>> {
        self.specifications.for_component(component_id).await
    }
}
