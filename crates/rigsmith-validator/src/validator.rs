//! # Configuration Validator
//!
//! Async front door of the engine. Gathers everything a validation needs
//! from the catalog concurrently, then runs the synchronous pipeline.
//!
//! ## Gathering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_configuration(config)                                        │
//! │       │                                                                 │
//! │       ├── tags_for_category(slug)        ┐                              │
//! │       │     (per slug, auto-detect       │                              │
//! │       │      when nothing is stored)     │  join_all, each read under  │
//! │       ├── rules_by_kind(kind)            │  tokio::time::timeout       │
//! │       │     (exact, derived, numeric)    │                              │
//! │       └── component_specifications(id)   ┘                              │
//! │             (entries sent without specs)                               │
//! │       │                                                                 │
//! │       ▼ fan-in                                                          │
//! │  any failure / timeout ──► ONE "Compatibility rules unavailable"       │
//! │                            warning, evaluation continues               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ConfigurationPipeline::evaluate ──► ValidationResult                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures::future::join_all;
use rigsmith_core::pipeline::{ConfigurationPipeline, Evaluation, EvaluationInput};
use rigsmith_core::{
    CompatibilityRule, Configuration, Issue, RawSpecification, Severity, TagRegistry, TagSet,
    ValidationResult,
};
use rigsmith_db::{CatalogRepository, DbResult, RULE_KINDS};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::error::ValidatorResult;

/// Message of the advisory raised when catalog data could not be read.
pub const RULES_UNAVAILABLE: &str = "Compatibility rules unavailable";

/// Validates configurations against a catalog repository.
pub struct ConfigurationValidator {
    repository: Arc<dyn CatalogRepository>,
    registry: TagRegistry,
    config: ValidatorConfig,
}

/// Everything read from the catalog for one configuration.
struct Gathered {
    configuration: Configuration,
    input: EvaluationInput,
}

impl ConfigurationValidator {
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        registry: TagRegistry,
        config: ValidatorConfig,
    ) -> Self {
        ConfigurationValidator {
            repository,
            registry,
            config,
        }
    }

    /// Builds a validator whose registry comes from `config`.
    ///
    /// ## Errors
    /// See [`ValidatorConfig::load_registry`].
    pub fn from_config(
        repository: Arc<dyn CatalogRepository>,
        config: ValidatorConfig,
    ) -> ValidatorResult<Self> {
        let registry = config.load_registry()?;
        Ok(Self::new(repository, registry, config))
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates one configuration. Never fails: every problem, including
    /// an unreachable catalog, is reported inside the result.
    pub async fn validate_configuration(&self, configuration: &Configuration) -> ValidationResult {
        self.evaluate(configuration).await.into_result()
    }

    /// Like [`Self::validate_configuration`], also returning the evaluation
    /// mode and the power budget.
    pub async fn evaluate(&self, configuration: &Configuration) -> Evaluation {
        let gathered = self.gather(configuration).await;
        ConfigurationPipeline::new(&self.registry, self.config.power_policy())
            .evaluate(&gathered.configuration, &gathered.input)
    }

    async fn gather(&self, configuration: &Configuration) -> Gathered {
        let timeout = self.config.repository_timeout();

        let (tag_reads, rule_reads, spec_reads) = futures::join!(
            join_all(configuration.slugs().map(|slug| {
                let repo = Arc::clone(&self.repository);
                let slug = slug.clone();
                async move {
                    let read = bounded(timeout, async { repo.tags_for_category(&slug).await }).await;
                    (slug, read)
                }
            })),
            join_all(RULE_KINDS.iter().map(|kind| {
                let repo = Arc::clone(&self.repository);
                async move {
                    let read = bounded(timeout, async { repo.rules_by_kind(kind).await }).await;
                    (*kind, read)
                }
            })),
            join_all(
                configuration
                    .iter()
                    .filter(|(_, entry)| entry.specifications.is_empty())
                    .map(|(slug, entry)| {
                        let repo = Arc::clone(&self.repository);
                        let slug = slug.clone();
                        let id = entry.id.clone();
                        async move {
                            let read =
                                bounded(timeout, async { repo.component_specifications(&id).await })
                                    .await;
                            (slug, read)
                        }
                    })
            ),
        );

        let mut failures: Vec<String> = Vec::new();

        let mut tags: BTreeMap<String, TagSet> = BTreeMap::new();
        for (slug, read) in tag_reads {
            let stored = match read {
                Ok(stored) => stored,
                Err(reason) => {
                    failures.push(format!("tags for '{}': {}", slug, reason));
                    TagSet::new()
                }
            };
            let resolved = if stored.is_empty() {
                self.detect_tags(&slug, configuration)
            } else {
                stored
            };
            if !resolved.is_empty() {
                tags.insert(slug, resolved);
            }
        }

        let mut rules: Vec<CompatibilityRule> = Vec::new();
        for (kind, read) in rule_reads {
            match read {
                Ok(mut batch) => rules.append(&mut batch),
                Err(reason) => failures.push(format!("{} rules: {}", kind, reason)),
            }
        }

        let mut hydrated = configuration.clone();
        for (slug, read) in spec_reads {
            match read {
                Ok(specs) => attach_specifications(&mut hydrated, &slug, specs),
                Err(reason) => failures.push(format!("specifications for '{}': {}", slug, reason)),
            }
        }

        let mut advisories = Vec::new();
        if !failures.is_empty() {
            warn!(failures = failures.len(), "Catalog reads failed, evaluating with partial data");
            advisories.push(
                Issue::warning(Severity::Medium, RULES_UNAVAILABLE).with_details(failures.join("; ")),
            );
        }

        info!(
            slugs = configuration.len(),
            tagged = tags.len(),
            rules = rules.len(),
            "Catalog data gathered"
        );

        Gathered {
            configuration: hydrated,
            input: EvaluationInput {
                tags,
                rules,
                advisories,
            },
        }
    }

    /// Tags of the profile best matching the slug and the entry's title.
    fn detect_tags(&self, slug: &str, configuration: &Configuration) -> TagSet {
        if !self.config.engine.auto_detect {
            return TagSet::new();
        }
        let title = configuration.get(slug).map(|e| e.title.as_str()).unwrap_or("");
        match self
            .registry
            .resolve(slug, title, self.config.engine.min_detection_confidence)
        {
            Some(profile) => {
                debug!(slug = %slug, profile = %profile.id, "Auto-detected profile");
                profile.tags.clone()
            }
            None => TagSet::new(),
        }
    }
}

/// Runs one repository read under `limit`, flattening both failure modes
/// into a reason string.
async fn bounded<T>(limit: Duration, read: impl Future<Output = DbResult<T>>) -> Result<T, String> {
    match tokio::time::timeout(limit, read).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(_) => Err(format!("timed out after {} ms", limit.as_millis())),
    }
}

fn attach_specifications(configuration: &mut Configuration, slug: &str, specs: Vec<RawSpecification>) {
    if let Some(entry) = configuration.get(slug) {
        let mut entry = entry.clone();
        debug!(slug = %slug, count = specs.len(), "Attached stored specifications");
        entry.specifications = specs;
        configuration.insert(slug, entry);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rigsmith_core::compat::{ComparisonMode, RuleSeverity, RuleTarget};
    use rigsmith_core::{CapabilityTag, ComponentEntry, ComponentRole, EvaluationMode};
    use rigsmith_db::{DbError, InMemoryCatalog};

    fn registry() -> TagRegistry {
        TagRegistry::builtin().unwrap()
    }

    fn validator(repo: impl CatalogRepository + 'static) -> ConfigurationValidator {
        ConfigurationValidator::new(Arc::new(repo), registry(), ValidatorConfig::default())
    }

    fn catalog_with_roles(slots: &[(&str, ComponentRole)]) -> InMemoryCatalog {
        let registry = registry();
        slots.iter().fold(InMemoryCatalog::new(), |catalog, (slug, role)| {
            catalog.with_tags(*slug, registry.tags(role.profile_id()))
        })
    }

    fn socket_pair(cpu: &str, board: &str) -> Configuration {
        Configuration::new()
            .with("processors", ComponentEntry::new("cpu-1", "Ryzen 7 7800X3D").spec("Socket", cpu))
            .with("motherboards", ComponentEntry::new("mb-1", "B650 board").spec("Socket", board))
    }

    /// Repository whose every read fails.
    struct BrokenCatalog;

    #[async_trait]
    impl CatalogRepository for BrokenCatalog {
        async fn tags_for_category(&self, _slug: &str) -> DbResult<TagSet> {
            Err(DbError::ConnectionFailed("refused".into()))
        }
        async fn rules_by_kind(&self, _kind: &str) -> DbResult<Vec<CompatibilityRule>> {
            Err(DbError::PoolExhausted)
        }
        async fn component_specifications(&self, _id: &str) -> DbResult<Vec<RawSpecification>> {
            Err(DbError::PoolExhausted)
        }
    }

    /// Repository that answers rules only after a long pause.
    struct SlowRules(InMemoryCatalog);

    #[async_trait]
    impl CatalogRepository for SlowRules {
        async fn tags_for_category(&self, slug: &str) -> DbResult<TagSet> {
            self.0.tags_for_category(slug).await
        }
        async fn rules_by_kind(&self, kind: &str) -> DbResult<Vec<CompatibilityRule>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            self.0.rules_by_kind(kind).await
        }
        async fn component_specifications(&self, id: &str) -> DbResult<Vec<RawSpecification>> {
            self.0.component_specifications(id).await
        }
    }

    fn unavailable(result: &ValidationResult) -> Vec<&Issue> {
        result
            .warnings
            .iter()
            .filter(|w| w.message == RULES_UNAVAILABLE)
            .collect()
    }

    #[tokio::test]
    async fn test_stored_tags_drive_tagged_mode() {
        let catalog = catalog_with_roles(&[
            ("processors", ComponentRole::Cpu),
            ("motherboards", ComponentRole::Motherboard),
        ]);
        let evaluation = validator(catalog).evaluate(&socket_pair("AM5", "AM4")).await;

        assert_eq!(evaluation.mode, EvaluationMode::Tagged);
        assert!(!evaluation.result.is_valid);
        assert_eq!(evaluation.result.issues.len(), 1);
        assert!(evaluation.result.issues[0].message.contains("AM5"));
        assert!(evaluation.result.issues[0].message.contains("AM4"));
    }

    #[tokio::test]
    async fn test_auto_detect_fills_untagged_categories() {
        let evaluation = validator(InMemoryCatalog::new())
            .evaluate(&socket_pair("AM5", "AM5"))
            .await;

        assert_eq!(evaluation.mode, EvaluationMode::Tagged);
        assert!(evaluation.result.is_valid);
    }

    #[tokio::test]
    async fn test_without_auto_detect_falls_back_to_legacy() {
        let mut config = ValidatorConfig::default();
        config.engine.auto_detect = false;
        let validator =
            ConfigurationValidator::new(Arc::new(InMemoryCatalog::new()), registry(), config);

        let configuration = Configuration::new()
            .with("processor", ComponentEntry::new("c", "CPU").spec("socket", "AM5"))
            .with("motherboard", ComponentEntry::new("m", "Board").spec("socket", "LGA1700"));
        let evaluation = validator.evaluate(&configuration).await;

        assert_eq!(evaluation.mode, EvaluationMode::Legacy);
        assert_eq!(evaluation.result.issues.len(), 1);
    }

    #[tokio::test]
    async fn test_stored_specifications_used_when_entry_has_none() {
        let catalog = catalog_with_roles(&[
            ("processors", ComponentRole::Cpu),
            ("motherboards", ComponentRole::Motherboard),
        ])
        .with_specifications("cpu-1", vec![RawSpecification::new("Socket", "LGA1700")]);

        let configuration = Configuration::new()
            .with("processors", ComponentEntry::new("cpu-1", "Core i5-13600K"))
            .with("motherboards", ComponentEntry::new("mb-1", "Z790").spec("Socket", "AM5"));
        let result = validator(catalog).validate_configuration(&configuration).await;

        assert!(!result.is_valid);
        assert!(result.issues[0].message.contains("LGA1700"));
    }

    #[tokio::test]
    async fn test_authored_rules_from_catalog_apply() {
        let catalog = catalog_with_roles(&[
            ("graphics-cards", ComponentRole::Gpu),
            ("power-supplies", ComponentRole::Psu),
        ])
        .with_rule(CompatibilityRule {
            id: "gpu-vs-psu".to_string(),
            primary: RuleTarget::Tag(CapabilityTag::ProvidesGraphics),
            primary_field: "power_consumption".to_string(),
            secondary: RuleTarget::Tag(CapabilityTag::ProvidesPower),
            secondary_field: "wattage".to_string(),
            comparison: ComparisonMode::NumericBound {
                bound: rigsmith_core::compat::Bound::AtMost,
            },
            severity: RuleSeverity::Error,
            message: Some("Card draws more than the supply".to_string()),
        });

        let configuration = Configuration::new()
            .with(
                "graphics-cards",
                ComponentEntry::new("g", "RTX").spec("Power Consumption", "450W"),
            )
            .with(
                "power-supplies",
                ComponentEntry::new("p", "PSU")
                    .spec("Wattage", "400W")
                    .spec("Efficiency", "80+ Gold"),
            );
        let result = validator(catalog).validate_configuration(&configuration).await;

        assert!(result
            .issues
            .iter()
            .any(|i| i.message == "Card draws more than the supply"));
    }

    #[tokio::test]
    async fn test_broken_repository_yields_single_warning() {
        let configuration = Configuration::new()
            .with("processor", ComponentEntry::new("c", "CPU"))
            .with("motherboard", ComponentEntry::new("m", "Board").spec("socket", "AM5"));

        let result = validator(BrokenCatalog).validate_configuration(&configuration).await;

        let advisories = unavailable(&result);
        assert_eq!(advisories.len(), 1);
        let details = advisories[0].details.as_deref().unwrap_or("");
        assert!(details.contains("tags for 'motherboard'"));
        assert!(details.contains("specifications for 'processor'"));
        // Advisory is the last finding.
        assert_eq!(result.warnings.last().map(|w| w.message.as_str()), Some(RULES_UNAVAILABLE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_rules_time_out() {
        let catalog = catalog_with_roles(&[
            ("processors", ComponentRole::Cpu),
            ("motherboards", ComponentRole::Motherboard),
        ]);
        let mut config = ValidatorConfig::default();
        config.repository.timeout_ms = 50;
        let validator = ConfigurationValidator::new(Arc::new(SlowRules(catalog)), registry(), config);

        let result = validator
            .validate_configuration(&socket_pair("AM5", "AM4"))
            .await;

        // Tags still arrived, so the socket check ran.
        assert_eq!(result.issues.len(), 1);
        let advisories = unavailable(&result);
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0]
            .details
            .as_deref()
            .unwrap_or("")
            .contains("timed out after 50 ms"));
    }

    #[tokio::test]
    async fn test_identical_inputs_identical_output() {
        let catalog = catalog_with_roles(&[("processors", ComponentRole::Cpu)]);
        let validator = validator(catalog);
        let configuration = socket_pair("AM5", "AM4");

        let first = validator.validate_configuration(&configuration).await;
        let second = validator.validate_configuration(&configuration).await;
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
