//! # Validation Pipeline
//!
//! The synchronous end-to-end evaluation of one configuration. Everything
//! the pipeline needs from the outside world (tags per slug, authored rules,
//! advisories about unavailable data) arrives pre-fetched in an
//! [`EvaluationInput`]; the async orchestration lives in the validator crate.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Configuration ──► assign_roles(tags) ──► Tagged | Legacy              │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  normalize_component (per slot, against the role's profile)            │
//! │        │ errors ──► blocking issues (medium) on the slot                │
//! │        │ notes  ──► warnings on the slot                                │
//! │        ▼                                                                │
//! │  compat::evaluate ──► Findings                                         │
//! │        │                                                                │
//! │  power::calculate_power ──► PowerBudget ──► validate_supply (per PSU)  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  result::aggregate ──► ValidationResult                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No step returns an error: every problem becomes an [`Issue`].

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::compat::{self, AssignedComponent, CompatibilityRule, EvaluationMode};
use crate::normalize::normalize_component;
use crate::power::{self, PowerBudget, PowerPolicy};
use crate::result::aggregate;
use crate::tags::{ComponentRole, TagRegistry, TagSet};
use crate::types::{Configuration, Issue, Severity, ValidationResult};

/// Data fetched ahead of an evaluation.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInput {
    /// Capability tags per configuration slug.
    pub tags: BTreeMap<String, TagSet>,
    pub rules: Vec<CompatibilityRule>,
    /// Warnings raised while gathering the input.
    pub advisories: Vec<Issue>,
}

/// Result of an evaluation plus how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub mode: EvaluationMode,
    pub budget: PowerBudget,
    pub result: ValidationResult,
}

impl Evaluation {
    pub fn into_result(self) -> ValidationResult {
        self.result
    }
}

/// Stateless evaluator bound to a registry and a power policy.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationPipeline<'r> {
    registry: &'r TagRegistry,
    policy: PowerPolicy,
}

impl<'r> ConfigurationPipeline<'r> {
    pub fn new(registry: &'r TagRegistry, policy: PowerPolicy) -> Self {
        ConfigurationPipeline { registry, policy }
    }

    pub fn evaluate(&self, configuration: &Configuration, input: &EvaluationInput) -> Evaluation {
        let (mode, slots, unassigned) = compat::assign_roles(configuration, &input.tags);
        let mut preliminary = Vec::new();

        for slug in unassigned {
            debug!(slug = %slug, "No role for slug");
            preliminary.push(
                Issue::warning(
                    Severity::Low,
                    format!("No compatibility profile for '{}', the component was not checked", slug),
                )
                .on(slug),
            );
        }

        let mut components = Vec::with_capacity(slots.len());
        for slot in slots {
            let Some(entry) = configuration.get(&slot.slug) else {
                continue;
            };
            let profile = self.registry.profile_for_role(slot.role);
            let declarations = profile.map(|p| p.declarations.as_slice()).unwrap_or(&[]);
            let normalized = normalize_component(&entry.specifications, declarations);

            for err in &normalized.errors {
                let mut issue = Issue::error(
                    Severity::Medium,
                    format!("Invalid {} specification: {}", slot.role.label(), err),
                )
                .on(&slot.slug);
                if !err.suggestions().is_empty() {
                    issue = issue.with_details(format!("Expected one of: {}", err.suggestions().join(", ")));
                }
                preliminary.push(issue);
            }
            for note in normalized.notes {
                preliminary.push(Issue::warning(Severity::Medium, note).on(&slot.slug));
            }

            // Legacy slots get the tags of the role's profile so tag rules still apply.
            let tags = match mode {
                EvaluationMode::Tagged => slot.tags,
                EvaluationMode::Legacy => profile.map(|p| p.tags.clone()).unwrap_or_default(),
            };
            components.push(AssignedComponent {
                slug: slot.slug,
                role: slot.role,
                tags,
                title: entry.title.clone(),
                specs: normalized.values,
            });
        }

        let mut findings = compat::evaluate(&components, mode, &input.rules);
        let budget = power::calculate_power(&components, &self.policy);
        for psu in components.iter().filter(|c| c.role == ComponentRole::Psu) {
            findings.extend(power::validate_supply(&budget, psu));
        }

        let mut ordered = preliminary;
        ordered.append(&mut findings.issues);
        ordered.extend(input.advisories.iter().cloned());
        findings.issues = ordered;

        let result = aggregate(findings, &budget);
        info!(
            ?mode,
            components = components.len(),
            valid = result.is_valid,
            issues = result.issues.len(),
            warnings = result.warnings.len(),
            actual_watts = result.actual_power_consumption,
            recommended_watts = result.recommended_psu_power,
            "Configuration evaluated"
        );

        Evaluation {
            mode,
            budget,
            result,
        }
    }
}

/// One-shot evaluation with the default power policy.
pub fn evaluate_configuration(
    registry: &TagRegistry,
    configuration: &Configuration,
    input: &EvaluationInput,
) -> ValidationResult {
    ConfigurationPipeline::new(registry, PowerPolicy::default())
        .evaluate(configuration, input)
        .into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::{ComparisonMode, RuleSeverity, RuleTarget};
    use crate::hardware::Socket;
    use crate::tags::CapabilityTag;
    use crate::types::{ComponentEntry, IssueKind};

    fn registry() -> TagRegistry {
        TagRegistry::builtin().unwrap()
    }

    fn tagged(registry: &TagRegistry, slots: &[(&str, ComponentRole)]) -> EvaluationInput {
        EvaluationInput {
            tags: slots
                .iter()
                .map(|(slug, role)| (slug.to_string(), registry.tags(role.profile_id())))
                .collect(),
            ..EvaluationInput::default()
        }
    }

    fn cpu(socket: &str) -> ComponentEntry {
        ComponentEntry::new("cpu-1", "AMD Ryzen 7 7800X3D").spec("socket", socket)
    }

    fn board(socket: &str) -> ComponentEntry {
        ComponentEntry::new("mb-1", "B650 Tomahawk").spec("socket", socket)
    }

    #[test]
    fn test_custom_profile_ids_still_normalize() {
        use crate::tags::{ComponentProfile, SpecificationDeclaration};
        use crate::value::ValueKind;

        let socket = || SpecificationDeclaration::new("socket", ValueKind::Socket).required();
        let registry = TagRegistry::from_profiles(vec![
            ComponentProfile::new("desktop-chip", "Desktop chip")
                .tags(&[CapabilityTag::RequiresSocket, CapabilityTag::ProvidesCompute])
                .declare(socket()),
            ComponentProfile::new("mainboard", "Mainboard")
                .tags(&[CapabilityTag::ProvidesSocket, CapabilityTag::ProvidesSlots])
                .declare(socket()),
        ])
        .unwrap();
        let config = Configuration::new()
            .with("chips", cpu("AM5"))
            .with("boards", board("AM4"));
        let input = EvaluationInput {
            tags: [
                ("chips".to_string(), registry.tags("desktop-chip")),
                ("boards".to_string(), registry.tags("mainboard")),
            ]
            .into_iter()
            .collect(),
            ..EvaluationInput::default()
        };

        let result = evaluate_configuration(&registry, &config, &input);
        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].message.contains("AM5"));
        assert!(result.issues[0].message.contains("AM4"));
        assert!(result
            .warnings
            .iter()
            .all(|w| !w.message.contains("does not declare socket")));
    }

    #[test]
    fn test_socket_mismatch_scenario() {
        let registry = registry();
        let config = Configuration::new()
            .with("cpu", cpu("AM5"))
            .with("motherboard", board("AM4"));
        let input = tagged(
            &registry,
            &[("cpu", ComponentRole::Cpu), ("motherboard", ComponentRole::Motherboard)],
        );

        let result = evaluate_configuration(&registry, &config, &input);
        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::Error);
        assert!(result.issues[0].message.contains("AM5"));
        assert!(result.issues[0].message.contains("AM4"));
    }

    #[test]
    fn test_power_precedence_scenario() {
        let registry = registry();
        let config = Configuration::new()
            .with("cpu", cpu("AM5").spec("tdp", 170.0))
            .with(
                "gpu",
                ComponentEntry::new("gpu-1", "Radeon RX 7900 XTX").spec("recommended_psu_power", "750 W"),
            );
        let input = tagged(&registry, &[("cpu", ComponentRole::Cpu), ("gpu", ComponentRole::Gpu)]);

        let result = evaluate_configuration(&registry, &config, &input);
        assert_eq!(result.recommended_psu_power, 750);
        assert_eq!(result.actual_power_consumption, 170);
    }

    #[test]
    fn test_power_fallback_scenario() {
        let registry = registry();
        let config = Configuration::new()
            .with("cpu", cpu("AM5").spec("tdp", "105 W"))
            .with("ram", ComponentEntry::new("ram-1", "32GB Kit").spec("memory_type", "DDR5"))
            .with("ssd", ComponentEntry::new("ssd-1", "990 Pro").spec("interface", "NVMe"))
            .with("cooler", ComponentEntry::new("cool-1", "Tower").spec("cooler_type", "Air"));
        let input = tagged(
            &registry,
            &[
                ("cpu", ComponentRole::Cpu),
                ("ram", ComponentRole::Memory),
                ("ssd", ComponentRole::Storage),
                ("cooler", ComponentRole::Cooler),
            ],
        );

        let result = evaluate_configuration(&registry, &config, &input);
        assert_eq!(result.actual_power_consumption, 122);
        assert_eq!(result.recommended_psu_power, 146);
        assert!(result.is_valid, "{:?}", result.issues);
    }

    fn gpu_fit(length: &str) -> ValidationResult {
        let registry = registry();
        let config = Configuration::new()
            .with("gpu", ComponentEntry::new("gpu-1", "Card").spec("length", length))
            .with("case", ComponentEntry::new("case-1", "Tower").spec("max_gpu_length", "330 mm"));
        let input = tagged(&registry, &[("gpu", ComponentRole::Gpu), ("case", ComponentRole::Case)]);
        evaluate_configuration(&registry, &config, &input)
    }

    #[test]
    fn test_physical_fit_scenario() {
        let exact = gpu_fit("330");
        assert!(exact.is_valid);
        assert!(exact.warnings.iter().any(|w| w.message.starts_with("Tight fit")));

        let over = gpu_fit("331 mm");
        assert!(!over.is_valid);
        assert_eq!(over.issues.len(), 1);

        let close = gpu_fit("300");
        assert!(close.is_valid);
        assert!(close.warnings.iter().any(|w| w.message.starts_with("Tight fit")));
    }

    #[test]
    fn test_unknown_socket_becomes_blocking_issue() {
        let registry = registry();
        let config = Configuration::new().with("cpu", cpu("Socket Z"));
        let input = tagged(&registry, &[("cpu", ComponentRole::Cpu)]);

        let result = evaluate_configuration(&registry, &config, &input);
        assert!(!result.is_valid);
        let issue = &result.issues[0];
        assert_eq!(issue.severity, Severity::Medium);
        assert_eq!(issue.role_a.as_deref(), Some("cpu"));
        assert_eq!(
            issue.details.as_deref(),
            Some(format!("Expected one of: {}", Socket::canonical_names().join(", ")).as_str())
        );
    }

    #[test]
    fn test_legacy_mode_runs_same_rules() {
        let registry = registry();
        let config = Configuration::new()
            .with("processor", cpu("AM5"))
            .with("motherboard", board("AM4"));

        let evaluation = ConfigurationPipeline::new(&registry, PowerPolicy::default())
            .evaluate(&config, &EvaluationInput::default());
        assert_eq!(evaluation.mode, EvaluationMode::Legacy);
        assert!(!evaluation.result.is_valid);
        assert_eq!(evaluation.result.issues.len(), 1);
    }

    #[test]
    fn test_legacy_components_match_tag_rules() {
        let registry = registry();
        let config = Configuration::new()
            .with("graphics", ComponentEntry::new("g", "Card").spec("power_consumption", 300.0))
            .with("power-supply", ComponentEntry::new("p", "PSU").spec("wattage", 650.0));
        let input = EvaluationInput {
            rules: vec![CompatibilityRule {
                id: "gpu-half-psu".to_string(),
                primary: RuleTarget::Tag(CapabilityTag::ProvidesGraphics),
                primary_field: "power_consumption".to_string(),
                secondary: RuleTarget::Tag(CapabilityTag::ProvidesPower),
                secondary_field: "wattage".to_string(),
                comparison: ComparisonMode::NumericBound {
                    bound: crate::compat::Bound::AtLeast,
                },
                severity: RuleSeverity::Info,
                message: Some("Graphics card draw is small next to the power supply".to_string()),
            }],
            ..EvaluationInput::default()
        };

        let result = evaluate_configuration(&registry, &config, &input);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.details.as_deref() == Some("rule gpu-half-psu")));
    }

    #[test]
    fn test_advisories_are_appended_as_warnings() {
        let registry = registry();
        let config = Configuration::new().with("processor", cpu("AM5"));
        let input = EvaluationInput {
            advisories: vec![Issue::warning(Severity::Low, "Compatibility rules unavailable")],
            ..EvaluationInput::default()
        };
        let result = evaluate_configuration(&registry, &config, &input);
        assert!(result.is_valid);
        assert_eq!(
            result.warnings.last().map(|w| w.message.as_str()),
            Some("Compatibility rules unavailable")
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let registry = registry();
        let config = Configuration::new()
            .with("cpu", cpu("AM5").spec("tdp", 120.0))
            .with("motherboard", board("AM5").spec("chipset", "B650").spec("form_factor", "ATX"))
            .with("ram", ComponentEntry::new("r", "Kit").spec("memory_type", "DDR4"))
            .with("case", ComponentEntry::new("c", "Case").spec("form_factor", "Micro-ATX"));
        let input = tagged(
            &registry,
            &[
                ("cpu", ComponentRole::Cpu),
                ("motherboard", ComponentRole::Motherboard),
                ("ram", ComponentRole::Memory),
                ("case", ComponentRole::Case),
            ],
        );

        let first = serde_json::to_string(&evaluate_configuration(&registry, &config, &input)).unwrap();
        let second = serde_json::to_string(&evaluate_configuration(&registry, &config, &input)).unwrap();
        assert_eq!(first, second);

        let result: ValidationResult = serde_json::from_str(&first).unwrap();
        // DDR4 on AM5 and an ATX board in a Micro-ATX case
        assert_eq!(result.issues.len(), 2);
    }
}
