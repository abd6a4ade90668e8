//! # Domain Types
//!
//! Input and output types of a validation call.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                                 OUTPUT                           │
//! │  ┌─────────────────────┐               ┌─────────────────────────┐     │
//! │  │   Configuration     │               │   ValidationResult      │     │
//! │  │  ─────────────────  │               │  ─────────────────────  │     │
//! │  │  slug → Component   │  ── engine ─► │  is_valid               │     │
//! │  └─────────┬───────────┘               │  issues   (blocking)    │     │
//! │            │                           │  warnings (advisory)    │     │
//! │  ┌─────────▼───────────┐               │  actual power (W)       │     │
//! │  │  ComponentEntry     │               │  recommended PSU (W)    │     │
//! │  │  id, title          │               └───────────┬─────────────┘     │
//! │  │  [RawSpecification] │                           │                   │
//! │  └─────────────────────┘               ┌───────────▼─────────────┐     │
//! │                                        │  Issue                  │     │
//! │                                        │  kind, roleA, roleB     │     │
//! │                                        │  message, details       │     │
//! │                                        │  severity               │     │
//! │                                        └─────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output types carry `ts-rs` derives so the storefront gets matching
//! TypeScript definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::value::RawValue;

// =============================================================================
// Configuration (input)
// =============================================================================

/// One raw `(name, value)` attribute pair as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpecification {
    pub name: String,
    pub raw_value: RawValue,
}

impl RawSpecification {
    pub fn new(name: impl Into<String>, raw_value: impl Into<RawValue>) -> Self {
        RawSpecification {
            name: name.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// A concrete component placed into a role slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub specifications: Vec<RawSpecification>,
}

impl ComponentEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        ComponentEntry {
            id: id.into(),
            title: title.into(),
            specifications: Vec::new(),
        }
    }

    /// Builder-style attribute append.
    pub fn spec(mut self, name: impl Into<String>, raw_value: impl Into<RawValue>) -> Self {
        self.specifications.push(RawSpecification::new(name, raw_value));
        self
    }
}

/// The unit under test: role/category slug → component.
///
/// Backed by a `BTreeMap` so every pass walks roles in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    components: BTreeMap<String, ComponentEntry>,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration::default()
    }

    /// Builder-style slot assignment.
    pub fn with(mut self, slug: impl Into<String>, component: ComponentEntry) -> Self {
        self.components.insert(slug.into(), component);
        self
    }

    pub fn insert(&mut self, slug: impl Into<String>, component: ComponentEntry) {
        self.components.insert(slug.into(), component);
    }

    pub fn get(&self, slug: &str) -> Option<&ComponentEntry> {
        self.components.get(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &String> {
        self.components.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ComponentEntry)> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

// =============================================================================
// Issue (output)
// =============================================================================

/// Blocking error or advisory warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Error,
    Warning,
}

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A single finding about the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub kind: IssueKind,
    pub role_a: Option<String>,
    pub role_b: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub severity: Severity,
}

impl Issue {
    pub fn error(severity: Severity, message: impl Into<String>) -> Self {
        Issue::new(IssueKind::Error, severity, message)
    }

    pub fn warning(severity: Severity, message: impl Into<String>) -> Self {
        Issue::new(IssueKind::Warning, severity, message)
    }

    fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Issue {
            kind,
            role_a: None,
            role_b: None,
            message: message.into(),
            details: None,
            severity,
        }
    }

    /// Attaches the role the finding is about.
    pub fn on(mut self, role: impl Into<String>) -> Self {
        self.role_a = Some(role.into());
        self
    }

    /// Attaches both roles of a pairwise finding.
    pub fn between(mut self, role_a: impl Into<String>, role_b: impl Into<String>) -> Self {
        self.role_a = Some(role_a.into());
        self.role_b = Some(role_b.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.kind == IssueKind::Error
    }
}

// =============================================================================
// Validation Result (output)
// =============================================================================

/// Final verdict of a validation call. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// Estimated draw in watts; `0` means no consuming component was known.
    pub actual_power_consumption: u32,
    /// Recommended supply rating in watts; `0` means insufficient data.
    pub recommended_psu_power: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_deserializes_from_contract_shape() {
        let json = r#"{
            "processor": {
                "id": "cpu-1",
                "title": "AMD Ryzen 7 7800X3D",
                "specifications": [
                    { "name": "socket", "rawValue": "AM5" },
                    { "name": "tdp", "rawValue": 120 }
                ]
            },
            "case": { "id": "case-1", "title": "Mid Tower" }
        }"#;

        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.len(), 2);

        let cpu = config.get("processor").unwrap();
        assert_eq!(cpu.specifications.len(), 2);
        assert_eq!(cpu.specifications[1].raw_value, RawValue::Number(120.0));
        assert!(config.get("case").unwrap().specifications.is_empty());
    }

    #[test]
    fn test_slugs_are_ordered() {
        let config = Configuration::new()
            .with("power-supply", ComponentEntry::new("p", "PSU"))
            .with("case", ComponentEntry::new("c", "Case"))
            .with("memory", ComponentEntry::new("m", "RAM"));
        let slugs: Vec<_> = config.slugs().cloned().collect();
        assert_eq!(slugs, vec!["case", "memory", "power-supply"]);
    }

    #[test]
    fn test_issue_serializes_camel_case() {
        let issue = Issue::error(Severity::High, "Socket mismatch").between("cpu", "motherboard");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["roleA"], "cpu");
        assert_eq!(json["roleB"], "motherboard");
        assert_eq!(json["severity"], "high");
        assert!(issue.is_blocking());
    }
}
