//! Externally authored compatibility rules.
//!
//! Rules are fetched read-only from the catalog store. Storage keeps the
//! target and comparison as short string keys (`tag:provides_socket`,
//! `derived_lookup:socket_memory`), parsed here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tags::CapabilityTag;
use crate::types::Severity;

/// Which components a rule side applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    /// Every component carrying the tag.
    Tag(CapabilityTag),
    /// The component in this category slug (legacy style).
    Category(String),
}

impl RuleTarget {
    /// Parses `tag:<name>` or `category:<slug>`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, value) = raw.split_once(':')?;
        match kind.trim() {
            "tag" => CapabilityTag::parse(value).map(RuleTarget::Tag),
            "category" if !value.trim().is_empty() => {
                Some(RuleTarget::Category(value.trim().to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::Tag(tag) => write!(f, "tag:{}", tag),
            RuleTarget::Category(slug) => write!(f, "category:{}", slug),
        }
    }
}

/// Reference table used by a derived lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedTable {
    /// Socket → supported memory types.
    SocketMemory,
    /// Chipset → supported sockets.
    ChipsetSocket,
    /// Chipset family → compatible CPU generations.
    ChipsetGeneration,
    /// Secondary field is a list that must contain the primary value.
    ListContains,
}

/// Direction of a numeric bound, read as `primary <op> secondary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    AtMost,
    AtLeast,
}

/// How the two fields are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ComparisonMode {
    ExactMatch,
    DerivedLookup { table: DerivedTable },
    NumericBound { bound: Bound },
}

impl ComparisonMode {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (mode, arg) = raw.split_once(':').unwrap_or((raw, ""));
        match (mode, arg) {
            ("exact_match", "") => Some(ComparisonMode::ExactMatch),
            ("derived_lookup", "socket_memory") => Some(ComparisonMode::DerivedLookup {
                table: DerivedTable::SocketMemory,
            }),
            ("derived_lookup", "chipset_socket") => Some(ComparisonMode::DerivedLookup {
                table: DerivedTable::ChipsetSocket,
            }),
            ("derived_lookup", "chipset_generation") => Some(ComparisonMode::DerivedLookup {
                table: DerivedTable::ChipsetGeneration,
            }),
            ("derived_lookup", "list_contains") => Some(ComparisonMode::DerivedLookup {
                table: DerivedTable::ListContains,
            }),
            ("numeric_bound", "at_most") => Some(ComparisonMode::NumericBound {
                bound: Bound::AtMost,
            }),
            ("numeric_bound", "at_least") => Some(ComparisonMode::NumericBound {
                bound: Bound::AtLeast,
            }),
            _ => None,
        }
    }

    /// Storage key, the inverse of [`ComparisonMode::parse`].
    pub fn as_key(&self) -> &'static str {
        match self {
            ComparisonMode::ExactMatch => "exact_match",
            ComparisonMode::DerivedLookup { table } => match table {
                DerivedTable::SocketMemory => "derived_lookup:socket_memory",
                DerivedTable::ChipsetSocket => "derived_lookup:chipset_socket",
                DerivedTable::ChipsetGeneration => "derived_lookup:chipset_generation",
                DerivedTable::ListContains => "derived_lookup:list_contains",
            },
            ComparisonMode::NumericBound { bound } => match bound {
                Bound::AtMost => "numeric_bound:at_most",
                Bound::AtLeast => "numeric_bound:at_least",
            },
        }
    }
}

/// Author-assigned weight of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
}

impl RuleSeverity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Some(RuleSeverity::Error),
            "warning" => Some(RuleSeverity::Warning),
            "info" => Some(RuleSeverity::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSeverity::Error => "error",
            RuleSeverity::Warning => "warning",
            RuleSeverity::Info => "info",
        }
    }

    /// Issue severity a violation is reported with.
    pub fn issue_severity(&self) -> Severity {
        match self {
            RuleSeverity::Error => Severity::High,
            RuleSeverity::Warning => Severity::Medium,
            RuleSeverity::Info => Severity::Low,
        }
    }
}

/// A relation between two component sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub id: String,
    pub primary: RuleTarget,
    pub primary_field: String,
    pub secondary: RuleTarget,
    pub secondary_field: String,
    pub comparison: ComparisonMode,
    pub severity: RuleSeverity,
    #[serde(default)]
    pub message: Option<String>,
}

impl CompatibilityRule {
    /// Rule kind used when fetching rules by kind: the comparison's mode name.
    pub fn kind(&self) -> &'static str {
        match self.comparison {
            ComparisonMode::ExactMatch => "exact_match",
            ComparisonMode::DerivedLookup { .. } => "derived_lookup",
            ComparisonMode::NumericBound { .. } => "numeric_bound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing() {
        assert_eq!(
            RuleTarget::parse("tag:provides_socket"),
            Some(RuleTarget::Tag(CapabilityTag::ProvidesSocket))
        );
        assert_eq!(
            RuleTarget::parse("category:case"),
            Some(RuleTarget::Category("case".to_string()))
        );
        assert_eq!(RuleTarget::parse("tag:flies"), None);
        assert_eq!(RuleTarget::parse("case"), None);
        assert_eq!(
            RuleTarget::Tag(CapabilityTag::HousesComponents).to_string(),
            "tag:houses_components"
        );
    }

    #[test]
    fn test_comparison_keys_are_inverse() {
        for key in [
            "exact_match",
            "derived_lookup:socket_memory",
            "derived_lookup:chipset_socket",
            "derived_lookup:chipset_generation",
            "derived_lookup:list_contains",
            "numeric_bound:at_most",
            "numeric_bound:at_least",
        ] {
            let mode = ComparisonMode::parse(key).unwrap();
            assert_eq!(mode.as_key(), key);
        }
        assert!(ComparisonMode::parse("numeric_bound:between").is_none());
        assert!(ComparisonMode::parse("exact_match:x").is_none());
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(RuleSeverity::parse("ERROR"), Some(RuleSeverity::Error));
        assert_eq!(RuleSeverity::Info.issue_severity(), Severity::Low);
        assert_eq!(RuleSeverity::Error.issue_severity(), Severity::High);
    }
}
