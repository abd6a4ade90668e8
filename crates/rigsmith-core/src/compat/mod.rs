//! # Compatibility Rule Engine
//!
//! Evaluates the normalized components of a configuration against the
//! built-in rule stages and the externally authored rules.
//!
//! ## Ordered Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Compatibility Evaluation                            │
//! │                                                                         │
//! │  assign_roles ──► Tagged mode   (roles from capability tags)           │
//! │        │     └──► Legacy mode   (no tags resolved: fixed slugs)        │
//! │        ▼                                                                │
//! │  1. matrix    socket, chipset → generation, memory type/speed/size     │
//! │  2. physical  GPU length, form factor, cooler socket/TDP/height        │
//! │  3. slots     PCIe x16, PCIe power connectors, M.2                     │
//! │  4. authored  catalog rules on field pairs not covered above           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Findings { mode, issues }                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both modes run the same stages over the same [`AssignedComponent`]
//! shape, so the result looks identical to callers.
//!
//! A field a check needs but cannot find becomes one "insufficient
//! information" warning per (role, role, field), never a silent skip.

pub mod authored;
pub mod matrix;
pub mod physical;
pub mod rule;
pub mod slots;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub use rule::{Bound, CompatibilityRule, ComparisonMode, DerivedTable, RuleSeverity, RuleTarget};

use crate::tags::{ComponentRole, TagSet};
use crate::types::{Configuration, Issue, Severity};
use crate::value::SpecMap;

// =============================================================================
// Role Assignment
// =============================================================================

/// Which resolution strategy produced the roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Roles derived from capability tags.
    Tagged,
    /// No slug resolved any tags; roles taken from fixed category slugs.
    Legacy,
}

/// A configuration slot with its role and capability tags.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSlot {
    pub slug: String,
    pub role: ComponentRole,
    pub tags: TagSet,
}

/// Resolves a role for every slot of the configuration.
///
/// Legacy mode is selected only when no slot carries tags that map to a
/// role. Slugs without a role in the chosen mode are returned separately.
pub fn assign_roles(
    configuration: &Configuration,
    tags_by_slug: &BTreeMap<String, TagSet>,
) -> (EvaluationMode, Vec<RoleSlot>, Vec<String>) {
    let tagged: Vec<(String, Option<ComponentRole>, TagSet)> = configuration
        .slugs()
        .map(|slug| {
            let tags = tags_by_slug.get(slug).cloned().unwrap_or_default();
            (slug.clone(), ComponentRole::from_tags(&tags), tags)
        })
        .collect();

    let mode = if tagged.iter().any(|(_, role, _)| role.is_some()) {
        EvaluationMode::Tagged
    } else {
        EvaluationMode::Legacy
    };

    let mut slots = Vec::new();
    let mut unassigned = Vec::new();
    for (slug, role, tags) in tagged {
        let role = match mode {
            EvaluationMode::Tagged => role,
            EvaluationMode::Legacy => ComponentRole::from_legacy_slug(&slug),
        };
        match role {
            Some(role) => slots.push(RoleSlot { slug, role, tags }),
            None => unassigned.push(slug),
        }
    }

    debug!(?mode, assigned = slots.len(), unassigned = unassigned.len(), "Roles assigned");
    (mode, slots, unassigned)
}

// =============================================================================
// Assigned Component
// =============================================================================

/// A component ready for rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedComponent {
    pub slug: String,
    pub role: ComponentRole,
    pub tags: TagSet,
    pub title: String,
    pub specs: SpecMap,
}

impl AssignedComponent {
    /// `"CPU 'Ryzen 7 7800X3D'"` style label for messages.
    pub fn label(&self) -> String {
        if self.title.is_empty() {
            self.role.label().to_string()
        } else {
            format!("{} '{}'", self.role.label(), self.title)
        }
    }
}

/// Role-indexed view over the assigned components.
#[derive(Debug, Clone, Copy)]
pub struct Build<'a> {
    components: &'a [AssignedComponent],
}

impl<'a> Build<'a> {
    pub fn new(components: &'a [AssignedComponent]) -> Self {
        Build { components }
    }

    pub fn all(&self) -> impl Iterator<Item = &'a AssignedComponent> {
        self.components.iter()
    }

    pub fn by_role(&self, role: ComponentRole) -> impl Iterator<Item = &'a AssignedComponent> {
        self.components.iter().filter(move |c| c.role == role)
    }

    pub fn has(&self, role: ComponentRole) -> bool {
        self.by_role(role).next().is_some()
    }
}

// =============================================================================
// Findings
// =============================================================================

/// Issues collected by the engine, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Findings {
    pub mode: EvaluationMode,
    pub issues: Vec<Issue>,
    reported_missing: BTreeSet<(String, String, String)>,
}

impl Findings {
    pub fn new(mode: EvaluationMode) -> Self {
        Findings {
            mode,
            issues: Vec::new(),
            reported_missing: BTreeSet::new(),
        }
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Reports that `owner` lacks `field` needed to check it against `other`.
    ///
    /// Reported once per (owner, other, field).
    pub fn missing(&mut self, owner: &AssignedComponent, other: &AssignedComponent, field: &str) {
        let key = (owner.slug.clone(), other.slug.clone(), field.to_string());
        if !self.reported_missing.insert(key) {
            return;
        }
        self.issues.push(
            Issue::warning(
                Severity::Medium,
                format!(
                    "Insufficient information: {} does not declare {}, compatibility with the {} could not be checked",
                    owner.label(),
                    field,
                    other.role.label()
                ),
            )
            .between(&owner.slug, &other.slug),
        );
    }

    pub fn blocking_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_blocking()).count()
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Runs every stage in order.
pub fn evaluate(
    components: &[AssignedComponent],
    mode: EvaluationMode,
    rules: &[CompatibilityRule],
) -> Findings {
    let build = Build::new(components);
    let mut findings = Findings::new(mode);

    matrix::check(build, &mut findings);
    physical::check(build, &mut findings);
    slots::check(build, &mut findings);
    authored::check(build, rules, &mut findings);

    debug!(
        ?mode,
        components = components.len(),
        rules = rules.len(),
        issues = findings.issues.len(),
        blocking = findings.blocking_count(),
        "Compatibility evaluated"
    );
    findings
}

/// `13th generation` / `7000 series`.
pub(crate) fn generation_label(generation: u32) -> String {
    if generation >= 1000 {
        return format!("{} series", generation);
    }
    let suffix = match (generation % 10, generation % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} generation", generation, suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
