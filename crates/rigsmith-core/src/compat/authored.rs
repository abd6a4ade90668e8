//! Applies catalog-authored [`CompatibilityRule`]s.
//!
//! Each rule runs over every ordered pair of distinct components matching
//! its primary and secondary targets. Rules on field pairs a built-in stage
//! already checks are skipped so a build never gets the same finding twice.

use tracing::debug;

use super::rule::{Bound, CompatibilityRule, ComparisonMode, DerivedTable, RuleSeverity, RuleTarget};
use super::{AssignedComponent, Build, Findings};
use crate::hardware::{alias_key, Chipset, MemoryType, Socket};
use crate::normalize::leading_number;
use crate::tags::profile::field_key;
use crate::tags::ComponentRole;
use crate::types::Issue;
use crate::value::SpecificationValue;

/// `(role, field, role, field)` relations the built-in stages own.
const BUILTIN_RELATIONS: &[(ComponentRole, &str, ComponentRole, &str)] = &[
    (ComponentRole::Cpu, "socket", ComponentRole::Motherboard, "socket"),
    (ComponentRole::Cpu, "generation", ComponentRole::Motherboard, "chipset"),
    (ComponentRole::Memory, "memory_type", ComponentRole::Motherboard, "socket"),
    (ComponentRole::Memory, "memory_type", ComponentRole::Cpu, "socket"),
    (ComponentRole::Memory, "memory_type", ComponentRole::Motherboard, "memory_type"),
    (ComponentRole::Memory, "frequency", ComponentRole::Motherboard, "chipset"),
    (ComponentRole::Memory, "capacity", ComponentRole::Motherboard, "max_memory"),
    (ComponentRole::Memory, "modules", ComponentRole::Motherboard, "memory_slots"),
    (ComponentRole::Gpu, "length", ComponentRole::Case, "max_gpu_length"),
    (ComponentRole::Motherboard, "form_factor", ComponentRole::Case, "form_factor"),
    (ComponentRole::Cpu, "socket", ComponentRole::Cooler, "supported_sockets"),
    (ComponentRole::Cpu, "tdp", ComponentRole::Cooler, "max_tdp"),
    (ComponentRole::Cooler, "height", ComponentRole::Case, "max_cooler_height"),
    (ComponentRole::Gpu, "power_consumption", ComponentRole::Psu, "pcie_connectors"),
];

fn covered_by_builtin(a: &AssignedComponent, field_a: &str, b: &AssignedComponent, field_b: &str) -> bool {
    BUILTIN_RELATIONS.iter().any(|(ra, fa, rb, fb)| {
        (a.role == *ra && field_a == *fa && b.role == *rb && field_b == *fb)
            || (a.role == *rb && field_a == *fb && b.role == *ra && field_b == *fa)
    })
}

fn targets(target: &RuleTarget, component: &AssignedComponent) -> bool {
    match target {
        RuleTarget::Tag(tag) => component.tags.contains(tag),
        RuleTarget::Category(slug) => component.slug == *slug,
    }
}

pub(crate) fn check(build: Build<'_>, rules: &[CompatibilityRule], findings: &mut Findings) {
    for rule in rules {
        let primary_field = field_key(&rule.primary_field);
        let secondary_field = field_key(&rule.secondary_field);

        for a in build.all().filter(|c| targets(&rule.primary, c)) {
            for b in build.all().filter(|c| targets(&rule.secondary, c)) {
                if a.slug == b.slug {
                    continue;
                }
                if covered_by_builtin(a, &primary_field, b, &secondary_field) {
                    debug!(rule = %rule.id, primary = %a.slug, secondary = %b.slug, "Rule covered by built-in stage");
                    continue;
                }
                apply(rule, a, &primary_field, b, &secondary_field, findings);
            }
        }
    }
}

/// Result of one comparison.
enum Verdict {
    Pass,
    Fail,
    /// The values exist but cannot be read the way the comparison needs.
    Unreadable,
}

fn apply(
    rule: &CompatibilityRule,
    a: &AssignedComponent,
    field_a: &str,
    b: &AssignedComponent,
    field_b: &str,
    findings: &mut Findings,
) {
    let (va, vb) = match (a.specs.get(field_a), b.specs.get(field_b)) {
        (Some(va), Some(vb)) => (va, vb),
        (va, vb) => {
            if va.is_none() {
                findings.missing(a, b, field_a);
            }
            if vb.is_none() {
                findings.missing(b, a, field_b);
            }
            return;
        }
    };

    let verdict = match rule.comparison {
        ComparisonMode::ExactMatch => {
            if va.matches(vb) {
                Verdict::Pass
            } else {
                Verdict::Fail
            }
        }
        ComparisonMode::DerivedLookup { table } => derived(table, va, vb),
        ComparisonMode::NumericBound { bound } => match (number(va), number(vb)) {
            (Some(x), Some(y)) => {
                let holds = match bound {
                    Bound::AtMost => x <= y,
                    Bound::AtLeast => x >= y,
                };
                if holds {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                }
            }
            _ => Verdict::Unreadable,
        },
    };

    match verdict {
        Verdict::Pass => {}
        Verdict::Unreadable => {
            debug!(rule = %rule.id, "Rule fields not comparable");
            findings.missing(a, b, field_a);
        }
        Verdict::Fail => {
            let message = rule.message.clone().unwrap_or_else(|| {
                format!(
                    "{} {} ({}) is not compatible with {} {} ({})",
                    a.label(),
                    field_a,
                    va,
                    b.label(),
                    field_b,
                    vb
                )
            });
            let severity = rule.severity.issue_severity();
            let issue = match rule.severity {
                RuleSeverity::Error => Issue::error(severity, message),
                RuleSeverity::Warning | RuleSeverity::Info => Issue::warning(severity, message),
            };
            findings.push(
                issue
                    .between(&a.slug, &b.slug)
                    .with_details(format!("rule {}", rule.id)),
            );
        }
    }
}

fn number(value: &SpecificationValue) -> Option<f64> {
    value
        .as_number()
        .or_else(|| value.as_text().and_then(leading_number))
}

fn socket(value: &SpecificationValue) -> Option<Socket> {
    value
        .as_socket()
        .or_else(|| value.as_text().and_then(Socket::parse))
}

fn memory_type(value: &SpecificationValue) -> Option<MemoryType> {
    value
        .as_memory_type()
        .or_else(|| value.as_text().and_then(MemoryType::parse))
}

fn chipset(value: &SpecificationValue) -> Option<Chipset> {
    value
        .as_chipset()
        .or_else(|| value.as_text().and_then(Chipset::parse))
}

fn derived(table: DerivedTable, va: &SpecificationValue, vb: &SpecificationValue) -> Verdict {
    let verdict = |holds: bool| if holds { Verdict::Pass } else { Verdict::Fail };

    match table {
        DerivedTable::SocketMemory => {
            let pair = match (socket(va), memory_type(vb)) {
                (Some(s), Some(m)) => Some((s, m)),
                _ => socket(vb).zip(memory_type(va)),
            };
            match pair {
                Some((s, m)) => verdict(s.supports_memory(m)),
                None => Verdict::Unreadable,
            }
        }
        DerivedTable::ChipsetSocket => {
            let pair = match (chipset(va), socket(vb)) {
                (Some(c), Some(s)) => Some((c, s)),
                _ => chipset(vb).zip(socket(va)),
            };
            match pair {
                Some((c, s)) => verdict(c.supports_socket(s)),
                None => Verdict::Unreadable,
            }
        }
        DerivedTable::ChipsetGeneration => {
            let pair = match (chipset(va), number(vb)) {
                (Some(c), Some(g)) => Some((c, g)),
                _ => chipset(vb).zip(number(va)),
            };
            match pair {
                Some((c, g)) => verdict(c.family().generation_support().supports(g.round() as u32)),
                None => Verdict::Unreadable,
            }
        }
        DerivedTable::ListContains => {
            let Some(list) = vb.as_text() else {
                return Verdict::Unreadable;
            };
            let wanted = alias_key(&va.to_string());
            let found = list
                .split([',', ';', '/'])
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .any(|item| match va.as_socket() {
                    Some(s) => Socket::parse(item) == Some(s),
                    None => alias_key(item) == wanted,
                });
            verdict(found)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::component;
    use super::super::EvaluationMode;
    use super::*;
    use crate::tags::CapabilityTag;
    use crate::types::{IssueKind, Severity};
    use crate::value::SpecificationValue as V;

    fn rule(
        primary: RuleTarget,
        primary_field: &str,
        secondary: RuleTarget,
        secondary_field: &str,
        comparison: ComparisonMode,
        severity: RuleSeverity,
    ) -> CompatibilityRule {
        CompatibilityRule {
            id: "r1".to_string(),
            primary,
            primary_field: primary_field.to_string(),
            secondary,
            secondary_field: secondary_field.to_string(),
            comparison,
            severity,
            message: None,
        }
    }

    fn run(components: &[AssignedComponent], rules: &[CompatibilityRule]) -> Findings {
        let mut findings = Findings::new(EvaluationMode::Tagged);
        check(Build::new(components), rules, &mut findings);
        findings
    }

    fn psu_and_gpu() -> Vec<AssignedComponent> {
        vec![
            component(
                "gpu",
                ComponentRole::Gpu,
                &[("power_consumption", V::PowerConsumption { watts: 450.0, unit: "W".to_string() })],
            ),
            component(
                "psu",
                ComponentRole::Psu,
                &[("wattage", V::PowerConsumption { watts: 550.0, unit: "W".to_string() })],
            ),
        ]
    }

    #[test]
    fn test_numeric_bound_rule() {
        // 450 W draw at most 550 W passes; flipped to at_least it fails
        let mut bound = rule(
            RuleTarget::Tag(CapabilityTag::ProvidesGraphics),
            "power_consumption",
            RuleTarget::Tag(CapabilityTag::ProvidesPower),
            "wattage",
            ComparisonMode::NumericBound { bound: Bound::AtMost },
            RuleSeverity::Warning,
        );
        let findings = run(&psu_and_gpu(), std::slice::from_ref(&bound));
        assert!(findings.issues.is_empty());

        bound.comparison = ComparisonMode::NumericBound { bound: Bound::AtLeast };
        let findings = run(&psu_and_gpu(), &[bound]);
        assert_eq!(findings.issues.len(), 1);
        assert_eq!(findings.issues[0].kind, IssueKind::Warning);
        assert_eq!(findings.issues[0].severity, Severity::Medium);
        assert_eq!(findings.issues[0].details.as_deref(), Some("rule r1"));
    }

    #[test]
    fn test_category_target_and_error_severity() {
        let mut components = psu_and_gpu();
        components[0].specs.insert("brand", V::Text { value: "Acme".to_string() });
        components[1].specs.insert("brand", V::Text { value: "Other".to_string() });
        let exact = rule(
            RuleTarget::Category("gpu".to_string()),
            "Brand",
            RuleTarget::Category("psu".to_string()),
            "brand",
            ComparisonMode::ExactMatch,
            RuleSeverity::Error,
        );
        let findings = run(&components, &[exact]);
        assert_eq!(findings.blocking_count(), 1);
    }

    #[test]
    fn test_unknown_field_is_missing_data() {
        let exact = rule(
            RuleTarget::Tag(CapabilityTag::ProvidesGraphics),
            "warp_factor",
            RuleTarget::Tag(CapabilityTag::ProvidesPower),
            "wattage",
            ComparisonMode::ExactMatch,
            RuleSeverity::Error,
        );
        let findings = run(&psu_and_gpu(), &[exact]);
        assert_eq!(findings.blocking_count(), 0);
        assert!(findings.issues[0].message.starts_with("Insufficient information"));
    }

    #[test]
    fn test_builtin_relation_is_skipped() {
        let cpu = component("cpu", ComponentRole::Cpu, &[("socket", V::Socket { value: Socket::Am5 })]);
        let board = component("board", ComponentRole::Motherboard, &[("socket", V::Socket { value: Socket::Am4 })]);
        let exact = rule(
            RuleTarget::Tag(CapabilityTag::RequiresSocket),
            "socket",
            RuleTarget::Tag(CapabilityTag::ProvidesSocket),
            "socket",
            ComparisonMode::ExactMatch,
            RuleSeverity::Error,
        );
        assert!(run(&[cpu, board], &[exact]).issues.is_empty());
    }

    #[test]
    fn test_derived_lookups() {
        let socket_v = V::Socket { value: Socket::Am5 };
        let ddr4 = V::MemoryType { value: MemoryType::Ddr4 };
        assert!(matches!(derived(DerivedTable::SocketMemory, &socket_v, &ddr4), Verdict::Fail));
        assert!(matches!(derived(DerivedTable::SocketMemory, &V::MemoryType { value: MemoryType::Ddr5 }, &socket_v), Verdict::Pass));

        let b650 = V::Text { value: "B650".to_string() };
        assert!(matches!(derived(DerivedTable::ChipsetSocket, &b650, &socket_v), Verdict::Pass));
        assert!(matches!(
            derived(DerivedTable::ChipsetGeneration, &b650, &V::Number { value: 5000.0, unit: None }),
            Verdict::Fail
        ));

        let list = V::Text { value: "LGA1700, AM5".to_string() };
        assert!(matches!(derived(DerivedTable::ListContains, &socket_v, &list), Verdict::Pass));
        assert!(matches!(derived(DerivedTable::ListContains, &ddr4, &socket_v), Verdict::Unreadable));
    }
}
