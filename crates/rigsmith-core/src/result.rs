//! Merges engine findings and the power budget into a [`ValidationResult`].

use crate::compat::Findings;
use crate::power::PowerBudget;
use crate::types::{Issue, ValidationResult};

/// Partitions findings by kind and attaches both power figures.
///
/// `is_valid` depends on blocking issues only; warnings never block.
pub fn aggregate(findings: Findings, budget: &PowerBudget) -> ValidationResult {
    let (issues, warnings): (Vec<Issue>, Vec<Issue>) =
        findings.issues.into_iter().partition(Issue::is_blocking);

    ValidationResult {
        is_valid: issues.is_empty(),
        issues,
        warnings,
        actual_power_consumption: budget.actual.get(),
        recommended_psu_power: budget.recommended.get(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::EvaluationMode;
    use crate::power::{PowerSource, Watts};
    use crate::types::Severity;

    #[test]
    fn test_warnings_never_block() {
        let mut findings = Findings::new(EvaluationMode::Tagged);
        findings.push(Issue::warning(Severity::High, "hot"));
        findings.push(Issue::warning(Severity::Low, "big"));
        let budget = PowerBudget {
            actual: Watts::new(300),
            recommended: Watts::new(360),
            source: PowerSource::Estimated,
            breakdown: Vec::new(),
        };

        let result = aggregate(findings, &budget);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.actual_power_consumption, 300);
        assert_eq!(result.recommended_psu_power, 360);
    }

    #[test]
    fn test_errors_partitioned() {
        let mut findings = Findings::new(EvaluationMode::Legacy);
        findings.push(Issue::warning(Severity::Low, "w"));
        findings.push(Issue::error(Severity::High, "e"));

        let result = aggregate(findings, &PowerBudget::insufficient());
        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].message, "e");
        assert_eq!(result.warnings[0].message, "w");
    }
}
