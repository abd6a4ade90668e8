//! Slot and connector constraints.

use super::{AssignedComponent, Build, Findings};
use crate::hardware::StorageInterface;
use crate::tags::ComponentRole;
use crate::types::{Issue, Severity};

/// Board draw above which a card needs auxiliary PCIe power.
const PCIE_SLOT_POWER_LIMIT: f64 = 150.0;

pub(crate) fn check(build: Build<'_>, findings: &mut Findings) {
    let gpus: Vec<&AssignedComponent> = build.by_role(ComponentRole::Gpu).collect();

    for board in build.by_role(ComponentRole::Motherboard) {
        check_x16_slots(&gpus, board, findings);
        check_m2_slots(build, board, findings);
    }

    for psu in build.by_role(ComponentRole::Psu) {
        for gpu in &gpus {
            check_pcie_power(gpu, psu, findings);
        }
    }
}

fn check_x16_slots(gpus: &[&AssignedComponent], board: &AssignedComponent, findings: &mut Findings) {
    let Some(first) = gpus.first() else {
        return;
    };
    let Some(slots) = board.specs.number("pcie_x16_slots") else {
        findings.missing(board, first, "pcie_x16_slots");
        return;
    };

    if slots < 1.0 {
        findings.push(
            Issue::warning(
                Severity::Medium,
                "Motherboard has no PCIe x16 slot for the graphics card",
            )
            .between(&first.slug, &board.slug),
        );
    } else if gpus.len() as f64 > slots {
        findings.push(
            Issue::warning(
                Severity::Medium,
                format!(
                    "{} graphics cards selected but the motherboard has {} PCIe x16 slots",
                    gpus.len(),
                    slots
                ),
            )
            .between(&first.slug, &board.slug),
        );
    }
}

fn check_pcie_power(gpu: &AssignedComponent, psu: &AssignedComponent, findings: &mut Findings) {
    let Some(draw) = gpu.specs.number("power_consumption") else {
        findings.missing(gpu, psu, "power_consumption");
        return;
    };
    if draw <= PCIE_SLOT_POWER_LIMIT {
        return;
    }

    match psu.specs.number("pcie_connectors") {
        Some(connectors) if connectors < 1.0 => findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "Graphics card draws {} W and needs PCIe power connectors, the power supply has none",
                    draw
                ),
            )
            .between(&gpu.slug, &psu.slug),
        ),
        Some(_) => {}
        None => findings.missing(psu, gpu, "pcie_connectors"),
    }
}

fn check_m2_slots(build: Build<'_>, board: &AssignedComponent, findings: &mut Findings) {
    let nvme: Vec<&AssignedComponent> = build
        .by_role(ComponentRole::Storage)
        .filter(|drive| {
            drive.specs.text("interface").and_then(StorageInterface::parse) == Some(StorageInterface::Nvme)
        })
        .collect();
    let Some(first) = nvme.first() else {
        return;
    };

    match board.specs.number("m2_slots") {
        Some(slots) if slots < 1.0 => findings.push(
            Issue::warning(
                Severity::Medium,
                "NVMe drive selected but the motherboard has no M.2 slot",
            )
            .between(&first.slug, &board.slug),
        ),
        Some(slots) if nvme.len() as f64 > slots => findings.push(
            Issue::warning(
                Severity::Medium,
                format!(
                    "{} NVMe drives selected but the motherboard has {} M.2 slots",
                    nvme.len(),
                    slots
                ),
            )
            .between(&first.slug, &board.slug),
        ),
        Some(_) => {}
        None => findings.missing(board, first, "m2_slots"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::component;
    use super::super::EvaluationMode;
    use super::*;
    use crate::value::SpecificationValue as V;

    fn count(value: f64) -> V {
        V::Number { value, unit: None }
    }

    fn run(components: &[AssignedComponent]) -> Findings {
        let mut findings = Findings::new(EvaluationMode::Tagged);
        check(Build::new(components), &mut findings);
        findings
    }

    fn hungry_gpu() -> AssignedComponent {
        component(
            "gpu",
            ComponentRole::Gpu,
            &[(
                "power_consumption",
                V::PowerConsumption {
                    watts: 320.0,
                    unit: "W".to_string(),
                },
            )],
        )
    }

    #[test]
    fn test_psu_without_pcie_connectors() {
        let findings = run(&[
            hungry_gpu(),
            component("psu", ComponentRole::Psu, &[("pcie_connectors", count(0.0))]),
        ]);
        assert_eq!(findings.blocking_count(), 1);

        let undeclared = run(&[hungry_gpu(), component("psu", ComponentRole::Psu, &[])]);
        assert_eq!(undeclared.blocking_count(), 0);
        assert_eq!(undeclared.issues.len(), 1);
    }

    #[test]
    fn test_board_without_x16_slot() {
        let findings = run(&[
            hungry_gpu(),
            component("board", ComponentRole::Motherboard, &[("pcie_x16_slots", count(0.0))]),
        ]);
        assert_eq!(findings.blocking_count(), 0);
        assert_eq!(findings.issues.len(), 1);
    }

    #[test]
    fn test_nvme_needs_m2_slot() {
        let drive = component(
            "ssd",
            ComponentRole::Storage,
            &[("interface", V::Enum { value: "NVMe".to_string() })],
        );
        let findings = run(&[
            drive.clone(),
            component("board", ComponentRole::Motherboard, &[("m2_slots", count(0.0))]),
        ]);
        assert_eq!(findings.issues.len(), 1);
        assert_eq!(findings.blocking_count(), 0);

        let fine = run(&[
            drive,
            component("board", ComponentRole::Motherboard, &[("m2_slots", count(2.0))]),
        ]);
        assert!(fine.issues.is_empty());
    }

    #[test]
    fn test_undeclared_slot_counts_are_reported() {
        let gpu = component(
            "gpu",
            ComponentRole::Gpu,
            &[(
                "power_consumption",
                V::PowerConsumption {
                    watts: 200.0,
                    unit: "W".to_string(),
                },
            )],
        );
        let findings = run(&[gpu, component("board", ComponentRole::Motherboard, &[])]);
        assert_eq!(findings.blocking_count(), 0);
        assert_eq!(findings.issues.len(), 1);
        assert!(findings.issues[0].message.starts_with("Insufficient information"));
        assert!(findings.issues[0].message.contains("pcie_x16_slots"));

        let drive = component(
            "ssd",
            ComponentRole::Storage,
            &[("interface", V::Enum { value: "NVMe".to_string() })],
        );
        let findings = run(&[drive, component("board", ComponentRole::Motherboard, &[])]);
        assert_eq!(findings.issues.len(), 1);
        assert!(findings.issues[0].message.contains("m2_slots"));
        assert_eq!(findings.issues[0].role_a.as_deref(), Some("board"));
    }
}
