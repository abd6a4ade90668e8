//! Socket / chipset / memory matrix.
//!
//! ```text
//!   CPU.socket ══ Motherboard.socket            (error on mismatch)
//!        │
//!        └─ matched ─► Motherboard.chipset family
//!                         └─► CPU generation supported?  (strict: error)
//!
//!   Memory.memory_type ∈ socket's memory set    (error)
//!   Memory.memory_type == Motherboard.memory_type (error)
//!   Memory.frequency ≤ chipset ceiling          (warning)
//!   Σ Memory.capacity ≤ Motherboard.max_memory  (warning)
//!   Σ Memory.modules  ≤ Motherboard.memory_slots (error)
//! ```

use super::{generation_label, AssignedComponent, Build, Findings};
use crate::hardware::{infer_cpu_generation, Socket};
use crate::tags::ComponentRole;
use crate::types::{Issue, Severity};

pub(crate) fn check(build: Build<'_>, findings: &mut Findings) {
    for cpu in build.by_role(ComponentRole::Cpu) {
        for board in build.by_role(ComponentRole::Motherboard) {
            check_cpu_board(cpu, board, findings);
        }
    }

    check_memory(build, findings);
}

fn check_cpu_board(cpu: &AssignedComponent, board: &AssignedComponent, findings: &mut Findings) {
    let (cpu_socket, board_socket) = match (cpu.specs.socket("socket"), board.specs.socket("socket")) {
        (Some(a), Some(b)) => (a, b),
        (a, b) => {
            if a.is_none() {
                findings.missing(cpu, board, "socket");
            }
            if b.is_none() {
                findings.missing(board, cpu, "socket");
            }
            return;
        }
    };

    if cpu_socket != board_socket {
        findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "CPU socket {} does not match motherboard socket {}",
                    cpu_socket, board_socket
                ),
            )
            .between(&cpu.slug, &board.slug)
            .with_details(format!(
                "{} requires a {} board, {} provides {}",
                cpu.label(),
                cpu_socket,
                board.label(),
                board_socket
            )),
        );
        return;
    }

    let Some(chipset) = board.specs.chipset("chipset") else {
        findings.missing(board, cpu, "chipset");
        return;
    };
    let generation = cpu
        .specs
        .number("generation")
        .map(|g| g.round() as u32)
        .or_else(|| infer_cpu_generation(&cpu.title));
    let Some(generation) = generation else {
        findings.missing(cpu, board, "generation");
        return;
    };

    let support = chipset.family().generation_support();
    if support.supports(generation) {
        return;
    }

    let issue = if support.strict {
        Issue::error(
            Severity::High,
            format!(
                "Chipset {} does not support {} CPUs",
                chipset,
                generation_label(generation)
            ),
        )
    } else {
        Issue::warning(
            Severity::Medium,
            format!(
                "Chipset {} may need a BIOS update to run {} CPUs",
                chipset,
                generation_label(generation)
            ),
        )
    };
    findings.push(issue.between(&cpu.slug, &board.slug));
}

fn check_memory(build: Build<'_>, findings: &mut Findings) {
    let kits: Vec<&AssignedComponent> = build.by_role(ComponentRole::Memory).collect();
    if kits.is_empty() {
        return;
    }

    // Memory controller lives in the CPU; the board socket is the same one.
    let hosts: Vec<&AssignedComponent> = if build.has(ComponentRole::Motherboard) {
        build.by_role(ComponentRole::Motherboard).collect()
    } else {
        build.by_role(ComponentRole::Cpu).collect()
    };

    for kit in &kits {
        for host in &hosts {
            check_kit_against_host(kit, host, findings);
        }
    }

    for board in build.by_role(ComponentRole::Motherboard) {
        check_board_capacity(&kits, board, findings);
    }
}

fn check_kit_against_host(kit: &AssignedComponent, host: &AssignedComponent, findings: &mut Findings) {
    let Some(memory) = kit.specs.memory_type("memory_type") else {
        findings.missing(kit, host, "memory_type");
        return;
    };

    let socket: Option<Socket> = host.specs.socket("socket");
    match socket {
        None => findings.missing(host, kit, "socket"),
        Some(socket) if !socket.supports_memory(memory) => {
            let supported: Vec<&str> = socket
                .supported_memory_types()
                .iter()
                .map(|m| m.as_str())
                .collect();
            findings.push(
                Issue::error(
                    Severity::High,
                    format!("{} memory is not supported by socket {}", memory, socket),
                )
                .between(&kit.slug, &host.slug)
                .with_details(format!("Socket {} supports {}", socket, supported.join(", "))),
            );
            return;
        }
        Some(_) => {}
    }

    if host.role != ComponentRole::Motherboard {
        return;
    }

    if let Some(board_memory) = host.specs.memory_type("memory_type") {
        if board_memory != memory {
            findings.push(
                Issue::error(
                    Severity::High,
                    format!(
                        "Motherboard takes {} memory but the selected kit is {}",
                        board_memory, memory
                    ),
                )
                .between(&kit.slug, &host.slug),
            );
            return;
        }
    }

    match (kit.specs.number("frequency"), host.specs.chipset("chipset")) {
        (Some(mhz), Some(chipset)) => {
            if let Some(ceiling) = chipset.family().max_memory_speed(memory) {
                if mhz > ceiling {
                    findings.push(
                        Issue::warning(
                            Severity::Low,
                            format!(
                                "Memory rated {} MHz will run at up to {} MHz on chipset {}",
                                mhz, ceiling, chipset
                            ),
                        )
                        .between(&kit.slug, &host.slug),
                    );
                }
            }
        }
        (Some(_), None) => findings.missing(host, kit, "chipset"),
        _ => {}
    }
}

fn check_board_capacity(kits: &[&AssignedComponent], board: &AssignedComponent, findings: &mut Findings) {
    let Some(first) = kits.first() else {
        return;
    };

    let modules: f64 = kits
        .iter()
        .map(|kit| kit.specs.number("modules").unwrap_or(1.0))
        .sum();
    match board.specs.number("memory_slots") {
        Some(slots) if modules > slots => findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "{} memory modules selected but the motherboard has {} slots",
                    modules, slots
                ),
            )
            .between(&first.slug, &board.slug),
        ),
        Some(_) => {}
        None => findings.missing(board, first, "memory_slots"),
    }

    let capacities: Vec<f64> = kits.iter().filter_map(|k| k.specs.number("capacity")).collect();
    if capacities.is_empty() {
        return;
    }
    let total: f64 = capacities.iter().sum();
    match board.specs.number("max_memory") {
        Some(max) if total > max => findings.push(
            Issue::warning(
                Severity::Medium,
                format!(
                    "{} GB of memory exceeds the motherboard maximum of {} GB",
                    total, max
                ),
            )
            .between(&first.slug, &board.slug),
        ),
        Some(_) => {}
        None => findings.missing(board, first, "max_memory"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::component;
    use super::super::EvaluationMode;
    use super::*;
    use crate::hardware::{Chipset, MemoryType};
    use crate::types::IssueKind;
    use crate::value::SpecificationValue as V;

    fn socket(s: Socket) -> V {
        V::Socket { value: s }
    }

    fn run(components: &[AssignedComponent]) -> Findings {
        let mut findings = Findings::new(EvaluationMode::Tagged);
        check(Build::new(components), &mut findings);
        findings
    }

    #[test]
    fn test_socket_mismatch_names_both() {
        let findings = run(&[
            component("cpu", ComponentRole::Cpu, &[("socket", socket(Socket::Am5))]),
            component("board", ComponentRole::Motherboard, &[("socket", socket(Socket::Am4))]),
        ]);
        assert_eq!(findings.blocking_count(), 1);
        let issue = &findings.issues[0];
        assert!(issue.message.contains("AM5") && issue.message.contains("AM4"));
        assert_eq!(issue.role_a.as_deref(), Some("cpu"));
        assert_eq!(issue.role_b.as_deref(), Some("board"));
    }

    #[test]
    fn test_strict_chipset_rejects_old_generation() {
        let findings = run(&[
            component(
                "cpu",
                ComponentRole::Cpu,
                &[
                    ("socket", socket(Socket::Lga1700)),
                    ("generation", V::Number { value: 11.0, unit: None }),
                ],
            ),
            component(
                "board",
                ComponentRole::Motherboard,
                &[
                    ("socket", socket(Socket::Lga1700)),
                    ("chipset", V::Chipset { value: Chipset::Z790 }),
                ],
            ),
        ]);
        assert_eq!(findings.blocking_count(), 1);
        assert!(findings.issues[0].message.contains("11th generation"));
    }

    #[test]
    fn test_lenient_chipset_warns() {
        let mut cpu = component("cpu", ComponentRole::Cpu, &[("socket", socket(Socket::Am4))]);
        cpu.title = "AMD Ryzen 7 5800X3D".to_string();
        let board = component(
            "board",
            ComponentRole::Motherboard,
            &[
                ("socket", socket(Socket::Am4)),
                ("chipset", V::Chipset { value: Chipset::A320 }),
            ],
        );
        let findings = run(&[cpu.clone(), board.clone()]);
        assert!(findings.issues.is_empty(), "{:?}", findings.issues);

        cpu.specs.insert("generation", V::Number { value: 7000.0, unit: None });
        let findings = run(&[cpu, board]);
        assert_eq!(findings.blocking_count(), 0);
        assert_eq!(findings.issues[0].kind, IssueKind::Warning);
    }

    #[test]
    fn test_memory_type_outside_socket_set() {
        let findings = run(&[
            component("board", ComponentRole::Motherboard, &[("socket", socket(Socket::Am5))]),
            component(
                "ram",
                ComponentRole::Memory,
                &[("memory_type", V::MemoryType { value: MemoryType::Ddr4 })],
            ),
        ]);
        assert_eq!(findings.blocking_count(), 1);
        assert!(findings.issues[0].message.contains("DDR4"));
    }

    #[test]
    fn test_memory_speed_and_capacity_warnings() {
        let findings = run(&[
            component(
                "board",
                ComponentRole::Motherboard,
                &[
                    ("socket", socket(Socket::Am5)),
                    ("chipset", V::Chipset { value: Chipset::B650 }),
                    ("memory_slots", V::Number { value: 2.0, unit: None }),
                    ("max_memory", V::MemorySize { gb: 64.0, unit: "GB".to_string() }),
                ],
            ),
            component(
                "ram",
                ComponentRole::Memory,
                &[
                    ("memory_type", V::MemoryType { value: MemoryType::Ddr5 }),
                    ("frequency", V::Frequency { mhz: 6000.0, unit: "MHz".to_string() }),
                    ("modules", V::Number { value: 4.0, unit: None }),
                    ("capacity", V::MemorySize { gb: 128.0, unit: "GB".to_string() }),
                ],
            ),
        ]);
        // module count is blocking, speed and capacity are advisory
        assert_eq!(findings.blocking_count(), 1);
        assert_eq!(findings.issues.len(), 3);
        assert!(findings.issues.iter().any(|i| i.message.contains("5200 MHz")));
    }

    #[test]
    fn test_missing_socket_is_a_warning() {
        let findings = run(&[
            component("cpu", ComponentRole::Cpu, &[]),
            component("board", ComponentRole::Motherboard, &[("socket", socket(Socket::Am5))]),
        ]);
        assert_eq!(findings.blocking_count(), 0);
        assert_eq!(findings.issues.len(), 1);
        assert!(findings.issues[0].message.starts_with("Insufficient information"));
    }

    #[test]
    fn test_undeclared_memory_slots_are_reported() {
        let findings = run(&[
            component("board", ComponentRole::Motherboard, &[("socket", socket(Socket::Am5))]),
            component(
                "ram",
                ComponentRole::Memory,
                &[("memory_type", V::MemoryType { value: MemoryType::Ddr5 })],
            ),
        ]);
        assert_eq!(findings.blocking_count(), 0);
        assert_eq!(findings.issues.len(), 1);
        assert!(findings.issues[0].message.starts_with("Insufficient information"));
        assert!(findings.issues[0].message.contains("memory_slots"));
    }
}
