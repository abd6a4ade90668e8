//! Physical and thermal constraints: GPU clearance, board size, cooling.

use super::{AssignedComponent, Build, Findings};
use crate::hardware::{CoolerType, FormFactor, Socket};
use crate::tags::ComponentRole;
use crate::types::{Issue, Severity};

/// Share of the case clearance above which a card is a tight fit.
const TIGHT_FIT_RATIO: f64 = 0.9;

/// Air coolers above this CPU TDP get a liquid cooling suggestion.
const AIR_COOLING_ADVISORY_TDP: f64 = 125.0;

pub(crate) fn check(build: Build<'_>, findings: &mut Findings) {
    for case in build.by_role(ComponentRole::Case) {
        for gpu in build.by_role(ComponentRole::Gpu) {
            check_gpu_clearance(gpu, case, findings);
        }
        for board in build.by_role(ComponentRole::Motherboard) {
            check_form_factor(board, case, findings);
        }
        for cooler in build.by_role(ComponentRole::Cooler) {
            check_cooler_height(cooler, case, findings);
        }
    }

    if build.has(ComponentRole::Cooler) {
        for cpu in build.by_role(ComponentRole::Cpu) {
            check_cooling(cpu, build, findings);
        }
    }
}

fn check_gpu_clearance(gpu: &AssignedComponent, case: &AssignedComponent, findings: &mut Findings) {
    let length = gpu.specs.number("length");
    let max = case.specs.number("max_gpu_length");
    let (Some(length), Some(max)) = (length, max) else {
        if length.is_none() {
            findings.missing(gpu, case, "length");
        }
        if max.is_none() {
            findings.missing(case, gpu, "max_gpu_length");
        }
        return;
    };

    if length > max {
        findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "Graphics card ({} mm) will not fit in the case (max {} mm)",
                    length, max
                ),
            )
            .between(&gpu.slug, &case.slug),
        );
    } else if length > max * TIGHT_FIT_RATIO {
        findings.push(
            Issue::warning(
                Severity::Medium,
                format!(
                    "Tight fit: graphics card ({} mm) leaves little room in the case (max {} mm)",
                    length, max
                ),
            )
            .between(&gpu.slug, &case.slug),
        );
    }
}

fn form_factor(component: &AssignedComponent) -> Option<FormFactor> {
    component.specs.text("form_factor").and_then(FormFactor::parse)
}

fn check_form_factor(board: &AssignedComponent, case: &AssignedComponent, findings: &mut Findings) {
    match (form_factor(board), form_factor(case)) {
        (Some(board_size), Some(case_size)) if board_size > case_size => findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "{} motherboard does not fit a case built for {}",
                    board_size.as_str(),
                    case_size.as_str()
                ),
            )
            .between(&board.slug, &case.slug),
        ),
        (Some(_), Some(_)) => {}
        (board_size, case_size) => {
            if board_size.is_none() {
                findings.missing(board, case, "form_factor");
            }
            if case_size.is_none() {
                findings.missing(case, board, "form_factor");
            }
        }
    }
}

fn check_cooler_height(cooler: &AssignedComponent, case: &AssignedComponent, findings: &mut Findings) {
    let height = cooler.specs.number("height");
    let max = case.specs.number("max_cooler_height");
    let (Some(height), Some(max)) = (height, max) else {
        if height.is_none() {
            findings.missing(cooler, case, "height");
        }
        if max.is_none() {
            findings.missing(case, cooler, "max_cooler_height");
        }
        return;
    };

    if height > max {
        findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "CPU cooler ({} mm) is taller than the case allows ({} mm)",
                    height, max
                ),
            )
            .between(&cooler.slug, &case.slug),
        );
    }
}

/// Socket support of one cooler for a given CPU socket.
enum SocketFit {
    Supported,
    Unsupported,
    Unknown,
}

fn socket_fit(cooler: &AssignedComponent, socket: Socket) -> SocketFit {
    match cooler.specs.list("supported_sockets") {
        None => SocketFit::Unknown,
        Some(list) if list.iter().any(|s| Socket::parse(s) == Some(socket)) => SocketFit::Supported,
        Some(_) => SocketFit::Unsupported,
    }
}

fn check_cooling(cpu: &AssignedComponent, build: Build<'_>, findings: &mut Findings) {
    let coolers: Vec<&AssignedComponent> = build.by_role(ComponentRole::Cooler).collect();

    let Some(socket) = cpu.specs.socket("socket") else {
        for cooler in &coolers {
            findings.missing(cpu, cooler, "socket");
        }
        return;
    };

    let mut usable = Vec::new();
    let mut rejected = Vec::new();
    for cooler in coolers {
        match socket_fit(cooler, socket) {
            SocketFit::Supported => usable.push(cooler),
            SocketFit::Unknown => {
                findings.missing(cooler, cpu, "supported_sockets");
                usable.push(cooler);
            }
            SocketFit::Unsupported => rejected.push(cooler),
        }
    }

    if usable.is_empty() {
        if let Some(first) = rejected.first() {
            findings.push(
                Issue::error(
                    Severity::High,
                    format!("No selected CPU cooler supports socket {}", socket),
                )
                .between(&cpu.slug, &first.slug)
                .with_details(format!(
                    "Checked: {}",
                    rejected.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
                )),
            );
        }
        return;
    }

    for cooler in usable {
        check_thermal_capacity(cpu, cooler, findings);
    }
}

fn check_thermal_capacity(cpu: &AssignedComponent, cooler: &AssignedComponent, findings: &mut Findings) {
    let tdp = cpu.specs.number("tdp");
    let rating = cooler.specs.number("max_tdp");
    let (Some(tdp), Some(rating)) = (tdp, rating) else {
        if tdp.is_none() {
            findings.missing(cpu, cooler, "tdp");
        }
        if rating.is_none() {
            findings.missing(cooler, cpu, "max_tdp");
        }
        return;
    };

    let cooler_type = cooler
        .specs
        .text("cooler_type")
        .and_then(CoolerType::parse)
        .unwrap_or(CoolerType::Air);

    if tdp > rating {
        findings.push(
            Issue::error(
                Severity::High,
                format!(
                    "CPU TDP of {} W exceeds the cooler rating of {} W",
                    tdp, rating
                ),
            )
            .between(&cpu.slug, &cooler.slug),
        );
        return;
    }

    if tdp > rating * cooler_type.comfort_ratio() {
        findings.push(
            Issue::warning(
                Severity::Medium,
                format!(
                    "CPU TDP of {} W is close to the cooler rating of {} W",
                    tdp, rating
                ),
            )
            .between(&cpu.slug, &cooler.slug),
        );
    }

    if cooler_type == CoolerType::Air && tdp > AIR_COOLING_ADVISORY_TDP {
        findings.push(
            Issue::warning(
                Severity::Low,
                format!(
                    "A {} W CPU usually runs cooler and quieter with liquid cooling",
                    tdp
                ),
            )
            .between(&cpu.slug, &cooler.slug),
        );
    }
}
