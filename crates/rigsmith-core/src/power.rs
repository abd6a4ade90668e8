//! # Power Budget
//!
//! Estimates the draw of a build and the supply rating to recommend, then
//! judges the selected power supply against both.
//!
//! ## Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. GPU declares recommended_psu_power?                                 │
//! │        yes ──► recommended = that figure (rounded), no headroom         │
//! │                                                                         │
//! │  2. otherwise sum the draw:                                             │
//! │        CPU tdp + GPU power_consumption                                  │
//! │        + memory modules × (DDR3/DDR4 3 W, DDR5 5 W)                     │
//! │        + storage (NVMe 7 W, SATA SSD 4 W, HDD 9 W)                      │
//! │        + cooler (air 5 W, liquid 15 W)                                  │
//! │        + motherboard 50 W + case fans 10 W (when present)               │
//! │      recommended = round(actual × (1 + headroom / 100))                 │
//! │                                                                         │
//! │  3. nothing known ──► 0 / 0 ("insufficient data")                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual draw is summed in every case so supply load can be judged
//! even when a manufacturer figure sets the recommendation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use tracing::debug;

use crate::compat::{AssignedComponent, Build};
use crate::hardware::{CoolerType, StorageInterface};
use crate::tags::ComponentRole;
use crate::types::{Issue, Severity};

/// Motherboard baseline draw.
pub const MOTHERBOARD_BASELINE_WATTS: f64 = 50.0;

/// Case fan baseline draw.
pub const CASE_FAN_BASELINE_WATTS: f64 = 10.0;

/// Default headroom above the estimated draw.
pub const DEFAULT_HEADROOM_PERCENT: u32 = 20;

// =============================================================================
// Watts
// =============================================================================

/// Whole watts.
///
/// Estimates are summed as floating point per component and rounded once,
/// at the budget boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Watts(u32);

impl Watts {
    #[inline]
    pub const fn new(watts: u32) -> Self {
        Watts(watts)
    }

    /// Rounds to the nearest watt; negative input clamps to zero.
    pub fn from_f64(watts: f64) -> Self {
        Watts(watts.max(0.0).round() as u32)
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Watts(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds a percentage on top, rounding to the nearest watt.
    ///
    /// ```rust
    /// use rigsmith_core::power::Watts;
    ///
    /// assert_eq!(Watts::new(122).with_headroom(20), Watts::new(146));
    /// ```
    pub fn with_headroom(&self, percent: u32) -> Watts {
        Watts::from_f64(f64::from(self.0) * (1.0 + f64::from(percent) / 100.0))
    }
}

impl fmt::Display for Watts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} W", self.0)
    }
}

impl Add for Watts {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Watts(self.0 + other.0)
    }
}

impl AddAssign for Watts {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Policy and Budget
// =============================================================================

/// Tunables of the power calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerPolicy {
    pub headroom_percent: u32,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        PowerPolicy {
            headroom_percent: DEFAULT_HEADROOM_PERCENT,
        }
    }
}

/// Where the recommended rating came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    ManufacturerRecommendation,
    Estimated,
    InsufficientData,
}

/// Draw attributed to one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerDraw {
    pub slug: String,
    pub watts: f64,
}

/// Outcome of the power calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerBudget {
    pub actual: Watts,
    pub recommended: Watts,
    pub source: PowerSource,
    pub breakdown: Vec<PowerDraw>,
}

impl PowerBudget {
    pub fn insufficient() -> Self {
        PowerBudget {
            actual: Watts::zero(),
            recommended: Watts::zero(),
            source: PowerSource::InsufficientData,
            breakdown: Vec::new(),
        }
    }
}

/// Estimated draw of one component, `None` when nothing is known.
fn component_draw(component: &AssignedComponent) -> Option<f64> {
    let specs = &component.specs;
    match component.role {
        ComponentRole::Cpu => specs.number("tdp"),
        ComponentRole::Gpu => specs.number("power_consumption"),
        ComponentRole::Memory => {
            let modules = specs.number("modules").unwrap_or(1.0);
            specs
                .memory_type("memory_type")
                .map(|ty| ty.module_watts() * modules)
        }
        ComponentRole::Storage => specs
            .text("interface")
            .and_then(StorageInterface::parse)
            .map(|interface| interface.watts()),
        ComponentRole::Cooler => specs
            .text("cooler_type")
            .and_then(CoolerType::parse)
            .map(|ty| ty.watts()),
        ComponentRole::Motherboard => Some(MOTHERBOARD_BASELINE_WATTS),
        ComponentRole::Case => Some(CASE_FAN_BASELINE_WATTS),
        ComponentRole::Psu => None,
    }
}

/// Computes actual draw and recommended supply rating.
pub fn calculate_power(components: &[AssignedComponent], policy: &PowerPolicy) -> PowerBudget {
    let build = Build::new(components);

    let breakdown: Vec<PowerDraw> = build
        .all()
        .filter_map(|c| {
            component_draw(c).map(|watts| PowerDraw {
                slug: c.slug.clone(),
                watts,
            })
        })
        .collect();
    let actual = Watts::from_f64(breakdown.iter().map(|d| d.watts).sum());

    let manufacturer = build
        .by_role(ComponentRole::Gpu)
        .filter_map(|gpu| gpu.specs.number("recommended_psu_power"))
        .fold(None, |max: Option<f64>, w| Some(max.map_or(w, |m| m.max(w))));

    let (recommended, source) = match manufacturer {
        Some(watts) => (Watts::from_f64(watts), PowerSource::ManufacturerRecommendation),
        None if actual.is_zero() => (Watts::zero(), PowerSource::InsufficientData),
        None => (
            actual.with_headroom(policy.headroom_percent),
            PowerSource::Estimated,
        ),
    };

    debug!(
        actual = actual.get(),
        recommended = recommended.get(),
        ?source,
        "Power budget calculated"
    );

    PowerBudget {
        actual,
        recommended,
        source,
        breakdown,
    }
}

// =============================================================================
// Supply Validation
// =============================================================================

const OVERLOAD_RATIO: f64 = 0.9;
const HIGH_LOAD_RATIO: f64 = 0.8;
const OVERSIZED_RATIO: f64 = 0.5;

/// Judges one power supply against the budget.
///
/// The efficiency advisory does not depend on the wattage being known.
pub fn validate_supply(budget: &PowerBudget, psu: &AssignedComponent) -> Vec<Issue> {
    let mut issues = Vec::new();

    match psu.specs.number("wattage") {
        Some(wattage) => check_capacity(budget, psu, wattage, &mut issues),
        None => issues.push(
            Issue::warning(
                Severity::Medium,
                "Insufficient information: power supply wattage is unknown, power capacity could not be checked",
            )
            .on(&psu.slug),
        ),
    }

    if psu.specs.text("efficiency").is_none() {
        issues.push(
            Issue::warning(Severity::Low, "Power supply declares no efficiency certification")
                .on(&psu.slug),
        );
    }

    issues
}

fn check_capacity(budget: &PowerBudget, psu: &AssignedComponent, wattage: f64, issues: &mut Vec<Issue>) {
    let recommended = f64::from(budget.recommended.get());
    if recommended > 0.0 && wattage < recommended {
        issues.push(
            Issue::error(
                Severity::High,
                format!(
                    "Power supply rated {} W is below the recommended {}",
                    wattage, budget.recommended
                ),
            )
            .on(&psu.slug),
        );
    }

    let actual = f64::from(budget.actual.get());
    if actual > 0.0 && wattage > 0.0 {
        let load = actual / wattage;
        let percent = (load * 100.0).round();
        if load > 1.0 {
            issues.push(
                Issue::error(
                    Severity::Critical,
                    format!(
                        "Estimated draw of {} exceeds the power supply rating of {} W",
                        budget.actual, wattage
                    ),
                )
                .on(&psu.slug),
            );
        } else if load > OVERLOAD_RATIO {
            issues.push(
                Issue::error(
                    Severity::High,
                    format!("Power supply would run at {}% load", percent),
                )
                .on(&psu.slug),
            );
        } else if load > HIGH_LOAD_RATIO {
            issues.push(
                Issue::warning(
                    Severity::Medium,
                    format!("Power supply would run at {}% load, little headroom left", percent),
                )
                .on(&psu.slug),
            );
        } else if load < OVERSIZED_RATIO {
            issues.push(
                Issue::warning(
                    Severity::Low,
                    format!(
                        "Power supply would run at {}% load, a smaller unit would be more efficient",
                        percent
                    ),
                )
                .on(&psu.slug),
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::tests::component;
    use crate::hardware::MemoryType;
    use crate::types::IssueKind;
    use crate::value::SpecificationValue as V;

    fn watts(watts: f64) -> V {
        V::PowerConsumption {
            watts,
            unit: "W".to_string(),
        }
    }

    fn psu(rating: f64) -> AssignedComponent {
        component(
            "psu",
            ComponentRole::Psu,
            &[
                ("wattage", watts(rating)),
                ("efficiency", V::Enum { value: "80+ Gold".to_string() }),
            ],
        )
    }

    fn budget(actual: u32, recommended: u32) -> PowerBudget {
        PowerBudget {
            actual: Watts::new(actual),
            recommended: Watts::new(recommended),
            source: PowerSource::Estimated,
            breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_watts_rounding_and_display() {
        assert_eq!(Watts::from_f64(146.4), Watts::new(146));
        assert_eq!(Watts::from_f64(146.5), Watts::new(147));
        assert_eq!(Watts::from_f64(-3.0), Watts::zero());
        assert_eq!(Watts::new(650).to_string(), "650 W");
        assert_eq!(Watts::new(100) + Watts::new(50), Watts::new(150));
    }

    #[test]
    fn test_manufacturer_recommendation_wins() {
        let components = vec![
            component("cpu", ComponentRole::Cpu, &[("tdp", watts(170.0))]),
            component("gpu", ComponentRole::Gpu, &[("recommended_psu_power", watts(750.0))]),
        ];
        let budget = calculate_power(&components, &PowerPolicy::default());
        assert_eq!(budget.recommended, Watts::new(750));
        assert_eq!(budget.source, PowerSource::ManufacturerRecommendation);
        assert_eq!(budget.actual, Watts::new(170));
    }

    #[test]
    fn test_fallback_sum_with_headroom() {
        let components = vec![
            component("cpu", ComponentRole::Cpu, &[("tdp", watts(105.0))]),
            component("ram", ComponentRole::Memory, &[("memory_type", V::MemoryType { value: MemoryType::Ddr5 })]),
            component("ssd", ComponentRole::Storage, &[("interface", V::Enum { value: "NVMe".to_string() })]),
            component("cooler", ComponentRole::Cooler, &[("cooler_type", V::Enum { value: "Air".to_string() })]),
        ];
        let budget = calculate_power(&components, &PowerPolicy::default());
        assert_eq!(budget.actual, Watts::new(122));
        assert_eq!(budget.recommended, Watts::new(146));
        assert_eq!(budget.source, PowerSource::Estimated);
        assert_eq!(budget.breakdown.len(), 4);
    }

    #[test]
    fn test_baselines_only_when_present() {
        let components = vec![
            component("board", ComponentRole::Motherboard, &[]),
            component("case", ComponentRole::Case, &[]),
        ];
        let budget = calculate_power(&components, &PowerPolicy { headroom_percent: 0 });
        assert_eq!(budget.actual, Watts::new(60));
        assert_eq!(budget.recommended, Watts::new(60));
    }

    #[test]
    fn test_nothing_known_is_zero() {
        let components = vec![component("psu", ComponentRole::Psu, &[("wattage", watts(650.0))])];
        assert_eq!(
            calculate_power(&components, &PowerPolicy::default()),
            PowerBudget::insufficient()
        );
        assert_eq!(calculate_power(&[], &PowerPolicy::default()).recommended, Watts::zero());
    }

    #[test]
    fn test_supply_below_recommendation() {
        let issues = validate_supply(&budget(400, 750), &psu(650.0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Error);
        assert_eq!(issues[0].role_a.as_deref(), Some("psu"));
    }

    #[test]
    fn test_supply_load_bands() {
        let heavy = validate_supply(&budget(560, 0), &psu(600.0));
        assert_eq!(heavy[0].kind, IssueKind::Error);

        let high = validate_supply(&budget(510, 0), &psu(600.0));
        assert_eq!(high[0].kind, IssueKind::Warning);
        assert_eq!(high[0].severity, Severity::Medium);

        let light = validate_supply(&budget(200, 240), &psu(1000.0));
        assert_eq!(light.len(), 1);
        assert_eq!(light[0].severity, Severity::Low);

        assert!(validate_supply(&budget(400, 480), &psu(650.0)).is_empty());
    }

    #[test]
    fn test_supply_missing_data() {
        let bare = component("psu", ComponentRole::Psu, &[("wattage", watts(650.0))]);
        let issues = validate_supply(&budget(400, 480), &bare);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("efficiency"));

        let unknown = component("psu", ComponentRole::Psu, &[]);
        let issues = validate_supply(&budget(400, 480), &unknown);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.starts_with("Insufficient information"));
        assert!(issues[1].message.contains("efficiency"));
        assert!(issues.iter().all(|i| i.kind == IssueKind::Warning));
    }
}
