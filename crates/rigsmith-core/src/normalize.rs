//! # Typed Value Normalizer
//!
//! Turns raw catalog input into [`SpecificationValue`]s, once.
//!
//! ## Normalization Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw "3.2 GHz" ──┐                                                      │
//! │                  ▼                                                      │
//! │  missing/blank? ──yes──► required? ──yes──► Err(Required)              │
//! │                  │ no                 └─no──► Ok(no value)              │
//! │                  ▼                                                      │
//! │  per-kind grammar (number + unit, alias table, token set, domain)      │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  unit conversion to canonical (GHz×1000, TB×1024, kW×1000, ...)        │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  range check ──fail──► Err(OutOfRange)                                 │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  context check against sibling fields (socket, memory_type)            │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  Ok(Frequency { mhz: 3200, unit: "GHz" })                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rigsmith_core::normalize::normalize;
//! use rigsmith_core::tags::SpecificationDeclaration;
//! use rigsmith_core::value::{RawValue, SpecMap, ValueKind};
//!
//! let decl = SpecificationDeclaration::new("frequency", ValueKind::Frequency);
//! let raw = RawValue::from("3.2 GHz");
//! let normalized = normalize(Some(&raw), &decl, &SpecMap::new()).unwrap();
//! assert_eq!(normalized.value.unwrap().as_number(), Some(3200.0));
//! ```

use crate::error::ValidationError;
use crate::hardware::{Chipset, MemoryType, Socket};
use crate::tags::profile::field_key;
use crate::tags::SpecificationDeclaration;
use crate::types::RawSpecification;
use crate::value::{RawValue, SpecMap, SpecificationValue, ValueKind};

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, ValidationError>;

const TRUTHY: [&str; 6] = ["true", "yes", "y", "1", "on", "+"];
const FALSY: [&str; 6] = ["false", "no", "n", "0", "off", "-"];

/// Accepted units per numeric kind: `(spelling, factor to canonical)`.
const FREQUENCY_UNITS: &[(&str, f64)] = &[("mhz", 1.0), ("ghz", 1000.0)];
const MEMORY_SIZE_UNITS: &[(&str, f64)] = &[("gb", 1.0), ("tb", 1024.0), ("mb", 1.0 / 1024.0)];
const POWER_UNITS: &[(&str, f64)] = &[("w", 1.0), ("watt", 1.0), ("watts", 1.0), ("kw", 1000.0)];

/// Outcome of a successful normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// `None` for an absent optional field.
    pub value: Option<SpecificationValue>,
    /// Advisory findings that do not reject the value.
    pub notes: Vec<String>,
}

impl Normalized {
    fn value(value: SpecificationValue) -> Self {
        Normalized {
            value: Some(value),
            notes: Vec::new(),
        }
    }
}

// =============================================================================
// Single Value
// =============================================================================

/// Normalizes one raw value against its declaration.
///
/// `context` holds the already-normalized sibling fields of the same
/// component; Socket and Chipset consult it.
///
/// ## Errors
/// Every failure is a field-level [`ValidationError`]: `Required`,
/// `InvalidFormat`, `NotAllowed` (with suggestions), `OutOfRange`, or
/// `Incompatible`.
pub fn normalize(
    raw: Option<&RawValue>,
    decl: &SpecificationDeclaration,
    context: &SpecMap,
) -> NormalizeResult<Normalized> {
    let raw = match raw {
        Some(raw) if !raw.is_blank() => raw,
        _ if decl.required => {
            return Err(ValidationError::Required {
                field: decl.name.clone(),
            })
        }
        _ => return Ok(Normalized::default()),
    };

    let field = decl.name.as_str();
    match decl.kind {
        ValueKind::Text => Ok(Normalized::value(SpecificationValue::Text {
            value: raw.to_string().trim().to_string(),
        })),
        ValueKind::Boolean => parse_bool(field, raw)
            .map(|value| Normalized::value(SpecificationValue::Boolean { value })),
        ValueKind::Enum => normalize_enum(decl, raw),
        ValueKind::MemoryType => {
            let text = raw.to_string();
            MemoryType::parse(&text)
                .map(|value| Normalized::value(SpecificationValue::MemoryType { value }))
                .ok_or_else(|| {
                    ValidationError::not_allowed(field, text.trim(), MemoryType::canonical_names())
                })
        }
        ValueKind::Socket => normalize_socket(field, raw, context),
        ValueKind::Chipset => normalize_chipset(field, raw, context),
        ValueKind::Number => {
            let (magnitude, unit) = split_quantity(field, raw)?;
            let unit = match (unit, decl.unit.as_deref()) {
                (Some(given), Some(declared)) if !given.eq_ignore_ascii_case(declared) => {
                    return Err(ValidationError::invalid_format(
                        field,
                        raw.to_string(),
                        format!("expected unit {}", declared),
                    ))
                }
                (Some(given), _) => Some(given),
                (None, declared) => declared.map(str::to_string),
            };
            let value = check_range(decl, round_canonical(magnitude))?;
            Ok(Normalized::value(SpecificationValue::Number { value, unit }))
        }
        ValueKind::Frequency => {
            let (mhz, unit) = convert(decl, raw, FREQUENCY_UNITS, "MHz")?;
            Ok(Normalized::value(SpecificationValue::Frequency { mhz, unit }))
        }
        ValueKind::MemorySize => {
            let (gb, unit) = convert(decl, raw, MEMORY_SIZE_UNITS, "GB")?;
            Ok(Normalized::value(SpecificationValue::MemorySize { gb, unit }))
        }
        ValueKind::PowerConsumption => {
            let (watts, unit) = convert(decl, raw, POWER_UNITS, "W")?;
            Ok(Normalized::value(SpecificationValue::PowerConsumption { watts, unit }))
        }
    }
}

fn parse_bool(field: &str, raw: &RawValue) -> NormalizeResult<bool> {
    match raw {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Number(n) if *n == 1.0 => Ok(true),
        RawValue::Number(n) if *n == 0.0 => Ok(false),
        other => {
            let token = other.to_string().trim().to_ascii_lowercase();
            if TRUTHY.contains(&token.as_str()) {
                Ok(true)
            } else if FALSY.contains(&token.as_str()) {
                Ok(false)
            } else {
                Err(ValidationError::invalid_format(
                    field,
                    other.to_string(),
                    "expected yes/no",
                ))
            }
        }
    }
}

fn normalize_enum(decl: &SpecificationDeclaration, raw: &RawValue) -> NormalizeResult<Normalized> {
    let text = raw.to_string().trim().to_string();
    if decl.allowed.is_empty() || decl.allowed.contains(&text) {
        Ok(Normalized::value(SpecificationValue::Enum { value: text }))
    } else {
        Err(ValidationError::not_allowed(
            &decl.name,
            text,
            decl.allowed.clone(),
        ))
    }
}

fn normalize_socket(field: &str, raw: &RawValue, context: &SpecMap) -> NormalizeResult<Normalized> {
    let text = raw.to_string();
    let socket = Socket::parse(&text)
        .ok_or_else(|| ValidationError::not_allowed(field, text.trim(), Socket::canonical_names()))?;

    let mut normalized = Normalized::value(SpecificationValue::Socket { value: socket });
    if let Some(memory) = context.memory_type("memory_type") {
        if !socket.supports_memory(memory) {
            normalized.notes.push(format!(
                "Socket {} does not support {} memory",
                socket, memory
            ));
        }
    }
    Ok(normalized)
}

fn normalize_chipset(field: &str, raw: &RawValue, context: &SpecMap) -> NormalizeResult<Normalized> {
    let text = raw.to_string();
    let chipset = Chipset::parse(&text)
        .ok_or_else(|| ValidationError::not_allowed(field, text.trim(), Chipset::canonical_names()))?;

    if let Some(socket) = context.socket("socket") {
        if !chipset.supports_socket(socket) {
            return Err(ValidationError::Incompatible {
                field: field.to_string(),
                value: chipset.to_string(),
                other_field: "socket".to_string(),
                other_value: socket.to_string(),
            });
        }
    }
    Ok(Normalized::value(SpecificationValue::Chipset { value: chipset }))
}

// =============================================================================
// Numeric Grammar
// =============================================================================

/// Splits `"<number>[ ]?<unit>?"` into magnitude and optional unit.
fn split_quantity(field: &str, raw: &RawValue) -> NormalizeResult<(f64, Option<String>)> {
    match raw {
        RawValue::Number(n) => Ok((*n, None)),
        RawValue::Bool(_) => Err(ValidationError::invalid_format(
            field,
            raw.to_string(),
            "expected a number",
        )),
        RawValue::Text(text) => {
            let text = text.trim();
            let split = text
                .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
                .unwrap_or(text.len());
            let (number, unit) = text.split_at(split);
            let magnitude: f64 = number.parse().map_err(|_| {
                ValidationError::invalid_format(field, text, "expected a number")
            })?;
            let unit = unit.trim();
            Ok((magnitude, (!unit.is_empty()).then(|| unit.to_string())))
        }
    }
}

/// Parses a quantity and converts it to the kind's canonical unit.
fn convert(
    decl: &SpecificationDeclaration,
    raw: &RawValue,
    units: &[(&str, f64)],
    canonical: &str,
) -> NormalizeResult<(f64, String)> {
    let (magnitude, unit) = split_quantity(&decl.name, raw)?;
    let (factor, display) = match unit {
        None => (1.0, canonical.to_string()),
        Some(unit) => {
            let key = unit.to_ascii_lowercase();
            let factor = units
                .iter()
                .find(|(spelling, _)| *spelling == key)
                .map(|(_, factor)| *factor)
                .ok_or_else(|| {
                    ValidationError::invalid_format(
                        &decl.name,
                        raw.to_string(),
                        format!("unknown unit '{}'", unit),
                    )
                })?;
            (factor, unit)
        }
    };
    let value = check_range(decl, round_canonical(magnitude * factor))?;
    Ok((value, display))
}

fn check_range(decl: &SpecificationDeclaration, value: f64) -> NormalizeResult<f64> {
    let min = decl.min.unwrap_or(f64::NEG_INFINITY);
    let max = decl.max.unwrap_or(f64::INFINITY);
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: decl.name.clone(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Rounds to 1e-6 so unit round-trips compare equal.
fn round_canonical(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Leading number of a free-form text (`"330 mm"` → 330), for undeclared fields.
pub fn leading_number(text: &str) -> Option<f64> {
    split_quantity("", &RawValue::Text(text.to_string()))
        .ok()
        .map(|(n, _)| n)
}

// =============================================================================
// Whole Component
// =============================================================================

/// All normalized values of one component plus what went wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentNormalization {
    pub values: SpecMap,
    pub errors: Vec<ValidationError>,
    pub notes: Vec<String>,
}

/// Context-producing kinds go first so Socket and Chipset can see their siblings.
fn context_rank(kind: ValueKind) -> u8 {
    match kind {
        ValueKind::MemoryType => 0,
        ValueKind::Socket => 1,
        ValueKind::Chipset => 2,
        _ => 3,
    }
}

/// Normalizes every declared field of a component.
///
/// Raw names are matched against declaration names and aliases. Attributes
/// no declaration claims are kept verbatim (text, number or boolean) so
/// authored rules can still reference them.
pub fn normalize_component(
    raw_specs: &[RawSpecification],
    declarations: &[SpecificationDeclaration],
) -> ComponentNormalization {
    let mut out = ComponentNormalization::default();

    let mut ordered: Vec<&SpecificationDeclaration> = declarations.iter().collect();
    ordered.sort_by_key(|d| context_rank(d.kind));

    for decl in ordered {
        let raw = raw_specs
            .iter()
            .find(|spec| decl.answers_to(&spec.name))
            .map(|spec| &spec.raw_value);

        match normalize(raw, decl, &out.values) {
            Ok(normalized) => {
                if let Some(value) = normalized.value {
                    out.values.insert(decl.name.clone(), value);
                }
                out.notes.extend(normalized.notes);
            }
            Err(err) => out.errors.push(err),
        }
    }

    for spec in raw_specs {
        if spec.raw_value.is_blank() || declarations.iter().any(|d| d.answers_to(&spec.name)) {
            continue;
        }
        let key = field_key(&spec.name);
        if out.values.contains(&key) {
            continue;
        }
        let value = match &spec.raw_value {
            RawValue::Bool(value) => SpecificationValue::Boolean { value: *value },
            RawValue::Number(value) => SpecificationValue::Number {
                value: *value,
                unit: None,
            },
            RawValue::Text(text) => SpecificationValue::Text {
                value: text.trim().to_string(),
            },
        };
        out.values.insert(key, value);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, kind: ValueKind) -> SpecificationDeclaration {
        SpecificationDeclaration::new(name, kind)
    }

    fn value_of(raw: RawValue, decl: &SpecificationDeclaration) -> SpecificationValue {
        normalize(Some(&raw), decl, &SpecMap::new())
            .unwrap()
            .value
            .unwrap()
    }

    #[test]
    fn test_frequency_units_agree() {
        let d = decl("frequency", ValueKind::Frequency);
        let ghz = value_of("3.2 GHz".into(), &d);
        let mhz = value_of("3200 MHz".into(), &d);
        let bare = value_of("3200".into(), &d);
        let numeric = value_of(3200.0.into(), &d);

        assert_eq!(ghz.as_number(), Some(3200.0));
        assert!(ghz.matches(&mhz));
        assert!(mhz.matches(&bare));
        assert!(bare.matches(&numeric));
        assert_eq!(value_of("3.2ghz".into(), &d).as_number(), Some(3200.0));
    }

    #[test]
    fn test_memory_size_units_agree() {
        let d = decl("capacity", ValueKind::MemorySize);
        let tb = value_of("1 TB".into(), &d);
        let gb = value_of("1024 GB".into(), &d);
        let mb = value_of("1048576 MB".into(), &d);
        assert_eq!(tb.as_number(), Some(1024.0));
        assert_eq!(gb.as_number(), Some(1024.0));
        assert_eq!(mb.as_number(), Some(1024.0));
        assert_eq!(value_of("512".into(), &d).as_number(), Some(512.0));
    }

    #[test]
    fn test_power_units() {
        let d = decl("wattage", ValueKind::PowerConsumption);
        assert_eq!(value_of("650 W".into(), &d).as_number(), Some(650.0));
        assert_eq!(value_of("0.65 kW".into(), &d).as_number(), Some(650.0));
        assert_eq!(value_of("650 watts".into(), &d).as_number(), Some(650.0));
        assert_eq!(value_of(650.0.into(), &d).as_number(), Some(650.0));
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let d = decl("frequency", ValueKind::Frequency);
        let err = normalize(Some(&"3 parsecs".into()), &d, &SpecMap::new()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));

        let err = normalize(Some(&"fast".into()), &d, &SpecMap::new()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_range_checked_after_conversion() {
        let d = decl("tdp", ValueKind::PowerConsumption).range(1.0, 500.0);
        let err = normalize(Some(&"0.9 kW".into()), &d, &SpecMap::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "tdp".to_string(),
                value: 900.0,
                min: 1.0,
                max: 500.0,
            }
        );
    }

    #[test]
    fn test_number_uses_declared_unit() {
        let d = decl("length", ValueKind::Number).unit("mm");
        assert_eq!(
            value_of("330".into(), &d),
            SpecificationValue::Number {
                value: 330.0,
                unit: Some("mm".to_string())
            }
        );
        assert_eq!(value_of("330 mm".into(), &d).as_number(), Some(330.0));
        assert!(normalize(Some(&"33 cm".into()), &d, &SpecMap::new()).is_err());
    }

    #[test]
    fn test_unknown_socket_lists_every_socket() {
        let d = decl("socket", ValueKind::Socket);
        let err = normalize(Some(&"Socket Z".into()), &d, &SpecMap::new()).unwrap_err();
        assert_eq!(err.suggestions(), Socket::canonical_names().as_slice());
        assert_eq!(err.field(), "socket");
    }

    #[test]
    fn test_socket_aliases_normalize() {
        let d = decl("socket", ValueKind::Socket);
        assert_eq!(
            value_of("Socket 1700".into(), &d),
            SpecificationValue::Socket {
                value: Socket::Lga1700
            }
        );
    }

    #[test]
    fn test_socket_memory_context_warns() {
        let d = decl("socket", ValueKind::Socket);
        let mut context = SpecMap::new();
        context.insert(
            "memory_type",
            SpecificationValue::MemoryType {
                value: MemoryType::Ddr4,
            },
        );
        let normalized = normalize(Some(&"AM5".into()), &d, &context).unwrap();
        assert!(normalized.value.is_some());
        assert_eq!(normalized.notes.len(), 1);
    }

    #[test]
    fn test_chipset_socket_context_errors() {
        let d = decl("chipset", ValueKind::Chipset);
        let mut context = SpecMap::new();
        context.insert("socket", SpecificationValue::Socket { value: Socket::Am4 });
        let err = normalize(Some(&"B650".into()), &d, &context).unwrap_err();
        assert!(matches!(err, ValidationError::Incompatible { .. }));

        context.insert("socket", SpecificationValue::Socket { value: Socket::Am5 });
        assert!(normalize(Some(&"B650".into()), &d, &context).is_ok());
    }

    #[test]
    fn test_boolean_tokens() {
        let d = decl("modular", ValueKind::Boolean);
        for token in ["yes", "Y", "on", "+", "1", "TRUE"] {
            assert_eq!(value_of(token.into(), &d).as_bool(), Some(true), "{}", token);
        }
        for token in ["no", "n", "off", "-", "0", "false"] {
            assert_eq!(value_of(token.into(), &d).as_bool(), Some(false), "{}", token);
        }
        assert_eq!(value_of(true.into(), &d).as_bool(), Some(true));
        assert!(normalize(Some(&"maybe".into()), &d, &SpecMap::new()).is_err());
    }

    #[test]
    fn test_enum_exact_membership() {
        let d = decl("form_factor", ValueKind::Enum).domain(&["ATX", "Micro-ATX"]);
        assert_eq!(value_of(" ATX ".into(), &d).as_text(), Some("ATX"));
        let err = normalize(Some(&"atx".into()), &d, &SpecMap::new()).unwrap_err();
        assert_eq!(err.suggestions(), ["ATX".to_string(), "Micro-ATX".to_string()]);
    }

    #[test]
    fn test_missing_values() {
        let required = decl("socket", ValueKind::Socket).required();
        assert_eq!(
            normalize(None, &required, &SpecMap::new()).unwrap_err(),
            ValidationError::Required {
                field: "socket".to_string()
            }
        );
        assert!(normalize(Some(&"  ".into()), &required, &SpecMap::new()).is_err());

        let optional = decl("chipset", ValueKind::Chipset);
        assert_eq!(
            normalize(None, &optional, &SpecMap::new()).unwrap(),
            Normalized::default()
        );
    }

    #[test]
    fn test_component_resolves_aliases_and_orders_context() {
        let decls = vec![
            decl("chipset", ValueKind::Chipset),
            decl("socket", ValueKind::Socket).required().aliases(&["connector_type"]),
            decl("memory_type", ValueKind::MemoryType),
        ];
        let raw = vec![
            RawSpecification::new("Chipset", "B650"),
            RawSpecification::new("connector_type", "AM4"),
            RawSpecification::new("memory_type", "DDR5"),
            RawSpecification::new("RGB Lighting", "yes"),
        ];

        let result = normalize_component(&raw, &decls);
        assert_eq!(result.values.socket("socket"), Some(Socket::Am4));
        assert_eq!(result.values.memory_type("memory_type"), Some(MemoryType::Ddr5));
        // B650 on AM4 is rejected because socket was normalized first
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field(), "chipset");
        // AM4 with DDR5 is only advisory
        assert_eq!(result.notes.len(), 1);
        assert_eq!(result.values.text("rgb_lighting"), Some("yes"));
    }

    #[test]
    fn test_component_reports_missing_required() {
        let decls = vec![decl("wattage", ValueKind::PowerConsumption).required()];
        let result = normalize_component(&[], &decls);
        assert!(result.values.is_empty());
        assert_eq!(result.errors[0].field(), "wattage");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("330 mm"), Some(330.0));
        assert_eq!(leading_number("n/a"), None);
    }
}
