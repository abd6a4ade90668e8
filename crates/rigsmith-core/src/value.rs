//! # Specification Values
//!
//! The typed value model every consumer works on. Raw attribute input is
//! turned into a [`SpecificationValue`] exactly once (see
//! [`crate::normalize`]); after that nobody re-parses strings.
//!
//! ## Canonical Units
//! ```text
//! ┌──────────────────┬───────────────┬──────────────────────────────────────┐
//! │ Kind             │ Canonical     │ Accepted input                       │
//! ├──────────────────┼───────────────┼──────────────────────────────────────┤
//! │ Frequency        │ MHz           │ "3.2 GHz", "3200 MHz", "3200"        │
//! │ MemorySize       │ GB            │ "1 TB", "1024 GB", "1048576 MB"      │
//! │ PowerConsumption │ W             │ "650 W", "0.65 kW", "650"            │
//! │ Number           │ as declared   │ "330 mm", "330"                      │
//! └──────────────────┴───────────────┴──────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::hardware::{Chipset, MemoryType, Socket};

// =============================================================================
// Value Kind
// =============================================================================

/// The declared data-kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    Enum,
    Socket,
    MemoryType,
    Chipset,
    Frequency,
    MemorySize,
    PowerConsumption,
}

impl ValueKind {
    /// Kinds whose canonical form is a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueKind::Number
                | ValueKind::Frequency
                | ValueKind::MemorySize
                | ValueKind::PowerConsumption
        )
    }
}

// =============================================================================
// Raw Value
// =============================================================================

/// A raw attribute value as entered by a catalog author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// `true` for empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

// =============================================================================
// Specification Value
// =============================================================================

/// A fully normalized attribute value.
///
/// Numeric kinds hold their canonical magnitude plus the unit string the
/// author originally used (kept for display only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecificationValue {
    Text { value: String },
    Number { value: f64, unit: Option<String> },
    Boolean { value: bool },
    Enum { value: String },
    Socket { value: Socket },
    MemoryType { value: MemoryType },
    Chipset { value: Chipset },
    Frequency { mhz: f64, unit: String },
    MemorySize { gb: f64, unit: String },
    PowerConsumption { watts: f64, unit: String },
}

impl SpecificationValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SpecificationValue::Text { .. } => ValueKind::Text,
            SpecificationValue::Number { .. } => ValueKind::Number,
            SpecificationValue::Boolean { .. } => ValueKind::Boolean,
            SpecificationValue::Enum { .. } => ValueKind::Enum,
            SpecificationValue::Socket { .. } => ValueKind::Socket,
            SpecificationValue::MemoryType { .. } => ValueKind::MemoryType,
            SpecificationValue::Chipset { .. } => ValueKind::Chipset,
            SpecificationValue::Frequency { .. } => ValueKind::Frequency,
            SpecificationValue::MemorySize { .. } => ValueKind::MemorySize,
            SpecificationValue::PowerConsumption { .. } => ValueKind::PowerConsumption,
        }
    }

    /// Canonical magnitude of numeric kinds.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SpecificationValue::Number { value, .. } => Some(*value),
            SpecificationValue::Frequency { mhz, .. } => Some(*mhz),
            SpecificationValue::MemorySize { gb, .. } => Some(*gb),
            SpecificationValue::PowerConsumption { watts, .. } => Some(*watts),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpecificationValue::Boolean { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_socket(&self) -> Option<Socket> {
        match self {
            SpecificationValue::Socket { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_memory_type(&self) -> Option<MemoryType> {
        match self {
            SpecificationValue::MemoryType { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_chipset(&self) -> Option<Chipset> {
        match self {
            SpecificationValue::Chipset { value } => Some(*value),
            _ => None,
        }
    }

    /// Text and enum payloads.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SpecificationValue::Text { value } | SpecificationValue::Enum { value } => Some(value),
            _ => None,
        }
    }

    /// Compares two values the way an exact-match rule does: numeric kinds
    /// by canonical magnitude, textual kinds case-insensitively, the rest by
    /// identity.
    pub fn matches(&self, other: &SpecificationValue) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return (a - b).abs() < 1e-6;
        }
        if let (Some(a), Some(b)) = (self.as_text(), other.as_text()) {
            return a.trim().eq_ignore_ascii_case(b.trim());
        }
        self == other
    }
}

impl fmt::Display for SpecificationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecificationValue::Text { value } | SpecificationValue::Enum { value } => {
                f.write_str(value)
            }
            SpecificationValue::Number { value, unit } => match unit {
                Some(unit) => write!(f, "{} {}", value, unit),
                None => write!(f, "{}", value),
            },
            SpecificationValue::Boolean { value } => write!(f, "{}", if *value { "yes" } else { "no" }),
            SpecificationValue::Socket { value } => write!(f, "{}", value),
            SpecificationValue::MemoryType { value } => write!(f, "{}", value),
            SpecificationValue::Chipset { value } => write!(f, "{}", value),
            SpecificationValue::Frequency { mhz, .. } => write!(f, "{} MHz", mhz),
            SpecificationValue::MemorySize { gb, .. } => write!(f, "{} GB", gb),
            SpecificationValue::PowerConsumption { watts, .. } => write!(f, "{} W", watts),
        }
    }
}

// =============================================================================
// Specification Map
// =============================================================================

/// Normalized values of one component, keyed by declared field name.
///
/// Absent fields are simply missing; there is no sentinel value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecMap(BTreeMap<String, SpecificationValue>);

impl SpecMap {
    pub fn new() -> Self {
        SpecMap::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: SpecificationValue) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&SpecificationValue> {
        self.0.get(field)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(SpecificationValue::as_number)
    }

    pub fn socket(&self, field: &str) -> Option<Socket> {
        self.get(field).and_then(SpecificationValue::as_socket)
    }

    pub fn memory_type(&self, field: &str) -> Option<MemoryType> {
        self.get(field).and_then(SpecificationValue::as_memory_type)
    }

    pub fn chipset(&self, field: &str) -> Option<Chipset> {
        self.get(field).and_then(SpecificationValue::as_chipset)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(SpecificationValue::as_text)
    }

    /// Comma/semicolon/slash separated list stored in a text field.
    pub fn list(&self, field: &str) -> Option<Vec<String>> {
        self.text(field).map(|text| {
            text.split([',', ';', '/'])
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecificationValue)> {
        self.0.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accessors() {
        let freq = SpecificationValue::Frequency {
            mhz: 3200.0,
            unit: "GHz".to_string(),
        };
        assert_eq!(freq.as_number(), Some(3200.0));
        assert_eq!(freq.kind(), ValueKind::Frequency);
        assert_eq!(freq.to_string(), "3200 MHz");
        assert!(freq.as_socket().is_none());
    }

    #[test]
    fn test_matches_by_canonical_magnitude() {
        let a = SpecificationValue::Frequency {
            mhz: 3200.0,
            unit: "GHz".to_string(),
        };
        let b = SpecificationValue::Frequency {
            mhz: 3200.0,
            unit: "MHz".to_string(),
        };
        assert!(a.matches(&b));

        let x = SpecificationValue::Enum {
            value: "ATX".to_string(),
        };
        let y = SpecificationValue::Text {
            value: " atx ".to_string(),
        };
        assert!(x.matches(&y));
    }

    #[test]
    fn test_raw_value_deserializes_untagged() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[true, 3.5, "AM5"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Bool(true),
                RawValue::Number(3.5),
                RawValue::Text("AM5".to_string())
            ]
        );
        assert!(RawValue::from("  ").is_blank());
    }

    #[test]
    fn test_spec_map_list() {
        let mut specs = SpecMap::new();
        specs.insert(
            "supported_sockets",
            SpecificationValue::Text {
                value: "AM4, AM5; LGA1700".to_string(),
            },
        );
        assert_eq!(
            specs.list("supported_sockets").unwrap(),
            vec!["AM4", "AM5", "LGA1700"]
        );
        assert!(specs.list("missing").is_none());
    }
}
