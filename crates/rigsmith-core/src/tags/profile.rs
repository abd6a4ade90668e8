//! Specification declarations and component profiles.

use serde::{Deserialize, Serialize};

use super::{CapabilityTag, TagSet};
use crate::value::ValueKind;

/// UI filter widget suggestion. The engine never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterHint {
    Range,
    Select,
    Checkbox,
    Search,
}

/// Contract for one named attribute of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationDeclaration {
    pub name: String,
    /// Alternative attribute names catalog authors use for the same field.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub kind: ValueKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    /// Enum domain (only meaningful for `ValueKind::Enum`).
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Unit assumed when the raw value carries none (`Number` kind).
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub compatibility_key: bool,
    #[serde(default)]
    pub filter_hint: Option<FilterHint>,
}

impl SpecificationDeclaration {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        SpecificationDeclaration {
            name: name.into(),
            aliases: Vec::new(),
            kind,
            required: false,
            min: None,
            max: None,
            allowed: Vec::new(),
            unit: None,
            compatibility_key: false,
            filter_hint: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn compat_key(mut self) -> Self {
        self.compatibility_key = true;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    pub fn domain(mut self, allowed: &[&str]) -> Self {
        self.allowed = allowed.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn filter(mut self, hint: FilterHint) -> Self {
        self.filter_hint = Some(hint);
        self
    }

    /// Whether a raw attribute name refers to this declaration.
    ///
    /// Comparison ignores case and treats spaces, hyphens and underscores alike.
    pub fn answers_to(&self, raw_name: &str) -> bool {
        let wanted = field_key(raw_name);
        field_key(&self.name) == wanted || self.aliases.iter().any(|a| field_key(a) == wanted)
    }
}

/// Canonical spelling of an attribute name.
pub(crate) fn field_key(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Specification contract, tags and detection heuristics of one component kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProfile {
    pub id: String,
    pub name: String,
    pub tags: TagSet,
    #[serde(default)]
    pub declarations: Vec<SpecificationDeclaration>,
    /// Regular expressions matched against the category name.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Lower-case keywords looked up in name and description.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Any match rejects the profile outright.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub priority: i32,
}

impl ComponentProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ComponentProfile {
            id: id.into(),
            name: name.into(),
            tags: TagSet::new(),
            declarations: Vec::new(),
            patterns: Vec::new(),
            keywords: Vec::new(),
            exclude_patterns: Vec::new(),
            priority: 0,
        }
    }

    pub fn tags(mut self, tags: &[CapabilityTag]) -> Self {
        self.tags.extend(tags.iter().copied());
        self
    }

    pub fn declare(mut self, declaration: SpecificationDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn patterns(mut self, patterns: &[&str]) -> Self {
        self.patterns.extend(patterns.iter().map(|p| p.to_string()));
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords.extend(keywords.iter().map(|k| k.to_string()));
        self
    }

    pub fn excludes(mut self, patterns: &[&str]) -> Self {
        self.exclude_patterns.extend(patterns.iter().map(|p| p.to_string()));
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn required_declarations(&self) -> impl Iterator<Item = &SpecificationDeclaration> {
        self.declarations.iter().filter(|d| d.required)
    }

    pub fn optional_declarations(&self) -> impl Iterator<Item = &SpecificationDeclaration> {
        self.declarations.iter().filter(|d| !d.required)
    }

    /// Looks a declaration up by name or alias.
    pub fn declaration(&self, raw_name: &str) -> Option<&SpecificationDeclaration> {
        self.declarations.iter().find(|d| d.answers_to(raw_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_aliases() {
        let decl = SpecificationDeclaration::new("socket", ValueKind::Socket)
            .aliases(&["connector_type", "CPU Socket"]);
        assert!(decl.answers_to("socket"));
        assert!(decl.answers_to("Socket"));
        assert!(decl.answers_to("connector-type"));
        assert!(decl.answers_to("cpu_socket"));
        assert!(!decl.answers_to("chipset"));
    }

    #[test]
    fn test_required_and_optional_split() {
        let profile = ComponentProfile::new("psu", "Power Supply")
            .declare(SpecificationDeclaration::new("wattage", ValueKind::PowerConsumption).required())
            .declare(SpecificationDeclaration::new("modular", ValueKind::Boolean));
        assert_eq!(profile.required_declarations().count(), 1);
        assert_eq!(profile.optional_declarations().count(), 1);
        assert_eq!(profile.declaration("Wattage").unwrap().name, "wattage");
    }

    #[test]
    fn test_profile_deserializes_from_toml_shape() {
        let json = r#"{
            "id": "fan",
            "name": "Case Fan",
            "tags": ["consumes_power", "provides_cooling"],
            "declarations": [{ "name": "size", "kind": "number", "unit": "mm" }],
            "patterns": ["(?i)fan"]
        }"#;
        let profile: ComponentProfile = serde_json::from_str(json).unwrap();
        assert!(profile.tags.contains(&CapabilityTag::ProvidesCooling));
        assert_eq!(profile.declarations[0].unit.as_deref(), Some("mm"));
        assert_eq!(profile.priority, 0);
    }
}
