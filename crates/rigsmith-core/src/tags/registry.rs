//! # Tag Registry
//!
//! Holds the component profiles with their detection patterns compiled.
//! Built explicitly and passed around by reference; there is no global.
//!
//! ## Detection Scoring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  category name ──► exclude pattern hit? ──yes──► profile rejected       │
//! │                            │ no                                         │
//! │                            ▼                                            │
//! │        +10 per matching name pattern                                    │
//! │        +3  per keyword found in name or description                     │
//! │                            │                                            │
//! │                            ▼                                            │
//! │        confidence = min(1, score / 20)                                  │
//! │                                                                         │
//! │  Order: score ↓, priority ↓, keyword count ↓, keyword length ↓, id ↑   │
//! │  (priority only separates equal raw scores)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

use super::profile::{field_key, ComponentProfile, SpecificationDeclaration};
use super::{builtin, ComponentRole, TagSet};
use crate::error::{CoreError, CoreResult};

const PATTERN_SCORE: u32 = 10;
const KEYWORD_SCORE: u32 = 3;
const FULL_CONFIDENCE_SCORE: f64 = 20.0;

/// One candidate profile for a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMatch {
    pub profile_id: String,
    /// Raw detection score; ranking uses this, not the capped confidence.
    pub score: u32,
    pub confidence: f64,
    pub priority: i32,
    pub matched_patterns: Vec<String>,
    pub matched_keywords: Vec<String>,
}

impl ProfileMatch {
    fn keyword_length(&self) -> usize {
        self.matched_keywords.iter().map(String::len).sum()
    }

    fn ranking(&self, other: &ProfileMatch) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| other.matched_keywords.len().cmp(&self.matched_keywords.len()))
            .then_with(|| other.keyword_length().cmp(&self.keyword_length()))
            .then_with(|| self.profile_id.cmp(&other.profile_id))
    }
}

#[derive(Debug)]
struct CompiledProfile {
    profile: ComponentProfile,
    patterns: Vec<Regex>,
    excludes: Vec<Regex>,
}

/// Read-only table of component profiles.
#[derive(Debug, Default)]
pub struct TagRegistry {
    profiles: Vec<CompiledProfile>,
}

impl TagRegistry {
    /// Registry over the shipped profiles.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_profiles(builtin::profiles())
    }

    /// Registry over a caller-supplied profile set.
    ///
    /// ## Errors
    /// - `CoreError::DuplicateProfile` when two profiles share an id
    /// - `CoreError::DuplicateDeclaration` when a profile declares a field twice
    /// - `CoreError::InvalidPattern` when a pattern does not compile
    pub fn from_profiles(profiles: Vec<ComponentProfile>) -> CoreResult<Self> {
        let mut ids = BTreeSet::new();
        let mut compiled = Vec::with_capacity(profiles.len());

        for profile in profiles {
            if !ids.insert(profile.id.clone()) {
                return Err(CoreError::DuplicateProfile(profile.id));
            }

            let mut fields = BTreeSet::new();
            for decl in &profile.declarations {
                if !fields.insert(field_key(&decl.name)) {
                    return Err(CoreError::DuplicateDeclaration {
                        profile: profile.id.clone(),
                        field: decl.name.clone(),
                    });
                }
            }

            let patterns = compile_all(&profile.id, &profile.patterns)?;
            let excludes = compile_all(&profile.id, &profile.exclude_patterns)?;
            compiled.push(CompiledProfile {
                profile,
                patterns,
                excludes,
            });
        }

        debug!(profiles = compiled.len(), "Tag registry built");
        Ok(TagRegistry { profiles: compiled })
    }

    /// Ranks every profile against a category.
    ///
    /// Returns an empty list when nothing matches.
    pub fn detect_profiles(&self, category_name: &str, description: &str) -> Vec<ProfileMatch> {
        let name = category_name.replace(['-', '_'], " ");
        let haystack = format!("{} {}", name, description).to_lowercase();

        let mut matches: Vec<ProfileMatch> = self
            .profiles
            .iter()
            .filter_map(|compiled| {
                if compiled.excludes.iter().any(|re| re.is_match(&name)) {
                    debug!(category = category_name, profile = %compiled.profile.id, "Profile excluded");
                    return None;
                }

                let matched_patterns: Vec<String> = compiled
                    .patterns
                    .iter()
                    .filter(|re| re.is_match(&name))
                    .map(|re| re.as_str().to_string())
                    .collect();
                let matched_keywords: Vec<String> = compiled
                    .profile
                    .keywords
                    .iter()
                    .filter(|kw| haystack.contains(&kw.to_lowercase()))
                    .cloned()
                    .collect();

                let score = PATTERN_SCORE * matched_patterns.len() as u32
                    + KEYWORD_SCORE * matched_keywords.len() as u32;
                if score == 0 {
                    return None;
                }

                Some(ProfileMatch {
                    profile_id: compiled.profile.id.clone(),
                    score,
                    confidence: (f64::from(score) / FULL_CONFIDENCE_SCORE).min(1.0),
                    priority: compiled.profile.priority,
                    matched_patterns,
                    matched_keywords,
                })
            })
            .collect();

        matches.sort_by(ProfileMatch::ranking);
        matches
    }

    /// Best profile for a category, if it clears `min_confidence`.
    pub fn resolve(
        &self,
        category_name: &str,
        description: &str,
        min_confidence: f64,
    ) -> Option<&ComponentProfile> {
        let best = self.detect_profiles(category_name, description).into_iter().next()?;
        if best.confidence < min_confidence {
            debug!(
                category = category_name,
                profile = %best.profile_id,
                confidence = best.confidence,
                "Best profile below confidence threshold"
            );
            return None;
        }
        self.profile(&best.profile_id)
    }

    pub fn profile(&self, profile_id: &str) -> Option<&ComponentProfile> {
        self.profiles
            .iter()
            .map(|c| &c.profile)
            .find(|p| p.id == profile_id)
    }

    /// Profile describing an engine role.
    ///
    /// Prefers the conventional id, then the first profile whose tags
    /// resolve to the role, so custom profile sets may name ids freely.
    pub fn profile_for_role(&self, role: ComponentRole) -> Option<&ComponentProfile> {
        self.profile(role.profile_id())
            .filter(|p| ComponentRole::from_tags(&p.tags) == Some(role))
            .or_else(|| {
                self.profiles()
                    .find(|p| ComponentRole::from_tags(&p.tags) == Some(role))
            })
    }

    /// `(required, optional)` declarations of a profile; both empty when unknown.
    pub fn declarations(
        &self,
        profile_id: &str,
    ) -> (Vec<&SpecificationDeclaration>, Vec<&SpecificationDeclaration>) {
        match self.profile(profile_id) {
            Some(profile) => (
                profile.required_declarations().collect(),
                profile.optional_declarations().collect(),
            ),
            None => (Vec::new(), Vec::new()),
        }
    }

    /// Capability tags of a profile; empty when unknown.
    pub fn tags(&self, profile_id: &str) -> TagSet {
        self.profile(profile_id)
            .map(|p| p.tags.clone())
            .unwrap_or_default()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ComponentProfile> {
        self.profiles.iter().map(|c| &c.profile)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn compile_all(profile: &str, patterns: &[String]) -> CoreResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| CoreError::InvalidPattern {
                profile: profile.to_string(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::CapabilityTag;
    use crate::value::ValueKind;

    fn registry() -> TagRegistry {
        TagRegistry::builtin().unwrap()
    }

    #[test]
    fn test_builtin_registry_builds() {
        let registry = registry();
        assert_eq!(registry.len(), 8);
        for role in [
            ComponentRole::Cpu,
            ComponentRole::Gpu,
            ComponentRole::Motherboard,
            ComponentRole::Memory,
            ComponentRole::Storage,
            ComponentRole::Psu,
            ComponentRole::Case,
            ComponentRole::Cooler,
        ] {
            let profile = registry.profile_for_role(role).unwrap();
            assert_eq!(ComponentRole::from_tags(&profile.tags), Some(role));
        }
    }

    #[test]
    fn test_detects_processor_category() {
        let matches = registry().detect_profiles("processors", "Desktop CPUs from AMD and Intel");
        let best = &matches[0];
        assert_eq!(best.profile_id, "cpu");
        // one pattern (10) + "cpu" and "processor" keywords (6)
        assert!((best.confidence - 0.8).abs() < 1e-9);
        assert!(best.matched_keywords.contains(&"cpu".to_string()));

        let matches = registry().detect_profiles("cpu", "AMD Ryzen processors");
        assert_eq!(matches[0].confidence, 1.0);
    }

    #[test]
    fn test_exclude_pattern_rejects_profile() {
        let matches = registry().detect_profiles("cpu-coolers", "");
        assert_eq!(matches[0].profile_id, "cooler");
        assert!(matches.iter().all(|m| m.profile_id != "cpu"));
    }

    #[test]
    fn test_unknown_category_yields_nothing() {
        assert!(registry().detect_profiles("gift-cards", "").is_empty());
        assert!(registry().resolve("gift-cards", "", 0.1).is_none());
    }

    #[test]
    fn test_keyword_only_match_has_partial_confidence() {
        let matches = registry().detect_profiles("parts", "a fast nvme drive");
        assert_eq!(matches[0].profile_id, "storage");
        assert!(matches[0].matched_patterns.is_empty());
        assert!((matches[0].confidence - 0.3).abs() < 1e-9);
        assert!(registry().resolve("parts", "a fast nvme drive", 0.5).is_none());
    }

    #[test]
    fn test_ties_break_by_priority_then_id() {
        let a = ComponentProfile::new("b-profile", "B").patterns(&["(?i)widget"]);
        let b = ComponentProfile::new("a-profile", "A").patterns(&["(?i)widget"]);
        let c = ComponentProfile::new("c-profile", "C")
            .patterns(&["(?i)widget"])
            .priority(5);
        let registry = TagRegistry::from_profiles(vec![a, b, c]).unwrap();

        let ids: Vec<_> = registry
            .detect_profiles("widgets", "")
            .into_iter()
            .map(|m| m.profile_id)
            .collect();
        assert_eq!(ids, vec!["c-profile", "a-profile", "b-profile"]);
    }

    #[test]
    fn test_higher_score_beats_priority() {
        let focused = ComponentProfile::new("focused", "Focused")
            .patterns(&["(?i)widget", "(?i)gadget", "(?i)gizmo"]);
        let favoured = ComponentProfile::new("favoured", "Favoured")
            .patterns(&["(?i)widget", "(?i)gadget"])
            .priority(50);
        let registry = TagRegistry::from_profiles(vec![favoured, focused]).unwrap();

        let matches = registry.detect_profiles("widget gadget gizmo", "");
        assert_eq!(matches[0].profile_id, "focused");
        assert_eq!(matches[0].score, 30);
        assert_eq!(matches[1].score, 20);
        // both report full confidence
        assert_eq!(matches[0].confidence, 1.0);
        assert_eq!(matches[1].confidence, 1.0);
    }

    #[test]
    fn test_role_lookup_with_custom_ids() {
        let chip = ComponentProfile::new("desktop-chip", "Desktop chip")
            .tags(&[CapabilityTag::RequiresSocket, CapabilityTag::ProvidesCompute]);
        let board = ComponentProfile::new("mainboard", "Mainboard")
            .tags(&[CapabilityTag::ProvidesSocket, CapabilityTag::ProvidesSlots]);
        let registry = TagRegistry::from_profiles(vec![chip, board]).unwrap();

        assert_eq!(registry.profile_for_role(ComponentRole::Cpu).unwrap().id, "desktop-chip");
        assert_eq!(registry.profile_for_role(ComponentRole::Motherboard).unwrap().id, "mainboard");
        assert!(registry.profile_for_role(ComponentRole::Gpu).is_none());
    }

    #[test]
    fn test_declarations_split() {
        let registry = registry();
        let (required, optional) = registry.declarations("psu");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].name, "wattage");
        assert!(optional.iter().any(|d| d.name == "efficiency"));

        let (required, optional) = registry.declarations("nope");
        assert!(required.is_empty() && optional.is_empty());
        assert!(registry.tags("nope").is_empty());
        assert!(registry.tags("psu").contains(&CapabilityTag::ProvidesPower));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let bad = ComponentProfile::new("bad", "Bad").patterns(&["(unclosed"]);
        let err = TagRegistry::from_profiles(vec![bad]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern { ref profile, .. } if profile == "bad"));
    }

    #[test]
    fn test_duplicate_ids_and_fields_rejected() {
        let one = ComponentProfile::new("x", "X");
        let two = ComponentProfile::new("x", "X again");
        assert!(matches!(
            TagRegistry::from_profiles(vec![one, two]),
            Err(CoreError::DuplicateProfile(_))
        ));

        let dup = ComponentProfile::new("y", "Y")
            .declare(SpecificationDeclaration::new("Socket", ValueKind::Socket))
            .declare(SpecificationDeclaration::new("socket", ValueKind::Socket));
        assert!(matches!(
            TagRegistry::from_profiles(vec![dup]),
            Err(CoreError::DuplicateDeclaration { .. })
        ));
    }
}
