//! # Capability Tags
//!
//! Components are identified by *what they do* rather than by the name of
//! the catalog category they live in.
//!
//! ## Tag Indirection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  category "processors"      ──┐                                         │
//! │  category "cpu-amd"         ──┼──► {provides_compute, requires_socket,  │
//! │  category "desktop-chips"   ──┘     generates_heat, consumes_power}     │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                    ComponentRole::Cpu                   │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                              rules written once against the role        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`profile`] - declarations and profiles
//! - [`registry`] - the explicitly constructed profile registry
//! - [`builtin`] - the shipped profile table

pub mod builtin;
pub mod profile;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub use profile::{ComponentProfile, FilterHint, SpecificationDeclaration};
pub use registry::{ProfileMatch, TagRegistry};

// =============================================================================
// Capability Tag
// =============================================================================

/// A function a component performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTag {
    ConsumesPower,
    ProvidesPower,
    RequiresSocket,
    ProvidesSocket,
    GeneratesHeat,
    ProvidesCooling,
    RequiresSlot,
    ProvidesSlots,
    ProvidesCompute,
    ProvidesGraphics,
    ProvidesMemory,
    ProvidesStorage,
    HousesComponents,
}

/// Ordered tag set attached to one role.
pub type TagSet = BTreeSet<CapabilityTag>;

impl CapabilityTag {
    pub const ALL: [CapabilityTag; 13] = [
        CapabilityTag::ConsumesPower,
        CapabilityTag::ProvidesPower,
        CapabilityTag::RequiresSocket,
        CapabilityTag::ProvidesSocket,
        CapabilityTag::GeneratesHeat,
        CapabilityTag::ProvidesCooling,
        CapabilityTag::RequiresSlot,
        CapabilityTag::ProvidesSlots,
        CapabilityTag::ProvidesCompute,
        CapabilityTag::ProvidesGraphics,
        CapabilityTag::ProvidesMemory,
        CapabilityTag::ProvidesStorage,
        CapabilityTag::HousesComponents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityTag::ConsumesPower => "consumes_power",
            CapabilityTag::ProvidesPower => "provides_power",
            CapabilityTag::RequiresSocket => "requires_socket",
            CapabilityTag::ProvidesSocket => "provides_socket",
            CapabilityTag::GeneratesHeat => "generates_heat",
            CapabilityTag::ProvidesCooling => "provides_cooling",
            CapabilityTag::RequiresSlot => "requires_slot",
            CapabilityTag::ProvidesSlots => "provides_slots",
            CapabilityTag::ProvidesCompute => "provides_compute",
            CapabilityTag::ProvidesGraphics => "provides_graphics",
            CapabilityTag::ProvidesMemory => "provides_memory",
            CapabilityTag::ProvidesStorage => "provides_storage",
            CapabilityTag::HousesComponents => "houses_components",
        }
    }

    /// Parses the stored snake_case name (hyphens and case are tolerated).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|tag| tag.as_str() == normalized)
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Component Role
// =============================================================================

/// The part a component plays in a build, as far as the rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    Cpu,
    Motherboard,
    Gpu,
    Memory,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl ComponentRole {
    /// Derives the role from a tag set. Order matters: a motherboard also
    /// consumes power, a GPU also generates heat.
    pub fn from_tags(tags: &TagSet) -> Option<Self> {
        use CapabilityTag::*;
        let has = |tag: CapabilityTag| tags.contains(&tag);

        if has(ProvidesSocket) && has(ProvidesSlots) {
            Some(ComponentRole::Motherboard)
        } else if has(ProvidesCompute) && has(RequiresSocket) {
            Some(ComponentRole::Cpu)
        } else if has(ProvidesGraphics) {
            Some(ComponentRole::Gpu)
        } else if has(ProvidesCooling) {
            Some(ComponentRole::Cooler)
        } else if has(ProvidesMemory) {
            Some(ComponentRole::Memory)
        } else if has(ProvidesStorage) {
            Some(ComponentRole::Storage)
        } else if has(ProvidesPower) {
            Some(ComponentRole::Psu)
        } else if has(HousesComponents) {
            Some(ComponentRole::Case)
        } else {
            None
        }
    }

    /// Fixed slot names understood when no tags resolve at all.
    pub fn from_legacy_slug(slug: &str) -> Option<Self> {
        match slug {
            "processor" => Some(ComponentRole::Cpu),
            "motherboard" => Some(ComponentRole::Motherboard),
            "memory" => Some(ComponentRole::Memory),
            "graphics" => Some(ComponentRole::Gpu),
            "power-supply" => Some(ComponentRole::Psu),
            "case" => Some(ComponentRole::Case),
            _ => None,
        }
    }

    /// Id of the builtin profile describing this role.
    pub fn profile_id(&self) -> &'static str {
        match self {
            ComponentRole::Cpu => "cpu",
            ComponentRole::Motherboard => "motherboard",
            ComponentRole::Gpu => "gpu",
            ComponentRole::Memory => "ram",
            ComponentRole::Storage => "storage",
            ComponentRole::Psu => "psu",
            ComponentRole::Case => "case",
            ComponentRole::Cooler => "cooler",
        }
    }

    /// Human label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentRole::Cpu => "CPU",
            ComponentRole::Motherboard => "motherboard",
            ComponentRole::Gpu => "graphics card",
            ComponentRole::Memory => "memory",
            ComponentRole::Storage => "storage",
            ComponentRole::Psu => "power supply",
            ComponentRole::Case => "case",
            ComponentRole::Cooler => "CPU cooler",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
