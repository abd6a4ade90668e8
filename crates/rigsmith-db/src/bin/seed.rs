//! # Catalog Seed Generator
//!
//! Populates a SQLite catalog with category tags, authored rules and
//! specifications for a handful of sample components.
//!
//! ## Usage
//! ```bash
//! cargo run -p rigsmith-db --bin seed
//! cargo run -p rigsmith-db --bin seed -- --db ./data/catalog.db
//! ```

use rigsmith_core::compat::{Bound, ComparisonMode, DerivedTable, RuleSeverity, RuleTarget};
use rigsmith_core::{CapabilityTag, CompatibilityRule, RawSpecification};
use rigsmith_db::{Database, DbConfig};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rigsmith_core::tags::CapabilityTag::*;

/// Category slug → capability tags.
const CATEGORIES: &[(&str, &[CapabilityTag])] = &[
    ("processors", &[ProvidesCompute, RequiresSocket, ConsumesPower, GeneratesHeat]),
    ("motherboards", &[ProvidesSocket, ProvidesSlots, ConsumesPower]),
    ("graphics-cards", &[ProvidesGraphics, RequiresSlot, ConsumesPower, GeneratesHeat]),
    ("memory", &[ProvidesMemory, RequiresSlot, ConsumesPower]),
    ("storage", &[ProvidesStorage, RequiresSlot, ConsumesPower]),
    ("power-supplies", &[ProvidesPower]),
    ("cases", &[HousesComponents]),
    ("cpu-coolers", &[ProvidesCooling, RequiresSocket, ConsumesPower]),
];

/// Sample components: id → specifications.
const COMPONENTS: &[(&str, &[(&str, &str)])] = &[
    (
        "cpu-ryzen-7-7800x3d",
        &[("Socket", "AM5"), ("TDP", "120W"), ("Cores", "8"), ("Memory Type", "DDR5")],
    ),
    (
        "cpu-core-i5-13600k",
        &[("Socket", "LGA1700"), ("TDP", "125W"), ("Generation", "13")],
    ),
    (
        "mb-b650-tomahawk",
        &[
            ("Socket", "AM5"),
            ("Chipset", "B650"),
            ("Form Factor", "ATX"),
            ("Memory Type", "DDR5"),
            ("Memory Slots", "4"),
            ("Max Memory", "192 GB"),
            ("M.2 Slots", "3"),
        ],
    ),
    (
        "gpu-rtx-4070",
        &[("Power Consumption", "200W"), ("Recommended PSU Power", "650W"), ("Length", "300mm")],
    ),
    (
        "ram-ddr5-6000-32",
        &[("Type", "DDR5"), ("Capacity", "32 GB"), ("Modules", "2"), ("Frequency", "6000 MHz")],
    ),
    ("ssd-nvme-2tb", &[("Interface", "NVMe"), ("Capacity", "2 TB")]),
    (
        "psu-750-gold",
        &[("Wattage", "750W"), ("Efficiency", "80+ Gold"), ("PCIe Connectors", "3")],
    ),
    (
        "case-mid-tower",
        &[("Form Factor", "ATX"), ("Max GPU Length", "360mm"), ("Max Cooler Height", "165mm")],
    ),
    (
        "cooler-tower-air",
        &[
            ("Cooler Type", "Air"),
            ("Max TDP", "220W"),
            ("Supported Sockets", "AM4, AM5, LGA1700"),
            ("Height", "158mm"),
        ],
    ),
];

fn authored_rules() -> Vec<CompatibilityRule> {
    vec![
        CompatibilityRule {
            id: String::new(),
            primary: RuleTarget::Tag(ProvidesGraphics),
            primary_field: "power_consumption".to_string(),
            secondary: RuleTarget::Tag(ProvidesPower),
            secondary_field: "wattage".to_string(),
            comparison: ComparisonMode::NumericBound {
                bound: Bound::AtMost,
            },
            severity: RuleSeverity::Error,
            message: Some("Graphics card alone draws more than the supply delivers".to_string()),
        },
        CompatibilityRule {
            id: String::new(),
            primary: RuleTarget::Tag(ProvidesCompute),
            primary_field: "memory_type".to_string(),
            secondary: RuleTarget::Tag(ProvidesMemory),
            secondary_field: "memory_type".to_string(),
            comparison: ComparisonMode::ExactMatch,
            severity: RuleSeverity::Info,
            message: None,
        },
        CompatibilityRule {
            id: String::new(),
            primary: RuleTarget::Category("motherboards".to_string()),
            primary_field: "chipset".to_string(),
            secondary: RuleTarget::Category("processors".to_string()),
            secondary_field: "socket".to_string(),
            comparison: ComparisonMode::DerivedLookup {
                table: DerivedTable::ChipsetSocket,
            },
            severity: RuleSeverity::Error,
            message: None,
        },
    ]
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rigsmith=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./rigsmith_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Rigsmith Catalog Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./rigsmith_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding catalog");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.rules().count().await?;
    if existing > 0 {
        println!("Catalog already has {} rules, skipping seed.", existing);
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    for (slug, tags) in CATEGORIES {
        db.category_tags().assign(slug, tags).await?;
    }
    println!("✓ Tagged {} categories", CATEGORIES.len());

    for rule in authored_rules() {
        let id = db.rules().insert(&rule).await?;
        info!(rule = %id, kind = rule.kind(), "Rule stored");
    }
    println!("✓ Stored {} rules", db.rules().count().await?);

    for (component_id, specs) in COMPONENTS {
        let specs: Vec<RawSpecification> = specs
            .iter()
            .map(|(name, value)| RawSpecification::new(*name, *value))
            .collect();
        db.specifications().replace(component_id, &specs).await?;
    }
    println!("✓ Stored specifications for {} components", COMPONENTS.len());

    db.close().await;
    println!("✓ Seed complete: {}", db_path);
    Ok(())
}
