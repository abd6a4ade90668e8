//! # Configuration Validation CLI
//!
//! Validates a configuration JSON document and prints the result as JSON.
//!
//! ## Usage
//! ```bash
//! # Against a SQLite catalog
//! cargo run -p rigsmith-validator --bin validate -- --db ./rigsmith_dev.db build.json
//!
//! # Against a JSON catalog (InMemoryCatalog layout)
//! cargo run -p rigsmith-validator --bin validate -- --catalog catalog.json build.json
//!
//! # Configuration on stdin, built-in detection only
//! cat build.json | cargo run -p rigsmith-validator --bin validate
//! ```
//!
//! Exit status is 0 for a valid build and 1 for an invalid one.

use rigsmith_core::Configuration;
use rigsmith_db::{CatalogRepository, Database, DbConfig, InMemoryCatalog};
use rigsmith_validator::{ConfigurationValidator, ValidatorConfig};
use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only the result.
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,rigsmith=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rigsmith=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

struct Args {
    config: Option<PathBuf>,
    db: Option<PathBuf>,
    catalog: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config: None,
        db: None,
        catalog: None,
        input: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--db" | "-d" if i + 1 < args.len() => {
                parsed.db = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--catalog" if i + 1 < args.len() => {
                parsed.catalog = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--help" | "-h" => {
                println!("Rigsmith Configuration Validator");
                println!();
                println!("Usage: validate [OPTIONS] [CONFIGURATION.json]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   Validator config (default: platform config dir)");
                println!("  -d, --db <PATH>       SQLite catalog");
                println!("      --catalog <PATH>  JSON catalog");
                println!("  -h, --help            Show this help message");
                return None;
            }
            other => parsed.input = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    Some(parsed)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let Some(args) = parse_args() else {
        return Ok(());
    };

    let config = ValidatorConfig::load(args.config)?;

    let repository: Arc<dyn CatalogRepository> =
        match (args.db.or_else(|| config.repository.database_path.clone()), args.catalog) {
            (_, Some(path)) => {
                info!(?path, "Using JSON catalog");
                let catalog: InMemoryCatalog = serde_json::from_str(&std::fs::read_to_string(path)?)?;
                Arc::new(catalog)
            }
            (Some(path), None) => {
                info!(?path, "Using SQLite catalog");
                let db = Database::new(DbConfig::new(path).read_only()).await?;
                Arc::new(db.catalog())
            }
            (None, None) => {
                info!("No catalog configured, relying on profile detection");
                Arc::new(InMemoryCatalog::new())
            }
        };

    let raw = match args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let configuration: Configuration = serde_json::from_str(&raw)?;

    let validator = ConfigurationValidator::from_config(repository, config)?;
    let result = validator.validate_configuration(&configuration).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_valid {
        std::process::exit(1);
    }
    Ok(())
}
