//! Autocomplete Index - command-line loader
//!
//! Loads, updates and clears the autocomplete index of one namespace from
//! JSON files of items.

use anyhow::{Context, Result};
use autocomplete_index::store::{IndexStore, MemoryStore, RedisStore};
use autocomplete_index::{Config, IndexManager, Item, ItemId};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "autocomplete-index", version, about = "Maintain a prefix autocomplete index")]
struct Cli {
    /// Run against an in-memory store instead of Redis
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace the namespace with the items in FILE (a JSON array)
    Load { file: PathBuf },
    /// Add or update the items in FILE (a JSON array)
    Add { file: PathBuf },
    /// Remove items by id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every item and prefix of the namespace
    Clear,
    /// Print the stored copy of an item
    Get { id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging (stderr only so `get` output stays clean)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        namespace = %config.namespace,
        min_complete = config.min_complete,
        stop_words = config.stop_words.len(),
        "Configuration loaded"
    );

    let store: Arc<dyn IndexStore> = if cli.dry_run {
        info!("Dry run: using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(RedisStore::from_params(config.connection_params()))
    };
    let manager = IndexManager::new(store, config.index_config());

    let result = run(&manager, cli.command).await;
    info!(metrics = ?manager.metrics().summary(), "Done");

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}

async fn run(manager: &IndexManager, command: Command) -> Result<()> {
    match command {
        Command::Load { file } => {
            let items = read_items(&file).await?;
            let loaded = manager.load(items).await?;
            info!(items = loaded.len(), "Namespace reloaded");
        }
        Command::Add { file } => {
            let items = read_items(&file).await?;
            for item in &items {
                manager.add(item, false).await?;
            }
            info!(items = items.len(), "Items added");
        }
        Command::Remove { ids } => {
            for id in ids {
                manager.remove_id(&ItemId::from(id)).await?;
            }
        }
        Command::Clear => {
            manager.clear().await?;
            info!("Namespace cleared");
        }
        Command::Get { id } => match manager.get(&ItemId::from(id.clone())).await? {
            Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
            None => anyhow::bail!("No item stored under id {}", id),
        },
    }
    Ok(())
}

/// Read a JSON array of items, validating every entry before anything is written.
async fn read_items(path: &Path) -> Result<Vec<Item>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            Item::from_value(value).with_context(|| format!("Item #{} is malformed", position))
        })
        .collect()
}
