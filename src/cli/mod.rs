pub mod categorize;
pub mod clear_labels;
pub mod filter;
pub mod init;
pub mod mappings;
pub mod processed;
pub mod review;
pub mod status;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use crate::categorizer::{apply_mappings, seed_identifiers, CategorizeResult};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::mappings::MappingStore;
use crate::settings::{DataPaths, Settings};

/// Settings plus the file locations resolved for this invocation.
pub struct Context {
    pub settings: Settings,
    pub paths: DataPaths,
}

/// Load the mapping store, falling back to an empty one with a notice when
/// the file cannot be read.
pub(crate) fn load_mappings_or_empty(ctx: &Context) -> MappingStore {
    match MappingStore::load(&ctx.paths.mappings) {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "mapping store unreadable");
            println!("{}", format!("Failed to load mappings: {e}").yellow());
            MappingStore::default()
        }
    }
}

/// Load the ledger for a command that may save it. A brand-new identifier
/// column is seeded here, before any save makes the column permanent.
pub(crate) fn load_ledger(ctx: &Context) -> Result<Ledger> {
    let mut ledger = Ledger::load(&ctx.paths.ledger)?;
    if ctx.settings.seed_fallback_rules && ledger.identifier_column_is_new() {
        seed_identifiers(&mut ledger);
    }
    Ok(ledger)
}

/// Load the ledger and apply the mapping store.
pub(crate) fn prepare_ledger(ctx: &Context) -> Result<(Ledger, MappingStore, CategorizeResult)> {
    let mut ledger = load_ledger(ctx)?;
    let mappings = load_mappings_or_empty(ctx);
    let result = apply_mappings(&mut ledger, &mappings);
    Ok((ledger, mappings, result))
}

#[derive(Parser)]
#[command(name = "stonestreet", about = "Categorize bank-exported transactions with learned description mappings.")]
pub struct Cli {
    /// Directory holding the ledger, mapping and processed files
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Ledger CSV to work on (default: <data_dir>/<ledger_file>)
    #[arg(long, global = true)]
    pub ledger: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and write the settings file.
    Init,
    /// Apply description mappings to the ledger and save it.
    Categorize,
    /// Step through transactions and assign labels interactively.
    Review {
        /// Only show transactions without a label
        #[arg(long = "hide-processed")]
        hide_processed: bool,
    },
    /// Manage description-to-label mappings.
    Mappings {
        #[command(subcommand)]
        command: MappingsCommands,
    },
    /// Manage the log of reviewed transactions.
    Processed {
        #[command(subcommand)]
        command: ProcessedCommands,
    },
    /// Keep only the transactions dated in one month.
    Filter {
        /// Month number: 1-12
        #[arg(long)]
        month: u32,
        /// Four-digit year
        #[arg(long)]
        year: i32,
    },
    /// Remove every label from the ledger.
    ClearLabels {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show file locations and ledger counts.
    Status,
}

#[derive(Subcommand)]
pub enum MappingsCommands {
    /// Map a description (or any part of one) to a label.
    Add {
        /// Text to look for in transaction descriptions
        description: String,
        /// Label to assign
        label: String,
        /// Save the mapping without re-categorizing the ledger
        #[arg(long = "no-apply")]
        no_apply: bool,
    },
    /// List all mappings.
    List,
    /// Delete a mapping by its key.
    Remove {
        /// Mapping key (shown in `stonestreet mappings list`)
        key: String,
    },
}

#[derive(Subcommand)]
pub enum ProcessedCommands {
    /// List reviewed transactions.
    List,
    /// Forget all reviewed transactions.
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Copy the processed log to a timestamped backup file.
    Backup {
        /// Output directory (default: the data directory)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
}
