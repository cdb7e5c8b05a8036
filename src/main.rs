mod categorizer;
mod cli;
mod error;
mod fmt;
mod ledger;
mod mappings;
mod models;
mod processed;
mod reviewer;
mod settings;

use clap::Parser;
use tracing_subscriber::{fmt as log_fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, Context, MappingsCommands, ProcessedCommands};
use settings::{load_settings, DataPaths};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose; logs go to stderr so command output stays clean.
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(log_fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let settings = load_settings();
    let paths = DataPaths::resolve(&settings, cli.data_dir.as_deref(), cli.ledger.as_deref());
    let ctx = Context { settings, paths };

    let result = match cli.command {
        Commands::Init => cli::init::run(cli.data_dir.as_deref()),
        Commands::Categorize => cli::categorize::run(&ctx),
        Commands::Review { hide_processed } => cli::review::run(&ctx, hide_processed),
        Commands::Mappings { command } => match command {
            MappingsCommands::Add {
                description,
                label,
                no_apply,
            } => cli::mappings::add(&ctx, &description, &label, no_apply),
            MappingsCommands::List => cli::mappings::list(&ctx),
            MappingsCommands::Remove { key } => cli::mappings::remove(&ctx, &key),
        },
        Commands::Processed { command } => match command {
            ProcessedCommands::List => cli::processed::list(&ctx),
            ProcessedCommands::Clear { yes } => cli::processed::clear(&ctx, yes),
            ProcessedCommands::Backup { output_dir } => {
                cli::processed::backup(&ctx, output_dir.as_deref())
            }
        },
        Commands::Filter { month, year } => cli::filter::run(&ctx, month, year),
        Commands::ClearLabels { yes } => cli::clear_labels::run(&ctx, yes),
        Commands::Status => cli::status::run(&ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
