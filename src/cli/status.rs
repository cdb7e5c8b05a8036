use super::{load_mappings_or_empty, Context};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::processed::ProcessedSet;
use crate::settings::settings_file;

pub fn run(ctx: &Context) -> Result<()> {
    let paths = &ctx.paths;
    println!("Settings:   {}", settings_file().display());
    println!("Data dir:   {}", paths.data_dir.display());
    println!("Ledger:     {}", paths.ledger.display());
    println!("Mappings:   {}", paths.mappings.display());
    println!("Processed:  {}", paths.processed.display());
    println!();

    if paths.ledger.exists() {
        let ledger = Ledger::load(&paths.ledger)?;
        if ledger.is_empty() {
            println!("Ledger has no transactions.");
        }
        let unlabeled = ledger.uncategorized().len();
        println!("Transactions:  {}", ledger.len());
        println!("Labeled:       {}", ledger.len() - unlabeled);
        println!("Unlabeled:     {unlabeled}");
    } else {
        println!("Ledger not found. Export transactions from your bank to the path above.");
    }

    let mappings = load_mappings_or_empty(ctx);
    let processed = ProcessedSet::load(&paths.processed)?;
    println!("Mappings:      {}", mappings.len());
    println!("Processed:     {}", processed.len());
    Ok(())
}
