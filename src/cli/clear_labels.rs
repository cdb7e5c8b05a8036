use colored::Colorize;
use dialoguer::Confirm;

use super::{load_ledger, Context};
use crate::error::Result;

pub fn run(ctx: &Context, yes: bool) -> Result<()> {
    let mut ledger = load_ledger(ctx)?;
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Clear all labels in {}?", ctx.paths.ledger.display()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }
    let cleared = ledger.clear_identifiers();
    ledger.save(&ctx.paths.ledger)?;
    println!("{}", format!("Cleared {cleared} labels.").green());
    Ok(())
}
