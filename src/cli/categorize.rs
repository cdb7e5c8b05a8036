use super::{prepare_ledger, Context};
use crate::error::Result;

pub fn run(ctx: &Context) -> Result<()> {
    let (mut ledger, mappings, result) = prepare_ledger(ctx)?;
    ledger.save(&ctx.paths.ledger)?;
    println!(
        "{} matched, {} unmatched ({} mappings)",
        result.matched,
        result.unmatched,
        mappings.len()
    );
    Ok(())
}
