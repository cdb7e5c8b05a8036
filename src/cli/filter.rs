use colored::Colorize;

use super::{prepare_ledger, Context};
use crate::error::Result;

pub fn run(ctx: &Context, month: u32, year: i32) -> Result<()> {
    let (mut ledger, _, _) = prepare_ledger(ctx)?;
    let summary = ledger.filter_month(month, year)?;
    ledger.save(&ctx.paths.ledger)?;
    println!("Kept {} transactions from {year}-{month:02}", summary.kept);
    if summary.dropped > 0 {
        println!("Dropped {}", summary.dropped);
    }
    if summary.unparseable > 0 {
        println!(
            "{}",
            format!("{} rows had unparseable dates and were dropped", summary.unparseable).yellow()
        );
    }
    Ok(())
}
