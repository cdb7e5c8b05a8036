use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::Confirm;

use super::Context;
use crate::error::Result;
use crate::fmt::truncate;
use crate::processed::ProcessedSet;
use crate::settings::shellexpand_path;

pub fn list(ctx: &Context) -> Result<()> {
    let set = ProcessedSet::load(&ctx.paths.processed)?;
    if set.is_empty() {
        println!("No processed transactions.");
        return Ok(());
    }
    let mut keys: Vec<_> = set.iter().collect();
    keys.sort_by(|a, b| (&a.date, &a.description).cmp(&(&b.date, &b.description)));

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount"]);
    for key in keys {
        table.add_row(vec![
            Cell::new(&key.date),
            Cell::new(truncate(&key.description, 50)),
            Cell::new(&key.amount),
        ]);
    }
    println!("Processed transactions ({})\n{table}", set.len());
    Ok(())
}

pub fn clear(ctx: &Context, yes: bool) -> Result<()> {
    let mut set = ProcessedSet::load(&ctx.paths.processed)?;
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Forget {} processed transactions?", set.len()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }
    let cleared = set.clear()?;
    println!("{}", format!("Processed transactions cleared ({cleared}).").green());
    Ok(())
}

pub fn backup(ctx: &Context, output_dir: Option<&str>) -> Result<()> {
    let set = ProcessedSet::load(&ctx.paths.processed)?;
    let dir = match output_dir {
        Some(p) => PathBuf::from(shellexpand_path(p)),
        None => ctx.paths.data_dir.clone(),
    };
    match set.backup(&dir)? {
        Some(dest) => println!("{}", format!("Backup created: {}", dest.display()).green()),
        None => println!("{}", "No processed transactions file to back up.".yellow()),
    }
    Ok(())
}
