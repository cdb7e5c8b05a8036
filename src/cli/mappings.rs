use comfy_table::{Cell, Table};

use super::{load_ledger, load_mappings_or_empty, Context};
use crate::categorizer::apply_mappings;
use crate::error::Result;
use crate::mappings::MappingStore;

pub fn add(ctx: &Context, description: &str, label: &str, no_apply: bool) -> Result<()> {
    let mut store = MappingStore::load(&ctx.paths.mappings)?;
    let key = store.add(description, label)?;
    store.save(&ctx.paths.mappings)?;
    println!("Mapping added: '{key}' \u{2192} {}", label.trim());

    if !no_apply && ctx.paths.ledger.exists() {
        let mut ledger = load_ledger(ctx)?;
        let result = apply_mappings(&mut ledger, &store);
        ledger.save(&ctx.paths.ledger)?;
        println!("{} transactions matched", result.matched);
    }
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let store = load_mappings_or_empty(ctx);
    if store.is_empty() {
        println!("No mappings yet.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Description contains", "Label"]);
    for (key, label) in store.iter() {
        table.add_row(vec![Cell::new(key), Cell::new(label)]);
    }
    println!("Mappings\n{table}");
    Ok(())
}

pub fn remove(ctx: &Context, key: &str) -> Result<()> {
    let mut store = MappingStore::load(&ctx.paths.mappings)?;
    let label = store.remove(key)?;
    store.save(&ctx.paths.mappings)?;
    println!("Removed mapping: '{}' \u{2192} {label}", key.trim().to_lowercase());
    Ok(())
}
