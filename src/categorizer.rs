use tracing::debug;

use crate::ledger::Ledger;
use crate::mappings::MappingStore;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq)]
enum RuleField {
    Description,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MatchKind {
    Contains,
    Exact,
}

/// Built-in rules used to seed a brand-new identifier column, checked in
/// order. Rows matching none get `FALLBACK_LABEL`.
const FALLBACK_RULES: &[(RuleField, MatchKind, &str, &str)] = &[
    (RuleField::Description, MatchKind::Contains, "grocery", "GROCERY"),
    (RuleField::Description, MatchKind::Contains, "rent", "RENT"),
    (RuleField::Type, MatchKind::Exact, "credit", "CREDIT"),
    (RuleField::Type, MatchKind::Exact, "debit", "DEBIT"),
];

const FALLBACK_LABEL: &str = "OTHER";

fn matches(value: &str, pattern: &str, kind: MatchKind) -> bool {
    match kind {
        MatchKind::Contains => value.to_lowercase().contains(pattern),
        MatchKind::Exact => value.trim().eq_ignore_ascii_case(pattern),
    }
}

fn fallback_label(txn: &Transaction) -> &'static str {
    FALLBACK_RULES
        .iter()
        .find(|(field, kind, pattern, _)| {
            let value = match field {
                RuleField::Description => &txn.description,
                RuleField::Type => &txn.txn_type,
            };
            matches(value, pattern, *kind)
        })
        .map(|(_, _, _, label)| *label)
        .unwrap_or(FALLBACK_LABEL)
}

/// Fill the identifier of every row from the built-in rules. Only meant for
/// a ledger whose identifier column did not exist on disk.
pub fn seed_identifiers(ledger: &mut Ledger) -> usize {
    if !ledger.identifier_column_is_new() {
        return 0;
    }
    for txn in &mut ledger.transactions {
        txn.custom_identifier = fallback_label(txn).to_string();
    }
    debug!(rows = ledger.len(), "seeded identifiers from fallback rules");
    ledger.len()
}

#[derive(Debug, PartialEq, Eq)]
pub struct CategorizeResult {
    pub matched: usize,
    pub unmatched: usize,
}

/// Assign each row the label of the first mapping key found in its
/// description. Unmatched rows keep whatever label they had.
pub fn apply_mappings(ledger: &mut Ledger, mappings: &MappingStore) -> CategorizeResult {
    let mut matched = 0usize;
    let mut unmatched = 0usize;
    for txn in &mut ledger.transactions {
        match mappings.lookup(&txn.description) {
            Some(label) => {
                txn.custom_identifier = label.to_string();
                matched += 1;
            }
            None => unmatched += 1,
        }
    }
    debug!(matched, unmatched, "applied mappings");
    CategorizeResult { matched, unmatched }
}
