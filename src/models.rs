use crate::fmt::parse_amount;

pub const COL_DATE: &str = "Transaction Date";
pub const COL_AMOUNT: &str = "Amount";
pub const COL_INDICATOR: &str = "Credit Debit Indicator";
pub const COL_TYPE: &str = "type";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_CATEGORY: &str = "Category";
pub const COL_IDENTIFIER: &str = "Custom Identifier";

/// Columns every ledger file must carry, in output order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_DATE,
    COL_AMOUNT,
    COL_INDICATOR,
    COL_TYPE,
    COL_DESCRIPTION,
    COL_CATEGORY,
];

/// One row of a bank export. Fields are kept exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub date: String,
    pub amount: String,
    pub credit_debit: String,
    pub txn_type: String,
    pub description: String,
    pub category: String,
    pub custom_identifier: String,
}

impl Transaction {
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(&self.date, &self.description, &self.amount)
    }

    pub fn amount_value(&self) -> f64 {
        parse_amount(&self.amount)
    }

    pub fn is_labeled(&self) -> bool {
        !self.custom_identifier.is_empty()
    }
}

/// (date, description, amount) identity of a transaction across sessions.
///
/// Fields are trimmed and the description is lower-cased, so the same
/// purchase exported twice with different casing or padding collides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub date: String,
    pub description: String,
    pub amount: String,
}

impl NaturalKey {
    pub fn new(date: &str, description: &str, amount: &str) -> Self {
        Self {
            date: date.trim().to_string(),
            description: description.trim().to_lowercase(),
            amount: amount.trim().to_string(),
        }
    }
}

/// Cells pandas-style exports write for missing values.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        raw.to_string()
    }
}
