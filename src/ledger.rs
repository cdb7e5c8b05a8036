use std::io::{Read, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::{Result, StonestreetError};
use crate::models::{clean_cell, Transaction, COL_IDENTIFIER, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y", "%d %b %Y", "%b %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// `MM/DD/YYYY` or `M/D/YY`; two-digit years land in 2000-2099.
pub fn parse_date_mdy(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].parse().ok()?;
    let d: u32 = parts[1].parse().ok()?;
    let mut y: i32 = parts[2].parse().ok()?;
    if parts[2].len() == 2 {
        y += 2000;
    }
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Parse a transaction date in any of the layouts bank exports use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = parse_date_mdy(raw) {
        return Some(date);
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    /// True when the source file had no identifier column and one was built.
    identifier_column_is_new: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FilterSummary {
    pub kept: usize,
    pub dropped: usize,
    pub unparseable: usize,
}

impl Ledger {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let ledger = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), rows = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    /// Read a bank export, keeping only the ledger columns.
    ///
    /// Cells are decoded lossily so that a row with bytes outside UTF-8 is
    /// still kept; the ledger is rewritten on save and must not lose rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_string())
            .collect();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let mut required = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = position(name).ok_or_else(|| StonestreetError::MissingColumn(name.to_string()))?;
        }
        let identifier_idx = position(COL_IDENTIFIER);

        let mut transactions = Vec::new();
        let mut lossy_rows = 0usize;
        for result in rdr.byte_records() {
            let record = result?;
            if std::str::from_utf8(record.as_slice()).is_err() {
                lossy_rows += 1;
            }
            let field = |idx: usize| {
                record
                    .get(idx)
                    .map(|b| String::from_utf8_lossy(b).into_owned())
                    .unwrap_or_default()
            };
            transactions.push(Transaction {
                date: field(required[0]),
                amount: field(required[1]),
                credit_debit: field(required[2]),
                txn_type: field(required[3]),
                description: field(required[4]),
                category: field(required[5]),
                custom_identifier: identifier_idx
                    .map(|idx| clean_cell(&field(idx)))
                    .unwrap_or_default(),
            });
        }
        if lossy_rows > 0 {
            warn!(rows = lossy_rows, "ledger rows contained non-UTF-8 bytes, replaced");
        }

        if identifier_idx.is_none() {
            debug!("ledger has no identifier column, starting empty");
        }
        Ok(Self {
            transactions,
            identifier_column_is_new: identifier_idx.is_none(),
        })
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)?;
        self.identifier_column_is_new = false;
        info!(path = %path.display(), rows = self.len(), "saved ledger");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        header.push(COL_IDENTIFIER);
        wtr.write_record(&header)?;
        for t in &self.transactions {
            wtr.write_record([
                &t.date,
                &t.amount,
                &t.credit_debit,
                &t.txn_type,
                &t.description,
                &t.category,
                &t.custom_identifier,
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn identifier_column_is_new(&self) -> bool {
        self.identifier_column_is_new
    }

    pub fn assign(&mut self, index: usize, label: &str) -> bool {
        match self.transactions.get_mut(index) {
            Some(t) => {
                t.custom_identifier = label.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn clear_identifiers(&mut self) -> usize {
        let mut cleared = 0;
        for t in &mut self.transactions {
            if t.is_labeled() {
                cleared += 1;
            }
            t.custom_identifier.clear();
        }
        cleared
    }

    /// Row indices that still need a label.
    pub fn uncategorized(&self) -> Vec<usize> {
        self.transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_labeled())
            .map(|(i, _)| i)
            .collect()
    }

    /// Keep only rows dated in `month`/`year`. Rows whose date cannot be
    /// parsed are dropped along with the out-of-range ones.
    pub fn filter_month(&mut self, month: u32, year: i32) -> Result<FilterSummary> {
        if !(1..=12).contains(&month) {
            return Err(StonestreetError::InvalidMonth(month));
        }
        let before = self.transactions.len();
        let mut unparseable = 0usize;
        self.transactions.retain(|t| match parse_date(&t.date) {
            Some(d) => d.month() == month && d.year() == year,
            None => {
                warn!(date = %t.date, description = %t.description, "dropping row with unparseable date");
                unparseable += 1;
                false
            }
        });
        let kept = self.transactions.len();
        Ok(FilterSummary {
            kept,
            dropped: before - kept,
            unparseable,
        })
    }
}
