//! # Sales Ledger
//!
//! Flat-file bookkeeping for daily sales counts.
//!
//! A ledger is a `date,sales` CSV file holding one row per calendar day. The
//! service keeps one aggregate ledger plus one ledger per branch, and keeps the
//! aggregate in step with the branches through incremental deltas:
//!
//! - [`LedgerStore::insert_sale`] merges a single branch record, replacing the
//!   branch's value for that day and moving the aggregate by the difference.
//! - [`LedgerStore::replace_month`] overwrites the aggregate rows for the first
//!   days of a month with a batch of daily totals.
//!
//! Files are rewritten in full on every change. There is no cross-file
//! transaction: a failure between the branch write and the aggregate write
//! leaves the two out of step.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use sales_ledger::LedgerStore;
//!
//! let store = LedgerStore::new("./sales_data.csv", "./branch");
//! let date = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
//! store.insert_sale(3, date, 120)?;
//! # Ok::<(), sales_ledger::LedgerError>(())
//! ```

use thiserror::Error;

pub mod batch;
pub mod ledger;
pub mod record;
pub mod store;

pub use crate::batch::MonthBatch;
pub use crate::ledger::Ledger;
pub use crate::record::SalesRecord;
pub use crate::store::{InsertOutcome, LedgerStore};

/// Errors that can occur while reading or updating a ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| LedgerError::InvalidDate(format!("'{}': {}", value, e)))
}
