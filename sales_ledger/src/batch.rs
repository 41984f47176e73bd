//! Whole-month aggregate batches

use crate::record::SalesRecord;
use crate::{LedgerError, Result};
use chrono::{Datelike, NaiveDate};

/// Daily totals for the first days of a month
///
/// `data[i]` is the total for day `i + 1` of the month containing `today`.
/// Only days 1 through `today.day()` are generated; entries are paired with
/// those days by index, so a short array covers fewer days and any entries
/// past `today` are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBatch {
    today: NaiveDate,
    data: Vec<i64>,
}

impl MonthBatch {
    pub fn new(today: NaiveDate, data: Vec<i64>) -> Self {
        Self { today, data }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// First day of the batch's month
    pub fn month_start(&self) -> Result<NaiveDate> {
        self.today.with_day(1).ok_or_else(|| {
            LedgerError::InvalidDate(format!("No first day for month of {}", self.today))
        })
    }

    /// Rows for day 1 through `today`, paired by index with the amounts
    pub fn records(&self) -> Result<Vec<SalesRecord>> {
        let start = self.month_start()?;
        Ok(start
            .iter_days()
            .take(self.today.day() as usize)
            .zip(self.data.iter())
            .map(|(date, &sales)| SalesRecord::new(date, sales))
            .collect())
    }
}
