//! In-memory view of a `date,sales` ledger file

use crate::record::SalesRecord;
use crate::{LedgerError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const HEADER: [&str; 2] = ["date", "sales"];

/// Ordered sequence of daily sales rows
///
/// Rows keep the order they were read or appended in. Only
/// [`Ledger::sort_by_date`] reorders them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<SalesRecord>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from existing rows
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    /// Load a ledger from a CSV file
    ///
    /// A file that does not exist yet is an empty ledger. Both the `date` and
    /// `sales` columns must be present; no other validation is applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let headers = reader.headers()?.clone();
        for column in HEADER {
            if !headers.iter().any(|h| h == column) {
                return Err(LedgerError::Validation(format!(
                    "Ledger {} is missing the '{}' column",
                    path.display(),
                    column
                )));
            }
        }

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: SalesRecord = row?;
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Rewrite the whole ledger file, creating its directory if needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // The header is written by hand so an empty ledger still has one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(HEADER)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Rows in ledger order
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sales recorded for a day, if the day has a row
    pub fn get(&self, date: NaiveDate) -> Option<i64> {
        self.records
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.sales)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    /// Set the sales for a day, returning the previous value
    ///
    /// Appends a new row when the day has none.
    pub fn upsert(&mut self, date: NaiveDate, sales: i64) -> Option<i64> {
        match self.records.iter_mut().find(|r| r.date == date) {
            Some(record) => Some(std::mem::replace(&mut record.sales, sales)),
            None => {
                self.records.push(SalesRecord::new(date, sales));
                None
            }
        }
    }

    /// Move the sales for a day by `delta`, appending a row when absent
    ///
    /// Fails without touching the row if the new total would overflow.
    pub fn add(&mut self, date: NaiveDate, delta: i64) -> Result<()> {
        match self.records.iter_mut().find(|r| r.date == date) {
            Some(record) => {
                record.sales = record.sales.checked_add(delta).ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "Sales total for {} overflows when adding {}",
                        date, delta
                    ))
                })?;
            }
            None => self.records.push(SalesRecord::new(date, delta)),
        }
        Ok(())
    }

    /// Drop every row whose date is in `dates`, returning how many were removed
    pub fn remove_dates(&mut self, dates: &HashSet<NaiveDate>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !dates.contains(&r.date));
        before - self.records.len()
    }

    /// Append rows as-is
    pub fn extend<I: IntoIterator<Item = SalesRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Stable sort of all rows by date
    pub fn sort_by_date(&mut self) {
        self.records.sort_by_key(|r| r.date);
    }

    /// Sum of sales over every row
    pub fn total(&self) -> i64 {
        self.records.iter().map(|r| r.sales).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn upsert_replaces_existing_day() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.upsert(day(1), 10), None);
        assert_eq!(ledger.upsert(day(1), 25), Some(10));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(day(1)), Some(25));
    }

    #[test]
    fn add_creates_or_moves_row() {
        let mut ledger = Ledger::new();
        ledger.add(day(2), 7).unwrap();
        ledger.add(day(2), -3).unwrap();
        ledger.add(day(1), 4).unwrap();
        assert_eq!(ledger.get(day(2)), Some(4));
        assert_eq!(ledger.records()[1].date, day(1));
        assert_eq!(ledger.total(), 8);
    }

    #[test]
    fn add_rejects_overflow() {
        let mut ledger = Ledger::from_records(vec![SalesRecord::new(day(1), i64::MAX)]);
        assert!(matches!(
            ledger.add(day(1), 1),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(ledger.get(day(1)), Some(i64::MAX));
    }

    #[test]
    fn sort_orders_by_date() {
        let mut ledger = Ledger::from_records(vec![
            SalesRecord::new(day(3), 1),
            SalesRecord::new(day(1), 2),
            SalesRecord::new(day(2), 3),
        ]);
        ledger.sort_by_date();
        let dates: Vec<_> = ledger.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
    }
}
