//! Aggregate and per-branch ledger files on local disk

use crate::batch::MonthBatch;
use crate::ledger::Ledger;
use crate::{LedgerError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the aggregate ledger
pub const DEFAULT_AGGREGATE_PATH: &str = "./sales_data.csv";
/// Default directory holding the branch ledgers
pub const DEFAULT_BRANCH_DIR: &str = "./branch";

/// What a single-record insert did to the branch ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The branch had no row for the day
    Inserted,
    /// The branch row was overwritten; `previous` is the value it replaced
    Replaced { previous: i64 },
}

/// Locations of the aggregate ledger and the branch ledger directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStore {
    aggregate_path: PathBuf,
    branch_dir: PathBuf,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(DEFAULT_AGGREGATE_PATH, DEFAULT_BRANCH_DIR)
    }
}

impl LedgerStore {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(aggregate_path: P, branch_dir: Q) -> Self {
        Self {
            aggregate_path: aggregate_path.into(),
            branch_dir: branch_dir.into(),
        }
    }

    pub fn aggregate_path(&self) -> &Path {
        &self.aggregate_path
    }

    pub fn branch_dir(&self) -> &Path {
        &self.branch_dir
    }

    /// File holding one branch's ledger
    pub fn branch_path(&self, branch: i64) -> PathBuf {
        self.branch_dir
            .join(format!("Branch_{}_sales_data.csv", branch))
    }

    pub fn load_aggregate(&self) -> Result<Ledger> {
        Ledger::load(&self.aggregate_path)
    }

    pub fn load_branch(&self, branch: i64) -> Result<Ledger> {
        Ledger::load(self.branch_path(branch))
    }

    /// Merge one branch's sales for a day into its ledger and the aggregate
    ///
    /// When the branch already has a row for `date`, that row is overwritten
    /// and the aggregate moves by `sales - previous`. Otherwise the branch gets
    /// a new row and the aggregate grows by `sales` (or gains a row for the
    /// day). The branch file is written before the aggregate file; the two
    /// writes are not atomic together.
    pub fn insert_sale(&self, branch: i64, date: NaiveDate, sales: i64) -> Result<InsertOutcome> {
        if sales < 0 {
            return Err(LedgerError::Validation(format!(
                "Sales must be non-negative, got {}",
                sales
            )));
        }

        let branch_path = self.branch_path(branch);
        std::fs::create_dir_all(&self.branch_dir)?;

        let mut branch_ledger = Ledger::load(&branch_path)?;
        let mut aggregate = self.load_aggregate()?;

        let outcome = match branch_ledger.upsert(date, sales) {
            Some(previous) => {
                aggregate.add(date, sales - previous)?;
                InsertOutcome::Replaced { previous }
            }
            None => {
                aggregate.add(date, sales)?;
                InsertOutcome::Inserted
            }
        };

        branch_ledger.save(&branch_path)?;
        aggregate.save(&self.aggregate_path)?;

        debug!(
            branch,
            %date,
            sales,
            ?outcome,
            "merged branch sales into ledgers"
        );

        Ok(outcome)
    }

    /// Overwrite the aggregate rows for the days covered by a month batch
    ///
    /// Branch ledgers are not touched. Returns the number of rows written for
    /// the batch.
    pub fn replace_month(&self, batch: &MonthBatch) -> Result<usize> {
        let records = batch.records()?;
        let dates: HashSet<NaiveDate> = records.iter().map(|r| r.date).collect();

        let mut aggregate = self.load_aggregate()?;
        let removed = aggregate.remove_dates(&dates);
        let written = records.len();
        aggregate.extend(records);
        aggregate.sort_by_date();
        aggregate.save(&self.aggregate_path)?;

        debug!(
            today = %batch.today(),
            written,
            removed,
            "replaced month in aggregate ledger"
        );

        Ok(written)
    }
}
