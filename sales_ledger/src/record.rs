//! A single ledger row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sales count for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar day, written as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Units sold that day
    pub sales: i64,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, sales: i64) -> Self {
        Self { date, sales }
    }
}
