//! Daily sales series handling for forecasting

use crate::error::{ForecastError, Result};
use crate::utils::percentile;
use chrono::NaiveDate;
use polars::prelude::*;
use sales_ledger::{Ledger, SalesRecord};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Percentile above which a day's sales are treated as an outlier
pub const OUTLIER_PERCENTILE: f64 = 0.99;

/// Daily sales observations ordered by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Data loader for ledger files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a sales series from a `date,sales` CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesSeries> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Create a sales series from a DataFrame with `date` and `sales` columns
    pub fn from_dataframe(df: &DataFrame) -> Result<SalesSeries> {
        let date_col = Self::column(df, "date")?.cast(&DataType::Utf8)?;
        let sales_col = Self::column(df, "sales")?.cast(&DataType::Float64)?;

        let mut dates = Vec::with_capacity(df.height());
        let mut values = Vec::with_capacity(df.height());

        for (row, (date, sales)) in date_col
            .utf8()?
            .into_iter()
            .zip(sales_col.f64()?.into_iter())
            .enumerate()
        {
            let (date, sales) = match (date, sales) {
                (Some(date), Some(sales)) => (date, sales),
                _ => {
                    return Err(ForecastError::DataError(format!(
                        "Row {} has an empty date or sales value",
                        row + 1
                    )))
                }
            };
            dates.push(sales_ledger::parse_date(date)?);
            values.push(sales);
        }

        SalesSeries::new(dates, values)
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        df.column(name).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' not found: {}", name, e))
        })
    }
}

impl SalesSeries {
    /// Create a series from parallel date and value vectors
    ///
    /// Rows are sorted by date; rows sharing a date keep their relative order.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        let mut rows: Vec<(NaiveDate, f64)> = dates.into_iter().zip(values).collect();
        rows.sort_by_key(|(date, _)| *date);
        let (dates, values) = rows.into_iter().unzip();

        Ok(Self { dates, values })
    }

    /// Create a series from ledger rows
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let mut rows: Vec<(NaiveDate, f64)> =
            records.iter().map(|r| (r.date, r.sales as f64)).collect();
        rows.sort_by_key(|(date, _)| *date);
        let (dates, values) = rows.into_iter().unzip();

        Self { dates, values }
    }

    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self::from_records(ledger.records())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Keep only the rows whose value satisfies `keep`
    pub fn filter<F: Fn(f64) -> bool>(&self, keep: F) -> Self {
        let (dates, values) = self
            .dates
            .iter()
            .zip(self.values.iter())
            .filter(|(_, v)| keep(**v))
            .map(|(&d, &v)| (d, v))
            .unzip();

        Self { dates, values }
    }
}

/// Prepare a series for model fitting
///
/// Drops days with non-positive sales, then drops days whose sales exceed the
/// 99th percentile of what remains.
pub fn preprocess(series: &SalesSeries) -> SalesSeries {
    let positive = series.filter(|v| v > 0.0);
    let cutoff = match percentile(positive.values(), OUTLIER_PERCENTILE) {
        Some(cutoff) => cutoff,
        None => return positive,
    };
    let cleaned = positive.filter(|v| v <= cutoff);

    debug!(
        input = series.len(),
        non_positive = series.len() - positive.len(),
        outliers = positive.len() - cleaned.len(),
        cutoff,
        "preprocessed sales series"
    );

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn new_sorts_rows_by_date() {
        let series = SalesSeries::new(vec![day(3), day(1), day(2)], vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(series.dates(), &[day(1), day(2), day(3)]);
        assert_eq!(series.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = SalesSeries::new(vec![day(1)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::ValidationError(_))));
    }

    #[test]
    fn preprocess_drops_non_positive_and_outliers() {
        let mut dates = Vec::new();
        let mut values = Vec::new();
        for d in 1..=31 {
            dates.push(day(d));
            values.push(match d {
                5 => 0.0,
                6 => -4.0,
                20 => 10_000.0,
                _ => 100.0 + d as f64,
            });
        }
        let series = SalesSeries::new(dates, values).unwrap();

        let cleaned = preprocess(&series);
        assert_eq!(cleaned.len(), 28);
        assert!(cleaned.values().iter().all(|&v| v > 0.0 && v < 10_000.0));
        assert!(!cleaned.dates().contains(&day(20)));
    }

    #[test]
    fn preprocess_of_empty_series_is_empty() {
        let cleaned = preprocess(&SalesSeries::default());
        assert!(cleaned.is_empty());
    }
}
