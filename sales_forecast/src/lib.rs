//! # Sales Forecast
//!
//! Daily sales forecasting on top of the aggregate sales ledger.
//!
//! ## Features
//!
//! - Loading `date,sales` ledgers into a [`SalesSeries`]
//! - Preprocessing for refits after a month batch: non-positive days and days
//!   above the 99th percentile are dropped before fitting
//! - A trend plus weekly/yearly seasonality model with uncertainty intervals
//! - Post-processing into published [`ForecastRow`]s: non-negative, smoothed
//!   over three days and rounded to whole units
//! - A [`ModelSlot`] holding the process-wide fitted model, replaced wholesale
//!   on refit
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::models::seasonal_trend::SeasonalTrend;
//! use sales_forecast::{DataLoader, ModelSlot};
//!
//! let slot = ModelSlot::new(SeasonalTrend::default());
//! let series = DataLoader::from_csv("sales_data.csv")?;
//! slot.refit(&series)?;
//!
//! for row in slot.predict(7)? {
//!     println!("{} {} [{}, {}]", row.ds, row.yhat, row.yhat_lower, row.yhat_upper);
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod data;
pub mod error;
pub mod models;
pub mod output;
pub mod slot;
pub mod utils;

// Re-export commonly used types
pub use crate::data::{preprocess, DataLoader, SalesSeries};
pub use crate::error::ForecastError;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::output::{postprocess, ForecastRow};
pub use crate::slot::{ModelSlot, ModelStatus};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
