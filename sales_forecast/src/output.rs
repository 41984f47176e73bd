//! Turning raw model output into published forecast rows

use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use crate::utils::centered_moving_average;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Window of the smoothing applied to point estimates
pub const SMOOTHING_WINDOW: usize = 3;

/// One published forecast day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Forecast day
    pub ds: NaiveDate,
    /// Point estimate
    pub yhat: i64,
    /// Lower bound of the uncertainty interval
    pub yhat_lower: i64,
    /// Upper bound of the uncertainty interval
    pub yhat_upper: i64,
}

/// Clip, smooth and round a forecast
///
/// Point estimates are clipped at zero, smoothed with a centered 3-day moving
/// average and rounded. Bounds are clipped and rounded independently, without
/// smoothing. After rounding each bound is widened if needed so that
/// `yhat_lower <= yhat <= yhat_upper`.
pub fn postprocess(result: &ForecastResult) -> Result<Vec<ForecastRow>> {
    let dates = result.dates().ok_or_else(|| {
        ForecastError::DataError("Forecast has no dates attached".to_string())
    })?;
    let intervals = result.intervals().ok_or_else(|| {
        ForecastError::DataError("Forecast has no intervals attached".to_string())
    })?;

    let clipped: Vec<f64> = result.values().iter().map(|v| v.max(0.0)).collect();
    let smoothed = centered_moving_average(&clipped, SMOOTHING_WINDOW);

    Ok(dates
        .iter()
        .zip(smoothed.iter())
        .zip(intervals.iter())
        .map(|((&ds, &point), &(lower, upper))| {
            let yhat = point.round() as i64;
            let yhat_lower = (lower.max(0.0).round() as i64).min(yhat);
            let yhat_upper = (upper.max(0.0).round() as i64).max(yhat);
            ForecastRow {
                ds,
                yhat,
                yhat_lower,
                yhat_upper,
            }
        })
        .collect())
}
