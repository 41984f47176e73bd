//! Additive trend plus seasonality model for daily sales
//!
//! The fitted curve is
//!
//! ```text
//! y(t) = a + b * t + weekly(t) + yearly(t)
//! ```
//!
//! where `t` is the day offset from the first observation scaled to `[0, 1]`
//! over the training span, and the seasonal terms are Fourier series with
//! periods of 7 and 365.25 days. Weekly terms are used once the history covers
//! two weeks, yearly terms once it covers two years. Coefficients are estimated
//! by ridge-regularised least squares on the max-scaled series.

use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::utils::{future_dates, solve_linear_system};
use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

const WEEKLY_PERIOD: f64 = 7.0;
const YEARLY_PERIOD: f64 = 365.25;
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;
const YEARLY_MIN_SPAN_DAYS: i64 = 730;
const RIDGE: f64 = 1e-4;

/// Default width of the uncertainty interval
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.8;

/// Trend plus weekly/yearly seasonality model
#[derive(Debug, Clone)]
pub struct SeasonalTrend {
    /// Name of the model
    name: String,
    /// Fourier order of the weekly component
    weekly_order: usize,
    /// Fourier order of the yearly component
    yearly_order: usize,
    /// Probability mass covered by the uncertainty interval
    interval_width: f64,
}

/// Trained trend plus seasonality model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalTrend {
    name: String,
    /// First training day, offset zero
    origin: NaiveDate,
    /// Last training day
    last_date: NaiveDate,
    /// Training span in days used to scale the trend
    span_days: f64,
    weekly_order: usize,
    yearly_order: usize,
    coefficients: Vec<f64>,
    /// Divisor applied to the series before fitting
    y_scale: f64,
    /// In-sample residual standard deviation, unscaled
    sigma: f64,
    /// Two-sided normal quantile for the interval width
    z: f64,
    observations: usize,
}

impl Default for SeasonalTrend {
    fn default() -> Self {
        Self {
            name: "Seasonal Trend (weekly=3, yearly=10, interval=0.8)".to_string(),
            weekly_order: 3,
            yearly_order: 10,
            interval_width: DEFAULT_INTERVAL_WIDTH,
        }
    }
}

impl SeasonalTrend {
    /// Create a new model
    pub fn new(weekly_order: usize, yearly_order: usize, interval_width: f64) -> Result<Self> {
        if interval_width <= 0.0 || interval_width >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }
        if weekly_order > 3 {
            return Err(ForecastError::InvalidParameter(
                "Weekly Fourier order must be at most 3".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "Seasonal Trend (weekly={}, yearly={}, interval={})",
                weekly_order, yearly_order, interval_width
            ),
            weekly_order,
            yearly_order,
            interval_width,
        })
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }
}

fn fourier_terms(features: &mut Vec<f64>, day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * day / period;
        features.push(angle.sin());
        features.push(angle.cos());
    }
}

fn design_row(
    day: f64,
    span_days: f64,
    weekly_order: usize,
    yearly_order: usize,
) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + 2 * (weekly_order + yearly_order));
    row.push(1.0);
    row.push(day / span_days);
    fourier_terms(&mut row, day, WEEKLY_PERIOD, weekly_order);
    fourier_terms(&mut row, day, YEARLY_PERIOD, yearly_order);
    row
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl ForecastModel for SeasonalTrend {
    type Trained = TrainedSeasonalTrend;

    fn train(&self, data: &SalesSeries) -> Result<Self::Trained> {
        let (origin, last_date) = match (data.first_date(), data.last_date()) {
            (Some(first), Some(last)) if data.len() >= 2 => (first, last),
            _ => {
                return Err(ForecastError::DataError(format!(
                    "Need at least 2 observations to fit, got {}",
                    data.len()
                )))
            }
        };

        let span = (last_date - origin).num_days();
        let span_days = span.max(1) as f64;
        let weekly_order = if span >= WEEKLY_MIN_SPAN_DAYS {
            self.weekly_order
        } else {
            0
        };
        let yearly_order = if span >= YEARLY_MIN_SPAN_DAYS {
            self.yearly_order
        } else {
            0
        };

        let y_scale = data
            .values()
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let rows: Vec<Vec<f64>> = data
            .dates()
            .iter()
            .map(|d| {
                let day = (*d - origin).num_days() as f64;
                design_row(day, span_days, weekly_order, yearly_order)
            })
            .collect();
        let p = rows[0].len();

        // Normal equations with a ridge penalty on everything but the intercept.
        let mut xtx = vec![0.0; p * p];
        let mut xty = vec![0.0; p];
        for (row, &y) in rows.iter().zip(data.values().iter()) {
            let y = y / y_scale;
            for i in 0..p {
                xty[i] += row[i] * y;
                for j in 0..p {
                    xtx[i * p + j] += row[i] * row[j];
                }
            }
        }
        for i in 1..p {
            xtx[i * p + i] += RIDGE;
        }

        let coefficients = solve_linear_system(&xtx, &xty, p)?;

        let sse: f64 = rows
            .iter()
            .zip(data.values().iter())
            .map(|(row, &y)| (y - dot(row, &coefficients) * y_scale).powi(2))
            .sum();
        let dof = data.len().saturating_sub(p).max(1) as f64;
        let sigma = (sse / dof).sqrt();

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::MathError(format!("Standard normal: {}", e)))?;
        let z = normal.inverse_cdf(0.5 + self.interval_width / 2.0);

        Ok(TrainedSeasonalTrend {
            name: self.name.clone(),
            origin,
            last_date,
            span_days,
            weekly_order,
            yearly_order,
            coefficients,
            y_scale,
            sigma,
            z,
            observations: data.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalTrend {
    fn value_at(&self, date: NaiveDate) -> f64 {
        let day = (date - self.origin).num_days() as f64;
        let row = design_row(day, self.span_days, self.weekly_order, self.yearly_order);
        dot(&row, &self.coefficients) * self.y_scale
    }

    /// In-sample residual standard deviation
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Whether weekly seasonality was fitted
    pub fn has_weekly(&self) -> bool {
        self.weekly_order > 0
    }

    /// Whether yearly seasonality was fitted
    pub fn has_yearly(&self) -> bool {
        self.yearly_order > 0
    }
}

impl TrainedForecastModel for TrainedSeasonalTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let dates = future_dates(self.last_date, horizon);
        let n = self.observations as f64;

        let mut values = Vec::with_capacity(horizon);
        let mut intervals = Vec::with_capacity(horizon);
        for (step, date) in dates.iter().enumerate() {
            let value = self.value_at(*date);
            // Spread grows with distance from the training data.
            let margin = self.z * self.sigma * (1.0 + (step + 1) as f64 / n).sqrt();
            values.push(value);
            intervals.push((value - margin, value + margin));
        }

        ForecastResult::new_with_intervals(values, horizon, intervals)?.with_dates(dates)
    }

    fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    fn name(&self) -> &str {
        &self.name
    }
}
