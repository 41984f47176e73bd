//! Utility functions for the sales_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};

/// Percentile of a sample using linear interpolation between closest ranks
///
/// `q` is a fraction in `[0, 1]`. Returns `None` for an empty sample.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Centered moving average
///
/// Each output is the mean of the values within `window / 2` positions on
/// either side. Near the ends the window is truncated to what exists.
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(values.len());
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// The `horizon` calendar days following `last`
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as i64)
        .map(|offset| last + Duration::days(offset))
        .collect()
}

/// Solve `a * x = b` for a dense `n x n` row-major matrix
///
/// Gaussian elimination with partial pivoting.
pub fn solve_linear_system(a: &[f64], b: &[f64], n: usize) -> Result<Vec<f64>> {
    if a.len() != n * n || b.len() != n {
        return Err(ForecastError::MathError(format!(
            "System dimensions don't match: matrix {} values, vector {} values, n = {}",
            a.len(),
            b.len(),
            n
        )));
    }

    let mut m = a.to_vec();
    let mut rhs = b.to_vec();

    for col in 0..n {
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if m[row * n + col].abs() > m[pivot_row * n + col].abs() {
                pivot_row = row;
            }
        }

        if m[pivot_row * n + col].abs() < 1e-12 {
            return Err(ForecastError::MathError(
                "Singular system: features are linearly dependent".to_string(),
            ));
        }

        if pivot_row != col {
            for j in 0..n {
                m.swap(col * n + j, pivot_row * n + j);
            }
            rhs.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = m[row * n + col] / m[col * n + col];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                m[row * n + j] -= factor * m[col * n + j];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|j| m[row * n + j] * x[j]).sum();
        x[row] = (rhs[row] - tail) / m[row * n + row];
    }

    Ok(x)
}
