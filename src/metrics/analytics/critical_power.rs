//! Critical Power / W' model.
//!
//! The two-parameter model treats total work over a maximal effort as
//! `work = CP × t + W'`:
//! - Critical Power (CP): the highest power sustainable without tapping W'
//! - W' (W-prime): finite anaerobic work capacity in joules
//!
//! Fitting is an ordinary least squares regression of work against duration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{AnalyticsError, AnalyticsResult};
use crate::metrics::rounding::{round_half_up, round_watts};

/// Fitted Critical Power model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpModel {
    /// Critical Power in watts.
    pub cp: u32,
    /// W' (anaerobic capacity) in joules.
    pub w_prime: u32,
    /// Fit quality (R², 0-1).
    pub r_squared: f64,
}

/// Slope, intercept and R² of a least squares line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl CpModel {
    /// Fit from `(duration_secs, power_watts)` pairs.
    ///
    /// Needs at least two points with distinct durations and a positive
    /// slope. A negative intercept is clamped to zero W'.
    pub fn fit(points: &[(u32, u32)]) -> AnalyticsResult<Self> {
        let work_time: Vec<(f64, f64)> = points
            .iter()
            .map(|(secs, watts)| (*secs as f64, *watts as f64 * *secs as f64))
            .collect();

        let fit = linear_regression(&work_time)?;

        if !fit.slope.is_finite() || fit.slope <= 0.0 {
            return Err(AnalyticsError::DegenerateRegression(format!(
                "critical power must be positive, got {:.1}",
                fit.slope
            )));
        }

        let w_prime = round_half_up(fit.intercept);
        if w_prime < 0.0 {
            tracing::warn!(
                "Negative W' ({:.0} J) from power tests, clamping to 0",
                fit.intercept
            );
        }

        let model = Self {
            cp: round_watts(fit.slope),
            w_prime: w_prime.max(0.0) as u32,
            r_squared: fit.r_squared,
        };
        tracing::debug!(
            "Fitted CP model: CP={}W W'={}J R²={:.3}",
            model.cp,
            model.w_prime,
            model.r_squared
        );
        Ok(model)
    }

    /// Time to exhaustion at a power above CP. `None` at or below CP.
    pub fn time_to_exhaustion(&self, power_watts: u32) -> Option<Duration> {
        if power_watts <= self.cp {
            return None;
        }
        let secs = self.w_prime as f64 / (power_watts - self.cp) as f64;
        Some(Duration::from_secs_f64(secs))
    }

    /// Sustainable power for a given duration.
    pub fn power_at_duration(&self, duration: Duration) -> u32 {
        let secs = duration.as_secs_f64();
        if secs <= 0.0 {
            return 0;
        }
        round_watts(self.cp as f64 + self.w_prime as f64 / secs)
    }

    /// W' left after riding at a power for a duration. Negative once depleted.
    pub fn w_prime_remaining(&self, power_watts: u32, duration: Duration) -> i64 {
        if power_watts <= self.cp {
            return self.w_prime as i64;
        }
        let spent = (power_watts - self.cp) as f64 * duration.as_secs_f64();
        self.w_prime as i64 - round_half_up(spent) as i64
    }
}

/// Ordinary least squares over `(x, y)` pairs.
pub fn linear_regression(points: &[(f64, f64)]) -> AnalyticsResult<Regression> {
    if points.len() < 2 {
        return Err(AnalyticsError::DegenerateRegression(format!(
            "need at least 2 points, got {}",
            points.len()
        )));
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < 1e-10 {
        return Err(AnalyticsError::DegenerateRegression(
            "zero denominator (all durations identical)".to_string(),
        ));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };

    Ok(Regression {
        slope,
        intercept,
        r_squared,
    })
}
