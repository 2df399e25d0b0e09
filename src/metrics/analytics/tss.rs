//! Zone-aware Training Stress Score estimates for planned sessions.
//!
//! `TSS = hours × IF² × 100`, where the intensity factor comes from whichever
//! target the session carries: power against FTP, pace against threshold
//! pace, or heart rate against lactate threshold heart rate. Swimming uses
//! `IF³` since drag grows faster than linearly with speed.

use crate::metrics::rounding::round_half_up;
use crate::workouts::types::{PlannedData, SportType};

/// Intensity factor assumed when a session has no usable target.
pub const DEFAULT_INTENSITY_FACTOR: f64 = 0.65;

/// Share of max HR used as LTHR when none is known.
const LTHR_FROM_MAX_HR: f64 = 0.93;

/// Intensity factors outside this range are treated as bad input.
const MAX_INTENSITY_FACTOR: f64 = 2.0;

/// TSS from duration and intensity factor, unrounded.
pub fn tss_for(sport: SportType, duration_minutes: f64, intensity_factor: f64) -> f64 {
    if !duration_minutes.is_finite() || duration_minutes <= 0.0 || intensity_factor <= 0.0 {
        return 0.0;
    }
    let hours = duration_minutes / 60.0;
    let exponent = match sport {
        SportType::Swimming => 3,
        SportType::Cycling | SportType::Running => 2,
    };
    hours * intensity_factor.powi(exponent) * 100.0
}

/// Athlete thresholds used to turn targets into TSS.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TssCalculator {
    /// Functional Threshold Power in watts
    pub ftp: Option<u32>,
    /// Threshold run pace in sec/km
    pub threshold_run_pace: Option<f64>,
    /// Threshold swim pace in sec/100m
    pub threshold_swim_pace: Option<f64>,
    /// Lactate threshold heart rate in bpm
    pub lthr: Option<u32>,
}

impl TssCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ftp(mut self, ftp: u32) -> Self {
        self.ftp = Some(ftp).filter(|f| *f > 0);
        self
    }

    pub fn with_threshold_run_pace(mut self, secs_per_km: f64) -> Self {
        self.threshold_run_pace = Some(secs_per_km).filter(|p| *p > 0.0);
        self
    }

    pub fn with_threshold_swim_pace(mut self, secs_per_100m: f64) -> Self {
        self.threshold_swim_pace = Some(secs_per_100m).filter(|p| *p > 0.0);
        self
    }

    /// Set LTHR directly.
    pub fn with_lthr(mut self, lthr: u32) -> Self {
        self.lthr = Some(lthr).filter(|l| *l > 0);
        self
    }

    /// Derive LTHR from max HR when no explicit LTHR was set.
    pub fn with_max_hr(mut self, max_hr: u32) -> Self {
        if self.lthr.is_none() && max_hr > 0 {
            self.lthr = Some(round_half_up(max_hr as f64 * LTHR_FROM_MAX_HR) as u32);
        }
        self
    }

    /// Intensity factor of a planned session.
    ///
    /// Tried in order: sport-specific target (power or pace), heart rate,
    /// then [`DEFAULT_INTENSITY_FACTOR`].
    pub fn intensity_factor(&self, sport: SportType, planned: &PlannedData) -> f64 {
        let sport_specific = match sport {
            SportType::Cycling => ratio(planned.target_power.map(f64::from), self.ftp.map(f64::from)),
            // Faster pace is a smaller number, so threshold over target
            SportType::Running => ratio(self.threshold_run_pace, planned.target_pace),
            SportType::Swimming => ratio(self.threshold_swim_pace, planned.target_pace),
        };

        sport_specific
            .or_else(|| {
                ratio(
                    planned.target_heart_rate.map(f64::from),
                    self.lthr.map(f64::from),
                )
            })
            .unwrap_or(DEFAULT_INTENSITY_FACTOR)
    }

    /// Planned TSS, rounded half up.
    pub fn planned_tss(&self, sport: SportType, planned: &PlannedData) -> f64 {
        let intensity = self.intensity_factor(sport, planned);
        round_half_up(tss_for(sport, planned.duration_minutes, intensity))
    }

    /// TSS of a ridden session from its average power, if FTP is known.
    pub fn tss_from_power(&self, duration_minutes: f64, average_power: u32) -> Option<f64> {
        let intensity = ratio(Some(average_power as f64), self.ftp.map(f64::from))?;
        Some(round_half_up(tss_for(
            SportType::Cycling,
            duration_minutes,
            intensity,
        )))
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (num, den) = (numerator?, denominator?);
    if !(num.is_finite() && den.is_finite()) || num <= 0.0 || den <= 0.0 {
        return None;
    }
    let value = num / den;
    if value > MAX_INTENSITY_FACTOR {
        tracing::warn!("Ignoring implausible intensity factor {:.2}", value);
        return None;
    }
    Some(value)
}
