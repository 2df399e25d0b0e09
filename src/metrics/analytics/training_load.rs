//! Performance Management Chart (ATL/CTL/TSB) and ACWR.
//!
//! - ATL (Acute Training Load): 7-day exponentially weighted moving average
//! - CTL (Chronic Training Load): 42-day exponentially weighted moving average
//! - TSB (Training Stress Balance): CTL - ATL
//! - ACWR (Acute:Chronic Workload Ratio): ATL / CTL
//!
//! Daily input is the TSS credited to completed workouts on each day.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::load_aggregator::actual_tss;
use crate::workouts::types::Workout;

/// Training load on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    /// Credited TSS for the day.
    pub tss: f64,
    pub atl: f64,
    pub ctl: f64,
    pub tsb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcwrStatus {
    /// Below 0.8: detraining risk.
    Undertrained,
    /// 0.8 - 1.3.
    Optimal,
    /// 1.3 - 1.5.
    Caution,
    /// Above 1.5: load spike.
    HighRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acwr {
    pub ratio: f64,
    pub status: AcwrStatus,
}

impl Acwr {
    pub fn recommendation(&self) -> &'static str {
        match self.status {
            AcwrStatus::Undertrained => {
                "Training load is low. Consider increasing training volume gradually."
            }
            AcwrStatus::Optimal => "Training load is in the optimal zone.",
            AcwrStatus::Caution => {
                "Training load is elevated. Monitor for signs of fatigue and consider recovery."
            }
            AcwrStatus::HighRisk => {
                "Training load spike detected. Reduce intensity for the next few days."
            }
        }
    }
}

/// EWMA-based load model.
#[derive(Debug, Clone, Copy)]
pub struct TrainingLoadCalculator {
    atl_days: f64,
    ctl_days: f64,
}

impl TrainingLoadCalculator {
    /// Standard 7/42 day constants.
    pub fn new() -> Self {
        Self {
            atl_days: 7.0,
            ctl_days: 42.0,
        }
    }

    pub fn with_constants(atl_days: f64, ctl_days: f64) -> Self {
        Self { atl_days, ctl_days }
    }

    /// Next day's load from the previous day and today's TSS. With no
    /// previous day the model starts from zero fatigue and fitness.
    pub fn calculate_day(
        &self,
        prev: Option<&DailyLoad>,
        date: NaiveDate,
        tss: f64,
    ) -> DailyLoad {
        // new = old × (1 - k) + value × k, k = 2 / (N + 1)
        let atl_k = 2.0 / (self.atl_days + 1.0);
        let ctl_k = 2.0 / (self.ctl_days + 1.0);

        let (prev_atl, prev_ctl) = prev.map_or((0.0, 0.0), |p| (p.atl, p.ctl));
        let atl = prev_atl * (1.0 - atl_k) + tss * atl_k;
        let ctl = prev_ctl * (1.0 - ctl_k) + tss * ctl_k;

        DailyLoad {
            date,
            tss,
            atl,
            ctl,
            tsb: ctl - atl,
        }
    }

    /// Load history over consecutive daily TSS values.
    pub fn calculate_history(&self, daily_tss: &[(NaiveDate, f64)]) -> Vec<DailyLoad> {
        let mut prev: Option<DailyLoad> = None;
        daily_tss
            .iter()
            .map(|(date, tss)| {
                let load = self.calculate_day(prev.as_ref(), *date, *tss);
                prev = Some(load);
                load
            })
            .collect()
    }

    /// Load history for the `days` days ending on `end`, `None` when the
    /// first day falls before the representable calendar.
    pub fn history_ending(
        &self,
        workouts: &[Workout],
        end: NaiveDate,
        days: u32,
    ) -> Option<Vec<DailyLoad>> {
        let start = end.checked_sub_days(Days::new(u64::from(days.max(1) - 1)))?;
        Some(self.history_from_workouts(workouts, start, end))
    }

    /// Load history for every day from `start` to `end`, rest days included.
    pub fn history_from_workouts(
        &self,
        workouts: &[Workout],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<DailyLoad> {
        self.calculate_history(&daily_tss_series(workouts, start, end))
    }

    pub fn acwr(&self, atl: f64, ctl: f64) -> Acwr {
        let ratio = if ctl > 0.0 { atl / ctl } else { 0.0 };

        let status = if ratio < 0.8 {
            AcwrStatus::Undertrained
        } else if ratio <= 1.3 {
            AcwrStatus::Optimal
        } else if ratio <= 1.5 {
            AcwrStatus::Caution
        } else {
            AcwrStatus::HighRisk
        };

        Acwr { ratio, status }
    }

    /// ACWR is only meaningful after four weeks of history.
    pub fn has_sufficient_history(&self, days: usize) -> bool {
        days >= 28
    }
}

impl Default for TrainingLoadCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Credited TSS per day from `start` to `end`, zero on days without completed work.
pub fn daily_tss_series(
    workouts: &[Workout],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for workout in workouts.iter().filter(|w| w.date >= start && w.date <= end) {
        if let Some(tss) = actual_tss(workout) {
            *by_day.entry(workout.date).or_insert(0.0) += tss;
        }
    }

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, by_day.get(&d).copied().unwrap_or(0.0)))
        .collect()
}
