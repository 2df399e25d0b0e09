//! Training load aggregation over a set of workouts.
//!
//! Planned totals count every workout. Completed totals count only completed
//! workouts, crediting the session TSS when one was recorded and otherwise
//! scaling the planned TSS by actual over planned duration.
//!
//! Monotony is mean load divided by its population standard deviation, with
//! one load sample per completed workout plus a zero for every missed
//! workout that is already due. Every division is guarded: nothing here
//! returns NaN or infinity.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::workouts::types::{SportType, Workout, WorkoutState};

/// Aggregated totals for a set of workouts. Derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    #[serde(rename = "plannedTSS")]
    pub planned_tss: f64,
    #[serde(rename = "completedTSS")]
    pub completed_tss: f64,
    pub planned_duration_minutes: f64,
    pub actual_duration_minutes: f64,
    pub distance_km: f64,
    pub completed_count: usize,
    pub total_count: usize,
    /// Workout count per sport, every status
    pub per_sport_breakdown: BTreeMap<SportType, usize>,
    /// Actual minutes per sport, completed workouts only
    pub per_sport_duration: BTreeMap<SportType, f64>,
    pub monotony: f64,
}

/// Planned against actual minutes of one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// 1-12
    pub month: u32,
    pub planned_minutes: f64,
    pub actual_minutes: f64,
}

/// Workouts dated between `start` and `end`, both inclusive, in date order.
pub fn filter_by_date_range(workouts: &[Workout], start: NaiveDate, end: NaiveDate) -> Vec<&Workout> {
    let mut selected: Vec<&Workout> = workouts
        .iter()
        .filter(|w| w.date >= start && w.date <= end)
        .collect();
    selected.sort_by_key(|w| w.date);
    selected
}

/// TSS credited for a workout, `None` unless it is completed.
pub fn actual_tss(workout: &Workout) -> Option<f64> {
    let WorkoutState::Completed(data) = workout.state() else {
        return None;
    };

    if let Some(tss) = data.metrics.tss.filter(|t| t.is_finite() && *t > 0.0) {
        return Some(tss);
    }

    let planned_tss = non_negative(workout.planned.planned_tss);
    let planned_minutes = non_negative(workout.planned.duration_minutes);
    if planned_minutes > 0.0 {
        Some(non_negative(data.actual_duration_minutes) / planned_minutes * planned_tss)
    } else {
        Some(planned_tss)
    }
}

/// Aggregate a set of workouts. `today` decides which missed workouts are due.
pub fn aggregate<'a, I>(workouts: I, today: NaiveDate) -> PeriodStats
where
    I: IntoIterator<Item = &'a Workout>,
{
    let mut stats = PeriodStats::default();
    let mut loads = Vec::new();

    for workout in workouts {
        stats.total_count += 1;
        stats.planned_duration_minutes += non_negative(workout.planned.duration_minutes);
        stats.planned_tss += non_negative(workout.planned.planned_tss);
        *stats.per_sport_breakdown.entry(workout.sport).or_insert(0) += 1;

        match workout.state() {
            WorkoutState::Completed(data) => {
                let minutes = non_negative(data.actual_duration_minutes);
                let tss = actual_tss(workout).unwrap_or(0.0);

                stats.completed_count += 1;
                stats.actual_duration_minutes += minutes;
                stats.distance_km += non_negative(data.actual_distance_km);
                stats.completed_tss += tss;
                *stats.per_sport_duration.entry(workout.sport).or_insert(0.0) += minutes;
                loads.push(tss);
            }
            WorkoutState::Missed if workout.date <= today => loads.push(0.0),
            _ => {}
        }
    }

    stats.monotony = monotony(&loads);
    stats
}

/// Mean over population standard deviation; 0 for fewer than 2 samples or no spread.
pub fn monotony(loads: &[f64]) -> f64 {
    if loads.len() < 2 {
        return 0.0;
    }
    let n = loads.len() as f64;
    let mean = loads.iter().sum::<f64>() / n;
    let variance = loads.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev > f64::EPSILON * mean.abs().max(1.0) {
        mean / std_dev
    } else {
        0.0
    }
}

/// Completed share of workouts due on or before `today`; 0 when none are due.
pub fn compliance_rate(workouts: &[Workout], today: NaiveDate) -> f64 {
    let due: Vec<&Workout> = workouts.iter().filter(|w| w.date <= today).collect();
    if due.is_empty() {
        return 0.0;
    }
    let completed = due.iter().filter(|w| w.is_completed()).count();
    completed as f64 / due.len() as f64
}

/// Planned and actual minutes for each month of a year, January first.
pub fn monthly_breakdown(workouts: &[Workout], year: i32) -> [MonthSummary; 12] {
    let mut months: [MonthSummary; 12] = std::array::from_fn(|idx| MonthSummary {
        month: idx as u32 + 1,
        ..Default::default()
    });

    for workout in workouts.iter().filter(|w| w.date.year() == year) {
        let month = &mut months[workout.date.month0() as usize];
        month.planned_minutes += non_negative(workout.planned.duration_minutes);
        if let Some(data) = workout.completed_data() {
            month.actual_minutes += non_negative(data.actual_duration_minutes);
        }
    }

    months
}

/// A calendar grouping to aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarWindow {
    /// The week containing a day, starting on the given weekday.
    Week { containing: NaiveDate, starts_on: Weekday },
    /// A calendar month (1-12).
    Month { year: i32, month: u32 },
    Year(i32),
    /// Arbitrary inclusive range.
    Range { start: NaiveDate, end: NaiveDate },
}

impl CalendarWindow {
    /// First and last day of the window, `None` for an invalid month or year
    /// or a week that runs past the representable calendar.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            CalendarWindow::Week {
                containing,
                starts_on,
            } => {
                let offset = (7 + containing.weekday().num_days_from_monday()
                    - starts_on.num_days_from_monday())
                    % 7;
                let start = containing.checked_sub_days(Days::new(u64::from(offset)))?;
                Some((start, start.checked_add_days(Days::new(6))?))
            }
            CalendarWindow::Month { year, month } => {
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)?
                };
                Some((start, next.pred_opt()?))
            }
            CalendarWindow::Year(year) => Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            )),
            CalendarWindow::Range { start, end } => Some((start, end)),
        }
    }

    /// Stats for the workouts inside the window.
    pub fn stats(&self, workouts: &[Workout], today: NaiveDate) -> PeriodStats {
        match self.bounds() {
            Some((start, end)) => aggregate(filter_by_date_range(workouts, start, end), today),
            None => PeriodStats::default(),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
