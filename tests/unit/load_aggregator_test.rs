//! Unit tests for period aggregation and calendar windows.

use chrono::{NaiveDate, Weekday};
use rustcoach::metrics::analytics::{
    actual_tss, aggregate, compliance_rate, filter_by_date_range, monotony, monthly_breakdown,
    CalendarWindow,
};
use rustcoach::workouts::{CompletedData, PlannedData, SportMetrics, SportType, Workout};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn done(minutes: f64, km: f64, tss: Option<f64>) -> CompletedData {
    CompletedData::new(minutes, km, 6)
        .unwrap()
        .with_metrics(SportMetrics {
            tss,
            ..Default::default()
        })
}

/// Mon 3 June to Sun 9 June 2024, viewed on Thursday the 6th.
fn training_week() -> Vec<Workout> {
    let mut ride = Workout::new(date(6, 3), SportType::Cycling, PlannedData::new(60.0, 50.0));
    ride.complete(done(60.0, 30.0, Some(70.0))).unwrap();

    let mut run = Workout::new(date(6, 4), SportType::Running, PlannedData::new(45.0, 40.0));
    run.complete(done(30.0, 6.0, None)).unwrap();

    let mut swim = Workout::new(date(6, 5), SportType::Swimming, PlannedData::new(40.0, 30.0));
    swim.mark_missed().unwrap();

    let long_ride = Workout::new(date(6, 6), SportType::Cycling, PlannedData::new(90.0, 80.0));

    let mut long_run = Workout::new(date(6, 9), SportType::Running, PlannedData::new(60.0, 50.0));
    long_run.mark_missed().unwrap();

    vec![long_run, ride, swim, long_ride, run]
}

fn today() -> NaiveDate {
    date(6, 6)
}

#[test]
fn test_week_totals() {
    let workouts = training_week();
    let stats = aggregate(&workouts, today());

    assert_eq!(stats.total_count, 5);
    assert_eq!(stats.completed_count, 2);
    assert_eq!(stats.planned_tss, 250.0);
    assert_eq!(stats.planned_duration_minutes, 295.0);
    assert_eq!(stats.actual_duration_minutes, 90.0);
    assert_eq!(stats.distance_km, 36.0);
    // 70 reported + 30/45 of 40 planned
    assert!((stats.completed_tss - (70.0 + 80.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn test_per_sport_maps() {
    let workouts = training_week();
    let stats = aggregate(&workouts, today());

    assert_eq!(stats.per_sport_breakdown[&SportType::Cycling], 2);
    assert_eq!(stats.per_sport_breakdown[&SportType::Running], 2);
    assert_eq!(stats.per_sport_breakdown[&SportType::Swimming], 1);

    assert_eq!(stats.per_sport_duration[&SportType::Cycling], 60.0);
    assert_eq!(stats.per_sport_duration[&SportType::Running], 30.0);
    assert!(!stats.per_sport_duration.contains_key(&SportType::Swimming));
}

#[test]
fn test_monotony_counts_due_misses_only() {
    let workouts = training_week();
    let stats = aggregate(&workouts, today());

    // Sunday's miss is not due yet
    let expected = monotony(&[70.0, 80.0 / 3.0, 0.0]);
    assert!((stats.monotony - expected).abs() < 1e-9);

    // Once Sunday has passed it adds another zero
    let stats = aggregate(&workouts, date(6, 10));
    let expected = monotony(&[70.0, 80.0 / 3.0, 0.0, 0.0]);
    assert!((stats.monotony - expected).abs() < 1e-9);
}

#[test]
fn test_monotony_guards() {
    assert_eq!(monotony(&[]), 0.0);
    assert_eq!(monotony(&[80.0]), 0.0);
    assert_eq!(monotony(&[50.0, 50.0, 50.0]), 0.0);
    assert_eq!(monotony(&[0.0, 0.0]), 0.0);

    // mean 50, sd 10
    assert!((monotony(&[40.0, 60.0]) - 5.0).abs() < 1e-9);
}

#[test]
fn test_empty_period() {
    let empty: Vec<Workout> = Vec::new();
    let stats = aggregate(&empty, today());

    assert_eq!(stats.total_count, 0);
    assert_eq!(stats.completed_tss, 0.0);
    assert_eq!(stats.monotony, 0.0);
    assert!(stats.per_sport_breakdown.is_empty());
}

#[test]
fn test_actual_tss_rules() {
    let mut reported_zero =
        Workout::new(date(6, 1), SportType::Cycling, PlannedData::new(60.0, 60.0));
    reported_zero.complete(done(30.0, 15.0, Some(0.0))).unwrap();
    // Zero counts as "not reported" and falls back to scaling
    assert_eq!(actual_tss(&reported_zero), Some(30.0));

    let mut unplanned = Workout::new(date(6, 1), SportType::Running, PlannedData::new(0.0, 35.0));
    unplanned.complete(done(40.0, 8.0, None)).unwrap();
    assert_eq!(actual_tss(&unplanned), Some(35.0));

    let pending = Workout::new(date(6, 1), SportType::Running, PlannedData::new(30.0, 20.0));
    assert_eq!(actual_tss(&pending), None);
}

#[test]
fn test_compliance_rate() {
    let workouts = training_week();
    // Due: Mon-Thu, two of them completed
    assert_eq!(compliance_rate(&workouts, today()), 0.5);
    assert_eq!(compliance_rate(&workouts, date(6, 1)), 0.0);
    assert_eq!(compliance_rate(&[], today()), 0.0);
}

#[test]
fn test_filter_is_inclusive_and_sorted() {
    let workouts = training_week();
    let selected = filter_by_date_range(&workouts, date(6, 4), date(6, 6));

    let dates: Vec<NaiveDate> = selected.iter().map(|w| w.date).collect();
    assert_eq!(dates, vec![date(6, 4), date(6, 5), date(6, 6)]);

    assert!(filter_by_date_range(&workouts, date(6, 10), date(6, 20)).is_empty());
}

#[test]
fn test_monthly_breakdown() {
    let mut workouts = training_week();
    let mut january = Workout::new(date(1, 15), SportType::Cycling, PlannedData::new(45.0, 35.0));
    january.complete(done(50.0, 20.0, None)).unwrap();
    workouts.push(january);
    workouts.push(Workout::new(
        NaiveDate::from_ymd_opt(2023, 6, 5).unwrap(),
        SportType::Running,
        PlannedData::new(999.0, 10.0),
    ));

    let months = monthly_breakdown(&workouts, 2024);

    assert_eq!(months.len(), 12);
    assert_eq!(months[0].month, 1);
    assert_eq!(months[0].planned_minutes, 45.0);
    assert_eq!(months[0].actual_minutes, 50.0);
    assert_eq!(months[5].planned_minutes, 295.0);
    assert_eq!(months[5].actual_minutes, 90.0);
    assert_eq!(months[11].month, 12);
    assert_eq!(months[11].planned_minutes, 0.0);
}

#[test]
fn test_week_window_bounds() {
    let monday_start = CalendarWindow::Week {
        containing: date(6, 5),
        starts_on: Weekday::Mon,
    };
    assert_eq!(monday_start.bounds(), Some((date(6, 3), date(6, 9))));

    let sunday_start = CalendarWindow::Week {
        containing: date(6, 5),
        starts_on: Weekday::Sun,
    };
    assert_eq!(sunday_start.bounds(), Some((date(6, 2), date(6, 8))));

    // The start day itself opens its own week
    let on_start = CalendarWindow::Week {
        containing: date(6, 3),
        starts_on: Weekday::Mon,
    };
    assert_eq!(on_start.bounds(), Some((date(6, 3), date(6, 9))));
}

#[test]
fn test_month_and_year_bounds() {
    assert_eq!(
        CalendarWindow::Month { year: 2024, month: 2 }.bounds(),
        Some((date(2, 1), date(2, 29)))
    );
    assert_eq!(
        CalendarWindow::Month { year: 2024, month: 12 }.bounds(),
        Some((date(12, 1), date(12, 31)))
    );
    assert_eq!(CalendarWindow::Month { year: 2024, month: 13 }.bounds(), None);
    assert_eq!(
        CalendarWindow::Year(2024).bounds(),
        Some((date(1, 1), date(12, 31)))
    );
}

#[test]
fn test_window_stats() {
    let workouts = training_week();
    let window = CalendarWindow::Range {
        start: date(6, 3),
        end: date(6, 4),
    };
    let stats = window.stats(&workouts, today());
    assert_eq!(stats.total_count, 2);
    assert_eq!(stats.completed_count, 2);

    let invalid = CalendarWindow::Month { year: 2024, month: 0 };
    assert_eq!(invalid.stats(&workouts, today()).total_count, 0);
}

#[test]
fn test_period_stats_json() {
    let workouts = training_week();
    let json = serde_json::to_value(aggregate(&workouts, today())).unwrap();

    assert_eq!(json["plannedTSS"], 250.0);
    assert_eq!(json["completedCount"], 2);
    assert_eq!(json["perSportBreakdown"]["cycling"], 2);
    assert_eq!(json["perSportDuration"]["running"], 30.0);
}
