//! RustCoach - Training coach core
//!
//! Command line entry point. Reads the profile and schedule JSON documents,
//! runs the zone estimator or load aggregator, and prints JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rustcoach::metrics::analytics::{
    compliance_rate, monthly_breakdown, CalendarWindow, PeriodStats, PowerTestSet, TestDuration,
    TrainingLoadCalculator,
};
use rustcoach::storage::config::{load_config, load_config_from, AppConfig, AthleteProfile};
use rustcoach::workouts::{
    import_activity, workouts_from_drafts, ImportedActivity, Schedule, WorkoutDraft,
};

#[derive(Parser)]
#[command(name = "rustcoach", version, about = "Training zones and load from the command line")]
struct Cli {
    /// Config file (defaults to the platform data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate FTP and power zones from test results
    Zones(ZonesArgs),
    /// Aggregate training load over a calendar window
    Stats(StatsArgs),
    /// Planned vs actual minutes per month
    Season {
        #[command(flatten)]
        input: ScheduleInput,
        #[arg(long)]
        year: i32,
    },
    /// Fitness, fatigue and form over the last days
    Load {
        #[command(flatten)]
        input: ScheduleInput,
        #[arg(long, default_value_t = 42)]
        days: u32,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Add generated workout drafts to the schedule
    Plan {
        #[command(flatten)]
        input: ScheduleInput,
        /// JSON array of workout drafts
        #[arg(long)]
        drafts: PathBuf,
    },
    /// Record imported platform activities on the schedule
    Import {
        #[command(flatten)]
        input: ScheduleInput,
        /// JSON array of activities
        #[arg(long)]
        activities: PathBuf,
    },
}

#[derive(Args)]
struct ZonesArgs {
    #[arg(long)]
    p5: Option<u32>,
    #[arg(long)]
    p8: Option<u32>,
    #[arg(long)]
    p15: Option<u32>,
    #[arg(long)]
    p20: Option<u32>,
    /// Use the profile's tests and store the result back into it
    #[arg(long, conflicts_with_all = ["p5", "p8", "p15", "p20"])]
    from_profile: bool,
}

#[derive(Args)]
struct ScheduleInput {
    /// Schedule JSON (defaults to the configured schedule file)
    #[arg(long)]
    schedule: Option<PathBuf>,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    input: ScheduleInput,
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    /// Week containing this day
    #[arg(long)]
    week: Option<NaiveDate>,
    /// Month as YYYY-MM
    #[arg(long, value_parser = parse_month)]
    month: Option<(i32, u32)>,
    #[arg(long)]
    year: Option<i32>,
    /// Reference day for due workouts (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(flatten)]
    stats: PeriodStats,
    compliance_rate: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    tracing::debug!("Data directory: {}", config.data_dir.display());

    match cli.command {
        Command::Zones(args) => zones(&config, args),
        Command::Stats(args) => stats(&config, args),
        Command::Season { input, year } => {
            let schedule = read_schedule(&config, &input)?;
            print_json(&monthly_breakdown(schedule.workouts(), year))
        }
        Command::Load { input, days, today } => {
            let schedule = read_schedule(&config, &input)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let calc = TrainingLoadCalculator::new();
            let Some(history) = calc.history_ending(schedule.workouts(), today, days) else {
                bail!("{} days before {} is outside the supported calendar", days, today);
            };
            let (atl, ctl) = history.last().map_or((0.0, 0.0), |d| (d.atl, d.ctl));
            let acwr = calc.acwr(atl, ctl);
            print_json(&serde_json::json!({
                "history": history,
                "acwr": acwr,
                "recommendation": acwr.recommendation(),
            }))
        }
        Command::Plan { input, drafts } => {
            let mut schedule = read_schedule(&config, &input)?;
            let profile = read_profile(&config)?;
            let drafts: Vec<WorkoutDraft> = read_json(&drafts)?;
            let count = drafts.len();
            for workout in workouts_from_drafts(drafts, &profile.tss_calculator()) {
                schedule.add(workout)?;
            }
            write_json(&schedule_path(&config, &input), &schedule)?;
            tracing::info!("Added {} planned workouts", count);
            Ok(())
        }
        Command::Import { input, activities } => {
            let mut schedule = read_schedule(&config, &input)?;
            let profile = read_profile(&config)?;
            let activities: Vec<ImportedActivity> = read_json(&activities)?;
            let tss = profile.tss_calculator();
            for activity in &activities {
                match import_activity(&mut schedule, activity, &tss) {
                    Ok(id) => tracing::debug!("Activity {} recorded as {}", activity.id, id),
                    Err(e) => tracing::warn!("Skipping activity {}: {}", activity.id, e),
                }
            }
            write_json(&schedule_path(&config, &input), &schedule)
        }
    }
}

fn zones(config: &AppConfig, args: ZonesArgs) -> Result<()> {
    let estimator = config.zone_estimator();

    if args.from_profile {
        let mut profile = read_profile(config)?;
        let result = profile
            .recalculate_zones(&estimator)
            .context("Could not estimate zones from profile tests")?
            .clone();
        write_json(&config.profile_path(), &profile)?;
        return print_json(&result);
    }

    let mut tests = PowerTestSet::new();
    for (duration, value) in [
        (TestDuration::FiveMinute, args.p5),
        (TestDuration::EightMinute, args.p8),
        (TestDuration::FifteenMinute, args.p15),
        (TestDuration::TwentyMinute, args.p20),
    ] {
        if let Some(watts) = value {
            tests = tests.with(duration, watts);
        }
    }

    let result = estimator
        .estimate(&tests)
        .context("Enter at least one test result (--p5, --p8, --p15 or --p20)")?;
    print_json(&result)
}

fn stats(config: &AppConfig, args: StatsArgs) -> Result<()> {
    let schedule = read_schedule(config, &args.input)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let window = match (args.from.zip(args.to), args.week, args.month, args.year) {
        (Some((start, end)), None, None, None) => CalendarWindow::Range { start, end },
        (None, Some(day), None, None) => CalendarWindow::Week {
            containing: day,
            starts_on: config.week_starts_on.weekday(),
        },
        (None, None, Some((year, month)), None) => CalendarWindow::Month { year, month },
        (None, None, None, Some(year)) => CalendarWindow::Year(year),
        (None, None, None, None) => CalendarWindow::Week {
            containing: today,
            starts_on: config.week_starts_on.weekday(),
        },
        _ => bail!("Choose one of --from/--to, --week, --month or --year"),
    };

    let (start, end) = window
        .bounds()
        .context("Calendar window does not exist")?;
    let in_window: Vec<_> = schedule
        .between(start, end)
        .into_iter()
        .cloned()
        .collect();

    print_json(&StatsReport {
        start,
        end,
        stats: window.stats(schedule.workouts(), today),
        compliance_rate: compliance_rate(&in_window, today),
    })
}

fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got {value}"))?;
    let year: i32 = year.parse().map_err(|_| format!("invalid year in {value}"))?;
    let month: u32 = month.parse().map_err(|_| format!("invalid month in {value}"))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month must be 1-12, got {month}"));
    }
    Ok((year, month))
}

fn schedule_path(config: &AppConfig, input: &ScheduleInput) -> PathBuf {
    input
        .schedule
        .clone()
        .unwrap_or_else(|| config.schedule_path())
}

fn read_schedule(config: &AppConfig, input: &ScheduleInput) -> Result<Schedule> {
    let path = schedule_path(config, input);
    if !path.exists() {
        tracing::info!("No schedule at {}, starting empty", path.display());
        return Ok(Schedule::new());
    }
    read_json(&path)
}

fn read_profile(config: &AppConfig) -> Result<AthleteProfile> {
    let path = config.profile_path();
    if !path.exists() {
        tracing::info!("No profile at {}, using defaults", path.display());
        return Ok(AthleteProfile::default());
    }
    read_json(&path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Whole-document write through a temporary file and rename.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
