//! RustCoach - Training coach core
//!
//! The performance model behind a personal training coach: estimates a
//! seven-zone power table from timed tests with the Critical Power model,
//! and aggregates training load (TSS, duration, distance, monotony,
//! per-sport breakdowns) over a schedule of planned and completed workouts.

pub mod metrics;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use metrics::analytics::{
    aggregate, estimate, filter_by_date_range, monthly_breakdown, AnalyticsError, FtpResult,
    PeriodStats, PowerTestSet, ZoneEstimator,
};
pub use storage::config::{AppConfig, AthleteProfile};
pub use workouts::{Schedule, Workout};
