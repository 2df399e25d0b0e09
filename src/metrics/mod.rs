//! Metrics module for zones and training analytics.

pub mod analytics;
pub mod rounding;
pub mod zones;

pub use zones::{HeartRateZones, Zone, ZoneTable};

pub use analytics::{
    aggregate, estimate, filter_by_date_range, monthly_breakdown, AnalyticsError, CalendarWindow,
    EstimationMethod, FtpResult, PeriodStats, PowerTestSet, TestDuration, TrainingLoadCalculator,
    TssCalculator, ZoneEstimator,
};
