//! Training analytics.
//!
//! - Zone estimation from timed power tests (Critical Power / W' model)
//! - Zone-aware TSS estimates for planned sessions
//! - Period aggregation: totals, per-sport breakdown, monotony, compliance
//! - Training load (ATL/CTL/TSB/ACWR)

pub mod critical_power;
pub mod error;
pub mod load_aggregator;
pub mod training_load;
pub mod tss;
pub mod zone_estimator;

pub use critical_power::{CpModel, Regression};
pub use error::{AnalyticsError, AnalyticsResult};
pub use load_aggregator::{
    actual_tss, aggregate, compliance_rate, filter_by_date_range, monthly_breakdown, monotony,
    CalendarWindow, MonthSummary, PeriodStats,
};
pub use training_load::{daily_tss_series, Acwr, AcwrStatus, DailyLoad, TrainingLoadCalculator};
pub use tss::{tss_for, TssCalculator, DEFAULT_INTENSITY_FACTOR};
pub use zone_estimator::{
    estimate, EstimationMethod, FtpResult, PowerTestSet, SeasonMeta, TestDuration, ZoneEstimator,
};
