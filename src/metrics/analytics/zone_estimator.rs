//! Zone estimation from timed power tests.
//!
//! Two or more tests are fitted with the Critical Power model and CP is used
//! directly as FTP. A single test falls back to a fixed ratio table. Either
//! way the result carries a fresh seven-zone table and the metadata needed to
//! explain how it was produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::critical_power::CpModel;
use super::error::{AnalyticsError, AnalyticsResult};
use crate::metrics::rounding::round_watts;
use crate::metrics::zones::{ZoneTable, DEFAULT_ZONE_CEILING_WATTS};

/// Named test durations an athlete can enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestDuration {
    #[serde(rename = "5min")]
    FiveMinute,
    #[serde(rename = "8min")]
    EightMinute,
    #[serde(rename = "15min")]
    FifteenMinute,
    #[serde(rename = "20min")]
    TwentyMinute,
}

impl TestDuration {
    /// All durations, shortest first.
    pub const ALL: [TestDuration; 4] = [
        TestDuration::FiveMinute,
        TestDuration::EightMinute,
        TestDuration::FifteenMinute,
        TestDuration::TwentyMinute,
    ];

    /// Test length in seconds.
    pub fn seconds(&self) -> u32 {
        match self {
            TestDuration::FiveMinute => 300,
            TestDuration::EightMinute => 480,
            TestDuration::FifteenMinute => 900,
            TestDuration::TwentyMinute => 1200,
        }
    }

    /// FTP as a fraction of the test's average power when it is the only test.
    pub fn single_test_ratio(&self) -> f64 {
        match self {
            TestDuration::FiveMinute => 0.82,
            TestDuration::EightMinute => 0.90,
            TestDuration::FifteenMinute => 0.93,
            TestDuration::TwentyMinute => 0.95,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestDuration::FiveMinute => "5min",
            TestDuration::EightMinute => "8min",
            TestDuration::FifteenMinute => "15min",
            TestDuration::TwentyMinute => "20min",
        }
    }
}

impl std::fmt::Display for TestDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sparse set of test results in watts. Zero or absent means "no test".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerTestSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p5min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p8min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p15min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p20min: Option<u32>,
}

impl PowerTestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one test result.
    pub fn with(mut self, duration: TestDuration, watts: u32) -> Self {
        let slot = match duration {
            TestDuration::FiveMinute => &mut self.p5min,
            TestDuration::EightMinute => &mut self.p8min,
            TestDuration::FifteenMinute => &mut self.p15min,
            TestDuration::TwentyMinute => &mut self.p20min,
        };
        *slot = Some(watts);
        self
    }

    /// Power for a duration, `None` when absent or zero.
    pub fn get(&self, duration: TestDuration) -> Option<u32> {
        let value = match duration {
            TestDuration::FiveMinute => self.p5min,
            TestDuration::EightMinute => self.p8min,
            TestDuration::FifteenMinute => self.p15min,
            TestDuration::TwentyMinute => self.p20min,
        };
        value.filter(|watts| *watts > 0)
    }

    /// Usable tests, shortest duration first.
    pub fn valid_tests(&self) -> Vec<(TestDuration, u32)> {
        TestDuration::ALL
            .iter()
            .filter_map(|d| self.get(*d).map(|watts| (*d, watts)))
            .collect()
    }
}

/// How an FTP value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimationMethod {
    /// Linear regression of work over duration across two or more tests.
    CriticalPowerRegression,
    /// Fixed ratio applied to one test.
    SingleTestEstimation,
}

/// Provenance of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonMeta {
    pub calculated_at: DateTime<Utc>,
    /// W' in joules, 0 when unknown.
    pub w_prime: u32,
    pub critical_power: u32,
    pub method: EstimationMethod,
    /// Tests used, shortest first.
    pub source_tests: Vec<TestDuration>,
    /// R² of the regression, absent for single-test estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
}

/// FTP with its zone table. Replaces the previous result on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpResult {
    pub ftp: u32,
    pub zones: ZoneTable,
    pub season_data: SeasonMeta,
}

/// Turns power tests into an [`FtpResult`].
#[derive(Debug, Clone, Copy)]
pub struct ZoneEstimator {
    zone_ceiling: u32,
}

impl ZoneEstimator {
    pub fn new() -> Self {
        Self {
            zone_ceiling: DEFAULT_ZONE_CEILING_WATTS,
        }
    }

    /// Use a custom z7 upper bound.
    pub fn with_zone_ceiling(zone_ceiling: u32) -> Self {
        Self { zone_ceiling }
    }

    /// Estimate FTP and zones, stamped with the current time.
    pub fn estimate(&self, tests: &PowerTestSet) -> AnalyticsResult<FtpResult> {
        self.estimate_at(tests, Utc::now())
    }

    /// Estimate FTP and zones with an explicit timestamp.
    pub fn estimate_at(
        &self,
        tests: &PowerTestSet,
        calculated_at: DateTime<Utc>,
    ) -> AnalyticsResult<FtpResult> {
        let valid = tests.valid_tests();

        let season_data = match valid.as_slice() {
            [] => return Err(AnalyticsError::NoValidTest),
            [(duration, watts)] => {
                let ftp = round_watts(*watts as f64 * duration.single_test_ratio());
                tracing::debug!("Single {} test: {}W -> FTP {}W", duration, watts, ftp);
                SeasonMeta {
                    calculated_at,
                    w_prime: 0,
                    critical_power: ftp,
                    method: EstimationMethod::SingleTestEstimation,
                    source_tests: vec![*duration],
                    r_squared: None,
                }
            }
            points => {
                let pairs: Vec<(u32, u32)> =
                    points.iter().map(|(d, watts)| (d.seconds(), *watts)).collect();
                let model = CpModel::fit(&pairs)?;
                tracing::debug!(
                    "CP regression over {} tests: CP={}W W'={}J",
                    points.len(),
                    model.cp,
                    model.w_prime
                );
                SeasonMeta {
                    calculated_at,
                    w_prime: model.w_prime,
                    critical_power: model.cp,
                    method: EstimationMethod::CriticalPowerRegression,
                    source_tests: points.iter().map(|(d, _)| *d).collect(),
                    r_squared: Some(model.r_squared),
                }
            }
        };

        let ftp = season_data.critical_power;
        let zones = ZoneTable::from_ftp_with(
            ftp,
            tests.get(TestDuration::FiveMinute),
            self.zone_ceiling,
        );

        Ok(FtpResult {
            ftp,
            zones,
            season_data,
        })
    }
}

impl Default for ZoneEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimate with default settings.
pub fn estimate(tests: &PowerTestSet) -> AnalyticsResult<FtpResult> {
    ZoneEstimator::new().estimate(tests)
}
