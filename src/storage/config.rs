//! Athlete profile and application configuration.
//!
//! Configuration lives in `config.toml` under the platform data directory.
//! The athlete profile is a JSON document owned by the caller; this module
//! only defines its shape and how a fresh FTP estimate replaces the old one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::analytics::error::AnalyticsResult;
use crate::metrics::analytics::tss::TssCalculator;
use crate::metrics::analytics::zone_estimator::{FtpResult, PowerTestSet, ZoneEstimator};
use crate::metrics::zones::{HeartRateZones, DEFAULT_ZONE_CEILING_WATTS};

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekStart::Monday => write!(f, "Monday"),
            WeekStart::Sunday => write!(f, "Sunday"),
        }
    }
}

/// Athlete profile with test results and the latest FTP estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteProfile {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Weight in kilograms
    #[serde(default)]
    pub weight_kg: Option<f32>,
    /// Maximum heart rate in bpm
    #[serde(default)]
    pub max_hr: Option<u32>,
    /// Resting heart rate in bpm
    #[serde(default)]
    pub resting_hr: Option<u32>,
    /// Lactate threshold heart rate in bpm
    #[serde(default)]
    pub lthr: Option<u32>,
    /// Threshold run pace in sec/km
    #[serde(default)]
    pub threshold_run_pace: Option<f64>,
    /// Threshold swim pace in sec/100m
    #[serde(default)]
    pub threshold_swim_pace: Option<f64>,
    #[serde(default)]
    pub power_tests: PowerTestSet,
    /// Most recent estimate; replaced, never versioned
    #[serde(default)]
    pub ftp_result: Option<FtpResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for AthleteProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: "Athlete".to_string(),
            weight_kg: None,
            max_hr: None,
            resting_hr: None,
            lthr: None,
            threshold_run_pace: None,
            threshold_swim_pace: None,
            power_tests: PowerTestSet::default(),
            ftp_result: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl AthleteProfile {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Current FTP, if an estimate exists.
    pub fn ftp(&self) -> Option<u32> {
        self.ftp_result.as_ref().map(|r| r.ftp)
    }

    /// Replace the stored estimate.
    pub fn apply_ftp_result(&mut self, result: FtpResult) -> &FtpResult {
        tracing::info!(
            "FTP updated: {:?} -> {}W ({:?})",
            self.ftp(),
            result.ftp,
            result.season_data.method
        );
        self.updated_at = Utc::now();
        self.ftp_result.insert(result)
    }

    /// Re-estimate from the stored power tests and keep the result.
    ///
    /// On error the previous estimate is left untouched.
    pub fn recalculate_zones(&mut self, estimator: &ZoneEstimator) -> AnalyticsResult<&FtpResult> {
        let result = estimator.estimate(&self.power_tests)?;
        Ok(self.apply_ftp_result(result))
    }

    /// Heart rate zones when both rates are known.
    pub fn hr_zones(&self) -> Option<HeartRateZones> {
        HeartRateZones::from_karvonen(self.max_hr?, self.resting_hr?)
    }

    /// TSS calculator seeded with this athlete's thresholds.
    pub fn tss_calculator(&self) -> TssCalculator {
        let mut calc = TssCalculator::new();
        if let Some(ftp) = self.ftp() {
            calc = calc.with_ftp(ftp);
        }
        if let Some(pace) = self.threshold_run_pace {
            calc = calc.with_threshold_run_pace(pace);
        }
        if let Some(pace) = self.threshold_swim_pace {
            calc = calc.with_threshold_swim_pace(pace);
        }
        if let Some(lthr) = self.lthr {
            calc = calc.with_lthr(lthr);
        }
        if let Some(max_hr) = self.max_hr {
            calc = calc.with_max_hr(max_hr);
        }
        calc
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// First day of calendar weeks
    pub week_starts_on: WeekStart,
    /// Upper bound of power zone 7 in watts
    pub zone_ceiling_watts: u32,
    /// Profile document, relative to the data directory
    pub profile_file: String,
    /// Schedule document, relative to the data directory
    pub schedule_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            week_starts_on: WeekStart::Monday,
            zone_ceiling_watts: DEFAULT_ZONE_CEILING_WATTS,
            profile_file: "profile.json".to_string(),
            schedule_file: "schedule.json".to_string(),
        }
    }
}

impl AppConfig {
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(&self.profile_file)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.data_dir.join(&self.schedule_file)
    }

    /// Zone estimator using the configured z7 ceiling.
    pub fn zone_estimator(&self) -> ZoneEstimator {
        ZoneEstimator::with_zone_ceiling(self.zone_ceiling_watts)
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rustcoach", "RustCoach")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from a file; a missing file yields defaults.
///
/// The data directory is the file's parent directory.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.data_dir = data_dir;

    Ok(config)
}

/// Save configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to a file, creating parent directories.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
