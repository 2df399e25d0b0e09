//! Workout types and enums.
//!
//! A workout's status and its completed-activity feedback are one value:
//! [`WorkoutState`] only carries [`CompletedData`] in the `Completed` variant,
//! so a pending or missed workout can never hold stale feedback. The flat
//! `status` + `completedData` JSON shape is validated on the way in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Sport of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SportType {
    Cycling,
    Running,
    Swimming,
}

impl SportType {
    pub const ALL: [SportType; 3] = [SportType::Cycling, SportType::Running, SportType::Swimming];

    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SportType::Cycling => "Cycling",
            SportType::Running => "Running",
            SportType::Swimming => "Swimming",
        }
    }
}

impl std::fmt::Display for SportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Flat status tag, as stored alongside the workout body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    Pending,
    Completed,
    Missed,
}

impl std::fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkoutStatus::Pending => write!(f, "pending"),
            WorkoutStatus::Completed => write!(f, "completed"),
            WorkoutStatus::Missed => write!(f, "missed"),
        }
    }
}

/// Planned target of a workout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedData {
    /// Target duration in minutes
    #[serde(default)]
    pub duration_minutes: f64,
    /// Target Training Stress Score
    #[serde(default, rename = "plannedTSS")]
    pub planned_tss: f64,
    /// Target power in watts (cycling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_power: Option<u32>,
    /// Target pace: sec/km for running, sec/100m for swimming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pace: Option<f64>,
    /// Target heart rate in bpm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_heart_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlannedData {
    /// Planned block with a duration and TSS.
    pub fn new(duration_minutes: f64, planned_tss: f64) -> Self {
        Self {
            duration_minutes,
            planned_tss,
            ..Default::default()
        }
    }

    pub fn with_target_power(mut self, watts: u32) -> Self {
        self.target_power = Some(watts);
        self
    }

    pub fn with_target_pace(mut self, pace: f64) -> Self {
        self.target_pace = Some(pace);
        self
    }

    pub fn with_target_heart_rate(mut self, bpm: u32) -> Self {
        self.target_heart_rate = Some(bpm);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Per-sport measurements of a completed session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportMetrics {
    /// Training Stress Score reported for the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tss: Option<f64>,
    /// Average power in watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_power: Option<u32>,
    /// Average pace: sec/km for running, sec/100m for swimming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_pace: Option<f64>,
    /// Average heart rate in bpm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<u32>,
    /// Average cadence (rpm or spm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cadence: Option<u32>,
}

/// Feedback recorded when a workout is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedData {
    #[serde(default)]
    pub actual_duration_minutes: f64,
    #[serde(default)]
    pub actual_distance_km: f64,
    /// Rate of perceived effort (1-10)
    pub perceived_effort: u8,
    #[serde(default)]
    pub metrics: SportMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Platform id of the imported activity this feedback came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_activity_id: Option<i64>,
}

impl CompletedData {
    /// Validated feedback block.
    pub fn new(
        actual_duration_minutes: f64,
        actual_distance_km: f64,
        perceived_effort: u8,
    ) -> Result<Self, WorkoutError> {
        let data = Self {
            actual_duration_minutes,
            actual_distance_km,
            perceived_effort,
            metrics: SportMetrics::default(),
            notes: None,
            source_activity_id: None,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn with_metrics(mut self, metrics: SportMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_source_activity_id(mut self, activity_id: i64) -> Self {
        self.source_activity_id = Some(activity_id);
        self
    }

    /// Check RPE range and that measured quantities are finite and non-negative.
    pub fn validate(&self) -> Result<(), WorkoutError> {
        if !(1..=10).contains(&self.perceived_effort) {
            return Err(WorkoutError::InvalidPerceivedEffort(self.perceived_effort));
        }
        check_non_negative("actualDurationMinutes", self.actual_duration_minutes)?;
        check_non_negative("actualDistanceKm", self.actual_distance_km)?;
        if let Some(tss) = self.metrics.tss {
            check_non_negative("metrics.tss", tss)?;
        }
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), WorkoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WorkoutError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Status of a workout together with the data that status owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkoutState {
    #[default]
    Pending,
    Completed(CompletedData),
    Missed,
}

impl WorkoutState {
    pub fn status(&self) -> WorkoutStatus {
        match self {
            WorkoutState::Pending => WorkoutStatus::Pending,
            WorkoutState::Completed(_) => WorkoutStatus::Completed,
            WorkoutState::Missed => WorkoutStatus::Missed,
        }
    }
}

/// A scheduled training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkoutRecord", into = "WorkoutRecord")]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Calendar day the workout is scheduled on
    pub date: NaiveDate,
    pub sport: SportType,
    pub planned: PlannedData,
    state: WorkoutState,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Workout {
    /// Create a pending workout.
    pub fn new(date: NaiveDate, sport: SportType, planned: PlannedData) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            sport,
            planned,
            state: WorkoutState::Pending,
            created_at: Utc::now(),
        }
    }

    /// Build a workout in any state, validating completed feedback.
    pub fn with_state(
        date: NaiveDate,
        sport: SportType,
        planned: PlannedData,
        state: WorkoutState,
    ) -> Result<Self, WorkoutError> {
        if let WorkoutState::Completed(data) = &state {
            data.validate()?;
        }
        Ok(Self {
            state,
            ..Self::new(date, sport, planned)
        })
    }

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn status(&self) -> WorkoutStatus {
        self.state.status()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, WorkoutState::Completed(_))
    }

    /// Feedback, present only when completed.
    pub fn completed_data(&self) -> Option<&CompletedData> {
        match &self.state {
            WorkoutState::Completed(data) => Some(data),
            _ => None,
        }
    }

    /// `pending → completed` or `missed → completed`.
    pub fn complete(&mut self, data: CompletedData) -> Result<(), WorkoutError> {
        match self.state {
            WorkoutState::Pending | WorkoutState::Missed => {
                data.validate()?;
                self.state = WorkoutState::Completed(data);
                Ok(())
            }
            WorkoutState::Completed(_) => Err(self.invalid(WorkoutStatus::Completed)),
        }
    }

    /// `pending → missed`.
    pub fn mark_missed(&mut self) -> Result<(), WorkoutError> {
        match self.state {
            WorkoutState::Pending => {
                self.state = WorkoutState::Missed;
                Ok(())
            }
            _ => Err(self.invalid(WorkoutStatus::Missed)),
        }
    }

    /// Back to pending, dropping any completed feedback. No-op when pending.
    pub fn reset(&mut self) {
        self.state = WorkoutState::Pending;
    }

    /// Overwrite feedback on a completed workout without changing status.
    pub fn update_feedback(&mut self, data: CompletedData) -> Result<(), WorkoutError> {
        match &mut self.state {
            WorkoutState::Completed(existing) => {
                data.validate()?;
                *existing = data;
                Ok(())
            }
            _ => Err(WorkoutError::NotCompleted(self.id)),
        }
    }

    /// Move to another day, keeping the body and state.
    pub fn reschedule(&mut self, date: NaiveDate) {
        self.date = date;
    }

    fn invalid(&self, to: WorkoutStatus) -> WorkoutError {
        WorkoutError::InvalidTransition {
            from: self.status(),
            to,
        }
    }
}

/// Flat stored shape of a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub sport_type: SportType,
    pub status: WorkoutStatus,
    #[serde(default)]
    pub planned_data: PlannedData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_data: Option<CompletedData>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WorkoutRecord> for Workout {
    type Error = WorkoutError;

    fn try_from(record: WorkoutRecord) -> Result<Self, Self::Error> {
        let state = match (record.status, record.completed_data) {
            (WorkoutStatus::Completed, Some(data)) => {
                data.validate()?;
                WorkoutState::Completed(data)
            }
            (WorkoutStatus::Completed, None) => {
                return Err(WorkoutError::StatusMismatch(format!(
                    "workout {} is completed but has no completedData",
                    record.id
                )))
            }
            (status, Some(_)) => {
                return Err(WorkoutError::StatusMismatch(format!(
                    "workout {} is {} but carries completedData",
                    record.id, status
                )))
            }
            (WorkoutStatus::Pending, None) => WorkoutState::Pending,
            (WorkoutStatus::Missed, None) => WorkoutState::Missed,
        };

        Ok(Workout {
            id: record.id,
            date: record.date,
            sport: record.sport_type,
            planned: record.planned_data,
            state,
            created_at: record.created_at,
        })
    }
}

impl From<Workout> for WorkoutRecord {
    fn from(workout: Workout) -> Self {
        let status = workout.status();
        let completed_data = match workout.state {
            WorkoutState::Completed(data) => Some(data),
            _ => None,
        };
        WorkoutRecord {
            id: workout.id,
            date: workout.date,
            sport_type: workout.sport,
            status,
            planned_data: workout.planned,
            completed_data,
            created_at: workout.created_at,
        }
    }
}

/// Errors related to workout operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkoutError {
    /// Status change not allowed by the workout lifecycle
    #[error("Cannot move workout from {from} to {to}")]
    InvalidTransition {
        from: WorkoutStatus,
        to: WorkoutStatus,
    },

    /// Feedback edit on a workout that is not completed
    #[error("Workout {0} is not completed")]
    NotCompleted(Uuid),

    /// Status and completed data disagree
    #[error("Status mismatch: {0}")]
    StatusMismatch(String),

    /// RPE outside 1-10
    #[error("Perceived effort must be between 1 and 10, got {0}")]
    InvalidPerceivedEffort(u8),

    /// Invalid field value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Workout not found
    #[error("Workout not found: {0}")]
    NotFound(Uuid),

    /// Another workout already uses the id
    #[error("Duplicate workout id: {0}")]
    DuplicateId(Uuid),
}
