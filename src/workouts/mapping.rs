//! Mapping collaborator output into workouts.
//!
//! Two sources feed the schedule from outside:
//! - plan generation returns [`WorkoutDraft`]s that become pending workouts,
//!   with TSS precomputed from the athlete's thresholds when the draft has none
//! - platform import returns [`ImportedActivity`] records that become
//!   [`CompletedData`] on the matching scheduled workout

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::Schedule;
use super::types::{
    CompletedData, PlannedData, SportMetrics, SportType, Workout, WorkoutError, WorkoutStatus,
};
use crate::metrics::analytics::tss::TssCalculator;
use crate::metrics::rounding::round_half_up;

/// RPE recorded for imports that carry no perceived effort.
const DEFAULT_IMPORT_RPE: u8 = 5;

/// Workout draft returned by the plan generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDraft {
    pub date: NaiveDate,
    pub sport_type: SportType,
    #[serde(default)]
    pub duration_minutes: f64,
    #[serde(default, rename = "plannedTSS")]
    pub planned_tss: Option<f64>,
    #[serde(default)]
    pub target_power: Option<u32>,
    #[serde(default)]
    pub target_pace: Option<f64>,
    #[serde(default)]
    pub target_heart_rate: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Pending workout from a draft. A missing or non-positive TSS is estimated.
pub fn workout_from_draft(draft: WorkoutDraft, tss: &TssCalculator) -> Workout {
    let mut planned = PlannedData {
        duration_minutes: draft.duration_minutes.max(0.0),
        planned_tss: 0.0,
        target_power: draft.target_power,
        target_pace: draft.target_pace,
        target_heart_rate: draft.target_heart_rate,
        description: draft.description,
    };
    planned.planned_tss = match draft.planned_tss.filter(|t| t.is_finite() && *t > 0.0) {
        Some(given) => given,
        None => tss.planned_tss(draft.sport_type, &planned),
    };

    Workout::new(draft.date, draft.sport_type, planned)
}

/// Pending workouts for a whole generated plan.
pub fn workouts_from_drafts(drafts: Vec<WorkoutDraft>, tss: &TssCalculator) -> Vec<Workout> {
    drafts
        .into_iter()
        .map(|draft| workout_from_draft(draft, tss))
        .collect()
}

/// Completed activity fetched from the fitness platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedActivity {
    pub id: i64,
    /// Platform activity type, e.g. "Ride", "VirtualRide", "Run", "Swim"
    #[serde(rename = "type", default)]
    pub activity_type: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub moving_time: i64,
    /// Meters
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub average_watts: Option<f64>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub perceived_effort: Option<u8>,
}

impl ImportedActivity {
    /// Sport for the platform's activity type, `None` for unsupported types.
    pub fn sport(&self) -> Option<SportType> {
        match self.activity_type.as_str() {
            "Ride" | "VirtualRide" | "EBikeRide" | "GravelRide" | "MountainBikeRide" => {
                Some(SportType::Cycling)
            }
            "Run" | "VirtualRun" | "TrailRun" => Some(SportType::Running),
            "Swim" => Some(SportType::Swimming),
            _ => None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start_date.date_naive()
    }
}

/// Feedback block for an imported activity.
///
/// Pace is sec/km for running and sec/100m for swimming. TSS comes from
/// average power when FTP is known.
pub fn completed_data_from_activity(
    activity: &ImportedActivity,
    tss: &TssCalculator,
) -> Result<CompletedData, WorkoutError> {
    let sport = activity.sport().ok_or_else(|| WorkoutError::InvalidValue {
        field: "type".to_string(),
        value: activity.activity_type.clone(),
    })?;

    let minutes = activity.moving_time.max(0) as f64 / 60.0;
    let meters = activity.distance.filter(|d| d.is_finite() && *d > 0.0);
    let average_power = activity
        .average_watts
        .filter(|w| w.is_finite() && *w > 0.0)
        .map(|w| round_half_up(w) as u32);

    let average_pace = meters.and_then(|m| {
        let secs = activity.moving_time as f64;
        match sport {
            SportType::Running if secs > 0.0 => Some(round_half_up(secs / (m / 1000.0))),
            SportType::Swimming if secs > 0.0 => Some(round_half_up(secs / (m / 100.0))),
            _ => None,
        }
    });

    let session_tss = match (sport, average_power) {
        (SportType::Cycling, Some(power)) => tss.tss_from_power(minutes, power),
        _ => None,
    };

    let metrics = SportMetrics {
        tss: session_tss,
        average_power,
        average_pace,
        average_heart_rate: positive_rounded(activity.average_heartrate),
        average_cadence: positive_rounded(activity.average_cadence),
    };

    Ok(CompletedData::new(
        minutes,
        meters.unwrap_or(0.0) / 1000.0,
        activity.perceived_effort.unwrap_or(DEFAULT_IMPORT_RPE),
    )?
    .with_metrics(metrics)
    .with_source_activity_id(activity.id))
}

fn positive_rounded(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| round_half_up(v) as u32)
}

/// First open (pending or missed) workout on the activity's day and sport.
pub fn find_matching_workout(workouts: &[Workout], activity: &ImportedActivity) -> Option<Uuid> {
    let sport = activity.sport()?;
    let date = activity.date();
    workouts
        .iter()
        .find(|w| w.date == date && w.sport == sport && w.status() != WorkoutStatus::Completed)
        .map(|w| w.id)
}

/// Completed workout whose feedback came from the given platform activity.
pub fn find_imported_workout(workouts: &[Workout], activity_id: i64) -> Option<Uuid> {
    workouts
        .iter()
        .find(|w| {
            w.completed_data()
                .is_some_and(|data| data.source_activity_id == Some(activity_id))
        })
        .map(|w| w.id)
}

/// Record an imported activity on the schedule.
///
/// An activity already on the schedule refreshes that workout's feedback.
/// Otherwise it completes the matching planned workout, or adds a new
/// completed workout whose plan mirrors what was done when nothing was
/// scheduled.
pub fn import_activity(
    schedule: &mut Schedule,
    activity: &ImportedActivity,
    tss: &TssCalculator,
) -> Result<Uuid, WorkoutError> {
    let data = completed_data_from_activity(activity, tss)?;

    if let Some(id) = find_imported_workout(schedule.workouts(), activity.id) {
        schedule.update_feedback(id, data)?;
        tracing::debug!(
            "Activity {} already imported as {}, feedback refreshed",
            activity.id,
            id
        );
        return Ok(id);
    }

    if let Some(id) = find_matching_workout(schedule.workouts(), activity) {
        schedule.complete(id, data)?;
        return Ok(id);
    }

    let sport = activity.sport().ok_or_else(|| WorkoutError::InvalidValue {
        field: "type".to_string(),
        value: activity.activity_type.clone(),
    })?;
    let mut planned = PlannedData::new(data.actual_duration_minutes, 0.0);
    planned.planned_tss = data
        .metrics
        .tss
        .unwrap_or_else(|| tss.planned_tss(sport, &planned));

    let mut workout = Workout::new(activity.date(), sport, planned);
    workout.complete(data)?;
    tracing::info!(
        "Imported unscheduled {} activity {} on {}",
        sport,
        activity.id,
        workout.date
    );
    schedule.add(workout)
}
