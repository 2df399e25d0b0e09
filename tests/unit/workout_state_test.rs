//! Unit tests for the workout status lifecycle and stored shape.

use chrono::NaiveDate;
use rustcoach::workouts::{
    CompletedData, PlannedData, SportMetrics, SportType, Workout, WorkoutError, WorkoutState,
    WorkoutStatus,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
}

fn ride() -> Workout {
    Workout::new(day(), SportType::Cycling, PlannedData::new(60.0, 55.0))
}

fn feedback(rpe: u8) -> CompletedData {
    CompletedData::new(58.0, 31.5, rpe).unwrap()
}

#[test]
fn test_pending_to_completed() {
    let mut workout = ride();
    workout.complete(feedback(6)).unwrap();

    assert_eq!(workout.status(), WorkoutStatus::Completed);
    assert_eq!(workout.completed_data().unwrap().perceived_effort, 6);
}

#[test]
fn test_missed_can_still_be_completed() {
    let mut workout = ride();
    workout.mark_missed().unwrap();
    assert_eq!(workout.status(), WorkoutStatus::Missed);
    assert!(workout.completed_data().is_none());

    workout.complete(feedback(4)).unwrap();
    assert!(workout.is_completed());
}

#[test]
fn test_completed_cannot_be_missed() {
    let mut workout = ride();
    workout.complete(feedback(6)).unwrap();
    assert_eq!(
        workout.mark_missed(),
        Err(WorkoutError::InvalidTransition {
            from: WorkoutStatus::Completed,
            to: WorkoutStatus::Missed,
        })
    );
}

#[test]
fn test_double_completion_rejected() {
    let mut workout = ride();
    workout.complete(feedback(6)).unwrap();
    assert!(matches!(
        workout.complete(feedback(7)),
        Err(WorkoutError::InvalidTransition { .. })
    ));
    // First feedback kept
    assert_eq!(workout.completed_data().unwrap().perceived_effort, 6);
}

#[test]
fn test_reset_clears_feedback() {
    let mut workout = ride();
    workout.complete(feedback(6)).unwrap();
    workout.reset();

    assert_eq!(workout.status(), WorkoutStatus::Pending);
    assert!(workout.completed_data().is_none());

    // Resetting a pending workout changes nothing
    workout.reset();
    assert_eq!(workout.state(), &WorkoutState::Pending);
}

#[test]
fn test_update_feedback_keeps_status() {
    let mut workout = ride();
    assert_eq!(
        workout.update_feedback(feedback(5)),
        Err(WorkoutError::NotCompleted(workout.id))
    );

    workout.complete(feedback(5)).unwrap();
    workout
        .update_feedback(feedback(8).with_notes("Legs heavy"))
        .unwrap();

    let data = workout.completed_data().unwrap();
    assert_eq!(workout.status(), WorkoutStatus::Completed);
    assert_eq!(data.perceived_effort, 8);
    assert_eq!(data.notes.as_deref(), Some("Legs heavy"));
}

#[test]
fn test_perceived_effort_range() {
    assert_eq!(
        CompletedData::new(30.0, 5.0, 0),
        Err(WorkoutError::InvalidPerceivedEffort(0))
    );
    assert_eq!(
        CompletedData::new(30.0, 5.0, 11),
        Err(WorkoutError::InvalidPerceivedEffort(11))
    );
    assert!(CompletedData::new(30.0, 5.0, 1).is_ok());
    assert!(CompletedData::new(30.0, 5.0, 10).is_ok());
}

#[test]
fn test_negative_duration_rejected() {
    assert!(matches!(
        CompletedData::new(-5.0, 5.0, 5),
        Err(WorkoutError::InvalidValue { .. })
    ));
}

#[test]
fn test_reschedule_keeps_state() {
    let mut workout = ride();
    workout.mark_missed().unwrap();
    let later = NaiveDate::from_ymd_opt(2024, 4, 12).unwrap();
    workout.reschedule(later);
    assert_eq!(workout.date, later);
    assert_eq!(workout.status(), WorkoutStatus::Missed);
}

#[test]
fn test_stored_shape() {
    let mut workout = ride();
    workout
        .complete(feedback(6).with_metrics(SportMetrics {
            tss: Some(62.0),
            average_power: Some(210),
            ..Default::default()
        }))
        .unwrap();

    let json = serde_json::to_value(&workout).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["sportType"], "cycling");
    assert_eq!(json["date"], "2024-04-10");
    assert_eq!(json["plannedData"]["plannedTSS"], 55.0);
    assert_eq!(json["completedData"]["metrics"]["tss"], 62.0);

    let back: Workout = serde_json::from_value(json).unwrap();
    assert_eq!(back, workout);
}

#[test]
fn test_pending_record_has_no_completed_data() {
    let json = serde_json::to_value(ride()).unwrap();
    assert_eq!(json["status"], "pending");
    assert!(json.get("completedData").is_none());
}

#[test]
fn test_mismatched_record_rejected() {
    let completed_without_data = r#"{
        "id": "6f1c3f0e-4a51-4d8e-9a0b-2f5f0d6b8a11",
        "date": "2024-04-10",
        "sportType": "running",
        "status": "completed",
        "plannedData": {"durationMinutes": 45, "plannedTSS": 40}
    }"#;
    assert!(serde_json::from_str::<Workout>(completed_without_data).is_err());

    let missed_with_data = r#"{
        "id": "6f1c3f0e-4a51-4d8e-9a0b-2f5f0d6b8a11",
        "date": "2024-04-10",
        "sportType": "running",
        "status": "missed",
        "plannedData": {"durationMinutes": 45, "plannedTSS": 40},
        "completedData": {"actualDurationMinutes": 40, "perceivedEffort": 5}
    }"#;
    assert!(serde_json::from_str::<Workout>(missed_with_data).is_err());
}

#[test]
fn test_record_without_created_at_loads() {
    let json = r#"{
        "id": "6f1c3f0e-4a51-4d8e-9a0b-2f5f0d6b8a11",
        "date": "2024-04-10",
        "sportType": "swimming",
        "status": "pending",
        "plannedData": {"durationMinutes": 45, "plannedTSS": 40}
    }"#;
    let workout: Workout = serde_json::from_str(json).unwrap();
    assert_eq!(workout.sport, SportType::Swimming);
    assert_eq!(workout.planned.duration_minutes, 45.0);
}
