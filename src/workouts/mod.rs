//! Workout module for scheduled sessions and their lifecycle.

pub mod mapping;
pub mod schedule;
pub mod types;

pub use mapping::{
    completed_data_from_activity, find_imported_workout, find_matching_workout, import_activity,
    workout_from_draft, workouts_from_drafts, ImportedActivity, WorkoutDraft,
};
pub use schedule::Schedule;
pub use types::{
    CompletedData, PlannedData, SportMetrics, SportType, Workout, WorkoutError, WorkoutState,
    WorkoutStatus,
};
