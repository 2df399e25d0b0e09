//! Training schedule: the collection that owns every workout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{CompletedData, Workout, WorkoutError};
use crate::metrics::analytics::load_aggregator::filter_by_date_range;

/// Ordered collection of workouts keyed by id.
///
/// Several workouts may share a date (one per sport, or doubles).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleDocument")]
pub struct Schedule {
    workouts: Vec<Workout>,
}

/// Stored shape; loading re-sorts by date and rejects duplicate ids.
#[derive(Deserialize)]
struct ScheduleDocument {
    #[serde(default)]
    workouts: Vec<Workout>,
}

impl TryFrom<ScheduleDocument> for Schedule {
    type Error = WorkoutError;

    fn try_from(document: ScheduleDocument) -> Result<Self, Self::Error> {
        Schedule::from_workouts(document.workouts)
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from workouts, rejecting duplicate ids.
    pub fn from_workouts(workouts: Vec<Workout>) -> Result<Self, WorkoutError> {
        let mut schedule = Self::new();
        for workout in workouts {
            schedule.add(workout)?;
        }
        Ok(schedule)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Add a workout, keeping the list sorted by date.
    pub fn add(&mut self, workout: Workout) -> Result<Uuid, WorkoutError> {
        if self.get(workout.id).is_some() {
            return Err(WorkoutError::DuplicateId(workout.id));
        }
        let id = workout.id;
        let idx = self.workouts.partition_point(|w| w.date <= workout.date);
        self.workouts.insert(idx, workout);
        Ok(id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Workout, WorkoutError> {
        self.workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WorkoutError::NotFound(id))
    }

    /// Delete a workout and hand it back.
    pub fn remove(&mut self, id: Uuid) -> Result<Workout, WorkoutError> {
        let idx = self
            .workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or(WorkoutError::NotFound(id))?;
        tracing::info!("Removed workout {}", id);
        Ok(self.workouts.remove(idx))
    }

    /// Move a workout to another day.
    pub fn reschedule(&mut self, id: Uuid, date: NaiveDate) -> Result<(), WorkoutError> {
        let mut workout = self.remove(id)?;
        let from = workout.date;
        workout.reschedule(date);
        self.add(workout)?;
        tracing::info!("Rescheduled workout {} from {} to {}", id, from, date);
        Ok(())
    }

    pub fn complete(&mut self, id: Uuid, data: CompletedData) -> Result<(), WorkoutError> {
        self.get_mut(id)?.complete(data)?;
        tracing::info!("Workout {} completed", id);
        Ok(())
    }

    pub fn mark_missed(&mut self, id: Uuid) -> Result<(), WorkoutError> {
        self.get_mut(id)?.mark_missed()?;
        tracing::info!("Workout {} missed", id);
        Ok(())
    }

    /// Undo completion or a miss.
    pub fn reset(&mut self, id: Uuid) -> Result<(), WorkoutError> {
        self.get_mut(id)?.reset();
        tracing::info!("Workout {} reset to pending", id);
        Ok(())
    }

    pub fn update_feedback(&mut self, id: Uuid, data: CompletedData) -> Result<(), WorkoutError> {
        self.get_mut(id)?.update_feedback(data)
    }

    /// Workouts on a given day.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Workout> {
        self.workouts.iter().filter(|w| w.date == date).collect()
    }

    /// Workouts between two days, inclusive, in date order.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Workout> {
        filter_by_date_range(&self.workouts, start, end)
    }
}
