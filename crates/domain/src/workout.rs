use crate::{
    ExerciseID, Location, StorageError, Tick, UpdateError, ValidationError, one_rep_max,
};

pub trait WorkoutRepository {
    fn read_workouts(&self, exercise_id: &ExerciseID) -> Vec<WorkoutSet>;
    fn read_all_workouts(&self) -> Vec<WorkoutSet>;
    fn read_workout(&self, tick: Tick) -> Option<WorkoutSet>;
    fn create_workout(&self, workout: WorkoutSet) -> Result<WorkoutSet, StorageError>;
    /// Overwrite exercise, weight and reps of the workout with the same tick.
    fn replace_workout(&self, workout: WorkoutSet) -> Result<WorkoutSet, UpdateError>;
}

/// One recorded set of an exercise.
///
/// The tick is both the time the set was saved and its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub tick: Tick,
    pub exercise: ExerciseID,
    pub weight: f32,
    pub reps: u32,
    /// Milliseconds the exercise timer had been running when the set was saved, zero if the
    /// timer was stopped.
    pub exercise_duration: i64,
    pub location: Option<Location>,
}

impl WorkoutSet {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn work(&self) -> f32 {
        self.weight * self.reps as f32
    }

    #[must_use]
    pub fn one_rep_max(&self) -> f32 {
        one_rep_max(self.weight, self.reps)
    }
}

/// Reject sets without any work.
#[allow(clippy::cast_precision_loss)]
pub fn validate_work(weight: f32, reps: u32) -> Result<(), ValidationError> {
    if weight * reps as f32 > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NoWork)
    }
}

/// Sort workouts by tick, most recent first.
pub fn sort_by_tick_desc(workouts: &mut [WorkoutSet]) {
    workouts.sort_by(|a, b| b.tick.cmp(&a.tick));
}

/// The most recent workout, if any.
#[must_use]
pub fn latest(workouts: &[WorkoutSet]) -> Option<&WorkoutSet> {
    workouts.iter().max_by_key(|w| w.tick)
}
