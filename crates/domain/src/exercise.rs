use derive_more::{Deref, Display};

use crate::{CreateError, Name, Tick, UpdateError};

pub trait ExerciseRepository {
    fn read_exercises(&self) -> Vec<Exercise>;
    fn read_exercise(&self, id: &ExerciseID) -> Option<Exercise>;
    fn create_exercise(&self, exercise: Exercise) -> Result<Exercise, CreateError>;
    fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    /// Change the id of an exercise and retarget all of its workouts.
    ///
    /// Renaming onto the id of another existing exercise merges both exercises.
    fn rename_exercise(&self, id: &ExerciseID, new_id: ExerciseID)
    -> Result<Exercise, UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub last_performed: Tick,
    pub report_options: ReportOptions,
}

impl Exercise {
    #[must_use]
    pub fn new(id: ExerciseID, last_performed: Tick) -> Self {
        Self {
            id,
            last_performed,
            report_options: ReportOptions::default(),
        }
    }

    #[must_use]
    pub fn is_performed(&self) -> bool {
        !self.last_performed.is_zero()
    }
}

/// The exercise name, which also serves as its identity.
#[derive(Deref, Debug, Display, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Name> for ExerciseID {
    fn from(value: Name) -> Self {
        Self(value.into())
    }
}

impl From<ExerciseID> for String {
    fn from(value: ExerciseID) -> Self {
        value.0
    }
}

/// Selection of the aggregate rows shown in the report of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReportOptions {
    pub show_1rm: bool,
    pub show_max: bool,
    pub show_sum: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_1rm: true,
            show_max: true,
            show_sum: true,
        }
    }
}

/// Sort exercises by the time they were last performed, most recent first.
pub fn sort_by_recency(exercises: &mut [Exercise]) {
    exercises.sort_by(|a, b| b.last_performed.cmp(&a.last_performed));
}
