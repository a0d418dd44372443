use std::{cell::RefCell, collections::BTreeMap};

use liftlog_domain::{
    self as domain, CreateError, ExerciseID, StorageError, Tick, UpdateError, Value,
};
use log::{error, warn};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Backend, Key, model};

/// The record store.
///
/// All collections are loaded once at construction and served from memory afterwards. Every
/// mutation writes the whole affected collection back to the backend. The in-memory state is
/// only changed after the backend accepted the write.
///
/// Persisted records that cannot be read are kept aside and written back unchanged, so a single
/// broken record never costs the rest of the collection.
pub struct Store<B: Backend> {
    backend: B,
    exercises: RefCell<Vec<domain::Exercise>>,
    workouts: RefCell<Vec<domain::WorkoutSet>>,
    globals: RefCell<BTreeMap<String, Value>>,
    unreadable_exercises: RefCell<Vec<serde_json::Value>>,
    unreadable_workouts: RefCell<Vec<serde_json::Value>>,
}

impl<B: Backend> Store<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        let (exercises, unreadable_exercises) =
            load_records::<model::Exercise>(&backend, Key::Exercises);
        let (workouts, unreadable_workouts) =
            load_records::<model::WorkoutSet>(&backend, Key::Workouts);
        let globals = load::<model::Globals>(&backend, Key::Globals)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| match model::global_value(&value) {
                Some(value) => Some((key, value)),
                None => {
                    warn!("dropping non-primitive global {key}: {value}");
                    None
                }
            })
            .collect();
        Self {
            backend,
            exercises: RefCell::new(exercises.into_iter().map(domain::Exercise::from).collect()),
            workouts: RefCell::new(workouts.into_iter().map(domain::WorkoutSet::from).collect()),
            globals: RefCell::new(globals),
            unreadable_exercises: RefCell::new(unreadable_exercises),
            unreadable_workouts: RefCell::new(unreadable_workouts),
        }
    }

    /// Replace all exercises and all workouts.
    ///
    /// If the workouts cannot be written, the previous exercises are written back and the store
    /// stays unchanged.
    pub fn import(
        &self,
        exercises: Vec<domain::Exercise>,
        workouts: Vec<domain::WorkoutSet>,
    ) -> Result<(), StorageError> {
        self.write_records(
            Key::Exercises,
            exercises.iter().map(model::Exercise::from),
            &[],
        )?;
        if let Err(err) = self.write_records(
            Key::Workouts,
            workouts.iter().map(model::WorkoutSet::from),
            &[],
        ) {
            self.restore_exercises();
            return Err(err);
        }
        *self.exercises.borrow_mut() = exercises;
        *self.workouts.borrow_mut() = workouts;
        self.unreadable_exercises.borrow_mut().clear();
        self.unreadable_workouts.borrow_mut().clear();
        Ok(())
    }

    /// Replace all exercises.
    pub fn import_exercises(&self, exercises: Vec<domain::Exercise>) -> Result<(), StorageError> {
        self.write_records(
            Key::Exercises,
            exercises.iter().map(model::Exercise::from),
            &[],
        )?;
        *self.exercises.borrow_mut() = exercises;
        self.unreadable_exercises.borrow_mut().clear();
        Ok(())
    }

    /// Replace all workouts.
    pub fn import_workouts(&self, workouts: Vec<domain::WorkoutSet>) -> Result<(), StorageError> {
        self.write_records(
            Key::Workouts,
            workouts.iter().map(model::WorkoutSet::from),
            &[],
        )?;
        *self.workouts.borrow_mut() = workouts;
        self.unreadable_workouts.borrow_mut().clear();
        Ok(())
    }

    fn write_exercises(&self, exercises: &[domain::Exercise]) -> Result<(), StorageError> {
        self.write_records(
            Key::Exercises,
            exercises.iter().map(model::Exercise::from),
            &self.unreadable_exercises.borrow(),
        )
    }

    fn write_workouts(&self, workouts: &[domain::WorkoutSet]) -> Result<(), StorageError> {
        self.write_records(
            Key::Workouts,
            workouts.iter().map(model::WorkoutSet::from),
            &self.unreadable_workouts.borrow(),
        )
    }

    /// Write the exercises currently in memory, after a failed multi-step write.
    fn restore_exercises(&self) {
        if let Err(err) = self.write_exercises(&self.exercises.borrow()) {
            error!("failed to restore exercises: {err}");
        }
    }

    fn write_globals(&self, globals: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        self.write(
            Key::Globals,
            &globals
                .iter()
                .map(|(key, value)| (key.clone(), model::json_value(value)))
                .collect::<model::Globals>(),
        )
    }

    fn write_records<T: Serialize>(
        &self,
        key: Key,
        records: impl Iterator<Item = T>,
        unreadable: &[serde_json::Value],
    ) -> Result<(), StorageError> {
        self.write(
            key,
            &records
                .map(model::Record::Readable)
                .chain(unreadable.iter().map(model::Record::Unreadable))
                .collect::<Vec<_>>(),
        )
    }

    fn write<T: Serialize + ?Sized>(&self, key: Key, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|_| StorageError::Serialization(key.as_ref().to_string()))?;
        self.backend.set(key.as_ref(), &json)?;
        Ok(())
    }
}

fn load<T: DeserializeOwned>(backend: &impl Backend, key: Key) -> Option<T> {
    match backend.get(key.as_ref()) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("failed to parse {}: {err}", key.as_ref());
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            warn!("failed to read {}: {err}", key.as_ref());
            None
        }
    }
}

/// Load a collection record by record. Records that cannot be read are returned separately.
fn load_records<T: DeserializeOwned>(
    backend: &impl Backend,
    key: Key,
) -> (Vec<T>, Vec<serde_json::Value>) {
    let mut records = vec![];
    let mut unreadable = vec![];
    for value in load::<Vec<serde_json::Value>>(backend, key).unwrap_or_default() {
        match T::deserialize(&value) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!("keeping unreadable record in {}: {err}", key.as_ref());
                unreadable.push(value);
            }
        }
    }
    (records, unreadable)
}

impl<B: Backend> domain::ExerciseRepository for Store<B> {
    fn read_exercises(&self) -> Vec<domain::Exercise> {
        self.exercises.borrow().clone()
    }

    fn read_exercise(&self, id: &ExerciseID) -> Option<domain::Exercise> {
        self.exercises.borrow().iter().find(|e| e.id == *id).cloned()
    }

    fn create_exercise(&self, exercise: domain::Exercise) -> Result<domain::Exercise, CreateError> {
        let mut exercises = self.exercises.borrow().clone();
        if exercises.iter().any(|e| e.id == exercise.id) {
            return Err(CreateError::Conflict);
        }
        exercises.push(exercise.clone());
        self.write_exercises(&exercises)?;
        *self.exercises.borrow_mut() = exercises;
        Ok(exercise)
    }

    fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, UpdateError> {
        let mut exercises = self.exercises.borrow().clone();
        let Some(existing) = exercises.iter_mut().find(|e| e.id == exercise.id) else {
            return Err(UpdateError::NotFound);
        };
        existing.last_performed = exercise.last_performed;
        existing.report_options = exercise.report_options;
        let result = existing.clone();
        self.write_exercises(&exercises)?;
        *self.exercises.borrow_mut() = exercises;
        Ok(result)
    }

    fn rename_exercise(
        &self,
        id: &ExerciseID,
        new_id: ExerciseID,
    ) -> Result<domain::Exercise, UpdateError> {
        let previous_exercises = self.exercises.borrow().clone();
        let Some(exercise) = previous_exercises.iter().find(|e| e.id == *id).cloned() else {
            return Err(UpdateError::NotFound);
        };
        if *id == new_id {
            return Ok(exercise);
        }

        let mut exercises = previous_exercises.clone();
        let renamed = if let Some(target) = exercises.iter_mut().find(|e| e.id == new_id) {
            target.last_performed = target.last_performed.max(exercise.last_performed);
            let merged = target.clone();
            exercises.retain(|e| e.id != *id);
            merged
        } else {
            let mut renamed = exercise;
            renamed.id = new_id.clone();
            if let Some(e) = exercises.iter_mut().find(|e| e.id == *id) {
                *e = renamed.clone();
            }
            renamed
        };

        let mut workouts = self.workouts.borrow().clone();
        for workout in workouts.iter_mut().filter(|w| w.exercise == *id) {
            workout.exercise = new_id.clone();
        }

        self.write_exercises(&exercises)?;
        if let Err(err) = self.write_workouts(&workouts) {
            self.restore_exercises();
            return Err(err.into());
        }

        *self.exercises.borrow_mut() = exercises;
        *self.workouts.borrow_mut() = workouts;
        Ok(renamed)
    }
}

impl<B: Backend> domain::WorkoutRepository for Store<B> {
    fn read_workouts(&self, exercise_id: &ExerciseID) -> Vec<domain::WorkoutSet> {
        self.workouts
            .borrow()
            .iter()
            .filter(|w| w.exercise == *exercise_id)
            .cloned()
            .collect()
    }

    fn read_all_workouts(&self) -> Vec<domain::WorkoutSet> {
        self.workouts.borrow().clone()
    }

    fn read_workout(&self, tick: Tick) -> Option<domain::WorkoutSet> {
        self.workouts
            .borrow()
            .iter()
            .find(|w| w.tick == tick)
            .cloned()
    }

    fn create_workout(
        &self,
        workout: domain::WorkoutSet,
    ) -> Result<domain::WorkoutSet, StorageError> {
        let mut workouts = self.workouts.borrow().clone();
        workouts.push(workout.clone());
        self.write_workouts(&workouts)?;
        *self.workouts.borrow_mut() = workouts;
        Ok(workout)
    }

    fn replace_workout(
        &self,
        workout: domain::WorkoutSet,
    ) -> Result<domain::WorkoutSet, UpdateError> {
        let mut workouts = self.workouts.borrow().clone();
        let Some(existing) = workouts.iter_mut().find(|w| w.tick == workout.tick) else {
            return Err(UpdateError::NotFound);
        };
        existing.exercise = workout.exercise;
        existing.weight = workout.weight;
        existing.reps = workout.reps;
        let result = existing.clone();
        self.write_workouts(&workouts)?;
        *self.workouts.borrow_mut() = workouts;
        Ok(result)
    }
}

impl<B: Backend> domain::GlobalsRepository for Store<B> {
    fn read_globals(&self) -> BTreeMap<String, Value> {
        self.globals.borrow().clone()
    }

    fn read_global(&self, key: &str) -> Option<Value> {
        self.globals.borrow().get(key).cloned()
    }

    fn write_global(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut globals = self.globals.borrow().clone();
        globals.insert(key.to_string(), value);
        self.write_globals(&globals)?;
        *self.globals.borrow_mut() = globals;
        Ok(())
    }
}
