use log::{debug, error};

use crate::{
    Clock, EXERCISE_START_TIME, Exercise, ExerciseID, ExerciseRepository,
    GlobalsRepository, LocationProvider, Name, Report, ReportOptions, SaveError, StorageError,
    SystemClock, Tick, Value, WorkoutRepository, WorkoutSet, latest, relative_date,
    sort_by_recency, sort_by_tick_desc, validate_work,
};

pub struct Service<R, C = SystemClock> {
    repository: R,
    clock: C,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            clock: SystemClock,
        }
    }
}

impl<R, C> Service<R, C> {
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self { repository, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: literal) => {{
        let result = $result;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                SaveError::Validation(_) => {
                    debug!("rejected to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Started,
    Stopped,
}

impl<R, C> Service<R, C>
where
    R: ExerciseRepository + WorkoutRepository + GlobalsRepository,
    C: Clock,
{
    /// All exercises, most recently performed first.
    pub fn get_exercises(&self) -> Vec<Exercise> {
        let mut exercises = self.repository.read_exercises();
        sort_by_recency(&mut exercises);
        exercises
    }

    pub fn get_exercise(&self, id: &ExerciseID) -> Option<Exercise> {
        self.repository.read_exercise(id)
    }

    /// All workouts of an exercise, most recent first.
    pub fn get_workouts(&self, exercise_id: &ExerciseID) -> Vec<WorkoutSet> {
        let mut workouts = self.repository.read_workouts(exercise_id);
        sort_by_tick_desc(&mut workouts);
        workouts
    }

    pub fn get_workout(&self, tick: Tick) -> Option<WorkoutSet> {
        self.repository.read_workout(tick)
    }

    /// The latest workout of an exercise, used to prefill the form.
    pub fn get_last_workout(&self, exercise_id: &ExerciseID) -> Option<WorkoutSet> {
        latest(&self.repository.read_workouts(exercise_id)).cloned()
    }

    /// The report of an exercise, `None` if the exercise does not exist.
    pub fn get_report(&self, exercise_id: &ExerciseID) -> Option<Report> {
        let exercise = self.repository.read_exercise(exercise_id)?;
        let workouts = self.repository.read_workouts(exercise_id);
        Some(Report::new(Some(&exercise), &workouts, self.clock.now()))
    }

    /// Record a set.
    ///
    /// Unknown exercises are created on the fly. The location is attached if the provider
    /// delivers one, a failing provider never prevents saving. The exercise and the timer are
    /// only updated after the set was stored.
    pub async fn save_workout(
        &self,
        exercise: &str,
        weight: f32,
        reps: u32,
        locator: &impl LocationProvider,
    ) -> Result<WorkoutSet, SaveError> {
        let validated = validate(exercise, weight, reps);
        let id = log_on_error!(validated, "save", "workout")?;

        let now = self.clock.now();
        let tick = self.next_tick(now);

        let start_time = self.get_timer_start();
        let mut workout = WorkoutSet {
            tick,
            exercise: id,
            weight,
            reps,
            exercise_duration: start_time.map_or(0, |start| start.ticks_until(now)),
            location: None,
        };

        match locator.location().await {
            Ok(location) => workout.location = Some(location),
            Err(err) => debug!("saving workout without location: {err}"),
        }

        let workout = log_on_error!(
            self.repository
                .create_workout(workout)
                .map_err(SaveError::from),
            "save",
            "workout"
        )?;

        log_on_error!(
            self.touch_exercise(&workout.exercise, tick),
            "update",
            "exercise"
        )?;

        if start_time.is_some() {
            log_on_error!(
                self.write_timer_start(self.clock.now()).map_err(SaveError::from),
                "restart",
                "timer"
            )?;
        }

        Ok(workout)
    }

    pub fn create_exercise(&self, name: &str) -> Result<Exercise, SaveError> {
        let result = Name::new(name)
            .map_err(|err| SaveError::Validation(err.into()))
            .and_then(|name| {
                Ok(self
                    .repository
                    .create_exercise(Exercise::new(name.into(), self.clock.now()))?)
            });
        log_on_error!(result, "create", "exercise")
    }

    /// Rename an exercise and change its report options.
    pub fn edit_exercise(
        &self,
        id: &ExerciseID,
        name: &str,
        report_options: ReportOptions,
    ) -> Result<Exercise, SaveError> {
        let result = Name::new(name)
            .map_err(|err| SaveError::Validation(err.into()))
            .and_then(|name| {
                let new_id = ExerciseID::from(name);
                let mut exercise = if new_id == *id {
                    self.repository
                        .read_exercise(id)
                        .ok_or(SaveError::NotFound)?
                } else {
                    self.repository.rename_exercise(id, new_id)?
                };
                exercise.report_options = report_options;
                Ok(self.repository.replace_exercise(exercise)?)
            });
        log_on_error!(result, "edit", "exercise")
    }

    /// Change exercise, weight and reps of a recorded set.
    pub fn edit_workout(
        &self,
        tick: Tick,
        exercise: &str,
        weight: f32,
        reps: u32,
    ) -> Result<WorkoutSet, SaveError> {
        let result = validate(exercise, weight, reps).and_then(|id| {
            let mut workout = self
                .repository
                .read_workout(tick)
                .ok_or(SaveError::NotFound)?;
            if self.repository.read_exercise(&id).is_none() {
                self.repository
                    .create_exercise(Exercise::new(id.clone(), workout.tick))?;
            }
            workout.exercise = id;
            workout.weight = weight;
            workout.reps = reps;
            Ok(self.repository.replace_workout(workout)?)
        });
        log_on_error!(result, "edit", "workout")
    }

    pub fn get_timer_start(&self) -> Option<Tick> {
        self.repository
            .read_global(EXERCISE_START_TIME)
            .and_then(|value| value.as_tick())
    }

    /// Start the exercise timer if it is stopped, stop it otherwise.
    pub fn toggle_timer(&self) -> Result<TimerState, StorageError> {
        if self.get_timer_start().is_some() {
            self.write_timer_start(Tick::ZERO)?;
            Ok(TimerState::Stopped)
        } else {
            self.write_timer_start(self.clock.now())?;
            Ok(TimerState::Started)
        }
    }

    pub fn reset_timer(&self) -> Result<(), StorageError> {
        self.write_timer_start(Tick::ZERO)
    }

    /// Time since the timer was started or, if it is stopped, since the last exercise.
    pub fn time_since_last_exercise(&self) -> String {
        let since = self.get_timer_start().unwrap_or_else(|| {
            self.get_exercises()
                .first()
                .map_or(Tick::ZERO, |e| e.last_performed)
        });
        relative_date(since, self.clock.now())
    }

    /// Persist the value of a sticky form field.
    pub fn remember_field(&self, field_id: &str, value: &str) -> Result<(), StorageError> {
        self.repository.write_global(field_id, Value::from(value))
    }

    pub fn recall_field(&self, field_id: &str) -> Option<String> {
        self.repository
            .read_global(field_id)
            .filter(Value::is_set)
            .map(|value| value.to_string())
    }

    fn write_timer_start(&self, tick: Tick) -> Result<(), StorageError> {
        self.repository
            .write_global(EXERCISE_START_TIME, Value::from(tick))
    }

    /// A tick for a new workout which does not collide with any recorded workout.
    fn next_tick(&self, now: Tick) -> Tick {
        match self
            .repository
            .read_all_workouts()
            .iter()
            .map(|w| w.tick)
            .max()
        {
            Some(last) if last >= now => Tick::from(*last + 1),
            _ => now,
        }
    }

    fn touch_exercise(&self, id: &ExerciseID, tick: Tick) -> Result<Exercise, SaveError> {
        match self.repository.read_exercise(id) {
            Some(mut exercise) => {
                exercise.last_performed = tick;
                Ok(self.repository.replace_exercise(exercise)?)
            }
            None => Ok(self
                .repository
                .create_exercise(Exercise::new(id.clone(), tick))?),
        }
    }
}

fn validate(exercise: &str, weight: f32, reps: u32) -> Result<ExerciseID, SaveError> {
    let name = Name::new(exercise).map_err(|err| SaveError::Validation(err.into()))?;
    validate_work(weight, reps)?;
    Ok(name.into())
}
