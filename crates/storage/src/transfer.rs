//! Export and import of all records as a single JSON document.

use liftlog_domain::{
    self as domain, ExerciseRepository, ImportError, StorageError, WorkoutRepository,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Backend, Store, model};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transfer {
    pub exercises: Vec<model::Exercise>,
    pub workouts: Vec<model::WorkoutSet>,
}

/// Serialize all exercises and their workouts.
///
/// Workouts are collected per exercise in the order of the exercises. Workouts referencing an
/// unknown exercise are not exported.
pub fn export<B: Backend>(store: &Store<B>) -> Result<String, StorageError> {
    let exercises = store.read_exercises();
    let workouts = exercises
        .iter()
        .flat_map(|exercise| store.read_workouts(&exercise.id))
        .collect::<Vec<_>>();
    let transfer = Transfer {
        exercises: exercises.iter().map(model::Exercise::from).collect(),
        workouts: workouts.iter().map(model::WorkoutSet::from).collect(),
    };
    serde_json::to_string_pretty(&transfer)
        .map_err(|_| StorageError::Serialization("transfer".to_string()))
}

/// Replace all exercises and workouts by the content of an exported document.
///
/// The document is parsed completely before anything is written, so a malformed document leaves
/// the store unchanged. A failed write leaves it unchanged as well.
pub fn import<B: Backend>(store: &Store<B>, json: &str) -> Result<(), ImportError> {
    let transfer: Transfer =
        serde_json::from_str(json).map_err(|err| ImportError::Malformed(err.to_string()))?;
    debug!(
        "importing {} exercises and {} workouts",
        transfer.exercises.len(),
        transfer.workouts.len()
    );
    store.import(
        transfer
            .exercises
            .into_iter()
            .map(normalize)
            .map(domain::Exercise::from)
            .collect(),
        transfer
            .workouts
            .into_iter()
            .map(domain::WorkoutSet::from)
            .collect(),
    )?;
    Ok(())
}

/// Imported exercises without report options get the 1RM and Max rows enabled. Flags with any
/// value other than `false` were already read as set.
fn normalize(exercise: model::Exercise) -> model::Exercise {
    model::Exercise {
        report_options: Some(exercise.report_options.unwrap_or(model::ReportOptions {
            show1rm: Some(true),
            showmax: Some(true),
            showsum: None,
        })),
        ..exercise
    }
}
