//! Persisted representation of the records.
//!
//! The field names match the JSON written by earlier versions of the application, so existing
//! local storage contents and exported files stay readable.

use std::collections::BTreeMap;

use liftlog_domain as domain;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(default)]
    pub last_performed: i64,
    #[serde(default)]
    pub report_options: Option<ReportOptions>,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: value.id.to_string(),
            last_performed: *value.last_performed,
            report_options: Some(ReportOptions::from(value.report_options)),
        }
    }
}

impl From<Exercise> for domain::Exercise {
    fn from(value: Exercise) -> Self {
        Self {
            id: value.id.into(),
            last_performed: value.last_performed.into(),
            report_options: value
                .report_options
                .map(domain::ReportOptions::from)
                .unwrap_or_default(),
        }
    }
}

/// Report flags. An absent flag counts as set, as does any value other than `false`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flag"
    )]
    pub show1rm: Option<bool>,
    #[serde(
        default,
        alias = "showMax",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flag"
    )]
    pub showmax: Option<bool>,
    #[serde(
        default,
        alias = "showSum",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flag"
    )]
    pub showsum: Option<bool>,
}

impl From<domain::ReportOptions> for ReportOptions {
    fn from(value: domain::ReportOptions) -> Self {
        Self {
            show1rm: Some(value.show_1rm),
            showmax: Some(value.show_max),
            showsum: Some(value.show_sum),
        }
    }
}

impl From<ReportOptions> for domain::ReportOptions {
    fn from(value: ReportOptions) -> Self {
        Self {
            show_1rm: value.show1rm != Some(false),
            show_max: value.showmax != Some(false),
            show_sum: value.showsum != Some(false),
        }
    }
}

fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Some(value != serde_json::Value::Bool(false)))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub tick: i64,
    pub exercise: String,
    pub weight: f32,
    pub reps: u32,
    #[serde(default)]
    pub exercise_duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl From<domain::WorkoutSet> for WorkoutSet {
    fn from(value: domain::WorkoutSet) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::WorkoutSet> for WorkoutSet {
    fn from(value: &domain::WorkoutSet) -> Self {
        Self {
            tick: *value.tick,
            exercise: value.exercise.to_string(),
            weight: value.weight,
            reps: value.reps,
            exercise_duration: value.exercise_duration,
            location: value.location.map(Location::from),
        }
    }
}

impl From<WorkoutSet> for domain::WorkoutSet {
    fn from(value: WorkoutSet) -> Self {
        Self {
            tick: value.tick.into(),
            exercise: value.exercise.into(),
            weight: value.weight,
            reps: value.reps,
            exercise_duration: value.exercise_duration,
            location: value.location.map(domain::Location::from),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl From<domain::Location> for Location {
    fn from(value: domain::Location) -> Self {
        Self {
            lat: value.lat,
            lon: value.lon,
        }
    }
}

impl From<Location> for domain::Location {
    fn from(value: Location) -> Self {
        Self {
            lat: value.lat,
            lon: value.lon,
        }
    }
}

/// An element of a persisted collection. Unreadable records are written back as they were read.
#[derive(Serialize)]
#[serde(untagged)]
pub enum Record<'a, T> {
    Readable(T),
    Unreadable(&'a serde_json::Value),
}

pub type Globals = BTreeMap<String, serde_json::Value>;

/// Convert a persisted setting. Only primitive values are kept.
#[must_use]
pub fn global_value(value: &serde_json::Value) -> Option<domain::Value> {
    match value {
        serde_json::Value::String(text) => Some(domain::Value::Text(text.clone())),
        serde_json::Value::Number(number) => number.as_f64().map(domain::Value::Number),
        serde_json::Value::Bool(b) => Some(domain::Value::Bool(*b)),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    }
}

/// Whole numbers are written as integers, so ticks keep their JSON representation.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
pub fn json_value(value: &domain::Value) -> serde_json::Value {
    match value {
        domain::Value::Text(text) => serde_json::Value::String(text.clone()),
        domain::Value::Number(number)
            if number.is_finite() && (*number as i64) as f64 == *number =>
        {
            serde_json::Value::from(*number as i64)
        }
        domain::Value::Number(number) => serde_json::Number::from_f64(*number)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        domain::Value::Bool(b) => serde_json::Value::Bool(*b),
    }
}
