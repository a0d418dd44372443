use std::collections::BTreeMap;

use crate::{Tick, WorkoutSet, weeks_ago};

/// Number of weekly buckets covered by a report, including the current week.
pub const REPORT_WEEKS: u32 = 13;

/// Estimate the one-repetition maximum using the Wathan formula.
///
/// No special case exists for zero reps, which callers must exclude beforehand.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn one_rep_max(weight: f32, reps: u32) -> f32 {
    weight * 100.0 / (48.8 + 53.8 * (-0.075 * reps as f32).exp())
}

/// Assign each workout of the last `REPORT_WEEKS` weeks to the week it belongs to.
///
/// Workouts older than the report window or in the future are dropped.
#[must_use]
pub fn group_by_week(workouts: &[WorkoutSet], now: Tick) -> Vec<(u32, &WorkoutSet)> {
    workouts
        .iter()
        .filter_map(|w| {
            u32::try_from(weeks_ago(w.tick, now))
                .ok()
                .filter(|week| *week < REPORT_WEEKS)
                .map(|week| (week, w))
        })
        .collect()
}

/// Reduce the values of grouped workouts per bucket.
///
/// The value of each workout is truncated towards negative infinity before it is combined with
/// the accumulated value of its bucket, which starts at zero. Buckets without any workout are
/// absent from the result.
pub fn reduce_by_bucket(
    grouped: &[(u32, &WorkoutSet)],
    value: impl Fn(f32, u32) -> f32,
    combine: impl Fn(f32, f32) -> f32,
) -> BTreeMap<u32, f32> {
    let mut buckets: BTreeMap<u32, f32> = BTreeMap::new();

    for (bucket, workout) in grouped {
        let v = value(workout.weight, workout.reps).floor();
        let accumulator = buckets.entry(*bucket).or_insert(0.0);
        *accumulator = combine(*accumulator, v);
    }

    buckets
}

pub fn max_by_bucket(
    grouped: &[(u32, &WorkoutSet)],
    value: impl Fn(f32, u32) -> f32,
) -> BTreeMap<u32, f32> {
    reduce_by_bucket(grouped, value, f32::max)
}

pub fn sum_by_bucket(
    grouped: &[(u32, &WorkoutSet)],
    value: impl Fn(f32, u32) -> f32,
) -> BTreeMap<u32, f32> {
    reduce_by_bucket(grouped, value, |a, b| a + b)
}

/// Maximum estimated one-repetition maximum per week.
#[must_use]
pub fn weekly_one_rep_max(grouped: &[(u32, &WorkoutSet)]) -> BTreeMap<u32, f32> {
    max_by_bucket(grouped, one_rep_max)
}

/// Maximum weight per week.
#[must_use]
pub fn weekly_max_weight(grouped: &[(u32, &WorkoutSet)]) -> BTreeMap<u32, f32> {
    max_by_bucket(grouped, |weight, _| weight)
}

/// Relative work (weight times reps) summed per week.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weekly_relative_work(grouped: &[(u32, &WorkoutSet)]) -> BTreeMap<u32, f32> {
    sum_by_bucket(grouped, |weight, reps| weight * reps as f32)
}

/// Highest estimated one-repetition maximum of all workouts, zero if there are none.
#[must_use]
pub fn max_one_rep_max(workouts: &[WorkoutSet]) -> f32 {
    workouts
        .iter()
        .map(WorkoutSet::one_rep_max)
        .fold(0.0, f32::max)
}
