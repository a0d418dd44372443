//! Report
//!
//! A report lists the sets of the current week individually, followed by weekly aggregates of the
//! last `REPORT_WEEKS` weeks. The aggregate groups are selected by the report options of the
//! exercise.

use std::collections::BTreeMap;

use derive_more::Display;

use crate::{
    Exercise, ReportOptions, Tick, WorkoutSet, group_by_week, max_one_rep_max, relative_date,
    sort_by_tick_desc, weekly_max_weight, weekly_one_rep_max, weekly_relative_work, weeks_ago,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    /// Highest estimated one-repetition maximum of all workouts of the exercise.
    pub max_one_rep_max: f32,
}

impl Report {
    /// Build the report of an exercise.
    ///
    /// Without an exercise all aggregate groups are included.
    #[must_use]
    pub fn new(exercise: Option<&Exercise>, workouts: &[WorkoutSet], now: Tick) -> Self {
        let options = Self::options_in_effect(exercise);

        let mut workouts = workouts.to_vec();
        sort_by_tick_desc(&mut workouts);

        let mut rows = workouts
            .iter()
            .filter(|w| weeks_ago(w.tick, now) == 0)
            .map(|w| ReportRow::workout(w, now))
            .collect::<Vec<_>>();

        let grouped = group_by_week(&workouts, now);

        if options.show_1rm {
            rows.extend(aggregate_rows(
                Aggregate::OneRepMax,
                weekly_one_rep_max(&grouped),
            ));
        }
        if options.show_max {
            rows.extend(aggregate_rows(Aggregate::Max, weekly_max_weight(&grouped)));
        }
        if options.show_sum {
            rows.extend(aggregate_rows(
                Aggregate::RelativeWork,
                weekly_relative_work(&grouped),
            ));
        }

        Self {
            rows,
            max_one_rep_max: max_one_rep_max(&workouts),
        }
    }

    /// An empty report, shown while no exercise is selected.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: vec![],
            max_one_rep_max: 0.0,
        }
    }

    #[must_use]
    pub fn options_in_effect(exercise: Option<&Exercise>) -> ReportOptions {
        exercise.map(|e| e.report_options).unwrap_or_default()
    }
}

fn aggregate_rows(
    aggregate: Aggregate,
    buckets: BTreeMap<u32, f32>,
) -> impl Iterator<Item = ReportRow> {
    buckets
        .into_iter()
        .map(move |(week, value)| ReportRow::Aggregate {
            week,
            aggregate,
            value,
        })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportRow {
    Workout {
        tick: Tick,
        date: String,
        reps: String,
        weight: String,
    },
    Aggregate {
        week: u32,
        aggregate: Aggregate,
        value: f32,
    },
}

impl ReportRow {
    fn workout(workout: &WorkoutSet, now: Tick) -> Self {
        let reps = if workout.exercise_duration == 0 {
            workout.reps.to_string()
        } else {
            let started = Tick::from(*now - workout.exercise_duration);
            format!("{} {}", relative_date(started, now), workout.reps)
        };
        ReportRow::Workout {
            tick: workout.tick,
            date: relative_date(workout.tick, now),
            reps,
            weight: format!("{:.0}", workout.weight.round()),
        }
    }

    /// Identifier of the row, used to link a row to the workout it shows.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            ReportRow::Workout { tick, .. } => tick.to_string(),
            ReportRow::Aggregate { week, .. } => format!("week({week})"),
        }
    }

    /// The date, reps and weight columns of the row.
    #[must_use]
    pub fn columns(&self) -> [String; 3] {
        match self {
            ReportRow::Workout {
                date, reps, weight, ..
            } => [date.clone(), reps.clone(), weight.clone()],
            ReportRow::Aggregate {
                week,
                aggregate,
                value,
            } => [format!("{week}w"), aggregate.to_string(), format!("{value:.1}")],
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    #[display("1RM")]
    OneRepMax,
    #[display("Max")]
    Max,
    #[display("RW")]
    RelativeWork,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{TICKS_PER_DAY, TICKS_PER_SECOND, from_weeks_ago};

    fn now() -> Tick {
        Tick::from(1_700_000_000_000)
    }

    fn workout(ticks_ago: i64, weight: f32, reps: u32) -> WorkoutSet {
        WorkoutSet {
            tick: Tick::from(*now() - ticks_ago),
            exercise: "Bench".into(),
            weight,
            reps,
            exercise_duration: 0,
            location: None,
        }
    }

    fn weeks(weeks: i64) -> i64 {
        *now() - *from_weeks_ago(weeks, now()) + TICKS_PER_DAY
    }

    fn exercise(show_1rm: bool, show_max: bool, show_sum: bool) -> Exercise {
        Exercise {
            id: "Bench".into(),
            last_performed: now(),
            report_options: ReportOptions {
                show_1rm,
                show_max,
                show_sum,
            },
        }
    }

    fn columns(report: &Report) -> Vec<[String; 3]> {
        report.rows.iter().map(ReportRow::columns).collect()
    }

    fn row(date: &str, reps: &str, weight: &str) -> [String; 3] {
        [date.to_string(), reps.to_string(), weight.to_string()]
    }

    #[test]
    fn test_report_empty() {
        assert_eq!(Report::new(None, &[], now()), Report::empty());
    }

    #[test]
    fn test_report_row_order() {
        let workouts = vec![
            workout(weeks(2), 90.0, 5),
            workout(60 * TICKS_PER_SECOND, 100.0, 3),
            workout(30 * TICKS_PER_SECOND, 100.0, 5),
            workout(weeks(20), 200.0, 1),
        ];
        let report = Report::new(Some(&exercise(true, true, true)), &workouts, now());
        assert_eq!(
            columns(&report),
            vec![
                row("30s", "5", "100"),
                row("1m 0s", "3", "100"),
                row("0w", "1RM", "116.0"),
                row("2w", "1RM", "104.0"),
                row("0w", "Max", "100.0"),
                row("2w", "Max", "90.0"),
                row("0w", "RW", "800.0"),
                row("2w", "RW", "450.0"),
            ]
        );
        assert_eq!(
            report.rows.iter().map(ReportRow::key).collect::<Vec<_>>(),
            vec![
                (*now() - 30 * TICKS_PER_SECOND).to_string(),
                (*now() - 60 * TICKS_PER_SECOND).to_string(),
                "week(0)".to_string(),
                "week(2)".to_string(),
                "week(0)".to_string(),
                "week(2)".to_string(),
                "week(0)".to_string(),
                "week(2)".to_string(),
            ]
        );
    }

    #[rstest]
    #[case::all(true, true, true, vec!["1RM", "Max", "RW"])]
    #[case::no_1rm(false, true, true, vec!["Max", "RW"])]
    #[case::no_max(true, false, true, vec!["1RM", "RW"])]
    #[case::no_sum(true, true, false, vec!["1RM", "Max"])]
    #[case::none(false, false, false, vec![])]
    fn test_report_options(
        #[case] show_1rm: bool,
        #[case] show_max: bool,
        #[case] show_sum: bool,
        #[case] expected: Vec<&str>,
    ) {
        let workouts = vec![workout(weeks(3), 50.0, 10)];
        let report = Report::new(
            Some(&exercise(show_1rm, show_max, show_sum)),
            &workouts,
            now(),
        );
        assert_eq!(
            report
                .rows
                .iter()
                .filter_map(|r| match r {
                    ReportRow::Aggregate { aggregate, .. } => Some(aggregate.to_string()),
                    ReportRow::Workout { .. } => None,
                })
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_report_without_exercise_shows_all_aggregates() {
        let workouts = vec![workout(weeks(1), 50.0, 10)];
        assert_eq!(
            columns(&Report::new(None, &workouts, now())),
            vec![
                row("1w", "1RM", "67.0"),
                row("1w", "Max", "50.0"),
                row("1w", "RW", "500.0"),
            ]
        );
    }

    #[test]
    fn test_report_rest_interval() {
        let mut w = workout(5 * TICKS_PER_SECOND, 80.0, 8);
        w.exercise_duration = 90 * TICKS_PER_SECOND;
        let report = Report::new(None, &[w], now());
        assert_eq!(columns(&report)[0], row("5s", "1m 30s 8", "80"));
    }

    #[rstest]
    #[case(100.0, "100")]
    #[case(102.5, "103")]
    #[case(2.5, "3")]
    #[case(0.5, "1")]
    #[case(97.4, "97")]
    fn test_report_workout_weight(#[case] weight: f32, #[case] expected: &str) {
        let report = Report::new(None, &[workout(5 * TICKS_PER_SECOND, weight, 5)], now());
        assert_eq!(columns(&report)[0], row("5s", "5", expected));
    }

    #[test]
    fn test_report_excludes_old_workouts() {
        let workouts = vec![workout(weeks(13), 50.0, 10), workout(weeks(12), 40.0, 10)];
        assert_eq!(
            columns(&Report::new(Some(&exercise(false, true, false)), &workouts, now())),
            vec![row("12w", "Max", "40.0")]
        );
    }

    #[test]
    fn test_report_max_one_rep_max_includes_old_workouts() {
        let workouts = vec![workout(weeks(30), 100.0, 1), workout(weeks(1), 50.0, 1)];
        let report = Report::new(None, &workouts, now());
        assert!(report.max_one_rep_max > 101.0);
    }

    #[test]
    fn test_options_in_effect() {
        assert_eq!(Report::options_in_effect(None), ReportOptions::default());
        assert_eq!(
            Report::options_in_effect(Some(&exercise(false, true, false))),
            ReportOptions {
                show_1rm: false,
                show_max: true,
                show_sum: false,
            }
        );
    }
}
