//! Personal-record statistics over an exercise's logged sessions.
//!
//! Everything here is a pure pass over already-fetched history. Sessions
//! without series are tolerated everywhere: they summarise to zeros and never
//! contribute to records.

pub mod window;

pub use window::{DateWindow, Dated, filter_window, last_n};

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{HistoryPRExercise, SeriesPRExercise};

const ONE_RM_A: f64 = 1.0278;
const ONE_RM_B: f64 = 0.0278;

/// Reps of every series plus every dropset.
pub fn total_reps(h: &HistoryPRExercise) -> u64 {
    h.all_sets().map(|(_, reps)| u64::from(reps)).sum()
}

pub fn max_weight(h: &HistoryPRExercise) -> f64 {
    h.all_sets().map(|(weight, _)| weight).fold(0.0, f64::max)
}

/// Sum of `weight × reps` over series and dropsets.
pub fn session_volume(h: &HistoryPRExercise) -> f64 {
    h.all_sets().map(|(weight, reps)| weight * f64::from(reps)).sum()
}

/// Estimated one-rep max, `weight / (1.0278 - 0.0278 × reps)`.
///
/// Exact at one rep. Past 36 reps the divisor is no longer positive and the
/// estimate is meaningless, so `None` is returned.
pub fn one_rep_max(weight: f64, reps: u32) -> Option<f64> {
    match reps {
        0 => Some(0.0),
        1 => Some(weight),
        _ => {
            let divisor = ONE_RM_A - ONE_RM_B * f64::from(reps);
            (divisor > 0.0).then(|| weight / divisor)
        }
    }
}

/// Best one-rep-max estimate among the session's main series.
pub fn session_one_rep_max(h: &HistoryPRExercise) -> f64 {
    h.series
        .iter()
        .filter_map(|s| one_rep_max(s.weight, s.reps))
        .fold(0.0, f64::max)
}

/// Volume of one series, its dropsets included.
pub fn series_volume(s: &SeriesPRExercise) -> f64 {
    s.weight * f64::from(s.reps)
        + s.dropsets
            .iter()
            .map(|d| d.weight * f64::from(d.reps))
            .sum::<f64>()
}

pub fn best_series_volume(h: &HistoryPRExercise) -> f64 {
    h.series.iter().map(series_volume).fold(0.0, f64::max)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub history_id: i64,
    pub date: NaiveDate,
    pub series_count: usize,
    pub total_reps: u64,
    pub max_weight: f64,
    pub volume: f64,
    pub one_rep_max: f64,
    pub best_series_volume: f64,
}

impl SessionSummary {
    pub fn is_empty(&self) -> bool {
        self.series_count == 0
    }
}

pub fn summarize(h: &HistoryPRExercise) -> SessionSummary {
    SessionSummary {
        history_id: h.id,
        date: h.date,
        series_count: h.series.len(),
        total_reps: total_reps(h),
        max_weight: max_weight(h),
        volume: session_volume(h),
        one_rep_max: session_one_rep_max(h),
        best_series_volume: best_series_volume(h),
    }
}

/// A record value and the day it was set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Record {
    pub value: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonalRecords {
    pub max_weight: Option<Record>,
    pub one_rep_max: Option<Record>,
    pub best_series_volume: Option<Record>,
}

impl PersonalRecords {
    fn raise(slot: &mut Option<Record>, value: f64, date: NaiveDate) {
        if value > slot.map_or(0.0, |r| r.value) {
            *slot = Some(Record { value, date });
        }
    }

    pub fn max_weight_value(&self) -> f64 {
        self.max_weight.map_or(0.0, |r| r.value)
    }

    pub fn one_rep_max_value(&self) -> f64 {
        self.one_rep_max.map_or(0.0, |r| r.value)
    }

    pub fn best_series_volume_value(&self) -> f64 {
        self.best_series_volume.map_or(0.0, |r| r.value)
    }
}

/// Running maxima across sessions. On ties the first session seen keeps the
/// record.
pub fn personal_records<'a, I>(sessions: I) -> PersonalRecords
where
    I: IntoIterator<Item = &'a HistoryPRExercise>,
{
    let mut records = PersonalRecords::default();
    for h in sessions.into_iter().filter(|h| !h.series.is_empty()) {
        PersonalRecords::raise(&mut records.max_weight, max_weight(h), h.date);
        PersonalRecords::raise(&mut records.one_rep_max, session_one_rep_max(h), h.date);
        PersonalRecords::raise(
            &mut records.best_series_volume,
            best_series_volume(h),
            h.date,
        );
    }
    records
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestSeries {
    pub reps: u32,
    pub weight: f64,
    pub date: NaiveDate,
}

/// Heaviest main-series weight for each rep count, highest rep count first.
/// Equal weights keep the earliest date.
pub fn best_series<'a, I>(sessions: I) -> Vec<BestSeries>
where
    I: IntoIterator<Item = &'a HistoryPRExercise>,
{
    let mut by_reps: BTreeMap<u32, BestSeries> = BTreeMap::new();
    for h in sessions {
        for s in &h.series {
            let candidate = BestSeries {
                reps: s.reps,
                weight: s.weight,
                date: h.date,
            };
            by_reps
                .entry(s.reps)
                .and_modify(|best| {
                    if s.weight > best.weight || (s.weight == best.weight && h.date < best.date) {
                        *best = candidate;
                    }
                })
                .or_insert(candidate);
        }
    }
    by_reps.into_values().rev().collect()
}

/// Everything the exercise-history screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseReport {
    pub exercise_id: i64,
    pub window: String,
    /// Sessions in the window, newest first.
    pub sessions: Vec<SessionSummary>,
    /// All-time records, independent of the window.
    pub records: PersonalRecords,
    pub best_series: Vec<BestSeries>,
    pub window_volume: f64,
}

impl ExerciseReport {
    pub fn build(
        exercise_id: i64,
        history: &[HistoryPRExercise],
        window: DateWindow,
        last: Option<usize>,
        today: NaiveDate,
    ) -> Self {
        let in_window: Vec<HistoryPRExercise> = filter_window(history, window, today)
            .into_iter()
            .cloned()
            .collect();
        let recent = last_n(&in_window, last.unwrap_or(in_window.len()));
        let sessions: Vec<SessionSummary> = recent.into_iter().map(summarize).collect();
        let window_volume = sessions.iter().map(|s| s.volume).sum();
        Self {
            exercise_id,
            window: window.to_string(),
            sessions,
            records: personal_records(history),
            best_series: best_series(history),
            window_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DropsetPRExercise;
    use chrono::Days;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, n).unwrap()
    }

    fn series(reps: u32, weight: f64, dropsets: &[(u32, f64)]) -> SeriesPRExercise {
        SeriesPRExercise {
            id: 0,
            history_pr_exercise_id: None,
            order: 0,
            reps,
            weight,
            rpe: None,
            dropsets: dropsets
                .iter()
                .map(|&(reps, weight)| DropsetPRExercise {
                    id: 0,
                    series_pr_exercise_id: None,
                    order: 0,
                    reps,
                    weight,
                })
                .collect(),
        }
    }

    fn session(id: i64, date: NaiveDate, series: Vec<SeriesPRExercise>) -> HistoryPRExercise {
        HistoryPRExercise {
            id,
            exercise_id: 1,
            user_email: "ana@example.com".into(),
            date,
            notes: None,
            series,
        }
    }

    #[test]
    fn totals_include_dropsets() {
        let h = session(
            1,
            day(1),
            vec![series(10, 100.0, &[(8, 80.0), (6, 60.0)]), series(8, 105.0, &[])],
        );
        assert_eq!(total_reps(&h), 10 + 8 + 6 + 8);
        assert_eq!(max_weight(&h), 105.0);
        assert_eq!(
            session_volume(&h),
            1000.0 + 640.0 + 360.0 + 840.0
        );
        assert_eq!(series_volume(&h.series[0]), 2000.0);
        assert_eq!(best_series_volume(&h), 2000.0);
    }

    #[test]
    fn dropset_can_hold_the_max_weight() {
        // Data entered before dropset validation existed.
        let h = session(1, day(1), vec![series(5, 60.0, &[(3, 70.0)])]);
        assert_eq!(max_weight(&h), 70.0);
    }

    #[test]
    fn total_reps_does_not_overflow() {
        let h = session(1, day(1), vec![series(u32::MAX, 1.0, &[(u32::MAX, 1.0)])]);
        assert_eq!(total_reps(&h), 2 * u64::from(u32::MAX));
    }

    #[rstest]
    #[case(100.0, 1, Some(100.0))]
    #[case(100.0, 0, Some(0.0))]
    #[case(100.0, 37, None)]
    fn one_rep_max_edges(#[case] weight: f64, #[case] reps: u32, #[case] expected: Option<f64>) {
        assert_eq!(one_rep_max(weight, reps), expected);
    }

    #[test]
    fn one_rep_max_grows_with_reps() {
        let ten = one_rep_max(100.0, 10).unwrap();
        assert!((ten - 100.0 / 0.7498).abs() < 1e-9);
        assert!(one_rep_max(100.0, 36).unwrap() > ten);
    }

    #[test]
    fn empty_session_summarises_to_zero() {
        let h = session(3, day(2), vec![]);
        let summary = summarize(&h);
        assert!(summary.is_empty());
        assert_eq!(summary.max_weight, 0.0);
        assert_eq!(summary.one_rep_max, 0.0);
        assert_eq!(summary.volume, 0.0);
        assert_eq!(personal_records([&h]), PersonalRecords::default());
    }

    #[test]
    fn records_take_running_max() {
        let sessions = vec![
            session(1, day(1), vec![series(10, 100.0, &[])]),
            session(2, day(2), vec![]),
            session(3, day(3), vec![series(10, 110.0, &[])]),
        ];
        let records = personal_records(&sessions);
        assert_eq!(records.max_weight_value(), 110.0);
        assert_eq!(records.max_weight.unwrap().date, day(3));
        assert_eq!(records.best_series_volume_value(), 1100.0);
        assert_eq!(
            records.one_rep_max_value(),
            one_rep_max(110.0, 10).unwrap()
        );
    }

    #[test]
    fn best_series_one_row_per_rep_count() {
        let sessions = vec![
            session(1, day(1), vec![series(5, 100.0, &[]), series(8, 80.0, &[])]),
            session(2, day(4), vec![series(5, 105.0, &[]), series(8, 80.0, &[])]),
            session(3, day(6), vec![series(12, 60.0, &[(10, 40.0)])]),
        ];
        let table = best_series(&sessions);
        assert_eq!(
            table,
            vec![
                BestSeries { reps: 12, weight: 60.0, date: day(6) },
                BestSeries { reps: 8, weight: 80.0, date: day(1) },
                BestSeries { reps: 5, weight: 105.0, date: day(4) },
            ]
        );
    }

    #[test]
    fn report_windows_sessions_but_not_records() {
        let today = day(20);
        let old = today.checked_sub_days(Days::new(8)).unwrap();
        let recent = today.checked_sub_days(Days::new(6)).unwrap();
        let history = vec![
            session(1, old, vec![series(3, 140.0, &[])]),
            session(2, recent, vec![series(5, 120.0, &[])]),
            session(3, today, vec![series(5, 122.5, &[])]),
        ];
        let report = ExerciseReport::build(1, &history, DateWindow::Week, None, today);
        let ids: Vec<i64> = report.sessions.iter().map(|s| s.history_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(report.records.max_weight_value(), 140.0);
        assert_eq!(report.window_volume, 600.0 + 612.5);

        let last_one = ExerciseReport::build(1, &history, DateWindow::All, Some(1), today);
        assert_eq!(last_one.sessions.len(), 1);
        assert_eq!(last_one.sessions[0].history_id, 3);
    }
}
