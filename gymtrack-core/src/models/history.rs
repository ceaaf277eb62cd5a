use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{deserialize_count, deserialize_date};

/// One logged workout session of a single exercise.
///
/// Owns its series, which in turn own their dropsets. The backend deletes
/// the whole tree when the history row goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPRExercise {
    pub id: i64,
    pub exercise_id: i64,
    pub user_email: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub series: Vec<SeriesPRExercise>,
}

impl HistoryPRExercise {
    /// Puts series and their dropsets in `order`. The backend returns child
    /// rows in insertion order.
    pub fn sort_sets(&mut self) {
        self.series.sort_by_key(|s| s.order);
        for s in &mut self.series {
            s.dropsets.sort_by_key(|d| d.order);
        }
    }

    /// Main series followed by their dropsets, in performed order.
    pub fn all_sets(&self) -> impl Iterator<Item = (f64, u32)> + '_ {
        self.series.iter().flat_map(|s| {
            std::iter::once((s.weight, s.reps)).chain(s.dropsets.iter().map(|d| (d.weight, d.reps)))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPRExercise {
    pub id: i64,
    #[serde(default)]
    pub history_pr_exercise_id: Option<i64>,
    #[serde(default)]
    pub order: u32,
    #[serde(deserialize_with = "deserialize_count")]
    pub reps: u32,
    pub weight: f64,
    #[serde(default)]
    pub rpe: Option<f32>,
    #[serde(default)]
    pub dropsets: Vec<DropsetPRExercise>,
}

impl fmt::Display for SeriesPRExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpe_str = self.rpe.map(|r| format!(" @{:.1}", r)).unwrap_or_default();
        write!(f, "{:.1}kg x {} reps{}", self.weight, self.reps, rpe_str)?;
        for d in &self.dropsets {
            write!(f, " + {:.1}kg x {}", d.weight, d.reps)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropsetPRExercise {
    pub id: i64,
    #[serde(default)]
    pub series_pr_exercise_id: Option<i64>,
    #[serde(default)]
    pub order: u32,
    #[serde(deserialize_with = "deserialize_count")]
    pub reps: u32,
    pub weight: f64,
}

// Creation payloads. The tree is posted top-down: the history row first,
// then each series with the returned history id, then each dropset.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryPRExercise {
    pub exercise_id: i64,
    pub user_email: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    #[serde(skip)]
    pub series: Vec<NewSeries>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewSeries {
    pub reps: u32,
    pub weight: f64,
    pub rpe: Option<f32>,
    pub dropsets: Vec<NewDropset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NewDropset {
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSeriesPRExercise {
    pub history_pr_exercise_id: i64,
    pub order: u32,
    pub reps: u32,
    pub weight: f64,
    pub rpe: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDropsetPRExercise {
    pub series_pr_exercise_id: i64,
    pub order: u32,
    pub reps: u32,
    pub weight: f64,
}
