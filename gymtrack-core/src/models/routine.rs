use serde::{Deserialize, Serialize};

/// A routine. Owned by either a user or a gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub gym_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<TagOfTrainingPlan>,
    #[serde(default)]
    pub days: Vec<WorkoutDayExercise>,
}

impl TrainingPlan {
    pub fn total_sets(&self) -> u32 {
        self.days
            .iter()
            .flat_map(|d| d.exercise_configurations.iter())
            .map(|c| c.sets)
            .sum()
    }

    pub fn day(&self, week_day_id: i64) -> Option<&WorkoutDayExercise> {
        self.days.iter().find(|d| d.week_day_id == week_day_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrainingPlan {
    pub name: String,
    pub description: Option<String>,
    pub user_email: Option<String>,
    pub gym_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagOfTrainingPlan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub training_plan_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTagOfTrainingPlan {
    pub name: String,
    pub training_plan_id: i64,
}

/// One week day of a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDayExercise {
    pub id: i64,
    pub training_plan_id: i64,
    pub week_day_id: i64,
    #[serde(default)]
    pub exercise_configurations: Vec<ExerciseConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutDayExercise {
    pub training_plan_id: i64,
    pub week_day_id: i64,
}

/// Prescription for one exercise on a workout day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfiguration {
    pub id: i64,
    pub exercise_id: i64,
    #[serde(default)]
    pub workout_day_exercise_id: Option<i64>,
    pub sets: u32,
    #[serde(alias = "repsHigh")]
    pub reps_high: u32,
    #[serde(alias = "repsLow")]
    pub reps_low: u32,
    /// Seconds of rest between sets.
    pub rest: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExerciseConfiguration {
    pub exercise_id: i64,
    pub workout_day_exercise_id: Option<i64>,
    pub sets: u32,
    #[serde(alias = "repsHigh")]
    pub reps_high: u32,
    #[serde(alias = "repsLow")]
    pub reps_low: u32,
    pub rest: u32,
    pub notes: Option<String>,
}

impl From<&ExerciseConfiguration> for NewExerciseConfiguration {
    fn from(c: &ExerciseConfiguration) -> Self {
        NewExerciseConfiguration {
            exercise_id: c.exercise_id,
            workout_day_exercise_id: c.workout_day_exercise_id,
            sets: c.sets,
            reps_high: c.reps_high,
            reps_low: c.reps_low,
            rest: c.rest,
            notes: c.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn configuration_accepts_camel_case_rep_range() {
        let cfg: ExerciseConfiguration = serde_json::from_value(json!({
            "id": 4,
            "exercise_id": 9,
            "sets": 3,
            "repsHigh": 10,
            "repsLow": 8,
            "rest": 60
        }))
        .unwrap();
        assert_eq!((cfg.sets, cfg.reps_high, cfg.reps_low, cfg.rest), (3, 10, 8, 60));
        assert_eq!(cfg.workout_day_exercise_id, None);
    }

    #[test]
    fn plan_without_days_counts_zero_sets() {
        let plan: TrainingPlan =
            serde_json::from_value(json!({"id": 1, "name": "Push Pull Legs"})).unwrap();
        assert!(plan.days.is_empty());
        assert_eq!(plan.total_sets(), 0);
    }
}
