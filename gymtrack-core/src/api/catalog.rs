use super::ApiClient;
use crate::error::Result;
use crate::models::{Exercise, ExerciseMuscle, SpecificMuscle, TrainingPlan, WorkoutDayExercise};
use crate::pagination::{Page, PageQuery};

impl ApiClient {
    pub async fn search_exercises(&self, name: Option<&str>, query: PageQuery) -> Result<Page<Exercise>> {
        let query = match name {
            Some(name) if !name.trim().is_empty() => query.filter("name", name.trim()),
            _ => query,
        };
        self.list::<Exercise>(&query).await
    }

    pub async fn muscles_of_exercise(&self, exercise_id: i64) -> Result<Vec<ExerciseMuscle>> {
        self.list_all::<ExerciseMuscle>(&PageQuery::default().filter("exercise_id", exercise_id))
            .await
    }

    pub async fn specific_muscles_of(&self, muscle_id: i64) -> Result<Vec<SpecificMuscle>> {
        self.list_all::<SpecificMuscle>(&PageQuery::default().filter("muscle_id", muscle_id))
            .await
    }

    /// Routines of a user; the backend scopes them by the token's owner.
    pub async fn training_plans(&self, query: PageQuery) -> Result<Page<TrainingPlan>> {
        self.list::<TrainingPlan>(&query).await
    }

    pub async fn workout_days(&self, training_plan_id: i64) -> Result<Vec<WorkoutDayExercise>> {
        self.list_all::<WorkoutDayExercise>(
            &PageQuery::default().filter("training_plan_id", training_plan_id),
        )
        .await
    }
}
