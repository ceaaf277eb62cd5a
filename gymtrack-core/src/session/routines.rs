use log::info;

use super::Session;
use crate::auth::Role;
use crate::error::Result;
use crate::models::{
    ExerciseConfiguration, NewExerciseConfiguration, NewTagOfTrainingPlan, NewTrainingPlan,
    NewWorkoutDayExercise, TagOfTrainingPlan, TrainingPlan, WorkoutDayExercise,
};
use crate::pagination::{Page, PageQuery};
use crate::validation::{Validate, validate_name};

impl Session {
    pub async fn training_plans(&self, query: PageQuery) -> Result<Page<TrainingPlan>> {
        self.require(Role::Logued).await?;
        self.call(self.api.training_plans(query)).await
    }

    /// A routine with its days. Days missing from the response are fetched
    /// separately.
    pub async fn training_plan(&self, id: i64) -> Result<TrainingPlan> {
        self.require(Role::Logued).await?;
        let mut plan = self.call(self.api.get::<TrainingPlan>(id)).await?;
        if plan.days.is_empty() {
            plan.days = self.call(self.api.workout_days(id)).await?;
        }
        Ok(plan)
    }

    /// Personal routines need a logued user; gym routines need the gym role.
    pub async fn create_training_plan(&self, plan: &NewTrainingPlan) -> Result<TrainingPlan> {
        let required = if plan.gym_id.is_some() {
            Role::Gym
        } else {
            Role::Logued
        };
        self.require(required).await?;
        plan.validate()?;
        let created = self.call(self.api.create::<TrainingPlan, _>(plan)).await?;
        info!("Created training plan {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn delete_training_plan(&self, id: i64) -> Result<()> {
        self.require(Role::Logued).await?;
        self.call(self.api.delete::<TrainingPlan>(id)).await
    }

    pub async fn tag_training_plan(&self, training_plan_id: i64, name: &str) -> Result<TagOfTrainingPlan> {
        self.require(Role::Logued).await?;
        validate_name(name)?;
        let tag = NewTagOfTrainingPlan {
            name: name.trim().to_string(),
            training_plan_id,
        };
        self.call(self.api.create::<TagOfTrainingPlan, _>(&tag)).await
    }

    pub async fn add_workout_day(&self, training_plan_id: i64, week_day_id: i64) -> Result<WorkoutDayExercise> {
        self.require(Role::Logued).await?;
        let day = NewWorkoutDayExercise {
            training_plan_id,
            week_day_id,
        };
        self.call(self.api.create::<WorkoutDayExercise, _>(&day)).await
    }

    pub async fn exercise_configuration(&self, id: i64) -> Result<ExerciseConfiguration> {
        self.require(Role::Logued).await?;
        self.call(self.api.get::<ExerciseConfiguration>(id)).await
    }

    /// Sets, rep range and rest are sent exactly as entered.
    pub async fn create_exercise_configuration(
        &self,
        config: &NewExerciseConfiguration,
    ) -> Result<ExerciseConfiguration> {
        self.require(Role::Logued).await?;
        config.validate()?;
        self.call(self.api.create::<ExerciseConfiguration, _>(config))
            .await
    }

    pub async fn update_exercise_configuration(
        &self,
        id: i64,
        config: &NewExerciseConfiguration,
    ) -> Result<ExerciseConfiguration> {
        self.require(Role::Logued).await?;
        config.validate()?;
        self.call(self.api.update::<ExerciseConfiguration, _>(id, config))
            .await
    }

    pub async fn delete_exercise_configuration(&self, id: i64) -> Result<()> {
        self.require(Role::Logued).await?;
        self.call(self.api.delete::<ExerciseConfiguration>(id)).await
    }
}
