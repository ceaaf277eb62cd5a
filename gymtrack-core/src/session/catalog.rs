use log::info;
use serde::Serialize;

use super::Session;
use crate::api::Resource;
use crate::auth::Role;
use crate::error::Result;
use crate::models::{
    Exercise, ExerciseMuscle, Machine, NamedEntry, NewExercise, NewExerciseMuscle, NewMachine,
    NewSpecificMuscle, SpecificMuscle,
};
use crate::pagination::{Page, PageQuery};
use crate::validation::{Validate, ValidationErrors, validate_name};

impl Session {
    pub async fn search_exercises(&self, name: Option<&str>, query: PageQuery) -> Result<Page<Exercise>> {
        self.require(Role::Logued).await?;
        self.call(self.api.search_exercises(name, query)).await
    }

    pub async fn exercise(&self, id: i64) -> Result<Exercise> {
        self.require(Role::Logued).await?;
        self.call(self.api.get::<Exercise>(id)).await
    }

    /// Any full catalog listing: muscles, machines, difficulties, week days.
    pub async fn catalog<R: Resource>(&self) -> Result<Vec<R>> {
        self.require(Role::Logued).await?;
        self.call(self.api.list_all::<R>(&PageQuery::default())).await
    }

    pub async fn muscles_of_exercise(&self, exercise_id: i64) -> Result<Vec<ExerciseMuscle>> {
        self.require(Role::Logued).await?;
        self.call(self.api.muscles_of_exercise(exercise_id)).await
    }

    pub async fn specific_muscles_of(&self, muscle_id: i64) -> Result<Vec<SpecificMuscle>> {
        self.require(Role::Logued).await?;
        self.call(self.api.specific_muscles_of(muscle_id)).await
    }

    /// Creates an entry that only carries a name (muscle, difficulty).
    pub async fn create_catalog_entry<R: Resource>(&self, name: &str) -> Result<R> {
        self.require(Role::Gym).await?;
        validate_name(name)?;
        let body = NamedEntry {
            name: name.trim().to_string(),
        };
        let created = self.call(self.api.create::<R, _>(&body)).await?;
        info!("Created {} entry {:?}", R::PATH, body.name);
        Ok(created)
    }

    pub async fn create_exercise(&self, exercise: &NewExercise) -> Result<Exercise> {
        self.require(Role::Gym).await?;
        validate_name(&exercise.name)?;
        self.call(self.api.create::<Exercise, _>(exercise)).await
    }

    pub async fn create_machine(&self, machine: &NewMachine) -> Result<Machine> {
        self.require(Role::Gym).await?;
        validate_name(&machine.name)?;
        self.call(self.api.create::<Machine, _>(machine)).await
    }

    pub async fn create_specific_muscle(&self, muscle: &NewSpecificMuscle) -> Result<SpecificMuscle> {
        self.require(Role::Gym).await?;
        validate_name(&muscle.name)?;
        self.call(self.api.create::<SpecificMuscle, _>(muscle)).await
    }

    pub async fn link_muscle(&self, link: &NewExerciseMuscle) -> Result<ExerciseMuscle> {
        self.require(Role::Gym).await?;
        link.validate()?;
        self.call(self.api.create::<ExerciseMuscle, _>(link)).await
    }

    pub async fn update_catalog_entry<R, B>(&self, id: i64, body: &B) -> Result<R>
    where
        R: Resource,
        B: Serialize + ?Sized,
    {
        self.require(Role::Gym).await?;
        self.call(self.api.update::<R, _>(id, body)).await
    }

    pub async fn delete_catalog_entry<R: Resource>(&self, id: i64) -> Result<()> {
        self.require(Role::Gym).await?;
        if id <= 0 {
            let mut errors = ValidationErrors::new();
            errors.add("id", "must be positive");
            return Err(errors.into());
        }
        self.call(self.api.delete::<R>(id)).await?;
        info!("Deleted {}/{}", R::PATH, id);
        Ok(())
    }
}
