use chrono::{Local, NaiveDate};
use log::{info, warn};

use super::Session;
use crate::auth::Role;
use crate::error::{Error, Result};
use crate::models::{
    BodyMeasurement, DropsetPRExercise, HistoryPRExercise, NewBodyMeasurement,
    NewDropsetPRExercise, NewHistoryPRExercise, NewSeriesPRExercise, SeriesPRExercise,
};
use crate::progress::MeasurementProgress;
use crate::stats::{DateWindow, ExerciseReport};
use crate::validation::Validate;

impl Session {
    /// Logged sessions of one exercise for the signed-in user.
    pub async fn exercise_history(&self, exercise_id: i64) -> Result<Vec<HistoryPRExercise>> {
        let user = self.require(Role::Logued).await?;
        self.call(self.api.exercise_history(exercise_id, &user.email))
            .await
    }

    pub async fn exercise_report(
        &self,
        exercise_id: i64,
        window: DateWindow,
        last: Option<usize>,
    ) -> Result<ExerciseReport> {
        let history = self.exercise_history(exercise_id).await?;
        Ok(ExerciseReport::build(exercise_id, &history, window, last, today()))
    }

    /// Posts a session top-down: the history row, then each series under
    /// it, then each dropset under its series. Nothing is rolled back when a
    /// later step fails.
    pub async fn log_session(&self, session: &NewHistoryPRExercise) -> Result<HistoryPRExercise> {
        let user = self.require(Role::Logued).await?;
        session.validate()?;

        let mut session = session.clone();
        session.user_email = user.email;

        let mut history = self
            .call(self.api.create::<HistoryPRExercise, _>(&session))
            .await?;

        match self.post_series(history.id, &session).await {
            Ok(series) => {
                history.series = series;
                info!(
                    "Logged session {} with {} series for exercise {}",
                    history.id,
                    history.series.len(),
                    history.exercise_id
                );
                Ok(history)
            }
            Err(e) => {
                warn!("Session {} saved without all of its series: {}", history.id, e);
                Err(Error::after("history session", e))
            }
        }
    }

    async fn post_series(
        &self,
        history_id: i64,
        session: &NewHistoryPRExercise,
    ) -> Result<Vec<SeriesPRExercise>> {
        let mut created = Vec::with_capacity(session.series.len());
        for (i, s) in session.series.iter().enumerate() {
            let body = NewSeriesPRExercise {
                history_pr_exercise_id: history_id,
                order: i as u32 + 1,
                reps: s.reps,
                weight: s.weight,
                rpe: s.rpe,
            };
            let mut series = self
                .call(self.api.create::<SeriesPRExercise, _>(&body))
                .await?;

            for (j, d) in s.dropsets.iter().enumerate() {
                let body = NewDropsetPRExercise {
                    series_pr_exercise_id: series.id,
                    order: j as u32 + 1,
                    reps: d.reps,
                    weight: d.weight,
                };
                let dropset = self
                    .call(self.api.create::<DropsetPRExercise, _>(&body))
                    .await?;
                series.dropsets.push(dropset);
            }
            created.push(series);
        }
        Ok(created)
    }

    /// Removes a session; the backend deletes its series and dropsets too.
    pub async fn delete_session(&self, history_id: i64) -> Result<()> {
        self.require(Role::Logued).await?;
        self.call(self.api.delete::<HistoryPRExercise>(history_id))
            .await?;
        info!("Deleted session {}", history_id);
        Ok(())
    }

    pub async fn body_measurements(&self) -> Result<Vec<BodyMeasurement>> {
        let user = self.require(Role::Logued).await?;
        self.call(self.api.body_measurements(&user.email)).await
    }

    /// Saves a new snapshot for the signed-in user, dated today unless a
    /// date is given.
    pub async fn save_measurement(&self, measurement: &NewBodyMeasurement) -> Result<BodyMeasurement> {
        let user = self.require(Role::Logued).await?;
        measurement.validate()?;
        let body = NewBodyMeasurement {
            user_email: user.email,
            date: Some(measurement.date.unwrap_or_else(today)),
            ..measurement.clone()
        };
        self.call(self.api.create::<BodyMeasurement, _>(&body)).await
    }

    pub async fn measurement_progress(&self) -> Result<Option<MeasurementProgress>> {
        let snapshots = self.body_measurements().await?;
        Ok(MeasurementProgress::between(&snapshots))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
