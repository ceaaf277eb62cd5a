use super::ApiClient;
use crate::error::Result;
use crate::models::{BodyMeasurement, HistoryPRExercise};
use crate::pagination::PageQuery;

impl ApiClient {
    /// Every logged session of one exercise for one user, series and dropsets
    /// included.
    pub async fn exercise_history(&self, exercise_id: i64, email: &str) -> Result<Vec<HistoryPRExercise>> {
        let mut history = self
            .list_all::<HistoryPRExercise>(
                &PageQuery::default()
                    .filter("exercise_id", exercise_id)
                    .filter("user_email", email),
            )
            .await?;
        history.iter_mut().for_each(HistoryPRExercise::sort_sets);
        Ok(history)
    }

    pub async fn body_measurements(&self, email: &str) -> Result<Vec<BodyMeasurement>> {
        self.list_all::<BodyMeasurement>(&PageQuery::default().filter("user_email", email))
            .await
    }
}
