use chrono::Local;
use log::debug;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::RoleGate;
use crate::config::ClientConfig;
use crate::models::{NewBodyMeasurement, NewHistoryPRExercise};
use crate::pagination::PageQuery;
use crate::session::Session;
use crate::stats::DateWindow;
use crate::uniffi_interface::errors::GymtrackError;
use crate::uniffi_interface::objects::{
    ExerciseInfo, HistoryReport, MeasurementDelta, MeasurementEntry, ScreenAccess, SetEntry,
    SignedInUser, UserRole, parse_date,
};

/// Session handle held by the mobile shell. Calls are async: the work runs
/// on the global runtime and the foreign executor only awaits its result.
#[derive(uniffi::Object)]
pub struct AppSession {
    inner: Arc<Session>,
}

impl AppSession {
    async fn spawn<T, F, Fut>(&self, work: F) -> Result<T, GymtrackError>
    where
        F: FnOnce(Arc<Session>) -> Fut,
        Fut: Future<Output = crate::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let rt = crate::runtime::global_runtime()?;
        let handle = rt.spawn(work(Arc::clone(&self.inner)));
        match handle.await {
            Ok(result) => Ok(result?),
            Err(e) if e.is_cancelled() => Err(GymtrackError::Cancelled),
            Err(e) => Err(GymtrackError::Common(format!("session task failed: {}", e))),
        }
    }
}

#[uniffi::export]
impl AppSession {
    #[uniffi::constructor]
    pub fn new(api_url: String, db_path: String, timeout_secs: u64) -> Result<Arc<Self>, GymtrackError> {
        let config = ClientConfig {
            api_url,
            db_path: PathBuf::from(db_path),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        };
        debug!("Creating session against {}", config.api_url);
        let inner = Arc::new(Session::from_config(&config)?);
        Ok(Arc::new(AppSession { inner }))
    }

    /// Signed-in user from the local store, if the token has not expired.
    pub async fn restore(&self) -> Result<Option<SignedInUser>, GymtrackError> {
        let state = self.spawn(|s| async move { s.restore().await }).await?;
        Ok(state.user().cloned().map(Into::into))
    }

    pub async fn login(&self, email: String, password: String) -> Result<SignedInUser, GymtrackError> {
        let user = self
            .spawn(|s| async move {
                s.login(&email, &password).await?;
                s.current_user().await.ok_or(crate::Error::NotAuthenticated)
            })
            .await?;
        Ok(user.into())
    }

    pub async fn logout(&self) -> Result<(), GymtrackError> {
        self.spawn(|s| async move { s.logout().await }).await
    }

    pub async fn verify(&self) -> Result<(), GymtrackError> {
        self.spawn(|s| async move { s.verify().await.map(|_| ()) })
            .await
    }

    pub async fn current_user(&self) -> Result<Option<SignedInUser>, GymtrackError> {
        let user = self
            .spawn(|s| async move { Ok(s.current_user().await) })
            .await?;
        Ok(user.map(Into::into))
    }

    pub async fn can_access(&self, required: UserRole) -> Result<ScreenAccess, GymtrackError> {
        let gate = RoleGate::new(required.into());
        let access = self
            .spawn(move |s| async move { Ok(s.check(gate).await) })
            .await?;
        Ok(access.into())
    }

    pub async fn is_first_launch(&self) -> Result<bool, GymtrackError> {
        self.spawn(|s| async move { s.is_first_launch().await })
            .await
    }

    pub async fn mark_launched(&self) -> Result<(), GymtrackError> {
        self.spawn(|s| async move { s.mark_launched().await }).await
    }

    pub async fn search_exercises(
        &self,
        name: Option<String>,
        page: u32,
        size: u32,
    ) -> Result<Vec<ExerciseInfo>, GymtrackError> {
        let found = self
            .spawn(move |s| async move {
                s.search_exercises(name.as_deref(), PageQuery::new(page, size))
                    .await
            })
            .await?;
        Ok(found.items.into_iter().map(Into::into).collect())
    }

    /// `window` is one of `week`, `month`, `3months`, `6months`, `year`,
    /// `all`.
    pub async fn exercise_report(
        &self,
        exercise_id: i64,
        window: String,
        last: Option<u32>,
    ) -> Result<HistoryReport, GymtrackError> {
        let window: DateWindow = window
            .parse()
            .map_err(|message| GymtrackError::Validation { message })?;
        let report = self
            .spawn(move |s| async move {
                s.exercise_report(exercise_id, window, last.map(|n| n as usize))
                    .await
            })
            .await?;
        Ok(report.into())
    }

    /// Returns the id of the new history row.
    pub async fn log_session(
        &self,
        exercise_id: i64,
        date: Option<String>,
        notes: Option<String>,
        sets: Vec<SetEntry>,
    ) -> Result<i64, GymtrackError> {
        let date = match date {
            Some(d) => parse_date(&d)?,
            None => Local::now().date_naive(),
        };
        let session = NewHistoryPRExercise {
            exercise_id,
            user_email: String::new(),
            date,
            notes: notes.filter(|n| !n.trim().is_empty()),
            series: sets.into_iter().map(Into::into).collect(),
        };
        let created = self
            .spawn(|s| async move { s.log_session(&session).await })
            .await?;
        Ok(created.id)
    }

    pub async fn delete_session(&self, history_id: i64) -> Result<(), GymtrackError> {
        self.spawn(move |s| async move { s.delete_session(history_id).await })
            .await
    }

    pub async fn save_measurement(&self, entry: MeasurementEntry) -> Result<i64, GymtrackError> {
        let measurement = NewBodyMeasurement::try_from(entry)?;
        let saved = self
            .spawn(|s| async move { s.save_measurement(&measurement).await })
            .await?;
        Ok(saved.id)
    }

    pub async fn measurement_progress(&self) -> Result<Option<MeasurementDelta>, GymtrackError> {
        let progress = self
            .spawn(|s| async move { s.measurement_progress().await })
            .await?;
        Ok(progress.map(Into::into))
    }

    pub async fn register_push_token(&self, token: String) -> Result<(), GymtrackError> {
        self.spawn(|s| async move { s.register_push_token(&token).await })
            .await
    }
}
