//! REST client for the gymtrack backend.

pub mod account;
pub mod catalog;
pub mod gyms;
pub mod history;
pub mod notifications;

use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::sync::RwLock;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::*;
use crate::pagination::{Page, PageQuery};

/// A backend collection reachable under `/{PATH}` with the usual list, get,
/// create, update and delete verbs.
pub trait Resource: DeserializeOwned + Send + 'static {
    const PATH: &'static str;
}

macro_rules! resources {
    ($($ty:ty => $path:literal),* $(,)?) => {
        $(impl Resource for $ty {
            const PATH: &'static str = $path;
        })*
    };
}

resources! {
    Exercise => "/exercise",
    Difficulty => "/dificulty",
    Muscle => "/muscle",
    SpecificMuscle => "/specific_muscle",
    Machine => "/machine",
    WeekDay => "/week_day",
    ExerciseConfiguration => "/exercise_configuration",
    ExerciseMuscle => "/exercise_muscle",
    TrainingPlan => "/training_plan",
    TagOfTrainingPlan => "/tag_of_training_plan",
    WorkoutDayExercise => "/workout_day_exercise",
    Gym => "/gym",
    UserGym => "/user_gym",
    HistoryPRExercise => "/history_pr_exercise",
    SeriesPRExercise => "/series_pr_exercise",
    DropsetPRExercise => "/dropset_pr_exercise",
    User => "/user",
    BodyMeasurement => "/profile",
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("gymtrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("backend answered 401");
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        if body.trim().is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn list<R: Resource>(&self, query: &PageQuery) -> Result<Page<R>> {
        self.get_json(R::PATH, &query.to_query()).await
    }

    /// Follows `page` until the envelope says there is nothing left.
    pub async fn list_all<R: Resource>(&self, query: &PageQuery) -> Result<Vec<R>> {
        let mut query = query.clone();
        let mut items = Vec::new();
        loop {
            let page = self.list::<R>(&query).await?;
            let more = page.has_next() && !page.items.is_empty();
            items.extend(page.items);
            if !more {
                return Ok(items);
            }
            query = query.next_page();
        }
    }

    pub async fn get<R: Resource>(&self, id: impl Display) -> Result<R> {
        self.get_json(&format!("{}/{}", R::PATH, id), &[]).await
    }

    pub async fn create<R: Resource, B: Serialize + ?Sized>(&self, body: &B) -> Result<R> {
        self.post_json(R::PATH, body).await
    }

    pub async fn update<R: Resource, B: Serialize + ?Sized>(
        &self,
        id: impl Display,
        body: &B,
    ) -> Result<R> {
        self.put_json(&format!("{}/{}", R::PATH, id), body).await
    }

    pub async fn delete<R: Resource>(&self, id: impl Display) -> Result<()> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &format!("{}/{}", R::PATH, id)))
            .await?;
        Ok(())
    }
}

/// Pulls the human-readable part out of an error body. The backend reports
/// `{"detail": "..."}`; validation errors carry a list of `{msg}` objects.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
