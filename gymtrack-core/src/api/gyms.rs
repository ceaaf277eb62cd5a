use super::ApiClient;
use crate::error::Result;
use crate::models::{Gym, UserGym};
use crate::pagination::{Page, PageQuery};

impl ApiClient {
    /// Gyms owned by the caller.
    pub async fn gyms_by_user(&self) -> Result<Vec<Gym>> {
        self.get_json("/gym/by_user", &[]).await
    }

    pub async fn memberships_of_gym(&self, gym_id: i64, query: PageQuery) -> Result<Page<UserGym>> {
        self.list::<UserGym>(&query.filter("gym_id", gym_id)).await
    }

    pub async fn memberships_of_user(&self, email: &str) -> Result<Vec<UserGym>> {
        self.list_all::<UserGym>(&PageQuery::default().filter("user_email", email))
            .await
    }
}
