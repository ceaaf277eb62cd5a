use log::{info, warn};

use super::Session;
use crate::auth::Role;
use crate::error::{Error, Result};
use crate::models::{Gym, NewGym, NewUserGym, PushMessage, PushToken, UserGym};
use crate::pagination::{Page, PageQuery};
use crate::validation::{Validate, ValidationErrors};

impl Session {
    pub async fn my_gyms(&self) -> Result<Vec<Gym>> {
        self.require(Role::Gym).await?;
        self.call(self.api.gyms_by_user()).await
    }

    pub async fn create_gym(&self, gym: &NewGym) -> Result<Gym> {
        let user = self.require(Role::Gym).await?;
        gym.validate()?;
        let body = NewGym {
            owner_email: user.email,
            ..gym.clone()
        };
        let created = self.call(self.api.create::<Gym, _>(&body)).await?;
        info!("Created gym {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn gym_members(&self, gym_id: i64, query: PageQuery) -> Result<Page<UserGym>> {
        self.require(Role::Gym).await?;
        self.call(self.api.memberships_of_gym(gym_id, query)).await
    }

    pub async fn my_memberships(&self) -> Result<Vec<UserGym>> {
        let user = self.require(Role::Logued).await?;
        self.call(self.api.memberships_of_user(&user.email)).await
    }

    /// Enrols a user in a gym. A premium membership also raises the member to
    /// the premium role. The two writes are independent: when the role
    /// update fails the membership stays and `PartialFailure` is returned.
    pub async fn grant_membership(&self, membership: &NewUserGym) -> Result<UserGym> {
        self.require(Role::Gym).await?;
        membership.validate()?;

        let created = self
            .call(self.api.create::<UserGym, _>(membership))
            .await?;
        info!(
            "Granted membership {} of gym {} to {}",
            created.id, created.gym_id, created.user_email
        );
        if !membership.is_premium {
            return Ok(created);
        }

        match self.promote_to_premium(&membership.user_email).await {
            Ok(()) => Ok(created),
            Err(e) => {
                warn!(
                    "Membership {} created but role update for {} failed: {}",
                    created.id, membership.user_email, e
                );
                Err(Error::after("gym membership", e))
            }
        }
    }

    async fn promote_to_premium(&self, email: &str) -> Result<()> {
        let member = self.call(self.api.user_by_email(email)).await?;
        if member.role >= Role::Premium {
            return Ok(());
        }
        self.call(self.api.update_user_role(email, Role::Premium))
            .await?;
        info!("Raised {} to {}", email, Role::Premium);
        Ok(())
    }

    pub async fn register_push_token(&self, token: &str) -> Result<()> {
        let user = self.require(Role::Logued).await?;
        if token.trim().is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("token", "is required");
            return Err(errors.into());
        }
        let body = PushToken {
            token: token.trim().to_string(),
            user_email: user.email,
        };
        self.call(self.api.register_push_token(&body)).await
    }

    pub async fn send_notification(&self, message: &PushMessage) -> Result<()> {
        self.require(Role::Admin).await?;
        let mut errors = ValidationErrors::new();
        if message.title.trim().is_empty() {
            errors.add("title", "is required");
        }
        if message.body.trim().is_empty() {
            errors.add("body", "is required");
        }
        errors.into_result()?;
        self.call(self.api.send_notification(message)).await
    }
}
