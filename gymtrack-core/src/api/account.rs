use serde_json::json;

use super::ApiClient;
use crate::auth::Role;
use crate::error::Result;
use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    UpdateRole, User,
};

// Account and user endpoints. Responses of the account flows are plain
// acknowledgements, so they are read as untyped JSON and dropped.

impl ApiClient {
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.post_json("/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let _: serde_json::Value = self.post_json("/register", request).await?;
        Ok(())
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/verify_email", &json!({ "email": email, "code": code }))
            .await?;
        Ok(())
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/resend-verification", &json!({ "email": email }))
            .await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/forgot_password", &json!({ "email": email }))
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        let _: serde_json::Value = self.post_json("/reset_password", request).await?;
        Ok(())
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
        let _: serde_json::Value = self.post_json("/change_password", request).await?;
        Ok(())
    }

    /// The account behind the current token. A 401 here means the token
    /// is no longer good.
    pub async fn user_data(&self) -> Result<User> {
        self.get_json("/user_data", &[]).await
    }

    pub async fn user_by_email(&self, email: &str) -> Result<User> {
        self.get::<User>(email).await
    }

    pub async fn update_user_role(&self, email: &str, role: Role) -> Result<User> {
        self.put_json(&format!("/user/user_role/{}", email), &UpdateRole { role })
            .await
    }
}
