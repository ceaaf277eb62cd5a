use super::ApiClient;
use crate::error::Result;
use crate::models::{PushMessage, PushToken};

impl ApiClient {
    pub async fn register_push_token(&self, token: &PushToken) -> Result<()> {
        let _: serde_json::Value = self.post_json("/notification/token", token).await?;
        Ok(())
    }

    pub async fn send_notification(&self, message: &PushMessage) -> Result<()> {
        let _: serde_json::Value = self.post_json("/notification/send", message).await?;
        Ok(())
    }
}
