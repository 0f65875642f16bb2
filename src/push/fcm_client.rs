use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use tokio::sync::Mutex;

use super::{
    google_auth_token::GoogleAuthToken,
    push_message::{PushMessage, PushPayload},
    PushGateway,
};
use crate::{config::FcmConfig, constants::FCM_ENDPOINT_BASE};

/// Push gateway backed by the Firebase Cloud Messaging HTTP v1 API
pub struct FcmClient {
    client: reqwest::Client,
    endpoint: String,
    google_auth_token: Mutex<GoogleAuthToken>,
}

impl FcmClient {
    pub fn new(config: &FcmConfig) -> Self {
        let endpoint = format!("{}/{}/messages:send", FCM_ENDPOINT_BASE, config.project_id);
        Self {
            client: reqwest::Client::new(),
            endpoint,
            google_auth_token: Mutex::new(GoogleAuthToken::new(config)),
        }
    }

    async fn bearer_token(&self) -> anyhow::Result<String> {
        let mut google_auth_token = self.google_auth_token.lock().await;
        let access_token = google_auth_token.get_access_token(&self.client).await?;
        Ok(format!("Bearer {}", access_token))
    }
}

#[async_trait]
impl PushGateway for FcmClient {
    async fn send(&self, message: &PushMessage) -> anyhow::Result<()> {
        let bearer_token = self.bearer_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_token.as_str().parse()?);
        headers.insert(CONTENT_TYPE, "application/json".parse()?);
        let payload = PushPayload { message };
        let res = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .context("not able to reach fcm")?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("fcm rejected the message: {status} {body}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_contains_project_id() {
        let config = FcmConfig {
            project_id: "clinic-app".to_owned(),
            client_email: "svc@clinic-app.iam.gserviceaccount.com".to_owned(),
            private_key: String::new(),
        };
        let client = FcmClient::new(&config);
        assert_eq!(
            client.endpoint,
            "https://fcm.googleapis.com/v1/projects/clinic-app/messages:send"
        );
    }
}
