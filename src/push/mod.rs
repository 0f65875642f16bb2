use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

pub mod fcm_client;
pub mod google_auth_token;
pub mod push_message;

pub use fcm_client::FcmClient;
pub use push_message::{NotificationKind, PushMessage, PushMessageData, PushNotification};

/// Delivers a push message to the device identified by its token
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(&self, message: &PushMessage) -> anyhow::Result<()>;
}
