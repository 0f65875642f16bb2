use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::{AppointmentKey, AppointmentRecord};

/// Document store holding the appointment records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All unsent appointments across every appointment collection whose
    /// reminder timestamp is at or before `now` (epoch seconds)
    async fn find_due_reminders(&self, now: i64) -> anyhow::Result<Vec<AppointmentRecord>>;

    async fn find_appointment(
        &self,
        key: &AppointmentKey,
    ) -> anyhow::Result<Option<AppointmentRecord>>;

    /// Flips `notificationSent` to true only if it is still false.
    /// Returns whether this call changed the flag
    async fn mark_notification_sent(&self, key: &AppointmentKey) -> anyhow::Result<bool>;
}
