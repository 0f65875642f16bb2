use futures::future::join_all;
use std::{sync::Arc, time::Duration};

use super::delivery::{deliver, DeliveryOutcome};
use crate::{
    push::{NotificationKind, PushGateway, PushMessage},
    store::RecordStore,
};

/// Result of one sweep
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepReport {
    /// reminders handed to the push gateway
    pub dispatched: usize,
    /// due records without a device token
    pub skipped: usize,
    pub outcomes: Vec<DeliveryOutcome>,
}

impl SweepReport {
    /// Number of reminders sent, counted as dispatched rather than confirmed
    pub fn sent_count(&self) -> usize {
        self.dispatched
    }

    pub fn confirmed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_confirmed())
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.status.is_confirmed())
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

/// Sends the reminders of every due appointment which was not notified yet
pub struct ReminderSweep {
    store: Arc<dyn RecordStore>,
    gateway: Arc<dyn PushGateway>,
    timeout: Duration,
}

impl ReminderSweep {
    pub fn new(store: Arc<dyn RecordStore>, gateway: Arc<dyn PushGateway>, timeout: Duration) -> Self {
        Self {
            store,
            gateway,
            timeout,
        }
    }

    /// Runs one sweep for reminders due at or before `now` (epoch seconds).
    /// Fails when the store query fails or the sweep exceeds its timeout
    pub async fn run(&self, now: i64) -> anyhow::Result<SweepReport> {
        match tokio::time::timeout(self.timeout, self.sweep(now)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "reminder sweep timed out after {}s",
                self.timeout.as_secs_f32()
            )),
        }
    }

    async fn sweep(&self, now: i64) -> anyhow::Result<SweepReport> {
        tracing::debug!("running reminder sweep for ts {now}");
        let records = self.store.find_due_reminders(now).await?;
        let mut skipped = 0;
        let mut messages = Vec::with_capacity(records.len());
        for record in records {
            // the store only returns unsent records, check anyway before sending
            if record.appointment.notification_sent {
                continue;
            }
            match PushMessage::for_appointment(NotificationKind::AppointmentReminder, &record) {
                Some(message) => messages.push((record.key, message)),
                None => skipped += 1,
            }
        }
        let dispatched = messages.len();
        let store = self.store.as_ref();
        let gateway = self.gateway.as_ref();
        let deliveries = messages.into_iter().map(move |(key, message)| async move {
            deliver(store, gateway, key, &message).await
        });
        let outcomes = join_all(deliveries).await;
        let report = SweepReport {
            dispatched,
            skipped,
            outcomes,
        };
        tracing::info!(
            "Sent {} reminders ({} confirmed, {} failed, {} without device token)",
            report.sent_count(),
            report.confirmed_count(),
            report.failed_count(),
            report.skipped
        );
        Ok(report)
    }
}
