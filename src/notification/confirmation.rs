use std::sync::Arc;

use super::delivery::{deliver, DeliveryOutcome};
use crate::{
    models::AppointmentRecord,
    push::{NotificationKind, PushGateway, PushMessage},
    store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    SkippedNoToken,
    SkippedAlreadySent,
    Delivered(DeliveryOutcome),
}

/// Sends the confirmation push for a newly created appointment
pub struct ConfirmationNotifier {
    store: Arc<dyn RecordStore>,
    gateway: Arc<dyn PushGateway>,
}

impl ConfirmationNotifier {
    pub fn new(store: Arc<dyn RecordStore>, gateway: Arc<dyn PushGateway>) -> Self {
        Self { store, gateway }
    }

    /// Never fails: creation of the appointment must not depend on the push.
    /// Send and update errors are logged and reported through the outcome
    pub async fn on_appointment_created(&self, record: &AppointmentRecord) -> ConfirmationOutcome {
        if record.appointment.notification_sent {
            tracing::debug!("confirmation already sent for {}", record.key);
            return ConfirmationOutcome::SkippedAlreadySent;
        }
        let kind = NotificationKind::AppointmentConfirmation;
        let Some(message) = PushMessage::for_appointment(kind, record) else {
            tracing::debug!("no device token for {}", record.key);
            return ConfirmationOutcome::SkippedNoToken;
        };
        let outcome = deliver(
            self.store.as_ref(),
            self.gateway.as_ref(),
            record.key.clone(),
            &message,
        )
        .await;
        if outcome.status.is_confirmed() {
            tracing::info!("Confirmation notification sent successfully for {}", record.key);
        } else {
            tracing::error!("Error sending confirmation for {}: {:?}", record.key, outcome.status);
        }
        ConfirmationOutcome::Delivered(outcome)
    }
}
