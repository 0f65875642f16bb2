use crate::{
    models::AppointmentKey,
    push::{NotificationKind, PushGateway, PushMessage},
    store::RecordStore,
};

/// What happened to a single notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// message sent and the record flagged
    Sent,
    /// message sent but another run had already flagged the record
    AlreadyMarked,
    SendFailed(String),
    /// message sent but the record could not be flagged, it stays eligible
    UpdateFailed(String),
}

impl DeliveryStatus {
    /// The gateway accepted the message
    pub fn is_delivered(&self) -> bool {
        !matches!(self, Self::SendFailed(_))
    }

    /// The message was sent and the record carries the sent flag
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Sent | Self::AlreadyMarked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub key: AppointmentKey,
    pub kind: NotificationKind,
    pub status: DeliveryStatus,
}

/// Sends the message and then flags the record as notified.
/// Errors are logged and returned as part of the outcome, never propagated
pub async fn deliver(
    store: &dyn RecordStore,
    gateway: &dyn PushGateway,
    key: AppointmentKey,
    message: &PushMessage,
) -> DeliveryOutcome {
    let kind = message.data.kind;
    let status = match gateway.send(message).await {
        Err(err) => {
            tracing::warn!("not able to send {kind:?} for {key}: {err:#}");
            DeliveryStatus::SendFailed(format!("{err:#}"))
        }
        Ok(()) => match store.mark_notification_sent(&key).await {
            Ok(true) => {
                tracing::debug!("{kind:?} sent for {key}");
                DeliveryStatus::Sent
            }
            Ok(false) => {
                tracing::warn!("{kind:?} sent for {key} but it was already flagged by another run");
                DeliveryStatus::AlreadyMarked
            }
            Err(err) => {
                tracing::error!("{kind:?} sent for {key} but not able to flag it: {err:#}");
                DeliveryStatus::UpdateFailed(format!("{err:#}"))
            }
        },
    };
    DeliveryOutcome { key, kind, status }
}
