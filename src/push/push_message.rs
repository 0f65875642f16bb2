use serde::{Deserialize, Serialize};

use crate::{
    constants::{CONFIRMATION_TITLE, REMINDER_TITLE},
    models::AppointmentRecord,
};

/// Value of the `type` field in the data section of a push message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AppointmentReminder,
    AppointmentConfirmation,
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AppointmentReminder => REMINDER_TITLE,
            Self::AppointmentConfirmation => CONFIRMATION_TITLE,
        }
    }

    fn body(&self, service: &str, time_slot: &str) -> String {
        let service = service.trim();
        let time_slot = time_slot.trim();
        match self {
            Self::AppointmentReminder => {
                format!("You have an appointment for {service} tomorrow at {time_slot}")
            }
            Self::AppointmentConfirmation => {
                format!("Your appointment for {service} has been scheduled for {time_slot}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessageData {
    pub appointment_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub token: String,
    pub notification: PushNotification,
    pub data: PushMessageData,
}

impl PushMessage {
    /// Builds the push message of the given kind for an appointment.
    /// Returns `None` when the appointment has no device token
    pub fn for_appointment(kind: NotificationKind, record: &AppointmentRecord) -> Option<Self> {
        let appointment = &record.appointment;
        let token = appointment.device_token()?;
        let notification = PushNotification {
            title: kind.title().to_owned(),
            body: kind.body(&appointment.service, &appointment.time_slot),
        };
        let data = PushMessageData {
            appointment_id: record.key.id.to_string(),
            kind,
        };
        let message = Self {
            token: token.to_owned(),
            notification,
            data,
        };
        Some(message)
    }
}

/// Request body of the FCM HTTP v1 send endpoint
#[derive(Debug, Serialize)]
pub(crate) struct PushPayload<'a> {
    pub message: &'a PushMessage,
}
