use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use appointment_notifier::{
    models::{Appointment, AppointmentKey, AppointmentRecord},
    push::{PushGateway, PushMessage},
    store::RecordStore,
};

/// Record store keeping the appointments in memory
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<AppointmentRecord>>,
    fail_queries: AtomicBool,
}

impl InMemoryStore {
    pub fn insert(&self, collection: &str, id: &str, appointment: Appointment) -> AppointmentRecord {
        let appointment = Appointment {
            _id: Some(id.into()),
            ..appointment
        };
        let record = AppointmentRecord::new(AppointmentKey::new(collection, id), appointment);
        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn get(&self, key: &AppointmentKey) -> Option<Appointment> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|record| &record.key == key)
            .map(|record| record.appointment.clone())
    }

    pub fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find_due_reminders(&self, now: i64) -> anyhow::Result<Vec<AppointmentRecord>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("store unavailable"));
        }
        let records = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| {
                !record.appointment.notification_sent
                    && record.appointment.reminder_ts.map_or(false, |ts| ts <= now)
            })
            .cloned()
            .collect();
        Ok(records)
    }

    async fn find_appointment(
        &self,
        key: &AppointmentKey,
    ) -> anyhow::Result<Option<AppointmentRecord>> {
        let record = self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| &record.key == key)
            .cloned();
        Ok(record)
    }

    async fn mark_notification_sent(&self, key: &AppointmentKey) -> anyhow::Result<bool> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|record| &record.key == key) else {
            return Err(anyhow::anyhow!("appointment {key} not found"));
        };
        if record.appointment.notification_sent {
            return Ok(false);
        }
        record.appointment.notification_sent = true;
        Ok(true)
    }
}

/// Push gateway recording every message it accepts
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<PushMessage>>,
    failing_tokens: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn fail_for(&self, token: &str) {
        self.failing_tokens.lock().unwrap().push(token.to_owned());
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send(&self, message: &PushMessage) -> anyhow::Result<()> {
        let failing = self
            .failing_tokens
            .lock()
            .unwrap()
            .iter()
            .any(|token| token == &message.token);
        if failing {
            return Err(anyhow::anyhow!("unregistered token {}", message.token));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
