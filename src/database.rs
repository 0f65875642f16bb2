use anyhow::Context;
use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, from_bson, from_document, to_bson, Document};
use mongodb::change_stream::{
    event::{ChangeStreamEvent, ResumeToken},
    ChangeStream,
};
use mongodb::error::Result as MongoResult;
use mongodb::options::{ChangeStreamOptions, FindOneOptions, FindOptions, UpdateOptions};
use mongodb::results::UpdateResult;
use mongodb::{options::ClientOptions, Client, Database};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    config::AppConfig,
    constants::*,
    models::{Appointment, AppointmentKey, AppointmentRecord, RecordId},
    store::RecordStore,
    utils::get_epoch_ts,
};

pub struct AppDatabase {
    client: Client,
    db_name: String,
    appointment_coll_prefix: String,
}

impl AppDatabase {
    pub async fn new(config: &AppConfig) -> MongoResult<Self> {
        let timeout = Duration::from_secs(MONGO_CONN_TIMEOUT);
        // create the mongodb client options
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        client_options.max_pool_size = Some(config.mongodb_max_pool_size);
        client_options.min_pool_size = Some(config.mongodb_min_pool_size);
        client_options.connect_timeout = Some(timeout);
        // create the client and return Result object
        let client = Client::with_options(client_options)?;
        let app_db = Self {
            client,
            db_name: config.db_name.to_owned(),
            appointment_coll_prefix: config.appointment_coll_prefix.to_owned(),
        };
        Ok(app_db)
    }

    fn database(&self) -> Database {
        self.client.database(&self.db_name)
    }

    pub fn is_appointment_collection(&self, coll: &str) -> bool {
        is_appointment_collection(&self.appointment_coll_prefix, coll)
    }

    pub async fn appointment_collections(&self) -> MongoResult<Vec<String>> {
        let names = self.database().list_collection_names(None).await?;
        let names = names
            .into_iter()
            .filter(|name| self.is_appointment_collection(name))
            .collect();
        Ok(names)
    }

    pub async fn find_one<T>(
        &self,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOneOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.database().collection::<T>(coll);
        coll.find_one(filter, options).await
    }

    pub async fn find<T>(
        &self,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOptions>,
    ) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.database().collection::<T>(coll);
        let mut cursor = coll.find(filter, options).await?;
        let mut data = vec![];
        while let Some(doc) = cursor.next().await {
            data.push(doc?);
        }
        Ok(data)
    }

    pub async fn update_one(
        &self,
        coll: &str,
        filter: Document,
        update: Document,
    ) -> MongoResult<UpdateResult> {
        let coll = self.database().collection::<Document>(coll);
        coll.update_one(filter, update, None).await
    }

    /// Opens a change stream over insert events of the appointment collections,
    /// starting right after `resume_token` when one is given.
    /// Change streams are only available on replica sets
    pub async fn watch_appointment_inserts(
        &self,
        resume_token: Option<ResumeToken>,
    ) -> MongoResult<ChangeStream<ChangeStreamEvent<Document>>> {
        let pipeline = [insert_match_stage(&self.appointment_coll_prefix)];
        let options = ChangeStreamOptions::builder()
            .resume_after(resume_token)
            .build();
        self.database().watch(pipeline, Some(options)).await
    }

    /// Resume token of the last appointment insert the watcher handled
    pub async fn load_watch_resume_token(&self) -> MongoResult<Option<ResumeToken>> {
        let filter = doc! {"_id": WATCH_STATE_ID};
        let state = self
            .find_one::<Document>(COLL_NOTIFIER_STATE, Some(filter), None)
            .await?;
        Ok(state.and_then(resume_token_from_state))
    }

    pub async fn save_watch_resume_token(&self, token: &ResumeToken) -> MongoResult<()> {
        let ts = get_epoch_ts() as i64;
        let token = to_bson(token)?;
        let filter = doc! {"_id": WATCH_STATE_ID};
        let update = doc! {"$set": {"resumeToken": token, "updatedTs": ts}};
        let options = UpdateOptions::builder().upsert(true).build();
        let coll = self.database().collection::<Document>(COLL_NOTIFIER_STATE);
        coll.update_one(filter, update, options).await?;
        Ok(())
    }

    /// Forgets the stored resume token, used when the server no longer has
    /// the history it points into
    pub async fn clear_watch_resume_token(&self) -> MongoResult<()> {
        let filter = doc! {"_id": WATCH_STATE_ID};
        let update = doc! {"$unset": {"resumeToken": ""}};
        self.update_one(COLL_NOTIFIER_STATE, filter, update).await?;
        Ok(())
    }
}

fn insert_match_stage(coll_prefix: &str) -> Document {
    let prefix = coll_prefix.replace('.', "\\.");
    let pattern = format!("^{prefix}(\\..+)?$");
    doc! {
        "$match": {
            "operationType": "insert",
            "ns.coll": {"$regex": pattern}
        }
    }
}

fn resume_token_from_state(state: Document) -> Option<ResumeToken> {
    let token = state.get("resumeToken")?.clone();
    match from_bson::<ResumeToken>(token) {
        Ok(token) => Some(token),
        Err(err) => {
            tracing::warn!("ignoring unreadable watch resume token: {err}");
            None
        }
    }
}

/// Appointment collections are `<prefix>` itself and every `<prefix>.<group>...`
fn is_appointment_collection(prefix: &str, coll: &str) -> bool {
    coll == prefix
        || coll
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('.'))
}

/// Decodes one appointment document. Documents without a usable `_id` or
/// with fields of the wrong type are logged and skipped, so a single bad
/// record never hides the others
pub fn record_from_document(coll: &str, document: Document) -> Option<AppointmentRecord> {
    let Some(id) = document.get("_id").and_then(RecordId::from_bson) else {
        tracing::warn!("skipping appointment without usable _id in {coll}");
        return None;
    };
    let key = AppointmentKey::new(coll, id);
    match from_document::<Appointment>(document) {
        Ok(appointment) => Some(AppointmentRecord::new(key, appointment)),
        Err(err) => {
            tracing::warn!("skipping malformed appointment {key}: {err}");
            None
        }
    }
}

fn records_from_documents(coll: &str, documents: Vec<Document>) -> Vec<AppointmentRecord> {
    documents
        .into_iter()
        .filter_map(|document| record_from_document(coll, document))
        .collect()
}

#[async_trait]
impl RecordStore for AppDatabase {
    async fn find_due_reminders(&self, now: i64) -> anyhow::Result<Vec<AppointmentRecord>> {
        let collections = self
            .appointment_collections()
            .await
            .context("not able to list appointment collections")?;
        let filter = doc! {"notificationSent": false, "reminderTimestamp": {"$lte": now}};
        let mut records = vec![];
        for coll in collections {
            let documents = self
                .find::<Document>(&coll, Some(filter.clone()), None)
                .await
                .with_context(|| format!("not able to query due reminders in {coll}"))?;
            let found = documents.len();
            let due = records_from_documents(&coll, documents);
            tracing::debug!("{} due reminders in {coll} ({found} matched)", due.len());
            records.extend(due);
        }
        Ok(records)
    }

    async fn find_appointment(
        &self,
        key: &AppointmentKey,
    ) -> anyhow::Result<Option<AppointmentRecord>> {
        if !self.is_appointment_collection(&key.collection) {
            return Ok(None);
        }
        let filter = doc! {"_id": {"$in": key.id.lookup_candidates()}};
        let document = self
            .find_one::<Document>(&key.collection, Some(filter), None)
            .await
            .with_context(|| format!("not able to get appointment {key}"))?;
        let Some(document) = document else {
            return Ok(None);
        };
        // the key is rebuilt from the stored _id so later updates match it exactly
        let record = record_from_document(&key.collection, document)
            .with_context(|| format!("appointment {key} is malformed"))?;
        Ok(Some(record))
    }

    async fn mark_notification_sent(&self, key: &AppointmentKey) -> anyhow::Result<bool> {
        let ts = get_epoch_ts() as i64;
        let filter = doc! {"_id": key.id.to_bson(), "notificationSent": false};
        let update = doc! {"$set": {"notificationSent": true, "updatedTs": ts}};
        let result = self
            .update_one(&key.collection, filter, update)
            .await
            .with_context(|| format!("not able to mark appointment {key} as sent"))?;
        Ok(result.modified_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::Bson;

    use super::*;

    #[test]
    fn test_is_appointment_collection() {
        assert!(is_appointment_collection("appointments", "appointments"));
        assert!(is_appointment_collection("appointments", "appointments.dental.cleaning"));
        assert!(!is_appointment_collection("appointments", "appointmentsArchive"));
        assert!(!is_appointment_collection("appointments", "users"));
    }

    #[test]
    fn test_record_from_document_keeps_stored_id() {
        let document = doc! {"_id": 7_i64, "Service": "X-Ray", "notificationSent": false};
        let record = record_from_document("appointments.x", document).unwrap();
        assert_eq!(record.key, AppointmentKey::new("appointments.x", RecordId::Int64(7)));
        let filter = doc! {"_id": record.key.id.to_bson(), "notificationSent": false};
        assert_eq!(filter.get("_id"), Some(&Bson::Int64(7)));
    }

    #[test]
    fn test_record_from_document_requires_id() {
        let document = doc! {"Service": "X-Ray"};
        assert!(record_from_document("appointments", document).is_none());
    }

    #[test]
    fn test_malformed_document_does_not_hide_others() {
        let documents = vec![
            doc! {"_id": "a1", "Service": "Dental Cleaning", "reminderTimestamp": 10_i64},
            doc! {"_id": "a2", "Service": 5, "reminderTimestamp": 10_i64},
            doc! {"_id": "a3", "Service": "X-Ray", "reminderTimestamp": 10.5},
            doc! {"_id": "a4", "Service": "Physio", "reminderTimestamp": 10_i64},
        ];
        let records = records_from_documents("appointments", documents);
        let ids: Vec<_> = records.iter().map(|record| record.key.id.to_string()).collect();
        assert_eq!(ids, vec!["a1", "a4"]);
    }

    #[test]
    fn test_insert_match_stage() {
        let stage = insert_match_stage("appointments");
        let pattern = stage
            .get_document("$match")
            .unwrap()
            .get_document("ns.coll")
            .unwrap()
            .get_str("$regex")
            .unwrap();
        assert_eq!(pattern, "^appointments(\\..+)?$");
    }

    #[test]
    fn test_resume_token_from_state() {
        let state = doc! {"_id": WATCH_STATE_ID, "resumeToken": {"_data": "826540A1B2000000012B"}};
        assert!(resume_token_from_state(state).is_some());
        let state = doc! {"_id": WATCH_STATE_ID};
        assert!(resume_token_from_state(state).is_none());
    }
}
