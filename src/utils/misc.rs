use mongodb::bson::Bson;
use serde::{Deserialize, Deserializer};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::RecordId;

/// Get EPOCH timestamp in seconds
pub fn get_epoch_ts() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// Deserialize helper for the `_id` field, accepting ObjectId, string and integer ids
pub fn deserialize_record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Option::<Bson>::deserialize(deserializer)?;
    Ok(val.as_ref().and_then(RecordId::from_bson))
}
