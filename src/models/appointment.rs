use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::utils::deserialize_record_id;

/// Appointment document as written by the booking workflow
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    #[serde(rename = "_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "deserialize_record_id")]
    #[serde(default)]
    pub _id: Option<RecordId>,

    #[serde(rename = "Service", alias = "service")]
    #[serde(default)]
    pub service: String,

    #[serde(rename = "TimeSlot", alias = "timeSlot")]
    #[serde(default)]
    pub time_slot: String,

    /// epoch seconds at which the reminder becomes due
    #[serde(rename = "reminderTimestamp")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reminder_ts: Option<i64>,

    #[serde(rename = "fcmToken")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub fcm_token: Option<String>,

    #[serde(rename = "notificationSent")]
    #[serde(default)]
    pub notification_sent: bool,
}

impl Appointment {
    /// Device token of the recipient, `None` when absent or blank
    pub fn device_token(&self) -> Option<&str> {
        self.fcm_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// `_id` of an appointment document in the bson type it is stored with,
/// so that filters built from it match the stored value exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    ObjectId(ObjectId),
    String(String),
    Int32(i32),
    Int64(i64),
}

impl RecordId {
    pub fn from_bson(val: &Bson) -> Option<Self> {
        match val {
            Bson::ObjectId(oid) => Some(Self::ObjectId(*oid)),
            Bson::String(s) => Some(Self::String(s.to_owned())),
            Bson::Int32(n) => Some(Self::Int32(*n)),
            Bson::Int64(n) => Some(Self::Int64(*n)),
            _ => None,
        }
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            Self::ObjectId(oid) => Bson::ObjectId(*oid),
            Self::String(s) => Bson::String(s.to_owned()),
            Self::Int32(n) => Bson::Int32(*n),
            Self::Int64(n) => Bson::Int64(*n),
        }
    }

    /// Stored values an id may stand for. Ids received as text can name a
    /// string, ObjectId or numeric `_id`; typed ids only match themselves
    pub fn lookup_candidates(&self) -> Vec<Bson> {
        let Self::String(s) = self else {
            return vec![self.to_bson()];
        };
        let mut candidates = vec![Bson::String(s.to_owned())];
        if let Ok(oid) = ObjectId::parse_str(s) {
            candidates.push(Bson::ObjectId(oid));
        }
        // numeric comparison in mongodb also covers Int32 ids
        if let Ok(n) = s.parse::<i64>() {
            candidates.push(Bson::Int64(n));
        }
        candidates
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectId(oid) => write!(f, "{}", oid.to_hex()),
            Self::String(s) => write!(f, "{s}"),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::String(id.to_owned())
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self::ObjectId(oid)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bson().serialize(serializer)
    }
}

/// Location of an appointment record: the collection holding it and its id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppointmentKey {
    pub collection: String,
    pub id: RecordId,
}

impl AppointmentKey {
    pub fn new(collection: &str, id: impl Into<RecordId>) -> Self {
        Self {
            collection: collection.to_owned(),
            id: id.into(),
        }
    }
}

impl fmt::Display for AppointmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// An appointment together with the key it was loaded from
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRecord {
    pub key: AppointmentKey,
    pub appointment: Appointment,
}

impl AppointmentRecord {
    pub fn new(key: AppointmentKey, appointment: Appointment) -> Self {
        Self { key, appointment }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, oid::ObjectId};

    use super::*;

    #[test]
    fn test_deserialize_booking_document() {
        let oid = ObjectId::new();
        let document = doc! {
            "_id": oid,
            "Service": "Dental Cleaning",
            "TimeSlot": "10:00 AM",
            "reminderTimestamp": 1_700_000_000_i64,
            "fcmToken": "tok1",
            "notificationSent": false,
        };
        let appointment: Appointment = mongodb::bson::from_document(document).unwrap();
        assert_eq!(appointment._id, Some(RecordId::ObjectId(oid)));
        assert_eq!(appointment.service, "Dental Cleaning");
        assert_eq!(appointment.time_slot, "10:00 AM");
        assert_eq!(appointment.reminder_ts, Some(1_700_000_000));
        assert_eq!(appointment.device_token(), Some("tok1"));
        assert_eq!(appointment.notification_sent, false);
    }

    #[test]
    fn test_deserialize_lowercase_fields_and_defaults() {
        let document = doc! {
            "_id": "appt-1",
            "service": "X-Ray",
            "timeSlot": "2:00 PM",
        };
        let appointment: Appointment = mongodb::bson::from_document(document).unwrap();
        assert_eq!(appointment._id, Some(RecordId::from("appt-1")));
        assert_eq!(appointment.service, "X-Ray");
        assert_eq!(appointment.time_slot, "2:00 PM");
        assert_eq!(appointment.reminder_ts, None);
        assert_eq!(appointment.device_token(), None);
        assert_eq!(appointment.notification_sent, false);
    }

    #[test]
    fn test_blank_device_token_is_absent() {
        let appointment = Appointment {
            fcm_token: Some("   ".to_owned()),
            ..Default::default()
        };
        assert_eq!(appointment.device_token(), None);
    }

    #[test]
    fn test_record_id_keeps_stored_type() {
        let oid = ObjectId::new();
        let stored = [
            Bson::ObjectId(oid),
            Bson::String("appt-42".to_owned()),
            Bson::String(oid.to_hex()),
            Bson::Int32(7),
            Bson::Int64(7),
        ];
        for val in stored {
            let id = RecordId::from_bson(&val).unwrap();
            assert_eq!(id.to_bson(), val);
        }
        assert_eq!(RecordId::from_bson(&Bson::Null), None);
    }

    #[test]
    fn test_deserialize_numeric_and_hex_string_ids() {
        let appointment: Appointment =
            mongodb::bson::from_document(doc! {"_id": 7_i64, "Service": "X-Ray"}).unwrap();
        assert_eq!(appointment._id, Some(RecordId::Int64(7)));
        assert_eq!(appointment._id.unwrap().to_bson(), Bson::Int64(7));

        let hex = ObjectId::new().to_hex();
        let appointment: Appointment =
            mongodb::bson::from_document(doc! {"_id": hex.as_str()}).unwrap();
        assert_eq!(appointment._id.unwrap().to_bson(), Bson::String(hex));
    }

    #[test]
    fn test_lookup_candidates() {
        let oid = ObjectId::new();
        let candidates = RecordId::from(oid.to_hex().as_str()).lookup_candidates();
        assert_eq!(
            candidates,
            vec![Bson::String(oid.to_hex()), Bson::ObjectId(oid)]
        );
        let candidates = RecordId::from("7").lookup_candidates();
        assert_eq!(
            candidates,
            vec![Bson::String("7".to_owned()), Bson::Int64(7)]
        );
        assert_eq!(
            RecordId::Int32(7).lookup_candidates(),
            vec![Bson::Int32(7)]
        );
    }

    #[test]
    fn test_appointment_key_display() {
        let key = AppointmentKey::new("appointments.cardio.ecg", "abc");
        assert_eq!(key.to_string(), "appointments.cardio.ecg/abc");
    }
}
