pub const REQUEST_TIMEOUT_SECS: u64 = 120;
pub const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 3000;
pub const MONGO_MIN_POOL_SIZE: u32 = 5;
pub const MONGO_MAX_POOL_SIZE: u32 = 10;
pub const MONGO_CONN_TIMEOUT: u64 = 10;
// pub const REMINDER_JOB_INTERVAL: u64 = 60;
pub const REMINDER_JOB_INTERVAL: u64 = 60 * 60;
pub const SWEEP_TIMEOUT: u64 = 90;

pub const DB_NAME: &str = "clinic";
pub const COLL_APPOINTMENTS_PREFIX: &str = "appointments";
pub const COLL_NOTIFIER_STATE: &str = "notifierState";
pub const WATCH_STATE_ID: &str = "appointmentWatch";

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const FIREBASE_MESSAGE_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
pub const FCM_ENDPOINT_BASE: &str = "https://fcm.googleapis.com/v1/projects";
pub const GOOGLE_TOKEN_VALIDITY: u64 = 3600;
// refresh the access token this many seconds before google expires it
pub const GOOGLE_TOKEN_REFRESH_MARGIN: u64 = 15 * 60;

pub const REMINDER_TITLE: &str = "Appointment Reminder";
pub const CONFIRMATION_TITLE: &str = "Appointment Confirmed";
pub const APPOINTMENT_WATCH_RETRY_INTERVAL: u64 = 30;
// server error code when a resume token points past the retained oplog
pub const CHANGE_STREAM_HISTORY_LOST: i32 = 286;
