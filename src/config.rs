use std::time::Duration;

use anyhow::Context;

use crate::constants::*;

/// Credentials of the firebase service account used to send push messages
#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
}

/// Runtime configuration, read from the environment (and `.env` file)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_min_pool_size: u32,
    pub mongodb_max_pool_size: u32,
    pub db_name: String,
    pub appointment_coll_prefix: String,
    pub reminder_job_interval: Duration,
    pub sweep_timeout: Duration,
    pub appointment_watch_enabled: bool,
    pub fcm: FcmConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongodb_uri = required_var("MONGODB_URI")?;
        let fcm = FcmConfig {
            project_id: required_var("FIREBASE_PROJECT_ID")?,
            client_email: required_var("FIREBASE_SERVICE_CLIENT_EMAIL")?,
            // keys pasted into .env files usually carry escaped newlines
            private_key: required_var("FIREBASE_SERVICE_PRIVATE_KEY")?.replace("\\n", "\n"),
        };
        let reminder_job_interval = parse_var("REMINDER_JOB_INTERVAL_SECS", REMINDER_JOB_INTERVAL);
        let sweep_timeout = parse_var("SWEEP_TIMEOUT_SECS", SWEEP_TIMEOUT);
        let config = Self {
            port: parse_var("PORT", DEFAULT_PORT),
            mongodb_uri,
            mongodb_min_pool_size: parse_var("MONGODB_MIN_POOL_SIZE", MONGO_MIN_POOL_SIZE),
            mongodb_max_pool_size: parse_var("MONGODB_MAX_POOL_SIZE", MONGO_MAX_POOL_SIZE),
            db_name: std::env::var("MONGODB_DB_NAME").unwrap_or(DB_NAME.to_owned()),
            appointment_coll_prefix: std::env::var("APPOINTMENT_COLL_PREFIX")
                .unwrap_or(COLL_APPOINTMENTS_PREFIX.to_owned()),
            reminder_job_interval: Duration::from_secs(reminder_job_interval),
            sweep_timeout: Duration::from_secs(sweep_timeout),
            appointment_watch_enabled: parse_var("APPOINTMENT_WATCH_ENABLED", true),
            fcm,
        };
        Ok(config)
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} not found in environment"))
}

/// Parse an optional env variable, falling back to the default when it is
/// missing or not parsable
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    let val = std::env::var(name).unwrap_or_default();
    val.parse::<T>().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default() {
        let val = parse_var("APPOINTMENT_NOTIFIER_TEST_UNSET_VAR", 42u64);
        assert_eq!(val, 42);
    }

    #[test]
    fn test_parse_var_invalid_value() {
        std::env::set_var("APPOINTMENT_NOTIFIER_TEST_BAD_PORT", "not-a-port");
        let val = parse_var("APPOINTMENT_NOTIFIER_TEST_BAD_PORT", DEFAULT_PORT);
        assert_eq!(val, DEFAULT_PORT);
    }

    #[test]
    fn test_parse_var_bool() {
        std::env::set_var("APPOINTMENT_NOTIFIER_TEST_FLAG", "false");
        let val = parse_var("APPOINTMENT_NOTIFIER_TEST_FLAG", true);
        assert!(!val);
    }

    #[test]
    fn test_required_var_missing() {
        let err = required_var("APPOINTMENT_NOTIFIER_TEST_MISSING").unwrap_err();
        assert!(err.to_string().contains("APPOINTMENT_NOTIFIER_TEST_MISSING"));
    }
}
