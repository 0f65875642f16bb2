use std::sync::Arc;

use self::{appointment_watch::appointment_watch_job, reminder::reminder_job};
use crate::{app::AppState, config::AppConfig, database::AppDatabase};

pub mod appointment_watch;
pub mod reminder;

pub fn spawn_all_jobs(config: &AppConfig, db_client: Arc<AppDatabase>, state: Arc<AppState>) {
    {
        let state = state.clone();
        let period = config.reminder_job_interval;
        // spawn job to periodically send out due reminders
        tokio::spawn(async move {
            reminder_job(state, period).await;
        });
    }

    if config.appointment_watch_enabled {
        // spawn job which sends the confirmation when an appointment is created
        tokio::spawn(async move {
            appointment_watch_job(db_client, state).await;
        });
    }
}
