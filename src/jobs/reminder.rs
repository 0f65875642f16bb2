use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};

use crate::{app::AppState, utils::get_epoch_ts};

/// Periodically runs the reminder sweep
pub async fn reminder_job(state: Arc<AppState>, period: Duration) {
    tracing::debug!("initializing reminder scheduler job");
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let now = get_epoch_ts() as i64;
        if let Err(err) = state.reminder_sweep.run(now).await {
            tracing::error!("Error sending reminders: {err:#}");
        }
    }
}
