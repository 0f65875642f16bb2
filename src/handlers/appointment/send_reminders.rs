use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    app::AppState,
    models::{GenericResponse, SendRemindersResponse},
    utils::{get_epoch_ts, AppError},
};

/// Run the reminder sweep
///
/// Sends the reminder of every due appointment that was not notified yet.
/// Meant to be called by an external scheduler, once an hour
#[utoipa::path(
    get,
    path = "/api/v1/appointment/sendReminders",
    responses(
        (status = 200, description = "Sweep finished", body = SendRemindersResponse),
        (status = 500, description = "Sweep failed", body = GenericResponse)
    ),
    tag = "Notification API"
)]
pub async fn send_reminders_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SendRemindersResponse>, AppError> {
    let now = get_epoch_ts() as i64;
    let report = state
        .reminder_sweep
        .run(now)
        .await
        .map_err(|err| AppError::Internal(format!("Error sending reminders: {err:#}")))?;
    let res = SendRemindersResponse {
        success: true,
        message: format!("Successfully sent {} reminders", report.sent_count()),
        dispatched: report.sent_count(),
        confirmed: report.confirmed_count(),
        failed: report.failed_count(),
    };
    Ok(Json(res))
}
