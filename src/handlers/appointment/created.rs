use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    app::AppState,
    models::{AppointmentCreatedReq, AppointmentKey, GenericResponse},
    notification::ConfirmationOutcome,
    utils::{AppError, ValidatedBody},
};

/// Appointment created event
///
/// Sends the confirmation push for a newly created appointment.
/// Failures to send are logged only, the event is always acknowledged
#[utoipa::path(
    post,
    path = "/api/v1/appointment/created",
    request_body = AppointmentCreatedReq,
    responses(
        (status = 200, description = "Event handled", body = GenericResponse),
        (status = 404, description = "Appointment not found", body = GenericResponse)
    ),
    tag = "Notification API"
)]
pub async fn appointment_created_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<AppointmentCreatedReq>,
) -> Result<Json<GenericResponse>, AppError> {
    let key = AppointmentKey::new(&body.collection, body.appointment_id.as_str());
    let record = state
        .store
        .find_appointment(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("appointment {key} not found")))?;
    let outcome = state.confirmation.on_appointment_created(&record).await;
    let message = match outcome {
        ConfirmationOutcome::SkippedNoToken => "No device token for appointment",
        ConfirmationOutcome::SkippedAlreadySent => "Notification already sent",
        ConfirmationOutcome::Delivered(outcome) if outcome.status.is_confirmed() => {
            "Confirmation sent"
        }
        ConfirmationOutcome::Delivered(_) => "Confirmation not sent",
    };
    let res = GenericResponse {
        success: true,
        message: message.to_owned(),
    };
    Ok(Json(res))
}
