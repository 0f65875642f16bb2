use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    constants::{REQUEST_TIMEOUT_MARGIN_SECS, REQUEST_TIMEOUT_SECS},
    handlers::*,
    models::GenericResponse,
    notification::{ConfirmationNotifier, ReminderSweep},
    push::PushGateway,
    store::RecordStore,
    swagger::ApiDoc,
};

/// Shared state of the http handlers and background jobs
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub reminder_sweep: ReminderSweep,
    pub confirmation: ConfirmationNotifier,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        gateway: Arc<dyn PushGateway>,
        sweep_timeout: Duration,
    ) -> Self {
        let reminder_sweep = ReminderSweep::new(store.clone(), gateway.clone(), sweep_timeout);
        let confirmation = ConfirmationNotifier::new(store.clone(), gateway);
        Self {
            store,
            reminder_sweep,
            confirmation,
            request_timeout: request_timeout_for(sweep_timeout),
        }
    }
}

/// Requests must be allowed to outlive a full reminder sweep, so that a
/// timed out sweep is reported by the handler and not cut off by the layer
fn request_timeout_for(sweep_timeout: Duration) -> Duration {
    let default = Duration::from_secs(REQUEST_TIMEOUT_SECS);
    let sweep = sweep_timeout + Duration::from_secs(REQUEST_TIMEOUT_MARGIN_SECS);
    default.max(sweep)
}

pub fn build_app(state: Arc<AppState>) -> Router {
    tracing::debug!("Initializing the app");
    let api_routes = Router::new()
        .route("/ping", get(ping_handler))
        .route(
            "/appointment/sendReminders",
            get(send_reminders_handler).post(send_reminders_handler),
        )
        .route("/appointment/created", post(appointment_created_handler));

    Router::new()
        .route("/", get(default_route_handler))
        .nest("/api/v1", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(global_404_handler)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(state.request_timeout)
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<GenericResponse>) {
    let (status, message) = if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_owned())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    };
    tracing::debug!("{message}");
    let response = GenericResponse {
        success: false,
        message,
    };
    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timeout_covers_sweep() {
        assert_eq!(
            request_timeout_for(Duration::from_secs(90)),
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(
            request_timeout_for(Duration::from_secs(300)),
            Duration::from_secs(300 + REQUEST_TIMEOUT_MARGIN_SECS)
        );
    }
}
