use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::ping::ping_handler,
        crate::handlers::default::default_route_handler,
        crate::handlers::appointment::send_reminders::send_reminders_handler,
        crate::handlers::appointment::created::appointment_created_handler,
    ),
    components(
        schemas(
            crate::models::GenericResponse,
            crate::models::SendRemindersResponse,
            crate::models::AppointmentCreatedReq,
        )
    ),
    tags(
        (name = "Debugging API", description = "API for debugging purposes"),
        (name = "Notification API", description = "Triggers for appointment notifications")
    )
)]
pub struct ApiDoc;
