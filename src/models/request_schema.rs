use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// request body schema for the appointment created event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCreatedReq {
    #[validate(length(min = 1))]
    pub collection: String,

    #[validate(length(min = 1))]
    pub appointment_id: String,
}
