use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
}

/// response schema for a reminder sweep run
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendRemindersResponse {
    pub success: bool,
    pub message: String,
    /// number of reminders handed to the push gateway
    pub dispatched: usize,
    /// number of reminders sent and flagged in the store
    pub confirmed: usize,
    pub failed: usize,
}
