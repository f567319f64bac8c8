use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Consultation booking submitted from a treatment or doctor page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    #[serde(default)]
    pub treatment_id: Option<EntityId>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub medical_history_file: Option<String>,
    #[serde(default)]
    pub doctor_preference: Option<String>,
    #[serde(default)]
    pub hospital_preference: Option<String>,
    #[serde(default)]
    pub user_query: Option<String>,
    #[serde(default)]
    pub travel_assistant: bool,
    #[serde(default)]
    pub stay_assistant: bool,
}

/// Backend echo of a stored booking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub id: EntityId,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub request: BookingRequest,
}
