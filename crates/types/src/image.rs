use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded image attached to a catalogue record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: EntityId,
    #[serde(default)]
    pub owner_type: Option<String>,
    #[serde(default)]
    pub owner_id: Option<EntityId>,
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default, with = "crate::timestamp::option")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// The image flagged as primary, else the first image, else `None`.
pub fn primary_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .find(|img| img.is_primary)
        .or_else(|| images.first())
}
