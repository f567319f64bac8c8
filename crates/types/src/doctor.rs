use crate::faq::FaqList;
use crate::image::Image;
use crate::schedule::WeeklySchedule;
use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A hospital a doctor also consults at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedHospital {
    pub id: EntityId,
    pub name: String,
}

/// Doctor record as served by `GET /api/v1/doctors`.
///
/// `hospital_id` links the doctor to their primary hospital; list views resolve it to a display
/// name separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub consultancy_fee: Option<f64>,
    #[serde(default)]
    pub hospital_id: Option<EntityId>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(default)]
    pub awards: Option<String>,
    #[serde(default)]
    pub time_slots: WeeklySchedule,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub associated_hospitals: Vec<AssociatedHospital>,
    #[serde(flatten)]
    pub faqs: FaqList,
}

impl Doctor {
    /// Skills are stored one per line; blank lines are dropped.
    pub fn skills_list(&self) -> Vec<&str> {
        self.skills
            .as_deref()
            .unwrap_or_default()
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
