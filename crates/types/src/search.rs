use crate::doctor::Doctor;
use crate::hospital::Hospital;
use crate::treatment::Treatment;
use serde::{Deserialize, Serialize};

/// Results grouped by entity type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchBuckets {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
    #[serde(default)]
    pub hospitals: Vec<Hospital>,
}

impl SearchBuckets {
    pub fn len(&self) -> usize {
        self.doctors.len() + self.treatments.len() + self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response of `GET /api/v1/search`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub results: SearchBuckets,
}
