//! Doctor suggestions outside the filtered listing: doctors related to a treatment and the
//! roster of a single hospital.

use crate::client::{CatalogApi, DoctorQuery, Page};
use crate::constants::{RELATED_DOCTORS, RELATED_SEARCH_LIMIT};
use crate::CatalogResult;
use medtour_types::{compare_ratings, Doctor, EntityId};
use serde::Serialize;

/// Words that mark part of a treatment name as a medical specialty.
const MEDICAL_TERMS: &[&str] = &[
    "cardiac",
    "cardiology",
    "heart",
    "surgery",
    "orthopedic",
    "orthopedics",
    "bone",
    "joint",
    "oncology",
    "cancer",
    "tumor",
    "neurology",
    "brain",
    "spine",
    "kidney",
    "liver",
    "lung",
    "gastro",
    "dental",
    "eye",
    "skin",
    "plastic",
    "cosmetic",
    "urology",
    "gynecology",
    "pediatric",
];

/// Shortest word that may match as a fragment of a medical term (`"ortho"` for `"orthopedic"`).
const MIN_FRAGMENT_CHARS: usize = 3;

/// Which step of the related-doctor search produced the suggestions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "term", rename_all = "snake_case")]
pub enum RelatedSource {
    TreatmentName,
    Keyword(String),
    /// Nothing matched, so the best-known doctors are shown instead.
    TopDoctors,
    /// Every request failed.
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelatedDoctors {
    pub doctors: Vec<Doctor>,
    #[serde(flatten)]
    pub source: RelatedSource,
}

impl RelatedDoctors {
    fn found(mut doctors: Vec<Doctor>, source: RelatedSource) -> Self {
        doctors.truncate(RELATED_DOCTORS);
        Self { doctors, source }
    }
}

/// Search terms derived from a treatment name.
///
/// Words naming (or naming part of) a medical specialty come first, in order and without
/// repeats. A name with no such word yields its first two words.
pub fn medical_keywords(treatment_name: &str) -> Vec<String> {
    let lowered = treatment_name.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for word in &words {
        let medical = MEDICAL_TERMS.iter().any(|term| {
            word.contains(term) || (word.chars().count() >= MIN_FRAGMENT_CHARS && term.contains(word))
        });
        if medical && !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }

    if keywords.is_empty() {
        keywords.extend(words.iter().take(2).map(|word| word.to_string()));
    }
    keywords
}

/// Up to three doctors to suggest next to a treatment.
///
/// Tries the full treatment name, then the first keyword, then the second, and finally falls
/// back to the first doctors the backend lists. A failed keyword search skips straight to the
/// fallback.
pub async fn related_doctors<C: CatalogApi>(client: &C, treatment_name: &str) -> RelatedDoctors {
    let name = treatment_name.trim();
    if !name.is_empty() {
        match search_doctors(client, name).await {
            Ok(doctors) if !doctors.is_empty() => {
                return RelatedDoctors::found(doctors, RelatedSource::TreatmentName);
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(treatment = name, error = %err, "related doctor search failed"),
        }
    }

    for keyword in medical_keywords(name).into_iter().take(2) {
        match search_doctors(client, &keyword).await {
            Ok(doctors) if !doctors.is_empty() => {
                return RelatedDoctors::found(doctors, RelatedSource::Keyword(keyword));
            }
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(keyword = %keyword, error = %err, "related doctor keyword search failed");
                break;
            }
        }
    }

    let query = DoctorQuery {
        page: Page::first(RELATED_DOCTORS as u32),
        ..Default::default()
    };
    match client.doctors(&query).await {
        Ok(doctors) => RelatedDoctors::found(doctors, RelatedSource::TopDoctors),
        Err(err) => {
            tracing::warn!(error = %err, "fallback doctor list failed");
            RelatedDoctors::found(Vec::new(), RelatedSource::Unavailable)
        }
    }
}

async fn search_doctors<C: CatalogApi>(client: &C, term: &str) -> CatalogResult<Vec<Doctor>> {
    let query = DoctorQuery {
        page: Page::first(RELATED_SEARCH_LIMIT),
        search: Some(term.to_string()),
        ..Default::default()
    };
    client.doctors(&query).await
}

/// Doctors attached to one hospital, best rated first.
pub async fn hospital_doctors<C: CatalogApi>(
    client: &C,
    hospital_id: EntityId,
    page: Page,
) -> CatalogResult<Vec<Doctor>> {
    let query = DoctorQuery {
        page,
        hospital_id: Some(hospital_id),
        ..Default::default()
    };
    let mut doctors = client.doctors(&query).await?;
    doctors.sort_by(|a, b| compare_ratings(a.rating, b.rating));
    tracing::debug!(hospital_id, count = doctors.len(), "hospital roster loaded");
    Ok(doctors)
}
