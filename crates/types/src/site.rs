//! Records behind the home, attractions and contact pages: patient stories, partner logos,
//! treatment offers and the contact block.

use crate::image::Image;
use crate::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Testimonial as served by `GET /api/v1/stories`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientStory {
    pub id: EntityId,
    pub patient_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub treatment_type: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Discount or free camp attached to a treatment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub treatment_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, with = "crate::timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub is_free_camp: bool,
    #[serde(default)]
    pub treatment_id: Option<EntityId>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Offer {
    /// An offer without an end date never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| end < now)
    }
}

/// The offers endpoint answers with a bare array or with the array under `data` or `results`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OfferEnvelope {
    Bare(Vec<Offer>),
    Data { data: Vec<Offer> },
    Results { results: Vec<Offer> },
}

/// Offers decoded from any of the response shapes the backend uses.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "OfferEnvelope")]
pub struct OfferList(pub Vec<Offer>);

impl From<OfferEnvelope> for OfferList {
    fn from(envelope: OfferEnvelope) -> Self {
        match envelope {
            OfferEnvelope::Bare(offers)
            | OfferEnvelope::Data { data: offers }
            | OfferEnvelope::Results { results: offers } => Self(offers),
        }
    }
}

impl OfferList {
    pub fn into_inner(self) -> Vec<Offer> {
        self.0
    }
}

/// Contact block as served by `GET /api/v1/contact-us`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: EntityId,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offer_json() -> serde_json::Value {
        json!({
            "id": 2,
            "name": "Knee Replacement Camp",
            "treatment_type": null,
            "location": "Indore",
            "start_date": "2025-09-30T10:00:00",
            "end_date": "2025-10-12T15:55:00",
            "discount_percentage": 33,
            "treatment_id": 5,
            "is_active": true,
            "created_at": "2025-09-30T10:25:51.300630",
            "images": [{ "id": 41, "owner_type": "offer", "owner_id": 2, "url": "/media/offer/a.jpg", "is_primary": true }]
        })
    }

    #[test]
    fn test_offer_list_accepts_every_envelope() {
        for body in [
            json!([offer_json()]),
            json!({ "data": [offer_json()] }),
            json!({ "results": [offer_json()] }),
        ] {
            let offers: OfferList = serde_json::from_value(body).expect("offers");
            let offers = offers.into_inner();
            assert_eq!(offers.len(), 1);
            assert_eq!(offers[0].discount_percentage, Some(33.0));
            assert_eq!(offers[0].images.len(), 1);
        }
    }

    #[test]
    fn test_offer_list_rejects_unknown_shape() {
        assert!(serde_json::from_value::<OfferList>(json!({ "items": [] })).is_err());
    }

    #[test]
    fn test_offer_expiry_uses_end_date() {
        let offer: Offer = serde_json::from_value(offer_json()).expect("offer");
        let before = crate::timestamp::parse("2025-10-01T00:00:00").expect("date");
        let after = crate::timestamp::parse("2025-10-13T00:00:00").expect("date");
        assert!(!offer.is_expired(before));
        assert!(offer.is_expired(after));

        let open: Offer = serde_json::from_value(json!({ "id": 3, "name": "Free eye camp" }))
            .expect("offer");
        assert!(!open.is_expired(after));
    }

    #[test]
    fn test_story_and_contact_tolerate_missing_fields() {
        let story: PatientStory =
            serde_json::from_value(json!({ "id": 1, "patient_name": "Ravi K." })).expect("story");
        assert_eq!(story.rating, None);
        assert!(!story.is_featured);

        let contact: ContactInfo = serde_json::from_value(json!({
            "id": 1,
            "phone_no": "+91 731 000 0000",
            "email": "care@example.in",
            "updated_at": "2025-01-01T00:00:00"
        }))
        .expect("contact");
        assert_eq!(contact.email.as_deref(), Some("care@example.in"));
        assert!(contact.updated_at.is_some());
    }
}
