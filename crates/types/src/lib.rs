//! # Medtour Types
//!
//! Catalogue records shared by the Medtour crates.
//!
//! Everything the backend sends is decoded here, once, at the ingestion boundary:
//! - doctors, hospitals and treatments with their images
//! - the combined search response
//! - bookings, blog posts and banners
//! - patient stories, partners, offers and contact details
//!
//! Loosely typed backend fields (numbered FAQ columns, weekly schedules that arrive either as an
//! object or as a JSON-encoded string, naive timestamps) are normalised into proper types during
//! deserialisation so nothing downstream has to look up field names at runtime.

pub mod booking;
pub mod content;
pub mod doctor;
pub mod faq;
pub mod hospital;
pub mod image;
pub mod listing;
pub mod rating;
pub mod schedule;
pub mod search;
pub mod site;
pub mod text;
pub mod timestamp;
pub mod treatment;

/// Backend primary key for every catalogue entity.
pub type EntityId = i64;

pub use booking::{BookingConfirmation, BookingRequest};
pub use content::{Banner, Blog};
pub use doctor::{AssociatedHospital, Doctor};
pub use faq::{Faq, FaqList};
pub use hospital::Hospital;
pub use image::{primary_image, Image};
pub use listing::{Categorised, HospitalLinked, Listing, Located, Rated};
pub use rating::{compare_ratings, stars, Star};
pub use schedule::WeeklySchedule;
pub use search::{SearchBuckets, SearchResults};
pub use site::{ContactInfo, Offer, OfferList, Partner, PatientStory};
pub use text::{QueryText, TextError};
pub use treatment::Treatment;
