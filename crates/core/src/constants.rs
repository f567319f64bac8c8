//! Constants used throughout the Medtour core crate.
//!
//! Backend routes, search and listing policy values, and the fallback dropdown contents used
//! when the backend's filter endpoints are unreachable.

use std::time::Duration;

/// Backend used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const DOCTORS_PATH: &str = "/api/v1/doctors";
pub const HOSPITALS_PATH: &str = "/api/v1/hospitals";
pub const TREATMENTS_PATH: &str = "/api/v1/treatments";
pub const SEARCH_PATH: &str = "/api/v1/search";
pub const BOOKINGS_PATH: &str = "/api/v1/bookings";
pub const BLOGS_PATH: &str = "/api/v1/blogs";
pub const BANNERS_PATH: &str = "/api/v1/banners";
pub const STORIES_PATH: &str = "/api/v1/stories";
pub const PARTNERS_PATH: &str = "/api/v1/partners";
pub const OFFERS_PATH: &str = "/api/v1/offers";
pub const CONTACT_PATH: &str = "/api/v1/contact-us";
pub const DOCTOR_LOCATIONS_PATH: &str = "/api/v1/doctor-filters/locations";
pub const SPECIALIZATIONS_PATH: &str = "/api/v1/filters/specializations";
/// Treatment dropdown routes live outside the versioned prefix on the backend.
pub const TREATMENT_LOCATIONS_PATH: &str = "/api/filters/locations";
pub const TREATMENT_TYPES_PATH: &str = "/api/filters/treatment-types";

/// Shown in place of a hospital name when the hospital lookup fails or times out.
pub const HOSPITAL_NAME_PLACEHOLDER: &str = "Hospital not available";

/// Queries shorter than this (in characters, after trimming) are never dispatched.
pub const MIN_QUERY_CHARS: usize = 3;

/// Quiet period after the last keystroke before a search is dispatched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Per-request deadline for backend calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Number of posts in the "recent posts" sidebar.
pub const RECENT_POSTS: usize = 4;

/// Number of offers in the "recent offers" sidebar.
pub const RECENT_OFFERS: usize = 4;

/// Patient stories shown on the home page.
pub const STORIES_LIMIT: u32 = 10;

/// Doctors suggested alongside a treatment.
pub const RELATED_DOCTORS: usize = 3;

/// Page size for each related-doctor search attempt.
pub const RELATED_SEARCH_LIMIT: u32 = 10;

pub const FALLBACK_DOCTOR_LOCATIONS: &[&str] = &["Indore", "Mumbai", "Delhi", "Bangalore"];
pub const FALLBACK_SPECIALIZATIONS: &[&str] = &[
    "Interventional Cardiology",
    "Neurology",
    "Orthopedics",
    "Oncology",
];
pub const FALLBACK_TREATMENT_LOCATIONS: &[&str] = &["Indore", "Bhopal", "Delhi", "Mumbai"];
pub const FALLBACK_TREATMENT_TYPES: &[&str] =
    &["Cardiology", "Neurology", "Orthopedics", "Cancer Treatment"];
