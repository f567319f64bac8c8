//! # Medtour Core
//!
//! Client-side catalogue logic for the Medtour site.
//!
//! This crate talks to the catalogue backend and shapes what it returns for list and search views:
//! - location normalisation so the same city matches across spellings
//! - hospital name resolution with one lookup per distinct hospital
//! - combined search with stale-response protection and type-ahead debouncing
//! - filtered, rating-sorted doctor and treatment listings with dropdown options
//! - related-doctor suggestions for a treatment and per-hospital doctor rosters
//! - blog, banner, offer and slug helpers for the content pages
//!
//! **No HTTP serving concerns**: the site router lives in `api-rest`, the command line in
//! `medtour-cli`.

pub mod client;
pub mod config;
pub mod constants;
pub mod content;
pub mod doctors;
pub mod error;
pub mod hospitals;
pub mod listing;
pub mod location;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{BlogQuery, CatalogApi, DoctorQuery, HttpCatalogClient, Page, TreatmentQuery};
pub use config::CoreConfig;
pub use content::BlogFeed;
pub use doctors::{hospital_doctors, medical_keywords, related_doctors, RelatedDoctors, RelatedSource};
pub use error::{CatalogError, CatalogResult};
pub use hospitals::{HospitalNameCache, HospitalNameResolver, ResolveReport};
pub use listing::{
    DropdownOptions, FilterSelection, FilteredListController, ListOptions, ListResult, ListStatus,
    ListedEntity, ListingKind, Load,
};
pub use location::{location_keys, normalize, LocationIndex, LocationKey, LocationOption};
pub use search::{DebouncedSearch, EntitySearchAggregator, SearchOutcome, SearchState, SearchView};
