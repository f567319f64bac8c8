//! In-memory catalogue used by the component tests.

use crate::client::{BlogQuery, CatalogApi, DoctorQuery, Page, TreatmentQuery};
use crate::location::{location_keys, normalize};
use crate::{CatalogError, CatalogResult};
use medtour_types::{
    Banner, Blog, BookingConfirmation, BookingRequest, ContactInfo, Doctor, EntityId, Hospital,
    Offer, Partner, PatientStory, SearchBuckets, SearchResults, Treatment,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Doctors(DoctorQuery),
    Doctor(EntityId),
    Hospitals,
    Hospital(EntityId),
    DoctorLocations,
    Specializations,
    Treatments(TreatmentQuery),
    Treatment(EntityId),
    TreatmentLocations,
    TreatmentTypes,
    Search(String),
    Booking,
    Blogs,
    Banners,
    Stories,
    Partners,
    Offers,
    Offer(EntityId),
    Contact,
}

pub(crate) fn doctor(
    id: EntityId,
    name: &str,
    rating: Option<f64>,
    hospital_id: Option<EntityId>,
) -> Doctor {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "rating": rating,
        "hospital_id": hospital_id,
    }))
    .expect("doctor fixture")
}

pub(crate) fn treatment(id: EntityId, name: &str, rating: Option<f64>) -> Treatment {
    serde_json::from_value(json!({ "id": id, "name": name, "rating": rating }))
        .expect("treatment fixture")
}

pub(crate) fn hospital(id: EntityId, name: &str) -> Hospital {
    serde_json::from_value(json!({ "id": id, "name": name })).expect("hospital fixture")
}

fn unavailable(endpoint: &str) -> CatalogError {
    CatalogError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
        body: "Service Unavailable".into(),
    }
}

#[derive(Default)]
pub(crate) struct MockCatalog {
    doctors: Vec<Doctor>,
    treatments: Vec<Treatment>,
    hospitals: HashMap<EntityId, Hospital>,
    blogs: Vec<Blog>,
    offers: Vec<Offer>,
    failing_searches: HashSet<String>,
    failing_hospitals: HashSet<EntityId>,
    hospital_delays: HashMap<EntityId, Duration>,
    doctor_delays: HashMap<Option<String>, Duration>,
    search_delays: HashMap<String, Duration>,
    dropdowns: Option<(Vec<String>, Vec<String>)>,
    offline: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockCatalog {
    pub(crate) fn with_doctors(mut self, doctors: Vec<Doctor>) -> Self {
        self.doctors = doctors;
        self
    }

    pub(crate) fn with_treatments(mut self, treatments: Vec<Treatment>) -> Self {
        self.treatments = treatments;
        self
    }

    pub(crate) fn with_hospital(mut self, hospital: Hospital) -> Self {
        self.hospitals.insert(hospital.id, hospital);
        self
    }

    pub(crate) fn with_blogs(mut self, blogs: Vec<Blog>) -> Self {
        self.blogs = blogs;
        self
    }

    pub(crate) fn with_offers(mut self, offers: Vec<Offer>) -> Self {
        self.offers = offers;
        self
    }

    /// Fail doctor list requests whose `search` term is `term`.
    pub(crate) fn failing_doctor_search(mut self, term: &str) -> Self {
        self.failing_searches.insert(term.to_string());
        self
    }

    pub(crate) fn failing_hospital(mut self, id: EntityId) -> Self {
        self.failing_hospitals.insert(id);
        self
    }

    pub(crate) fn with_hospital_delay(mut self, id: EntityId, delay: Duration) -> Self {
        self.hospital_delays.insert(id, delay);
        self
    }

    /// Delay doctor list responses for the given server-side location filter.
    pub(crate) fn with_doctors_delay(mut self, location: Option<&str>, delay: Duration) -> Self {
        self.doctor_delays
            .insert(location.map(str::to_string), delay);
        self
    }

    pub(crate) fn with_search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    /// Answer the dropdown endpoints with these locations and categories.
    pub(crate) fn with_dropdowns(mut self, locations: &[&str], categories: &[&str]) -> Self {
        self.dropdowns = Some((
            locations.iter().map(|s| s.to_string()).collect(),
            categories.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub(crate) fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn hospital_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Hospital(_)))
            .count()
    }

    /// `search` terms sent to the doctor list endpoint, `None` for unfiltered requests.
    pub(crate) fn doctor_searches(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Doctors(query) => Some(query.search),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Search(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn dropdown(&self, endpoint: &str, categories: bool) -> CatalogResult<Vec<String>> {
        match (&self.dropdowns, self.offline) {
            (Some((locations, types)), false) => Ok(if categories {
                types.clone()
            } else {
                locations.clone()
            }),
            _ => Err(unavailable(endpoint)),
        }
    }
}

fn located_in(raw: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => location_keys(raw).contains(&normalize(Some(filter))),
        None => true,
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

impl CatalogApi for MockCatalog {
    async fn doctors(&self, query: &DoctorQuery) -> CatalogResult<Vec<Doctor>> {
        self.record(Call::Doctors(query.clone()));
        if let Some(delay) = self.doctor_delays.get(&query.location) {
            tokio::time::sleep(*delay).await;
        }
        let failing = query
            .search
            .as_ref()
            .is_some_and(|term| self.failing_searches.contains(term));
        if self.offline || failing {
            return Err(unavailable("/api/v1/doctors"));
        }
        let needle = query.search.as_deref().map(str::to_lowercase);
        Ok(self
            .doctors
            .iter()
            .filter(|d| located_in(d.location.as_deref(), query.location.as_deref()))
            .filter(|d| query.hospital_id.is_none() || d.hospital_id == query.hospital_id)
            .filter(|d| match needle.as_deref() {
                Some(needle) => {
                    contains_ci(Some(&d.name), needle)
                        || contains_ci(d.specialization.as_deref(), needle)
                }
                None => true,
            })
            .take(query.page.limit as usize)
            .cloned()
            .collect())
    }

    async fn doctor(&self, id: EntityId) -> CatalogResult<Doctor> {
        self.record(Call::Doctor(id));
        self.doctors
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| unavailable(&format!("/api/v1/doctors/{id}")))
    }

    async fn hospitals(&self, _page: Page) -> CatalogResult<Vec<Hospital>> {
        self.record(Call::Hospitals);
        Ok(self.hospitals.values().cloned().collect())
    }

    async fn hospital(&self, id: EntityId) -> CatalogResult<Hospital> {
        self.record(Call::Hospital(id));
        if let Some(delay) = self.hospital_delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        if self.offline || self.failing_hospitals.contains(&id) {
            return Err(unavailable(&format!("/api/v1/hospitals/{id}")));
        }
        self.hospitals
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::Status {
                endpoint: format!("/api/v1/hospitals/{id}"),
                status: 404,
                body: "Hospital not found".into(),
            })
    }

    async fn doctor_locations(&self) -> CatalogResult<Vec<String>> {
        self.record(Call::DoctorLocations);
        self.dropdown("/api/v1/doctor-filters/locations", false)
    }

    async fn specializations(&self) -> CatalogResult<Vec<String>> {
        self.record(Call::Specializations);
        self.dropdown("/api/v1/filters/specializations", true)
    }

    async fn treatments(&self, query: &TreatmentQuery) -> CatalogResult<Vec<Treatment>> {
        self.record(Call::Treatments(query.clone()));
        if self.offline {
            return Err(unavailable("/api/v1/treatments"));
        }
        Ok(self
            .treatments
            .iter()
            .filter(|t| located_in(t.location.as_deref(), query.location.as_deref()))
            .filter(|t| match query.treatment_type.as_deref() {
                Some(wanted) => t
                    .treatment_type
                    .as_deref()
                    .is_some_and(|ty| ty.eq_ignore_ascii_case(wanted)),
                None => true,
            })
            .filter(|t| !query.ayushman_only || t.is_ayushman)
            .filter(|t| !query.featured_only || t.is_featured)
            .cloned()
            .collect())
    }

    async fn treatment(&self, id: EntityId) -> CatalogResult<Treatment> {
        self.record(Call::Treatment(id));
        self.treatments
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| unavailable(&format!("/api/v1/treatments/{id}")))
    }

    async fn treatment_locations(&self) -> CatalogResult<Vec<String>> {
        self.record(Call::TreatmentLocations);
        self.dropdown("/api/filters/locations", false)
    }

    async fn treatment_types(&self) -> CatalogResult<Vec<String>> {
        self.record(Call::TreatmentTypes);
        self.dropdown("/api/filters/treatment-types", true)
    }

    async fn search(&self, query: &str, _limit: u32) -> CatalogResult<SearchResults> {
        self.record(Call::Search(query.to_string()));
        if let Some(delay) = self.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.offline {
            return Err(unavailable("/api/v1/search"));
        }

        let needle = query.to_lowercase();
        let results = SearchBuckets {
            doctors: self
                .doctors
                .iter()
                .filter(|d| {
                    contains_ci(Some(&d.name), &needle)
                        || contains_ci(d.specialization.as_deref(), &needle)
                })
                .cloned()
                .collect(),
            treatments: self
                .treatments
                .iter()
                .filter(|t| {
                    contains_ci(Some(&t.name), &needle)
                        || contains_ci(t.treatment_type.as_deref(), &needle)
                })
                .cloned()
                .collect(),
            hospitals: self
                .hospitals
                .values()
                .filter(|h| contains_ci(Some(&h.name), &needle))
                .cloned()
                .collect(),
        };
        Ok(SearchResults {
            query: query.to_string(),
            total_results: results.len() as u64,
            results,
        })
    }

    async fn create_booking(&self, request: &BookingRequest) -> CatalogResult<BookingConfirmation> {
        self.record(Call::Booking);
        Ok(BookingConfirmation {
            id: 1,
            created_at: None,
            request: request.clone(),
        })
    }

    async fn blogs(&self, query: &BlogQuery) -> CatalogResult<Vec<Blog>> {
        self.record(Call::Blogs);
        if self.offline {
            return Err(unavailable("/api/v1/blogs"));
        }
        Ok(self
            .blogs
            .iter()
            .filter(|b| !query.published_only || b.is_published)
            .cloned()
            .collect())
    }

    async fn banners(&self) -> CatalogResult<Vec<Banner>> {
        self.record(Call::Banners);
        Ok(Vec::new())
    }

    async fn stories(&self) -> CatalogResult<Vec<PatientStory>> {
        self.record(Call::Stories);
        Ok(Vec::new())
    }

    async fn partners(&self) -> CatalogResult<Vec<Partner>> {
        self.record(Call::Partners);
        Ok(Vec::new())
    }

    async fn offers(&self, page: Page) -> CatalogResult<Vec<Offer>> {
        self.record(Call::Offers);
        if self.offline {
            return Err(unavailable("/api/v1/offers"));
        }
        Ok(self
            .offers
            .iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn offer(&self, id: EntityId) -> CatalogResult<Offer> {
        self.record(Call::Offer(id));
        self.offers
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| unavailable(&format!("/api/v1/offers/{id}")))
    }

    async fn contact_info(&self) -> CatalogResult<ContactInfo> {
        self.record(Call::Contact);
        Err(unavailable("/api/v1/contact-us"))
    }
}
