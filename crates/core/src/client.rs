//! Catalogue backend client.
//!
//! [`CatalogApi`] is the seam every component depends on. [`HttpCatalogClient`] implements it
//! against the REST backend with `reqwest`; tests substitute an in-memory catalogue.

use crate::config::CoreConfig;
use crate::constants::{
    BANNERS_PATH, BLOGS_PATH, BOOKINGS_PATH, CONTACT_PATH, DEFAULT_PAGE_LIMIT, DOCTORS_PATH,
    DOCTOR_LOCATIONS_PATH, HOSPITALS_PATH, OFFERS_PATH, PARTNERS_PATH, SEARCH_PATH,
    SPECIALIZATIONS_PATH, STORIES_LIMIT, STORIES_PATH, TREATMENTS_PATH, TREATMENT_LOCATIONS_PATH,
    TREATMENT_TYPES_PATH,
};
use crate::{CatalogError, CatalogResult};
use medtour_types::{
    Banner, Blog, BookingConfirmation, BookingRequest, ContactInfo, Doctor, EntityId, Hospital,
    Offer, OfferList, Partner, PatientStory, SearchResults, Treatment,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

type QueryParams = Vec<(&'static str, String)>;

/// Offset pagination as the backend understands it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn first(limit: u32) -> Self {
        Self {
            skip: 0,
            limit: limit.max(1),
        }
    }

    fn push_params(&self, params: &mut QueryParams) {
        params.push(("skip", self.skip.to_string()));
        params.push(("limit", self.limit.to_string()));
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoctorQuery {
    pub page: Page,
    pub location: Option<String>,
    pub hospital_id: Option<EntityId>,
    pub search: Option<String>,
}

impl DoctorQuery {
    fn params(&self) -> QueryParams {
        let mut params = Vec::new();
        self.page.push_params(&mut params);
        push_text(&mut params, "location", self.location.as_deref());
        if let Some(id) = self.hospital_id {
            params.push(("hospital_id", id.to_string()));
        }
        push_text(&mut params, "search", self.search.as_deref());
        params
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreatmentQuery {
    pub page: Page,
    pub location: Option<String>,
    pub treatment_type: Option<String>,
    pub featured_only: bool,
    pub ayushman_only: bool,
}

impl TreatmentQuery {
    fn params(&self) -> QueryParams {
        let mut params = Vec::new();
        self.page.push_params(&mut params);
        push_text(&mut params, "location", self.location.as_deref());
        push_text(&mut params, "treatment_type", self.treatment_type.as_deref());
        if self.featured_only {
            params.push(("featured_only", "true".into()));
        }
        if self.ayushman_only {
            params.push(("ayushman_only", "true".into()));
        }
        params
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlogQuery {
    pub page: Page,
    pub published_only: bool,
    pub featured_only: bool,
}

impl BlogQuery {
    fn params(&self) -> QueryParams {
        let mut params = Vec::new();
        self.page.push_params(&mut params);
        if self.published_only {
            params.push(("published_only", "true".into()));
        }
        if self.featured_only {
            params.push(("featured_only", "true".into()));
        }
        params
    }
}

/// Blank values are never sent; the backend treats an empty filter as "no match".
fn push_text(params: &mut QueryParams, name: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        params.push((name, value.to_string()));
    }
}

/// Operations the catalogue components need from the backend.
pub trait CatalogApi: Send + Sync + 'static {
    fn doctors(
        &self,
        query: &DoctorQuery,
    ) -> impl Future<Output = CatalogResult<Vec<Doctor>>> + Send;

    fn doctor(&self, id: EntityId) -> impl Future<Output = CatalogResult<Doctor>> + Send;

    fn hospitals(&self, page: Page) -> impl Future<Output = CatalogResult<Vec<Hospital>>> + Send;

    fn hospital(&self, id: EntityId) -> impl Future<Output = CatalogResult<Hospital>> + Send;

    fn doctor_locations(&self) -> impl Future<Output = CatalogResult<Vec<String>>> + Send;

    fn specializations(&self) -> impl Future<Output = CatalogResult<Vec<String>>> + Send;

    fn treatments(
        &self,
        query: &TreatmentQuery,
    ) -> impl Future<Output = CatalogResult<Vec<Treatment>>> + Send;

    fn treatment(&self, id: EntityId) -> impl Future<Output = CatalogResult<Treatment>> + Send;

    fn treatment_locations(&self) -> impl Future<Output = CatalogResult<Vec<String>>> + Send;

    fn treatment_types(&self) -> impl Future<Output = CatalogResult<Vec<String>>> + Send;

    fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = CatalogResult<SearchResults>> + Send;

    fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = CatalogResult<BookingConfirmation>> + Send;

    fn blogs(&self, query: &BlogQuery) -> impl Future<Output = CatalogResult<Vec<Blog>>> + Send;

    /// Every banner, active or not; pages pick theirs by title or name.
    fn banners(&self) -> impl Future<Output = CatalogResult<Vec<Banner>>> + Send;

    /// Active patient stories for the home page, featured or not.
    fn stories(&self) -> impl Future<Output = CatalogResult<Vec<PatientStory>>> + Send;

    fn partners(&self) -> impl Future<Output = CatalogResult<Vec<Partner>>> + Send;

    /// Active offers, expired ones included.
    fn offers(&self, page: Page) -> impl Future<Output = CatalogResult<Vec<Offer>>> + Send;

    fn offer(&self, id: EntityId) -> impl Future<Output = CatalogResult<Offer>> + Send;

    fn contact_info(&self) -> impl Future<Output = CatalogResult<ContactInfo>> + Send;
}

/// `reqwest` implementation of [`CatalogApi`].
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(config: &CoreConfig) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(CatalogError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.api_base_url().to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> CatalogResult<T> {
        tracing::debug!(path, ?params, "GET");
        let response = self
            .http
            .get(self.url(path))
            .query(params)
            .send()
            .await
            .map_err(|e| self.send_error(path, e))?;
        self.decode(path, response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> CatalogResult<T> {
        tracing::debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(path, e))?;
        self.decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> CatalogResult<T> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.send_error(path, e))?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).trim().to_string(),
            });
        }

        let de = &mut serde_json::Deserializer::from_slice(&bytes);
        serde_path_to_error::deserialize(de).map_err(|e| CatalogError::Decode {
            endpoint: path.to_string(),
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    fn send_error(&self, path: &str, err: reqwest::Error) -> CatalogError {
        if err.is_timeout() {
            CatalogError::Timeout {
                endpoint: path.to_string(),
                after: self.request_timeout,
            }
        } else {
            CatalogError::Transport {
                endpoint: path.to_string(),
                source: err,
            }
        }
    }
}

impl CatalogApi for HttpCatalogClient {
    async fn doctors(&self, query: &DoctorQuery) -> CatalogResult<Vec<Doctor>> {
        self.get_json(DOCTORS_PATH, &query.params()).await
    }

    async fn doctor(&self, id: EntityId) -> CatalogResult<Doctor> {
        self.get_json(&format!("{DOCTORS_PATH}/{id}"), &[]).await
    }

    async fn hospitals(&self, page: Page) -> CatalogResult<Vec<Hospital>> {
        let mut params = Vec::new();
        page.push_params(&mut params);
        self.get_json(HOSPITALS_PATH, &params).await
    }

    async fn hospital(&self, id: EntityId) -> CatalogResult<Hospital> {
        self.get_json(&format!("{HOSPITALS_PATH}/{id}"), &[]).await
    }

    async fn doctor_locations(&self) -> CatalogResult<Vec<String>> {
        self.get_json(DOCTOR_LOCATIONS_PATH, &[]).await
    }

    async fn specializations(&self) -> CatalogResult<Vec<String>> {
        self.get_json(SPECIALIZATIONS_PATH, &[]).await
    }

    async fn treatments(&self, query: &TreatmentQuery) -> CatalogResult<Vec<Treatment>> {
        self.get_json(TREATMENTS_PATH, &query.params()).await
    }

    async fn treatment(&self, id: EntityId) -> CatalogResult<Treatment> {
        self.get_json(&format!("{TREATMENTS_PATH}/{id}"), &[]).await
    }

    async fn treatment_locations(&self) -> CatalogResult<Vec<String>> {
        self.get_json(TREATMENT_LOCATIONS_PATH, &[]).await
    }

    async fn treatment_types(&self) -> CatalogResult<Vec<String>> {
        self.get_json(TREATMENT_TYPES_PATH, &[]).await
    }

    async fn search(&self, query: &str, limit: u32) -> CatalogResult<SearchResults> {
        let params = vec![
            ("query", query.trim().to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_json(SEARCH_PATH, &params).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> CatalogResult<BookingConfirmation> {
        self.post_json(BOOKINGS_PATH, request).await
    }

    async fn blogs(&self, query: &BlogQuery) -> CatalogResult<Vec<Blog>> {
        self.get_json(BLOGS_PATH, &query.params()).await
    }

    async fn banners(&self) -> CatalogResult<Vec<Banner>> {
        self.get_json(BANNERS_PATH, &[("active_only", "false".to_string())])
            .await
    }

    async fn stories(&self) -> CatalogResult<Vec<PatientStory>> {
        let params = vec![
            ("active_only", "true".to_string()),
            ("featured_only", "false".to_string()),
            ("limit", STORIES_LIMIT.to_string()),
        ];
        self.get_json(STORIES_PATH, &params).await
    }

    async fn partners(&self) -> CatalogResult<Vec<Partner>> {
        self.get_json(PARTNERS_PATH, &[("active_only", "true".to_string())])
            .await
    }

    async fn offers(&self, page: Page) -> CatalogResult<Vec<Offer>> {
        let mut params = Vec::new();
        page.push_params(&mut params);
        params.push(("is_active", "true".into()));
        params.push(("include_expired", "true".into()));
        let offers: OfferList = self.get_json(OFFERS_PATH, &params).await?;
        Ok(offers.into_inner())
    }

    async fn offer(&self, id: EntityId) -> CatalogResult<Offer> {
        self.get_json(&format!("{OFFERS_PATH}/{id}"), &[]).await
    }

    async fn contact_info(&self) -> CatalogResult<ContactInfo> {
        self.get_json(CONTACT_PATH, &[]).await
    }
}
