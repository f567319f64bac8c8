//! Filtered, rating-sorted list views for doctors and treatments.
//!
//! A [`FilteredListController`] owns one listing session: its hospital name cache, its dropdown
//! options and the sequence counter that lets a newer [`load`](FilteredListController::load)
//! supersede an older one still in flight.

use crate::client::{CatalogApi, DoctorQuery, Page, TreatmentQuery};
use crate::config::CoreConfig;
use crate::constants::{
    FALLBACK_DOCTOR_LOCATIONS, FALLBACK_SPECIALIZATIONS, FALLBACK_TREATMENT_LOCATIONS,
    FALLBACK_TREATMENT_TYPES,
};
use crate::hospitals::{HospitalNameCache, HospitalNameResolver, ResolveReport};
use crate::location::{location_keys, normalize, LocationIndex, LocationKey, LocationOption};
use crate::CatalogResult;
use medtour_types::{
    compare_ratings, Categorised, Doctor, HospitalLinked, Listing, Located, Rated, Treatment,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    /// Location filtered by the backend, specialization filtered locally.
    Doctors,
    /// Location and treatment type filtered by the backend.
    Treatments,
    /// Ayushman-scheme treatments; the backend only narrows to the scheme.
    AyushmanTreatments,
}

impl ListingKind {
    fn server_filters_location(self) -> bool {
        matches!(self, ListingKind::Doctors | ListingKind::Treatments)
    }

    fn server_filters_category(self) -> bool {
        matches!(self, ListingKind::Treatments)
    }

    fn resolves_hospitals(self) -> bool {
        matches!(self, ListingKind::Doctors)
    }
}

/// The user's current dropdown choices. Both empty means "show everything".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub location: Option<LocationKey>,
    pub category: Option<String>,
}

impl FilterSelection {
    /// Build a selection from raw dropdown values. Blank values select nothing.
    pub fn new(location: Option<&str>, category: Option<&str>) -> Self {
        let location = Some(normalize(location)).filter(|key| !key.is_empty());
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self { location, category }
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.category.is_none()
    }
}

/// Backend filters for one fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchPlan {
    pub page: Page,
    pub location: Option<String>,
    pub category: Option<String>,
    pub ayushman_only: bool,
}

/// Records a [`FilteredListController`] can list.
pub trait ListedEntity:
    Rated + HospitalLinked + Located + Categorised + Clone + Send + Sync + 'static
{
    fn fetch<C: CatalogApi>(
        client: &C,
        plan: &FetchPlan,
    ) -> impl Future<Output = CatalogResult<Vec<Self>>> + Send;

    /// Whether a fetched record belongs in a listing of `kind`.
    fn belongs_to(&self, _kind: ListingKind) -> bool {
        true
    }
}

impl ListedEntity for Doctor {
    async fn fetch<C: CatalogApi>(client: &C, plan: &FetchPlan) -> CatalogResult<Vec<Self>> {
        let query = DoctorQuery {
            page: plan.page,
            location: plan.location.clone(),
            ..Default::default()
        };
        client.doctors(&query).await
    }
}

impl ListedEntity for Treatment {
    async fn fetch<C: CatalogApi>(client: &C, plan: &FetchPlan) -> CatalogResult<Vec<Self>> {
        let query = TreatmentQuery {
            page: plan.page,
            location: plan.location.clone(),
            treatment_type: plan.category.clone(),
            featured_only: false,
            ayushman_only: plan.ayushman_only,
        };
        client.treatments(&query).await
    }

    fn belongs_to(&self, kind: ListingKind) -> bool {
        kind != ListingKind::AyushmanTreatments || self.is_ayushman
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Populated,
    /// The backend answered but nothing matched.
    Empty,
    /// The backend could not be reached or answered with an error.
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListResult<T> {
    pub items: Vec<Listing<T>>,
    pub status: ListStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitals: Option<ResolveReport>,
}

/// Outcome of a [`FilteredListController::load`].
#[derive(Debug)]
pub enum Load<T> {
    Current(T),
    /// A newer load was started before this one finished; nothing was published.
    Superseded,
}

impl<T> Load<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Load::Current(value) => Some(value),
            Load::Superseded => None,
        }
    }
}

/// Dropdown contents derived from the last unfiltered fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ListOptions {
    pub locations: Vec<LocationOption>,
    pub categories: Vec<String>,
}

/// Dropdown contents as served by the backend's filter endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DropdownOptions {
    pub locations: Vec<String>,
    pub categories: Vec<String>,
    /// At least one list came from the built-in fallback.
    pub fallback: bool,
}

#[derive(Default)]
struct OptionState {
    index: LocationIndex,
    categories: Vec<String>,
}

/// Sort by rating, highest first, unrated last, keeping input order among equals.
pub fn sort_by_rating<T: Rated>(items: &mut [T]) {
    items.sort_by(|a, b| compare_ratings(a.rating(), b.rating()));
}

/// Distinct non-blank categories, compared case-insensitively, in sorted order. The first
/// spelling seen is kept.
fn distinct_categories<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        seen.entry(value.to_lowercase())
            .or_insert_with(|| value.to_string());
    }
    seen.into_values().collect()
}

pub struct FilteredListController<C, T> {
    client: Arc<C>,
    kind: ListingKind,
    page: Page,
    resolver: HospitalNameResolver<C>,
    issued: AtomicU64,
    loading: watch::Sender<bool>,
    options: RwLock<OptionState>,
    current: RwLock<Option<ListResult<T>>>,
}

impl<C: CatalogApi> FilteredListController<C, Doctor> {
    pub fn doctors(client: Arc<C>, config: &CoreConfig) -> Self {
        Self::with_kind(client, config, ListingKind::Doctors)
    }
}

impl<C: CatalogApi> FilteredListController<C, Treatment> {
    pub fn treatments(client: Arc<C>, config: &CoreConfig) -> Self {
        Self::with_kind(client, config, ListingKind::Treatments)
    }

    pub fn ayushman_treatments(client: Arc<C>, config: &CoreConfig) -> Self {
        Self::with_kind(client, config, ListingKind::AyushmanTreatments)
    }
}

impl<C: CatalogApi, T: ListedEntity> FilteredListController<C, T> {
    fn with_kind(client: Arc<C>, config: &CoreConfig, kind: ListingKind) -> Self {
        let (loading, _) = watch::channel(false);
        let resolver = HospitalNameResolver::new(
            client.clone(),
            Arc::new(HospitalNameCache::new()),
            config.request_timeout(),
        );
        Self {
            client,
            kind,
            page: Page::first(config.page_limit()),
            resolver,
            issued: AtomicU64::new(0),
            loading,
            options: RwLock::new(OptionState::default()),
            current: RwLock::new(None),
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Watch the loading flag. It turns `false` only once a load, including hospital name
    /// resolution for doctors, has fully completed.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn hospital_names(&self) -> &Arc<HospitalNameCache> {
        self.resolver.cache()
    }

    /// Result of the most recent load that was not superseded.
    pub fn current(&self) -> Option<ListResult<T>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn options(&self) -> ListOptions {
        let options = self.options.read().unwrap_or_else(PoisonError::into_inner);
        ListOptions {
            locations: options.index.options(),
            categories: options.categories.clone(),
        }
    }

    /// Fetch the list for `selection`, filter, sort and (for doctors) resolve hospital names.
    ///
    /// Returns [`Load::Superseded`] without touching any state if another load started
    /// meanwhile. An empty selection also rebuilds the dropdown options.
    pub async fn load(&self, selection: FilterSelection) -> Load<ListResult<T>> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.send_replace(true);

        let plan = self.plan(&selection);
        let fetched = T::fetch(&*self.client, &plan).await;
        if !self.is_latest(seq) {
            tracing::debug!(seq, kind = ?self.kind, "list load superseded");
            return Load::Superseded;
        }

        let result = match fetched {
            Err(err) => {
                tracing::warn!(kind = ?self.kind, error = %err, "list fetch failed");
                ListResult {
                    items: Vec::new(),
                    status: ListStatus::Unavailable,
                    hospitals: None,
                }
            }
            Ok(records) => {
                let records: Vec<T> = records
                    .into_iter()
                    .filter(|r| r.belongs_to(self.kind))
                    .collect();
                if selection.is_empty() {
                    self.rebuild_options(&records);
                }

                let mut items: Vec<Listing<T>> = records
                    .into_iter()
                    .filter(|r| self.matches_locally(r, &selection))
                    .map(Listing::new)
                    .collect();
                sort_by_rating(&mut items);

                let hospitals = if self.kind.resolves_hospitals() {
                    let report = self.resolver.resolve(&mut items).await;
                    if !self.is_latest(seq) {
                        tracing::debug!(seq, kind = ?self.kind, "list load superseded");
                        return Load::Superseded;
                    }
                    Some(report)
                } else {
                    None
                };

                let status = if items.is_empty() {
                    ListStatus::Empty
                } else {
                    ListStatus::Populated
                };
                ListResult {
                    items,
                    status,
                    hospitals,
                }
            }
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        self.loading.send_replace(false);
        tracing::debug!(seq, kind = ?self.kind, count = result.items.len(), "list loaded");
        Load::Current(result)
    }

    /// Rebuild the dropdown options from a fresh unfiltered fetch.
    pub async fn refresh_options(&self) -> CatalogResult<ListOptions> {
        let records = T::fetch(&*self.client, &self.plan(&FilterSelection::default())).await?;
        let records: Vec<T> = records
            .into_iter()
            .filter(|r| r.belongs_to(self.kind))
            .collect();
        self.rebuild_options(&records);
        Ok(self.options())
    }

    /// Dropdown lists from the backend's filter endpoints, each falling back to a fixed list
    /// when its endpoint fails.
    pub async fn remote_options(&self) -> DropdownOptions {
        let (locations, categories, fallback_locations, fallback_categories) = match self.kind {
            ListingKind::Doctors => (
                self.client.doctor_locations().await,
                self.client.specializations().await,
                FALLBACK_DOCTOR_LOCATIONS,
                FALLBACK_SPECIALIZATIONS,
            ),
            ListingKind::Treatments | ListingKind::AyushmanTreatments => (
                self.client.treatment_locations().await,
                self.client.treatment_types().await,
                FALLBACK_TREATMENT_LOCATIONS,
                FALLBACK_TREATMENT_TYPES,
            ),
        };

        let mut fallback = false;
        let mut or_fallback = |result: CatalogResult<Vec<String>>, defaults: &[&str]| {
            result.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "dropdown endpoint failed; using built-in list");
                fallback = true;
                defaults.iter().map(|s| s.to_string()).collect()
            })
        };
        let locations = or_fallback(locations, fallback_locations);
        let categories = or_fallback(categories, fallback_categories);

        DropdownOptions {
            locations,
            categories,
            fallback,
        }
    }

    /// Forget cached hospital names, for when the user leaves the listing.
    pub fn reset(&self) {
        self.resolver.cache().clear();
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }

    fn plan(&self, selection: &FilterSelection) -> FetchPlan {
        let location = selection
            .location
            .as_ref()
            .filter(|_| self.kind.server_filters_location())
            .map(|key| {
                self.options
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .index
                    .label(key)
            });
        let category = selection
            .category
            .clone()
            .filter(|_| self.kind.server_filters_category());

        FetchPlan {
            page: self.page,
            location,
            category,
            ayushman_only: self.kind == ListingKind::AyushmanTreatments,
        }
    }

    fn matches_locally(&self, record: &T, selection: &FilterSelection) -> bool {
        if let Some(key) = &selection.location {
            if !self.kind.server_filters_location() && !location_keys(record.location()).contains(key)
            {
                return false;
            }
        }
        if let Some(category) = &selection.category {
            if !self.kind.server_filters_category() {
                let wanted = category.trim().to_lowercase();
                let matches = record
                    .category()
                    .is_some_and(|c| c.trim().to_lowercase() == wanted);
                if !matches {
                    return false;
                }
            }
        }
        true
    }

    fn rebuild_options(&self, records: &[T]) {
        let index = LocationIndex::from_locations(records.iter().map(|r| r.location()));
        let categories = distinct_categories(records.iter().map(|r| r.category()));
        let mut options = self.options.write().unwrap_or_else(PoisonError::into_inner);
        options.index = index;
        options.categories = categories;
    }
}
