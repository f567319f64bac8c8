//! Hospital name resolution for list views.
//!
//! Doctor records carry only a `hospital_id`. [`HospitalNameResolver`] looks each distinct id up
//! once, concurrently, and writes the names back onto the listings. A lookup that fails or runs
//! past its deadline yields [`HOSPITAL_NAME_PLACEHOLDER`] for that id alone.
//!
//! Lookups still running when another pass asks for the same id are shared rather than repeated,
//! so overlapping loads in one session never fetch a hospital twice.

use crate::client::CatalogApi;
use crate::constants::{HOSPITALS_PATH, HOSPITAL_NAME_PLACEHOLDER};
use crate::{CatalogError, CatalogResult};
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use medtour_types::{EntityId, HospitalLinked, Listing};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Append-only `hospital id -> display name` map, scoped to one listing session.
///
/// A key is written at most once; readers see either nothing or the final name.
#[derive(Debug, Default)]
pub struct HospitalNameCache {
    names: RwLock<HashMap<EntityId, String>>,
}

impl HospitalNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EntityId) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Store `name` for `id` unless a name is already present. Returns whether it was stored.
    pub fn insert(&self, id: EntityId, name: impl Into<String>) -> bool {
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        if names.contains_key(&id) {
            return false;
        }
        names.insert(id, name.into());
        true
    }

    pub fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every name, for when the listing session ends.
    pub fn clear(&self) {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Outcome of one [`HospitalNameResolver::resolve`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ResolveReport {
    /// Distinct hospital ids referenced by the listings.
    pub unique: usize,
    /// Ids answered from the cache without a request.
    pub cached: usize,
    /// Ids this pass looked up over the network.
    pub fetched: usize,
    /// Ids already being looked up by an earlier pass, awaited instead of fetched again.
    pub joined: usize,
    /// Awaited ids that fell back to the placeholder.
    pub failed: usize,
}

/// A running lookup. Resolves to `true` when the real name was stored.
type Lookup = Shared<BoxFuture<'static, bool>>;

pub struct HospitalNameResolver<C> {
    client: Arc<C>,
    cache: Arc<HospitalNameCache>,
    in_flight: Arc<Mutex<HashMap<EntityId, Lookup>>>,
    deadline: Duration,
}

impl<C: CatalogApi> HospitalNameResolver<C> {
    pub fn new(client: Arc<C>, cache: Arc<HospitalNameCache>, deadline: Duration) -> Self {
        Self {
            client,
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            deadline,
        }
    }

    pub fn cache(&self) -> &Arc<HospitalNameCache> {
        &self.cache
    }

    /// Fill in `hospital_name` on every listing that references a hospital.
    ///
    /// Returns once every uncached id has settled, either with a name or the placeholder.
    /// Listings without a `hospital_id` are left untouched.
    pub async fn resolve<T: HospitalLinked>(&self, listings: &mut [Listing<T>]) -> ResolveReport {
        let mut seen = HashSet::new();
        let unique: Vec<EntityId> = listings
            .iter()
            .filter_map(|listing| listing.hospital_id())
            .filter(|id| seen.insert(*id))
            .collect();

        let mut report = ResolveReport {
            unique: unique.len(),
            ..Default::default()
        };

        let mut lookups = Vec::new();
        {
            // The cache is checked under the in-flight lock; a finished lookup writes the cache
            // before it leaves the in-flight map, so an id is always found in one or the other.
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            for &id in &unique {
                if self.cache.contains(id) {
                    report.cached += 1;
                } else if let Some(running) = in_flight.get(&id) {
                    report.joined += 1;
                    lookups.push(running.clone());
                } else {
                    report.fetched += 1;
                    let lookup = self.start_lookup(id);
                    in_flight.insert(id, lookup.clone());
                    lookups.push(lookup);
                }
            }
        }

        if !lookups.is_empty() {
            tracing::debug!(
                fetched = report.fetched,
                joined = report.joined,
                "resolving hospital names"
            );
            report.failed = join_all(lookups)
                .await
                .into_iter()
                .filter(|named| !named)
                .count();
        }

        for listing in listings.iter_mut() {
            if let Some(id) = listing.hospital_id() {
                listing.hospital_name = self.cache.get(id);
            }
        }

        report
    }

    fn start_lookup(&self, id: EntityId) -> Lookup {
        let client = self.client.clone();
        let cache = self.cache.clone();
        let in_flight = self.in_flight.clone();
        let deadline = self.deadline;

        async move {
            let named = match fetch_name(&*client, id, deadline).await {
                Ok(name) => {
                    cache.insert(id, name);
                    true
                }
                Err(err) => {
                    tracing::warn!(hospital_id = id, error = %err, "hospital lookup failed");
                    cache.insert(id, HOSPITAL_NAME_PLACEHOLDER);
                    false
                }
            };
            in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
            named
        }
        .boxed()
        .shared()
    }
}

async fn fetch_name<C: CatalogApi>(
    client: &C,
    id: EntityId,
    deadline: Duration,
) -> CatalogResult<String> {
    match tokio::time::timeout(deadline, client.hospital(id)).await {
        Ok(Ok(hospital)) => Ok(hospital.name),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(CatalogError::Timeout {
            endpoint: format!("{HOSPITALS_PATH}/{id}"),
            after: deadline,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{doctor, hospital, Call, MockCatalog};
    use medtour_types::Doctor;

    fn listings(doctors: Vec<Doctor>) -> Vec<Listing<Doctor>> {
        doctors.into_iter().map(Listing::new).collect()
    }

    fn resolver(mock: MockCatalog) -> (Arc<MockCatalog>, HospitalNameResolver<MockCatalog>) {
        let client = Arc::new(mock);
        let resolver = HospitalNameResolver::new(
            client.clone(),
            Arc::new(HospitalNameCache::new()),
            Duration::from_secs(10),
        );
        (client, resolver)
    }

    #[tokio::test]
    async fn test_one_lookup_per_distinct_hospital() {
        let mock = MockCatalog::default()
            .with_hospital(hospital(1, "CHL Hospital"))
            .with_hospital(hospital(2, "Bombay Hospital"));
        let (client, resolver) = resolver(mock);

        let mut items = listings(vec![
            doctor(1, "Dr. A", None, Some(1)),
            doctor(2, "Dr. B", None, Some(2)),
            doctor(3, "Dr. C", None, Some(1)),
            doctor(4, "Dr. D", None, Some(1)),
        ]);
        let report = resolver.resolve(&mut items).await;

        assert_eq!(client.hospital_calls(), 2);
        assert_eq!(
            report,
            ResolveReport {
                unique: 2,
                cached: 0,
                fetched: 2,
                joined: 0,
                failed: 0
            }
        );
        assert_eq!(items[2].hospital_name.as_deref(), Some("CHL Hospital"));
        assert_eq!(items[1].hospital_name.as_deref(), Some("Bombay Hospital"));
    }

    #[tokio::test]
    async fn test_empty_id_set_completes_without_requests() {
        let (client, resolver) = resolver(MockCatalog::default());
        let mut items = listings(vec![doctor(1, "Dr. A", Some(4.0), None)]);

        let report = resolver.resolve(&mut items).await;

        assert_eq!(report, ResolveReport::default());
        assert!(client.calls().is_empty());
        assert_eq!(items[0].hospital_name, None);
    }

    #[tokio::test]
    async fn test_failed_lookup_uses_placeholder_for_that_id_only() {
        let mock = MockCatalog::default()
            .with_hospital(hospital(1, "CHL Hospital"))
            .failing_hospital(2);
        let (_client, resolver) = resolver(mock);

        let mut items = listings(vec![
            doctor(1, "Dr. A", None, Some(1)),
            doctor(2, "Dr. B", None, Some(2)),
        ]);
        let report = resolver.resolve(&mut items).await;

        assert_eq!(report.failed, 1);
        assert_eq!(items[0].hospital_name.as_deref(), Some("CHL Hospital"));
        assert_eq!(
            items[1].hospital_name.as_deref(),
            Some(HOSPITAL_NAME_PLACEHOLDER)
        );
    }

    #[tokio::test]
    async fn test_cached_names_are_not_fetched_again() {
        let mock = MockCatalog::default().with_hospital(hospital(1, "CHL Hospital"));
        let (client, resolver) = resolver(mock);
        resolver.cache().insert(1, "CHL Hospital");

        let mut items = listings(vec![doctor(1, "Dr. A", None, Some(1))]);
        let report = resolver.resolve(&mut items).await;

        assert_eq!(report.cached, 1);
        assert_eq!(client.hospital_calls(), 0);
        assert_eq!(items[0].hospital_name.as_deref(), Some("CHL Hospital"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_hits_deadline_and_falls_back() {
        let mock = MockCatalog::default()
            .with_hospital(hospital(1, "CHL Hospital"))
            .with_hospital(hospital(3, "Apollo Hospital"))
            .with_hospital_delay(3, Duration::from_secs(60));
        let (client, resolver) = resolver(mock);

        let mut items = listings(vec![
            doctor(1, "Dr. A", None, Some(3)),
            doctor(2, "Dr. B", None, Some(1)),
        ]);
        let report = resolver.resolve(&mut items).await;

        assert_eq!(report.failed, 1);
        assert_eq!(
            items[0].hospital_name.as_deref(),
            Some(HOSPITAL_NAME_PLACEHOLDER)
        );
        assert_eq!(items[1].hospital_name.as_deref(), Some("CHL Hospital"));
        assert!(client.calls().contains(&Call::Hospital(3)));
    }

    #[test]
    fn test_cache_is_append_only() {
        let cache = HospitalNameCache::new();
        assert!(cache.insert(5, "Bombay Hospital"));
        assert!(!cache.insert(5, HOSPITAL_NAME_PLACEHOLDER));
        assert_eq!(cache.get(5).as_deref(), Some("Bombay Hospital"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_passes_share_one_lookup() {
        let mock = MockCatalog::default()
            .with_hospital(hospital(1, "CHL Hospital"))
            .with_hospital_delay(1, Duration::from_secs(2));
        let (client, resolver) = resolver(mock);

        let mut first = listings(vec![doctor(1, "Dr. A", None, Some(1))]);
        let mut second = listings(vec![
            doctor(2, "Dr. B", None, Some(1)),
            doctor(3, "Dr. C", None, Some(1)),
        ]);
        let (first_report, second_report) = tokio::join!(resolver.resolve(&mut first), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            resolver.resolve(&mut second).await
        });

        assert_eq!(client.hospital_calls(), 1);
        assert_eq!(first_report.fetched, 1);
        assert_eq!(second_report.fetched, 0);
        assert_eq!(second_report.joined, 1);
        assert_eq!(first[0].hospital_name.as_deref(), Some("CHL Hospital"));
        assert_eq!(second[1].hospital_name.as_deref(), Some("CHL Hospital"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_pass_leaves_lookup_for_the_next() {
        let mock = MockCatalog::default()
            .with_hospital(hospital(4, "Bombay Hospital"))
            .with_hospital_delay(4, Duration::from_secs(2));
        let (client, resolver) = resolver(mock);

        let mut abandoned = listings(vec![doctor(1, "Dr. A", None, Some(4))]);
        let outcome = tokio::time::timeout(
            Duration::from_millis(500),
            resolver.resolve(&mut abandoned),
        )
        .await;
        assert!(outcome.is_err());

        let mut next = listings(vec![doctor(2, "Dr. B", None, Some(4))]);
        let report = resolver.resolve(&mut next).await;

        assert_eq!(client.hospital_calls(), 1);
        assert_eq!(report.joined, 1);
        assert_eq!(next[0].hospital_name.as_deref(), Some("Bombay Hospital"));
    }
}
