//! Combined doctor/treatment/hospital search.
//!
//! [`EntitySearchAggregator`] sends one query to the backend's combined search endpoint and
//! publishes the grouped result. Every dispatch takes a sequence number and a response is only
//! applied while its number is still the latest, so a slow answer to an old query can never
//! replace the answer to a newer one.
//!
//! [`DebouncedSearch`] sits in front of it for type-ahead input: it waits for a quiet window,
//! dispatches only the last query and aborts the search it dispatched before.

use crate::client::CatalogApi;
use crate::config::CoreConfig;
use crate::CatalogError;
use medtour_types::{QueryText, SearchResults};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchState {
    /// Nothing to show: no query yet, or the query is too short.
    #[default]
    Idle,
    Loading { query: String },
    /// The backend answered; the buckets may be empty.
    Ready { results: SearchResults },
    Failed { query: String, message: String },
}

/// Published search state with the sequence number of the dispatch that produced it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchView {
    pub seq: u64,
    #[serde(flatten)]
    pub state: SearchState,
}

/// What happened to one [`EntitySearchAggregator::search`] call.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The query was too short to send; the previous result was cleared.
    Skipped,
    Applied(SearchResults),
    Failed(CatalogError),
    /// A newer search was dispatched while this one was in flight.
    Superseded,
}

pub struct EntitySearchAggregator<C> {
    client: Arc<C>,
    min_query_chars: usize,
    issued: AtomicU64,
    state: watch::Sender<SearchView>,
}

impl<C: CatalogApi> EntitySearchAggregator<C> {
    pub fn new(client: Arc<C>, config: &CoreConfig) -> Self {
        let (state, _) = watch::channel(SearchView::default());
        Self {
            client,
            min_query_chars: config.min_query_chars(),
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SearchView {
        self.state.borrow().clone()
    }

    pub async fn search(&self, query: &str, limit: u32) -> SearchOutcome {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let query = match QueryText::new(query, self.min_query_chars) {
            Ok(query) => query,
            Err(reason) => {
                tracing::debug!(seq, %reason, "search not dispatched");
                self.publish(seq, SearchState::Idle);
                return SearchOutcome::Skipped;
            }
        };

        self.publish(
            seq,
            SearchState::Loading {
                query: query.to_string(),
            },
        );

        let response = self.client.search(query.as_str(), limit.max(1)).await;

        let (state, outcome) = match response {
            Ok(results) => (
                SearchState::Ready {
                    results: results.clone(),
                },
                SearchOutcome::Applied(results),
            ),
            Err(err) => {
                tracing::warn!(seq, query = %query, error = %err, "search failed");
                (
                    SearchState::Failed {
                        query: query.to_string(),
                        message: err.to_string(),
                    },
                    SearchOutcome::Failed(err),
                )
            }
        };

        if self.publish(seq, state) {
            outcome
        } else {
            tracing::debug!(seq, query = %query, "discarding superseded search response");
            SearchOutcome::Superseded
        }
    }

    /// Replace the published state if `seq` is still the latest dispatch.
    fn publish(&self, seq: u64, state: SearchState) -> bool {
        self.state.send_if_modified(|view| {
            if self.issued.load(Ordering::SeqCst) != seq {
                return false;
            }
            view.seq = seq;
            view.state = state;
            true
        })
    }
}

/// Type-ahead front end for an [`EntitySearchAggregator`].
///
/// Dropping it stops the background task and aborts any search still in flight.
pub struct DebouncedSearch {
    input: mpsc::UnboundedSender<String>,
    state: watch::Receiver<SearchView>,
}

impl DebouncedSearch {
    /// Start the debounce task, using the configured quiet window and result limit.
    pub fn spawn<C: CatalogApi>(
        aggregator: Arc<EntitySearchAggregator<C>>,
        config: &CoreConfig,
    ) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let state = aggregator.subscribe();
        tokio::spawn(debounce(
            aggregator,
            rx,
            config.search_debounce(),
            config.search_limit(),
        ));
        Self { input, state }
    }

    /// Queue a query. Only the last query of a burst is dispatched.
    pub fn submit(&self, query: impl Into<String>) {
        if self.input.send(query.into()).is_err() {
            tracing::warn!("debounced search task is gone; query dropped");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.state.clone()
    }
}

async fn debounce<C: CatalogApi>(
    aggregator: Arc<EntitySearchAggregator<C>>,
    mut rx: mpsc::UnboundedReceiver<String>,
    window: Duration,
    limit: u32,
) {
    let mut pending: Option<String> = None;
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let Some(query) = pending.take() else {
            match rx.recv().await {
                Some(query) => pending = Some(query),
                None => break,
            }
            continue;
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(next) => pending = Some(next),
                None => break,
            },
            _ = tokio::time::sleep(window) => {
                if let Some(previous) = in_flight.take() {
                    previous.abort();
                }
                let aggregator = aggregator.clone();
                in_flight = Some(tokio::spawn(async move {
                    aggregator.search(&query, limit).await;
                }));
            }
        }
    }

    if let Some(previous) = in_flight {
        previous.abort();
    }
}
