//! Search state and the fetches that drive it
//!
//! Every `search` takes a new request token. A response is applied only if
//! its token is still current when it resolves, so a slow response can never
//! overwrite the results of a later search. Pagination is strictly serial:
//! at most one request is in flight, and `fetch_all` awaits each page before
//! asking for the next.

use crate::data::facility::{FacilityCollection, FacilityFeature};
use crate::prelude::HashSet;
use crate::search::codec::FilterCodec;
use crate::search::fetcher::{FacilityFetcher, PageRequest};
use crate::search::filters::FilterState;
use crate::{ErrorKind, MapError, Result};
use instant::Instant;
use std::sync::{Mutex, MutexGuard};

/// A failed fetch as recorded on the search state
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFailure {
    /// Filter of the search that failed
    pub filter: FilterState,
    pub message: String,
}

impl SearchFailure {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::FetchFailed
    }
}

/// Observable state of the orchestrator
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Filter of the latest `search` call
    pub filter: FilterState,
    pub collection: Option<FacilityCollection>,
    /// A first-page fetch is in flight
    pub fetching: bool,
    /// A next-page fetch is in flight
    pub fetching_next_page: bool,
    pub error: Option<SearchFailure>,
    /// Bumped whenever `collection` is replaced, extended or dropped
    pub generation: u64,
    request_token: u64,
    cancelled_through: u64,
}

impl SearchState {
    pub fn is_busy(&self) -> bool {
        self.fetching || self.fetching_next_page
    }

    pub fn next_page_cursor(&self) -> Option<&str> {
        self.collection
            .as_ref()
            .and_then(|collection| collection.next_page_cursor.as_deref())
    }

    /// Why a response carrying `token` is no longer wanted, if it isn't
    fn staleness(&self, token: u64) -> Option<MapError> {
        if token == self.request_token {
            None
        } else if token <= self.cancelled_through {
            Some(MapError::Cancelled)
        } else {
            Some(MapError::Superseded)
        }
    }

    fn fail(&mut self, filter: &FilterState, err: &MapError) -> MapError {
        self.collection = None;
        self.generation += 1;
        self.error = Some(SearchFailure {
            filter: filter.clone(),
            message: err.to_string(),
        });
        MapError::fetch_failed(filter, err.to_string())
    }
}

pub struct SearchOrchestrator<F> {
    fetcher: F,
    page_size: usize,
    state: Mutex<SearchState>,
}

impl<F: FacilityFetcher> SearchOrchestrator<F> {
    pub fn new(fetcher: F, page_size: usize) -> Self {
        Self {
            fetcher,
            page_size: page_size.max(1),
            state: Mutex::new(SearchState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn collection(&self) -> Option<FacilityCollection> {
        self.lock().collection.clone()
    }

    pub fn error(&self) -> Option<SearchFailure> {
        self.lock().error.clone()
    }

    /// Runs a new search. On success the previous collection is replaced
    /// wholesale; on failure the state is left with no results and the error set.
    pub async fn search(&self, filter: FilterState) -> Result<FacilityCollection> {
        let filter = filter.normalized();
        let token = {
            let mut state = self.lock();
            state.request_token += 1;
            state.filter = filter.clone();
            state.fetching = true;
            state.fetching_next_page = false;
            state.error = None;
            state.request_token
        };

        let started = Instant::now();
        let result = self
            .fetcher
            .fetch_page(PageRequest::First {
                filter: filter.clone(),
                page_size: self.page_size,
            })
            .await;

        let mut state = self.lock();
        if let Some(stale) = state.staleness(token) {
            log::warn!(
                "discarding response for `{}`: {}",
                FilterCodec::encode(&filter),
                stale
            );
            return Err(stale);
        }
        state.fetching = false;

        match result {
            Ok(collection) => {
                log::info!(
                    "search `{}` returned {} of {} facilities in {:?}",
                    FilterCodec::encode(&filter),
                    collection.len(),
                    collection.count,
                    started.elapsed()
                );
                state.collection = Some(collection.clone());
                state.generation += 1;
                Ok(collection)
            }
            Err(err) => {
                log::warn!("search `{}` failed: {}", FilterCodec::encode(&filter), err);
                Err(state.fail(&filter, &err))
            }
        }
    }

    /// Fetches the page after the current one and appends it.
    ///
    /// Fails without issuing a request when there is no cursor or when any
    /// fetch is already in flight.
    pub async fn fetch_next_page(&self) -> Result<FacilityCollection> {
        let (token, cursor, filter) = {
            let mut state = self.lock();
            if state.is_busy() {
                log::debug!("next page requested while a fetch is in flight");
                return Err(MapError::FetchInFlight);
            }
            let cursor = state
                .next_page_cursor()
                .map(str::to_string)
                .ok_or(MapError::NoNextPage)?;
            state.fetching_next_page = true;
            (state.request_token, cursor, state.filter.clone())
        };

        let result = self
            .fetcher
            .fetch_page(PageRequest::Next {
                cursor: cursor.clone(),
            })
            .await;

        let mut state = self.lock();
        if let Some(stale) = state.staleness(token) {
            log::warn!("discarding page {}: {}", cursor, stale);
            return Err(stale);
        }
        state.fetching_next_page = false;

        match result {
            Ok(page) => {
                state.generation += 1;
                let collection = state.collection.get_or_insert_with(FacilityCollection::default);
                collection.append_page(page);
                log::info!(
                    "page {} appended, {} of {} facilities loaded",
                    cursor,
                    collection.len(),
                    collection.count
                );
                Ok(collection.clone())
            }
            Err(err) => {
                log::warn!("page {} failed: {}", cursor, err);
                Err(state.fail(&filter, &err))
            }
        }
    }

    /// Loads every remaining page, one at a time, and returns the full collection.
    ///
    /// Pages are never requested in parallel. A repeated cursor aborts with
    /// `PaginationCycle` instead of looping forever.
    pub async fn fetch_all(&self) -> Result<FacilityCollection> {
        let mut seen = HashSet::default();
        loop {
            let cursor = {
                let state = self.lock();
                let Some(collection) = state.collection.as_ref() else {
                    return Err(MapError::NoNextPage);
                };
                match collection.next_page_cursor.clone() {
                    None => return Ok(collection.clone()),
                    Some(cursor) => cursor,
                }
            };

            if !seen.insert(cursor.clone()) {
                log::warn!("pagination cursor {} repeated, stopping", cursor);
                return Err(MapError::PaginationCycle(cursor));
            }
            self.fetch_next_page().await?;
        }
    }

    /// Loads one facility's detail record. Served from the current results when
    /// the facility is already there.
    pub async fn fetch_facility(&self, id: &str) -> Result<FacilityFeature> {
        let cached = self
            .lock()
            .collection
            .as_ref()
            .and_then(|collection| collection.get(id).cloned());
        match cached {
            Some(feature) => Ok(feature),
            None => self.fetcher.fetch_facility(id).await,
        }
    }

    /// Invalidates every in-flight request; their responses will be discarded
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled_through = state.request_token;
        state.request_token += 1;
        state.fetching = false;
        state.fetching_next_page = false;
    }

    /// Cancels and drops all results, errors and the current filter
    pub fn clear(&self) {
        self.cancel();
        let mut state = self.lock();
        state.collection = None;
        state.error = None;
        state.filter = FilterState::default();
        state.generation += 1;
    }
}
