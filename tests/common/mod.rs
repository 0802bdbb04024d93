//! Shared fetchers and fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use facility_map::prelude::*;
use std::sync::Mutex;
use tokio::sync::oneshot;

pub type PageResult = facility_map::Result<FacilityCollection>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Key a fetcher uses to look up the response for a request
pub fn request_key(request: &PageRequest) -> String {
    match request {
        PageRequest::First { filter, .. } => FilterCodec::encode(filter),
        PageRequest::Next { cursor } => cursor.clone(),
    }
}

pub fn feature(id: &str, lng: f64, lat: f64) -> FacilityFeature {
    FacilityFeature::named(id, format!("Facility {}", id), [lng, lat])
}

pub fn page(
    features: Vec<FacilityFeature>,
    count: usize,
    extent: Option<[f64; 4]>,
    next: Option<&str>,
) -> FacilityCollection {
    FacilityCollection {
        features,
        count,
        extent,
        next_page_cursor: next.map(str::to_string),
    }
}

pub fn query(text: &str) -> FilterState {
    FilterState::new().with(FilterUpdate::Query(text.to_string()))
}

/// Holds every response until the test releases it through a oneshot gate,
/// so responses can be made to resolve in any order.
#[derive(Default)]
pub struct GatedFetcher {
    gates: Mutex<HashMap<String, oneshot::Receiver<PageResult>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl GatedFetcher {
    /// Registers the gate for the request with `key` (encoded filter or cursor)
    pub fn gate(&self, key: &str) -> oneshot::Sender<PageResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Yields until at least `count` requests have been issued
    pub async fn wait_for_requests(&self, count: usize) {
        while self.requests.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl FacilityFetcher for GatedFetcher {
    async fn fetch_page(&self, request: PageRequest) -> PageResult {
        let key = request_key(&request);
        self.requests.lock().unwrap().push(request);
        let gate = self.gates.lock().unwrap().remove(&key);
        match gate {
            Some(gate) => gate.await.unwrap_or(Err(MapError::Cancelled)),
            None => Err(MapError::NotFound(key)),
        }
    }

    async fn fetch_facility(&self, id: &str) -> facility_map::Result<FacilityFeature> {
        Err(MapError::NotFound(id.to_string()))
    }
}

/// Answers immediately from fixed pages and detail records
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, FacilityCollection>,
    details: HashMap<String, FacilityFeature>,
    requests: Mutex<Vec<PageRequest>>,
}

impl StaticFetcher {
    /// Serves `collection` for the filter encoding or cursor `key`
    pub fn with_page(mut self, key: &str, collection: FacilityCollection) -> Self {
        self.pages.insert(key.to_string(), collection);
        self
    }

    pub fn with_detail(mut self, feature: FacilityFeature) -> Self {
        self.details.insert(feature.id.clone(), feature);
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FacilityFetcher for StaticFetcher {
    async fn fetch_page(&self, request: PageRequest) -> PageResult {
        let key = request_key(&request);
        self.requests.lock().unwrap().push(request);
        self.pages
            .get(&key)
            .cloned()
            .ok_or(MapError::NotFound(key))
    }

    async fn fetch_facility(&self, id: &str) -> facility_map::Result<FacilityFeature> {
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| MapError::NotFound(id.to_string()))
    }
}
