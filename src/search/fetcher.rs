use crate::data::facility::{FacilityCollection, FacilityFeature};
use crate::search::filters::FilterState;
use crate::Result;
use async_trait::async_trait;

/// What to ask the data source for
#[derive(Debug, Clone, PartialEq)]
pub enum PageRequest {
    /// First page of a new search
    First { filter: FilterState, page_size: usize },
    /// Page pointed to by a previous response's cursor
    Next { cursor: String },
}

/// Data source for facility searches.
///
/// Implementations perform exactly one request per call: no retries, no
/// timeouts. Callers decide when to ask again.
#[async_trait]
pub trait FacilityFetcher: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<FacilityCollection>;

    /// Detail record of one facility
    async fn fetch_facility(&self, id: &str) -> Result<FacilityFeature>;
}
