pub mod codec;
pub mod fetcher;
pub mod filters;
#[cfg(feature = "http")]
pub mod http;
pub mod orchestrator;

// Re-export the essential types
pub use codec::{DecodeReport, FilterCodec, IgnoredParam};
pub use fetcher::{FacilityFetcher, PageRequest};
pub use filters::{Boundary, FilterState, FilterUpdate, ListFacet};
#[cfg(feature = "http")]
pub use http::HttpFacilityFetcher;
pub use orchestrator::{SearchOrchestrator, SearchState};
