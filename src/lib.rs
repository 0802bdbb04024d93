//! # facility-map
//!
//! Search-state and viewport plumbing for facility maps.
//!
//! The crate keeps an imperative map surface in step with an asynchronous
//! facility search: filters round-trip through the URL query string, search
//! results drive a single viewport state machine, and near-coincident
//! facilities can be disambiguated when clustering can no longer split them.

pub mod core;
pub mod data;
pub mod prelude;
pub mod search;
pub mod session;
pub mod spatial;
pub mod sync;
pub mod viewport;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::MapConfig,
    geo::{LatLng, LatLngBounds},
    viewport::Viewport,
};

pub use data::facility::{FacilityCollection, FacilityFeature, FacilityProperties};

pub use search::{
    codec::FilterCodec,
    fetcher::{FacilityFetcher, PageRequest},
    filters::{Boundary, FilterState, FilterUpdate},
    orchestrator::{SearchOrchestrator, SearchState},
};

pub use spatial::disambiguation::{ClusterDisambiguator, ClusterGroup};

pub use sync::{
    history::{History, Location, MemoryHistory},
    query_string::QueryStringSync,
};

pub use viewport::controller::{MapSurface, ViewportCommand, ViewportController, ViewportIntent};

pub use session::MapSession;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Coarse classification of failures, used for logging and UI decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or server error during search or pagination
    FetchFailed,
    /// Malformed query-string facet that was replaced by its default
    DecodeIgnored,
    /// A camera intent referenced a feature without usable geometry
    ViewportCommandSkipped,
    /// The caller asked for something the current state cannot do
    Request,
    /// The response belonged to a superseded or cancelled request
    Stale,
}

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("fetch failed for filter `{query}`: {message}")]
    FetchFailed {
        /// Filter snapshot that triggered the fetch
        filter: Box<search::filters::FilterState>,
        /// Encoded form of `filter`, kept for log lines
        query: String,
        message: String,
    },

    #[error("no next page is available")]
    NoNextPage,

    #[error("a fetch is already in flight")]
    FetchInFlight,

    #[error("response discarded: request was superseded")]
    Superseded,

    #[error("request cancelled")]
    Cancelled,

    #[error("pagination cursor repeated: {0}")]
    PaginationCycle(String),

    #[error("facility not found: {0}")]
    NotFound(String),

    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl MapError {
    /// Builds a `FetchFailed` carrying the filter that was being searched
    pub fn fetch_failed(filter: &search::filters::FilterState, message: impl Into<String>) -> Self {
        Self::FetchFailed {
            query: FilterCodec::encode(filter),
            filter: Box::new(filter.clone()),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FetchFailed { .. } | Self::NotFound(_) | Self::Serialization(_) => {
                ErrorKind::FetchFailed
            }
            #[cfg(feature = "http")]
            Self::Network(_) => ErrorKind::FetchFailed,
            Self::PaginationCycle(_) => ErrorKind::FetchFailed,
            Self::NoNextPage | Self::FetchInFlight | Self::InvalidUrl(_) => ErrorKind::Request,
            Self::Superseded | Self::Cancelled => ErrorKind::Stale,
        }
    }
}

/// Error type alias for convenience
pub type Error = MapError;
