//! Prelude module for common facility-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use facility_map::prelude::*;`

pub use crate::core::{
    config::{DisambiguationConfig, MapConfig, MapProfile, SearchConfig, ViewportConfig},
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use crate::data::facility::{FacilityCollection, FacilityFeature, FacilityProperties};

pub use crate::search::{
    codec::{DecodeReport, FilterCodec, IgnoredParam},
    fetcher::{FacilityFetcher, PageRequest},
    filters::{Boundary, FilterState, FilterUpdate, ListFacet},
    orchestrator::{SearchFailure, SearchOrchestrator, SearchState},
};

#[cfg(feature = "http")]
pub use crate::search::http::HttpFacilityFetcher;

pub use crate::spatial::{
    disambiguation::{group_near, ClusterClick, ClusterDisambiguator, ClusterGroup},
    index::{SpatialIndex, SpatialItem},
};

pub use crate::viewport::controller::{
    ControllerState, MapSurface, ViewportCommand, ViewportController, ViewportIntent,
    ViewportSignals,
};

pub use crate::sync::{
    history::{History, Location, MemoryHistory},
    query_string::{MountOutcome, QueryStringSync},
};

pub use crate::session::{MapSession, Resettable};

pub use crate::{ErrorKind, MapError, Result};

// Fast hash collections
pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
