//! Core constants for the facility map.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Latitude of the camera when nothing has been searched or after a reset.
pub const DEFAULT_CENTER_LAT: f64 = 15.0;

/// Longitude of the camera when nothing has been searched or after a reset.
pub const DEFAULT_CENTER_LNG: f64 = 0.0;

/// Zoom that shows most of the world on a desktop-sized map.
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Zoom used when arriving directly on a single facility.
pub const DETAIL_ZOOM: f64 = 15.0;

/// Cap applied to `fit_bounds` so a one-facility extent does not zoom to street level.
pub const FIT_BOUNDS_MAX_ZOOM: f64 = 15.0;

/// Padding (pixels) kept around a fitted extent.
pub const FIT_BOUNDS_PADDING: f64 = 20.0;

/// Zoom limits of the base map.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Zoom at which the cluster layer stops splitting markers.
pub const MAX_CLUSTER_ZOOM: f64 = 18.0;

/// Two facilities closer than this (in degrees) are treated as the same point.
/// Well below geocoding precision, so only truly coincident points match.
pub const DEFAULT_COINCIDENCE_TOLERANCE: f64 = 1e-6;

/// Results requested per search page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Path prefix of facility detail routes.
pub const FACILITY_ROUTE_PREFIX: &str = "/facilities/";
