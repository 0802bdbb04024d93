pub mod config;
pub mod constants;
pub mod geo;
pub mod viewport;

// Re-export the essential types
pub use config::{DisambiguationConfig, MapConfig, SearchConfig, ViewportConfig};
pub use self::geo::{LatLng, LatLngBounds, Point};
pub use viewport::Viewport;
