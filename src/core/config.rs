//! Configuration for the facility map
//!
//! Settings are grouped by the component that consumes them. A profile
//! resolves to a full `MapConfig`; the viewer app can also read one from JSON.

use crate::core::constants::{
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_COINCIDENCE_TOLERANCE, DEFAULT_PAGE_SIZE,
    DEFAULT_ZOOM, DETAIL_ZOOM, FIT_BOUNDS_MAX_ZOOM, FIT_BOUNDS_PADDING, MAX_CLUSTER_ZOOM,
    MAX_ZOOM, MIN_ZOOM,
};
use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum MapProfile {
    /// Full-page map: the camera stays put when results change
    Standard,
    /// Embedded map: smaller pages, camera follows search results
    Embedded,
    Custom(MapConfig),
}

impl MapProfile {
    pub fn resolve(&self) -> MapConfig {
        match self {
            Self::Standard => MapConfig::default(),
            Self::Embedded => MapConfig {
                viewport: ViewportConfig {
                    zoom_to_search: true,
                    ..ViewportConfig::default()
                },
                disambiguation: DisambiguationConfig::default(),
                search: SearchConfig {
                    page_size: 20,
                    ..SearchConfig::default()
                },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for MapProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: ViewportConfig,
    pub disambiguation: DisambiguationConfig,
    pub search: SearchConfig,
}

impl MapConfig {
    /// Preset for maps embedded in third-party pages
    pub fn embedded() -> Self {
        MapProfile::Embedded.resolve()
    }

    /// Parses a JSON document; missing sections fall back to defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub default_center: LatLng,
    pub default_zoom: f64,
    /// Zoom used when arriving directly on a facility
    pub detail_zoom: f64,
    /// Upper zoom bound when fitting to a result extent
    pub fit_max_zoom: f64,
    pub fit_padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fit the camera to every new result extent
    pub zoom_to_search: bool,
}

impl ViewportConfig {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            default_zoom: DEFAULT_ZOOM,
            detail_zoom: DETAIL_ZOOM,
            fit_max_zoom: FIT_BOUNDS_MAX_ZOOM,
            fit_padding: FIT_BOUNDS_PADDING,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_to_search: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisambiguationConfig {
    /// Planar distance (degrees) under which two facilities share a point
    pub tolerance_degrees: f64,
    /// Zoom at which clusters stop splitting and clicks open the chooser
    pub max_cluster_zoom: f64,
    /// Zoom levels added when a cluster is clicked below `max_cluster_zoom`
    pub zoom_step: f64,
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            tolerance_degrees: DEFAULT_COINCIDENCE_TOLERANCE,
            max_cluster_zoom: MAX_CLUSTER_ZOOM,
            zoom_step: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the facility API, e.g. `https://example.org/api/`
    pub api_base: String,
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8081/api/".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
