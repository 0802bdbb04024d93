//! Facility records as delivered by the search API
//!
//! The API speaks GeoJSON: a page is a `FeatureCollection` extended with
//! `count`, `extent` and a `next` link. Features are converted into a flat
//! `FacilityFeature` on the way in so the rest of the crate never has to
//! look inside geometry objects.

use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl GeoJsonGeometry {
    /// The single `[lng, lat]` position of a point geometry
    fn point(&self) -> Option<[f64; 2]> {
        match self {
            GeoJsonGeometry::Point { coordinates } => Some(*coordinates),
            GeoJsonGeometry::MultiPoint { coordinates } if coordinates.len() == 1 => {
                Some(coordinates[0])
            }
            _ => None,
        }
    }
}

/// Descriptive properties of a facility
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacilityProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub country_name: String,
    /// Remaining API properties, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single facility; identity is `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FeatureWire", into = "FeatureWire")]
pub struct FacilityFeature {
    pub id: String,
    /// `[lng, lat]`, absent when the facility has no usable geometry
    pub coordinates: Option<[f64; 2]>,
    pub properties: FacilityProperties,
}

impl FacilityFeature {
    pub fn new(id: impl Into<String>, coordinates: [f64; 2], properties: FacilityProperties) -> Self {
        Self {
            id: id.into(),
            coordinates: Some(coordinates),
            properties,
        }
    }

    /// Builds a feature with only a name, mostly useful in tests
    pub fn named(id: impl Into<String>, name: impl Into<String>, coordinates: [f64; 2]) -> Self {
        Self::new(
            id,
            coordinates,
            FacilityProperties {
                name: name.into(),
                ..FacilityProperties::default()
            },
        )
    }

    /// Position of the facility, or `None` if its geometry is missing or unusable
    pub fn position(&self) -> Option<LatLng> {
        self.coordinates
            .map(LatLng::from_lng_lat)
            .filter(LatLng::is_valid)
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct FeatureWire {
    id: String,
    #[serde(rename = "type", default = "feature_type")]
    kind: String,
    #[serde(default)]
    geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    properties: FacilityProperties,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl From<FeatureWire> for FacilityFeature {
    fn from(wire: FeatureWire) -> Self {
        Self {
            id: wire.id,
            coordinates: wire.geometry.as_ref().and_then(GeoJsonGeometry::point),
            properties: wire.properties,
        }
    }
}

impl From<FacilityFeature> for FeatureWire {
    fn from(feature: FacilityFeature) -> Self {
        Self {
            id: feature.id,
            kind: feature_type(),
            geometry: feature
                .coordinates
                .map(|coordinates| GeoJsonGeometry::Point { coordinates }),
            properties: feature.properties,
        }
    }
}

/// One search result set, possibly only partially paginated
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacilityCollection {
    #[serde(default)]
    pub features: Vec<FacilityFeature>,
    /// Total number of matches on the server, across all pages
    #[serde(default)]
    pub count: usize,
    /// `[minLng, minLat, maxLng, maxLat]` of the whole result set
    #[serde(default)]
    pub extent: Option<[f64; 4]>,
    /// Opaque cursor (the API sends a URL) for the following page
    #[serde(default, rename = "next", alias = "next_page_cursor")]
    pub next_page_cursor: Option<String>,
}

impl FacilityCollection {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// True once every page has been fetched
    pub fn is_complete(&self) -> bool {
        self.next_page_cursor.is_none()
    }

    pub fn get(&self, id: &str) -> Option<&FacilityFeature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    /// Result extent as bounds; `None` when absent or malformed
    pub fn extent_bounds(&self) -> Option<LatLngBounds> {
        self.extent.and_then(LatLngBounds::from_extent)
    }

    /// Appends a following page: features are concatenated and the cursor advanced.
    /// `count` and `extent` describe the whole result set and stay as they are
    /// unless the page carries fresher values.
    pub fn append_page(&mut self, page: FacilityCollection) {
        self.features.extend(page.features);
        self.next_page_cursor = page.next_page_cursor;
        if page.count > 0 {
            self.count = page.count;
        }
        if page.extent.is_some() {
            self.extent = page.extent;
        }
    }
}
