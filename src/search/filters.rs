//! Search filter state
//!
//! Every facet defaults to an empty value, and an all-empty `FilterState`
//! encodes to an empty query string. Updates go through [`FilterState::apply`]
//! so the combine-contributors flag is dropped as soon as fewer than two
//! contributors remain selected.

use crate::core::geo::LatLngBounds;
use geo::BoundingRect;
use geo_types::{Coord, LineString, Polygon};

/// List-valued facets. Each is serialized as a repeated query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListFacet {
    Contributors,
    ContributorTypes,
    Countries,
    Sectors,
    Lists,
    ParentCompanies,
    FacilityTypes,
    ProcessingTypes,
    ProductTypes,
    NumberOfWorkers,
}

impl ListFacet {
    /// Canonical encoding order
    pub const ALL: [ListFacet; 10] = [
        ListFacet::Contributors,
        ListFacet::ContributorTypes,
        ListFacet::Countries,
        ListFacet::Sectors,
        ListFacet::Lists,
        ListFacet::ParentCompanies,
        ListFacet::FacilityTypes,
        ListFacet::ProcessingTypes,
        ListFacet::ProductTypes,
        ListFacet::NumberOfWorkers,
    ];

    /// Query-string key; stable because URLs are shared and bookmarked
    pub fn key(self) -> &'static str {
        match self {
            ListFacet::Contributors => "contributors",
            ListFacet::ContributorTypes => "contributor_types",
            ListFacet::Countries => "countries",
            ListFacet::Sectors => "sectors",
            ListFacet::Lists => "lists",
            ListFacet::ParentCompanies => "parent_company",
            ListFacet::FacilityTypes => "facility_type",
            ListFacet::ProcessingTypes => "processing_type",
            ListFacet::ProductTypes => "product_type",
            ListFacet::NumberOfWorkers => "number_of_workers",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.key() == key)
    }
}

/// Custom search area drawn by the user.
///
/// `Option<Boundary>` is the facet: `None` means no custom area. An empty or
/// degenerate polygon cannot be constructed, so there is no second "cleared"
/// sentinel; clearing the area sets the facet back to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary(Polygon<f64>);

impl Boundary {
    /// Minimum vertex count of the open ring
    pub const MIN_VERTICES: usize = 3;

    /// Builds a boundary from `[lng, lat]` vertices. The ring is closed
    /// automatically. Returns `None` for fewer than three vertices or any
    /// non-finite coordinate.
    pub fn new(vertices: Vec<[f64; 2]>) -> Option<Self> {
        if vertices.iter().flatten().any(|v| !v.is_finite()) {
            return None;
        }
        let ring: Vec<Coord<f64>> = vertices
            .into_iter()
            .map(|[lng, lat]| Coord { x: lng, y: lat })
            .collect();
        let open_len = match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if ring.len() > 1 && first == last => ring.len() - 1,
            _ => ring.len(),
        };
        if open_len < Self::MIN_VERTICES {
            return None;
        }
        Some(Self(Polygon::new(LineString::new(ring), Vec::new())))
    }

    /// Vertices of the open ring (closing vertex omitted) as `[lng, lat]`
    pub fn vertices(&self) -> Vec<[f64; 2]> {
        let exterior = self.0.exterior();
        let count = exterior.0.len().saturating_sub(1);
        exterior.0[..count].iter().map(|c| [c.x, c.y]).collect()
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.0
    }

    /// Bounding box of the area
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.0.bounding_rect().map(|rect| LatLngBounds::from_rect(&rect))
    }
}

/// A plain record of independent search facets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    /// Free-text query (name, address or facility id)
    pub query: String,
    pub contributors: Vec<String>,
    pub contributor_types: Vec<String>,
    pub countries: Vec<String>,
    pub sectors: Vec<String>,
    pub lists: Vec<String>,
    pub parent_companies: Vec<String>,
    pub facility_types: Vec<String>,
    pub processing_types: Vec<String>,
    pub product_types: Vec<String>,
    pub number_of_workers: Vec<String>,
    pub native_language_name: String,
    /// Match facilities shared by all selected contributors instead of any.
    /// Only meaningful with two or more contributors.
    pub combine_contributors: bool,
    pub boundary: Option<Boundary>,
}

/// One edit to a `FilterState`
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Query(String),
    List(ListFacet, Vec<String>),
    NativeLanguageName(String),
    CombineContributors(bool),
    Boundary(Option<Boundary>),
    /// Back to the all-empty state
    Clear,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn list(&self, facet: ListFacet) -> &[String] {
        match facet {
            ListFacet::Contributors => &self.contributors,
            ListFacet::ContributorTypes => &self.contributor_types,
            ListFacet::Countries => &self.countries,
            ListFacet::Sectors => &self.sectors,
            ListFacet::Lists => &self.lists,
            ListFacet::ParentCompanies => &self.parent_companies,
            ListFacet::FacilityTypes => &self.facility_types,
            ListFacet::ProcessingTypes => &self.processing_types,
            ListFacet::ProductTypes => &self.product_types,
            ListFacet::NumberOfWorkers => &self.number_of_workers,
        }
    }

    pub fn list_mut(&mut self, facet: ListFacet) -> &mut Vec<String> {
        match facet {
            ListFacet::Contributors => &mut self.contributors,
            ListFacet::ContributorTypes => &mut self.contributor_types,
            ListFacet::Countries => &mut self.countries,
            ListFacet::Sectors => &mut self.sectors,
            ListFacet::Lists => &mut self.lists,
            ListFacet::ParentCompanies => &mut self.parent_companies,
            ListFacet::FacilityTypes => &mut self.facility_types,
            ListFacet::ProcessingTypes => &mut self.processing_types,
            ListFacet::ProductTypes => &mut self.product_types,
            ListFacet::NumberOfWorkers => &mut self.number_of_workers,
        }
    }

    /// Applies one edit and re-establishes the facet invariants
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Query(query) => self.query = query,
            FilterUpdate::List(facet, values) => *self.list_mut(facet) = values,
            FilterUpdate::NativeLanguageName(name) => self.native_language_name = name,
            FilterUpdate::CombineContributors(combine) => self.combine_contributors = combine,
            FilterUpdate::Boundary(boundary) => self.boundary = boundary,
            FilterUpdate::Clear => *self = Self::default(),
        }
        self.normalize();
    }

    /// Builder-style `apply`
    pub fn with(mut self, update: FilterUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Drops blank list entries and clears `combine_contributors` below two contributors
    pub fn normalize(&mut self) {
        for facet in ListFacet::ALL {
            self.list_mut(facet).retain(|value| !value.is_empty());
        }
        if self.contributors.len() < 2 {
            self.combine_contributors = false;
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}
