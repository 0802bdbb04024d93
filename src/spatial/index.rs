use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::facility::FacilityFeature;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A point item indexed via an R-tree. Coordinates are `[lng, lat]`.
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub point: [f64; 2],
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, point: [f64; 2], data: T) -> Self {
        Self { id, point, data }
    }

    pub fn from_lat_lng(id: String, lat_lng: LatLng, data: T) -> Self {
        Self::new(id, lat_lng.to_lng_lat(), data)
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree of facility positions
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
        }
    }

    pub fn bulk_load(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    pub fn insert(&mut self, item: SpatialItem<T>) {
        self.rtree.insert(item);
    }

    /// Items inside the bounds (edges included)
    pub fn query(&self, bounds: &LatLngBounds) -> Vec<&SpatialItem<T>> {
        let envelope = AABB::from_corners(
            [bounds.south_west.lng, bounds.south_west.lat],
            [bounds.north_east.lng, bounds.north_east.lat],
        );
        self.rtree.locate_in_envelope(&envelope).collect()
    }

    /// Items whose planar distance to `center` is at most `radius` degrees
    pub fn query_radius(&self, center: &LatLng, radius: f64) -> Vec<&SpatialItem<T>> {
        self.rtree
            .locate_within_distance(center.to_lng_lat(), radius * radius)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&SpatialItem<T>> {
        self.rtree.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }
}

impl SpatialIndex<usize> {
    /// Indexes every feature with usable geometry; `data` is the feature's
    /// position in `features`.
    pub fn from_features(features: &[FacilityFeature]) -> Self {
        let items = features
            .iter()
            .enumerate()
            .filter_map(|(i, feature)| {
                feature
                    .position()
                    .map(|position| SpatialItem::from_lat_lng(feature.id.clone(), position, i))
            })
            .collect();
        Self::bulk_load(items)
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
