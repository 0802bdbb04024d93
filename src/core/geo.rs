use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a GeoJSON `[lng, lat]` pair
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns the GeoJSON `[lng, lat]` pair
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Euclidean distance in degrees. Only meaningful for very small separations,
    /// which is all the coincidence test needs.
    pub fn planar_distance(&self, other: &LatLng) -> f64 {
        let dx = self.lng - other.lng;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Creates bounds from an API extent `[minLng, minLat, maxLng, maxLat]`.
    /// Returns `None` for non-finite or inverted extents.
    pub fn from_extent(extent: [f64; 4]) -> Option<Self> {
        let [min_lng, min_lat, max_lng, max_lat] = extent;
        if extent.iter().any(|v| !v.is_finite()) || min_lng > max_lng || min_lat > max_lat {
            return None;
        }
        Some(Self::from_coords(min_lat, min_lng, max_lat, max_lng))
    }

    /// Returns the bounds as `[minLng, minLat, maxLng, maxLat]`
    pub fn to_extent(&self) -> [f64; 4] {
        [
            self.south_west.lng,
            self.south_west.lat,
            self.north_east.lng,
            self.north_east.lat,
        ]
    }

    /// Creates bounds from a planar rectangle whose x is longitude and y latitude
    pub fn from_rect(rect: &geo_types::Rect<f64>) -> Self {
        Self::from_coords(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Returns the union of this bounds with another bounds
    pub fn union(&self, other: &LatLngBounds) -> LatLngBounds {
        let south = self.south_west.lat.min(other.south_west.lat);
        let west = self.south_west.lng.min(other.south_west.lng);
        let north = self.north_east.lat.max(other.north_east.lat);
        let east = self.north_east.lng.max(other.north_east.lng);

        LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_pair_order() {
        let coord = LatLng::from_lng_lat([-74.0060, 40.7128]);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert_eq!(coord.to_lng_lat(), [-74.0060, 40.7128]);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_extent_conversion() {
        let bounds = LatLngBounds::from_extent([0.0, 1.0, 10.0, 11.0]).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(1.0, 0.0));
        assert_eq!(bounds.north_east, LatLng::new(11.0, 10.0));
        assert_eq!(bounds.to_extent(), [0.0, 1.0, 10.0, 11.0]);

        assert!(LatLngBounds::from_extent([10.0, 0.0, 0.0, 10.0]).is_none());
        assert!(LatLngBounds::from_extent([f64::NAN, 0.0, 0.0, 10.0]).is_none());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);
        let point_inside = LatLng::new(40.5, -74.0);
        let point_outside = LatLng::new(42.0, -74.0);

        assert!(bounds.contains(&point_inside));
        assert!(!bounds.contains(&point_outside));
    }

    #[test]
    fn test_bounds_union() {
        let a = LatLngBounds::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = LatLngBounds::from_coords(-5.0, 2.0, 3.0, 20.0);
        assert_eq!(a.union(&b), LatLngBounds::from_coords(-5.0, 0.0, 10.0, 20.0));
    }
}
