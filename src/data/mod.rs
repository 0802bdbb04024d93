pub mod facility;

pub use facility::{FacilityCollection, FacilityFeature, FacilityProperties, GeoJsonGeometry};
