pub mod disambiguation;
pub mod index;

// Re-export the essential types
pub use disambiguation::{group_near, ClusterClick, ClusterDisambiguator, ClusterGroup};
pub use index::{SpatialIndex, SpatialItem};
