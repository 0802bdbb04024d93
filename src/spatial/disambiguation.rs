//! Choosing between facilities that share a map position
//!
//! Marker clusters split apart as the map zooms in, but facilities at the
//! same coordinates never do. Once a cluster is clicked at the zoom cap the
//! disambiguator collects the coincident facilities into a `ClusterGroup`
//! and lets the user pick one.

use crate::core::config::DisambiguationConfig;
use crate::core::geo::LatLng;
use crate::data::facility::{FacilityCollection, FacilityFeature};
use crate::prelude::HashSet;
use crate::spatial::index::SpatialIndex;
use crate::viewport::controller::ViewportIntent;

/// Facilities that occupy (within tolerance) the same point
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    pub anchor: LatLng,
    pub members: Vec<FacilityFeature>,
}

impl ClusterGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|member| member.id == id)
    }
}

/// Groups the facilities lying strictly closer than `tolerance` degrees to `anchor`
pub fn group_near(features: &[FacilityFeature], anchor: LatLng, tolerance: f64) -> ClusterGroup {
    let index = SpatialIndex::from_features(features);
    members_near(&index, features, anchor, tolerance)
}

fn members_near(
    index: &SpatialIndex<usize>,
    features: &[FacilityFeature],
    anchor: LatLng,
    tolerance: f64,
) -> ClusterGroup {
    let mut hits: Vec<usize> = index
        .query_radius(&anchor, tolerance)
        .into_iter()
        .filter(|item| LatLng::from_lng_lat(item.point).planar_distance(&anchor) < tolerance)
        .map(|item| item.data)
        .collect();
    // Keep result-set order so the chooser lists facilities as the results do
    hits.sort_unstable();

    let mut seen = HashSet::default();
    let members = hits
        .into_iter()
        .filter_map(|i| features.get(i))
        .filter(|feature| seen.insert(feature.id.clone()))
        .cloned()
        .collect();

    ClusterGroup { anchor, members }
}

/// What a click on a cluster marker should do
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterClick {
    /// Below the zoom cap: zoom in so the cluster can split
    ZoomIn(ViewportIntent),
    /// Several facilities share the point: the chooser is now open
    Disambiguate(ClusterGroup),
    /// Only one facility there: it was selected directly
    Selected(ViewportIntent),
    /// Nothing from the current results at that point
    Nothing,
}

pub struct ClusterDisambiguator {
    config: DisambiguationConfig,
    features: Vec<FacilityFeature>,
    index: SpatialIndex<usize>,
    generation: Option<u64>,
    open: Option<ClusterGroup>,
    selected: Option<String>,
}

impl ClusterDisambiguator {
    pub fn new(config: DisambiguationConfig) -> Self {
        Self {
            config,
            features: Vec::new(),
            index: SpatialIndex::new(),
            generation: None,
            open: None,
            selected: None,
        }
    }

    pub fn config(&self) -> &DisambiguationConfig {
        &self.config
    }

    /// Re-indexes when the result set changed. Any open group is closed so
    /// members of an old result set can never be selected.
    pub fn sync_results(&mut self, collection: Option<&FacilityCollection>, generation: u64) -> bool {
        if self.generation == Some(generation) {
            return false;
        }
        self.generation = Some(generation);
        self.features = collection
            .map(|collection| collection.features.clone())
            .unwrap_or_default();
        self.index = SpatialIndex::from_features(&self.features);
        if self.open.take().is_some() {
            log::debug!("result set changed, closing disambiguation");
        }
        true
    }

    /// Coincident facilities around `anchor` in the indexed results
    pub fn group_near(&self, anchor: LatLng) -> ClusterGroup {
        members_near(&self.index, &self.features, anchor, self.config.tolerance_degrees)
    }

    /// Handles a click on a cluster marker at `anchor` while the map is at `zoom`
    pub fn click_cluster(&mut self, anchor: LatLng, zoom: f64) -> ClusterClick {
        if zoom < self.config.max_cluster_zoom {
            let target = (zoom + self.config.zoom_step).min(self.config.max_cluster_zoom);
            return ClusterClick::ZoomIn(ViewportIntent::ZoomToCluster {
                center: anchor,
                zoom: target,
            });
        }

        let group = self.group_near(anchor);
        match group.members.as_slice() {
            [] => ClusterClick::Nothing,
            [only] => {
                let id = only.id.clone();
                ClusterClick::Selected(self.select_facility(&id))
            }
            _ => {
                log::debug!(
                    "{} facilities share ({}, {})",
                    group.len(),
                    anchor.lat,
                    anchor.lng
                );
                self.open = Some(group.clone());
                ClusterClick::Disambiguate(group)
            }
        }
    }

    /// Picks a member of the open group. Returns `None` (and changes nothing)
    /// when no group is open or `id` is not one of its members.
    pub fn select(&mut self, id: &str) -> Option<ViewportIntent> {
        if !self.open.as_ref().is_some_and(|group| group.contains(id)) {
            log::debug!("ignoring selection of {} outside the open group", id);
            return None;
        }
        Some(self.select_facility(id))
    }

    /// Selects a facility from a list or marker click
    pub fn select_facility(&mut self, id: &str) -> ViewportIntent {
        self.selected = Some(id.to_string());
        self.open = None;
        ViewportIntent::CenterOnFeature(id.to_string())
    }

    pub fn open_group(&self) -> Option<&ClusterGroup> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Forgets results, selection and any open group
    pub fn clear(&mut self) {
        self.features.clear();
        self.index.clear();
        self.generation = None;
        self.open = None;
        self.selected = None;
    }
}

impl Default for ClusterDisambiguator {
    fn default() -> Self {
        Self::new(DisambiguationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(features: Vec<FacilityFeature>) -> FacilityCollection {
        FacilityCollection {
            count: features.len(),
            features,
            extent: None,
            next_page_cursor: None,
        }
    }

    fn coincident_and_distinct() -> Vec<FacilityFeature> {
        vec![
            FacilityFeature::named("same-1", "Mill 1", [90.4, 23.8]),
            FacilityFeature::named("far-1", "Elsewhere 1", [90.41, 23.8]),
            FacilityFeature::named("same-2", "Mill 2", [90.4, 23.8]),
            FacilityFeature::named("far-2", "Elsewhere 2", [90.4, 23.80001]),
            FacilityFeature::named("same-3", "Mill 3", [90.4, 23.8]),
        ]
    }

    #[test]
    fn test_group_near_collects_only_coincident_points() {
        let features = coincident_and_distinct();
        let group = group_near(&features, LatLng::new(23.8, 90.4), 1e-6);

        let ids: Vec<_> = group.members.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["same-1", "same-2", "same-3"]);
        assert_eq!(group.anchor, LatLng::new(23.8, 90.4));
    }

    #[test]
    fn test_group_near_deduplicates_ids() {
        let mut features = coincident_and_distinct();
        features.push(FacilityFeature::named("same-1", "Mill 1 again", [90.4, 23.8]));
        let group = group_near(&features, LatLng::new(23.8, 90.4), 1e-6);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_click_below_cap_zooms_in() {
        let mut disambiguator = ClusterDisambiguator::default();
        disambiguator.sync_results(Some(&collection(coincident_and_distinct())), 1);

        let click = disambiguator.click_cluster(LatLng::new(23.8, 90.4), 12.0);
        assert_eq!(
            click,
            ClusterClick::ZoomIn(ViewportIntent::ZoomToCluster {
                center: LatLng::new(23.8, 90.4),
                zoom: 14.0,
            })
        );
        assert!(!disambiguator.is_open());
    }

    #[test]
    fn test_select_member_closes_and_centers() {
        let mut disambiguator = ClusterDisambiguator::default();
        disambiguator.sync_results(Some(&collection(coincident_and_distinct())), 1);

        let click = disambiguator.click_cluster(LatLng::new(23.8, 90.4), 18.0);
        assert!(matches!(click, ClusterClick::Disambiguate(ref group) if group.len() == 3));
        assert!(disambiguator.is_open());

        assert_eq!(disambiguator.select("far-1"), None);
        assert!(disambiguator.is_open());

        let intent = disambiguator.select("same-2");
        assert_eq!(intent, Some(ViewportIntent::CenterOnFeature("same-2".into())));
        assert_eq!(disambiguator.selected(), Some("same-2"));
        assert!(!disambiguator.is_open());
    }

    #[test]
    fn test_single_member_selected_directly() {
        let mut disambiguator = ClusterDisambiguator::default();
        disambiguator.sync_results(Some(&collection(coincident_and_distinct())), 1);

        let click = disambiguator.click_cluster(LatLng::new(23.8, 90.41), 18.0);
        assert_eq!(
            click,
            ClusterClick::Selected(ViewportIntent::CenterOnFeature("far-1".into()))
        );
    }

    #[test]
    fn test_new_results_close_open_group() {
        let mut disambiguator = ClusterDisambiguator::default();
        disambiguator.sync_results(Some(&collection(coincident_and_distinct())), 1);
        disambiguator.click_cluster(LatLng::new(23.8, 90.4), 18.0);
        assert!(disambiguator.is_open());

        assert!(!disambiguator.sync_results(None, 1));
        assert!(disambiguator.is_open());

        assert!(disambiguator.sync_results(Some(&collection(Vec::new())), 2));
        assert!(!disambiguator.is_open());
        assert_eq!(disambiguator.select("same-1"), None);
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let mut disambiguator = ClusterDisambiguator::new(DisambiguationConfig {
            tolerance_degrees: 0.02,
            ..DisambiguationConfig::default()
        });
        disambiguator.sync_results(Some(&collection(coincident_and_distinct())), 1);
        assert_eq!(disambiguator.group_near(LatLng::new(23.8, 90.4)).len(), 5);
    }
}
