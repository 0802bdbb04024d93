//! One mounted map: search, disambiguation, camera and URL wired together
//!
//! `MapSession` is the only place that knows about all components. Each user
//! or route event updates the relevant component, then one viewport pass runs
//! so the camera reacts to everything that changed at once.

use crate::core::config::MapConfig;
use crate::core::geo::LatLng;
use crate::data::facility::{FacilityCollection, FacilityFeature};
use crate::search::fetcher::FacilityFetcher;
use crate::search::filters::{FilterState, FilterUpdate};
use crate::search::orchestrator::{SearchOrchestrator, SearchState};
use crate::spatial::disambiguation::{ClusterClick, ClusterDisambiguator};
use crate::sync::history::History;
use crate::sync::query_string::{MountOutcome, QueryStringSync};
use crate::viewport::controller::{MapSurface, ViewportController, ViewportIntent, ViewportSignals};
use crate::{ErrorKind, Result};

/// A resource that must be released when the map goes away
pub trait Resettable {
    fn reset(&mut self);
}

impl<F: FacilityFetcher> Resettable for SearchOrchestrator<F> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl Resettable for ClusterDisambiguator {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<S: MapSurface> Resettable for ViewportController<S> {
    fn reset(&mut self) {
        self.dispose();
    }
}

impl<H: History> Resettable for QueryStringSync<H> {
    fn reset(&mut self) {
        self.unmount();
    }
}

pub struct MapSession<F, S, H> {
    config: MapConfig,
    orchestrator: SearchOrchestrator<F>,
    disambiguator: ClusterDisambiguator,
    viewport: ViewportController<S>,
    sync: QueryStringSync<H>,
    reset_counter: u64,
    focus_id: Option<String>,
    focus: Option<FacilityFeature>,
}

impl<F, S, H> MapSession<F, S, H>
where
    F: FacilityFetcher,
    S: MapSurface,
    H: History,
{
    pub fn new(fetcher: F, surface: S, history: H, config: MapConfig) -> Self {
        Self {
            orchestrator: SearchOrchestrator::new(fetcher, config.search.page_size),
            disambiguator: ClusterDisambiguator::new(config.disambiguation.clone()),
            viewport: ViewportController::new(surface, config.viewport.clone()),
            sync: QueryStringSync::new(history),
            config,
            reset_counter: 0,
            focus_id: None,
            focus: None,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator<F> {
        &self.orchestrator
    }

    pub fn disambiguator(&self) -> &ClusterDisambiguator {
        &self.disambiguator
    }

    pub fn viewport(&self) -> &ViewportController<S> {
        &self.viewport
    }

    pub fn sync(&self) -> &QueryStringSync<H> {
        &self.sync
    }

    pub fn history_mut(&mut self) -> &mut H {
        self.sync.history_mut()
    }

    pub fn search_state(&self) -> SearchState {
        self.orchestrator.state()
    }

    pub fn filter(&self) -> FilterState {
        self.orchestrator.state().filter
    }

    pub fn reset_counter(&self) -> u64 {
        self.reset_counter
    }

    /// Restores the filter from the URL (or the empty default), runs the
    /// single initial search and starts the initial focus if the route names a facility
    pub async fn mount(&mut self) -> MountOutcome {
        let outcome = self.sync.mount();
        if let Some(id) = &outcome.focus {
            self.viewport.begin_initial_focus(id.clone());
            self.focus_id = Some(id.clone());
        }
        self.run_search(outcome.filter.clone()).await;
        if let Some(id) = outcome.focus.clone() {
            self.load_focus(&id).await;
        }
        self.process_viewport();
        outcome
    }

    /// Reacts to a route change (back/forward or a link)
    pub async fn on_navigation(&mut self) -> ViewportIntent {
        let route_focus = self
            .sync
            .history()
            .location()
            .facility_id()
            .map(str::to_string);
        if route_focus != self.focus_id {
            self.focus = None;
            self.focus_id = route_focus.clone();
            match &route_focus {
                Some(id) => self.viewport.begin_initial_focus(id.clone()),
                None => {
                    self.viewport.cancel_initial_focus();
                }
            }
        }

        if let Some(filter) = self.sync.on_navigation() {
            self.run_search(filter).await;
        }
        if let Some(id) = route_focus.filter(|_| self.focus.is_none()) {
            self.load_focus(&id).await;
        }
        self.process_viewport()
    }

    /// Applies one filter edit, writes the URL and searches
    pub async fn update_filter(&mut self, update: FilterUpdate) -> ViewportIntent {
        let filter = self.filter().with(update);
        self.run_search(filter).await;
        self.process_viewport()
    }

    async fn run_search(&mut self, filter: FilterState) {
        self.sync.on_filter_change(&filter);
        if let Err(err) = self.orchestrator.search(filter).await {
            log::debug!("search ended without results: {}", err);
        }
    }

    async fn load_focus(&mut self, id: &str) {
        match self.orchestrator.fetch_facility(id).await {
            Ok(feature) => self.focus = Some(feature),
            Err(err) => {
                // Not in the results either, so there is nothing to center on
                log::warn!(
                    "{:?}: could not load facility {}: {}",
                    ErrorKind::ViewportCommandSkipped,
                    id,
                    err
                );
                self.viewport.cancel_initial_focus();
            }
        }
    }

    /// Loads the next page of the current results
    pub async fn next_page(&mut self) -> Result<FacilityCollection> {
        let result = self.orchestrator.fetch_next_page().await;
        self.process_viewport();
        result
    }

    /// Loads every remaining page, one request at a time, e.g. before an export
    pub async fn download_all(&mut self) -> Result<FacilityCollection> {
        let result = self.orchestrator.fetch_all().await;
        self.process_viewport();
        result
    }

    /// A facility was clicked in the result list or on the map
    pub fn select_facility(&mut self, id: &str) -> ViewportIntent {
        let intent = self.disambiguator.select_facility(id);
        self.viewport.request(intent);
        self.process_viewport()
    }

    /// A member of the open disambiguation group was chosen
    pub fn choose_from_group(&mut self, id: &str) -> ViewportIntent {
        match self.disambiguator.select(id) {
            Some(intent) => {
                self.viewport.request(intent);
                self.process_viewport()
            }
            None => ViewportIntent::NoOp,
        }
    }

    /// A cluster marker at `anchor` was clicked while the map was at `zoom`
    pub fn click_cluster(&mut self, anchor: LatLng, zoom: f64) -> ClusterClick {
        self.sync_results();
        let click = self.disambiguator.click_cluster(anchor, zoom);
        if let ClusterClick::ZoomIn(intent) | ClusterClick::Selected(intent) = &click {
            self.viewport.request(intent.clone());
            self.process_viewport();
        }
        click
    }

    pub fn close_group(&mut self) {
        self.disambiguator.close();
    }

    /// Fits the camera to the current results on request, regardless of zoom-to-search
    pub fn zoom_to_results(&mut self) -> ViewportIntent {
        let extent = self
            .orchestrator
            .collection()
            .and_then(|collection| collection.extent_bounds());
        match extent {
            Some(bounds) => {
                self.viewport.request(ViewportIntent::FitToExtent(bounds));
                self.process_viewport()
            }
            None => ViewportIntent::NoOp,
        }
    }

    /// Switches fitting to new result extents on or off and applies it right away
    pub fn set_zoom_to_search(&mut self, enabled: bool) -> ViewportIntent {
        self.config.viewport.zoom_to_search = enabled;
        self.viewport.set_zoom_to_search(enabled);
        self.process_viewport()
    }

    /// Signals a reset: default camera and no open group
    pub fn reset(&mut self) -> ViewportIntent {
        self.reset_counter += 1;
        self.process_viewport()
    }

    fn sync_results(&mut self) -> SearchState {
        let state = self.orchestrator.state();
        self.disambiguator
            .sync_results(state.collection.as_ref(), state.generation);
        state
    }

    /// One arbitration pass over everything observed since the last one
    pub fn process_viewport(&mut self) -> ViewportIntent {
        let state = self.sync_results();
        let signals = ViewportSignals {
            reset_counter: self.reset_counter,
            collection: state.collection.as_ref(),
            boundary: state.filter.boundary.as_ref(),
            focus: self.focus.as_ref(),
        };
        self.viewport.process(&signals, &mut self.disambiguator)
    }

    /// Unmounts the map. In-flight fetches are cancelled, results dropped and
    /// the surface released, so no camera command can follow.
    pub fn teardown(&mut self) {
        let resources: [(&str, &mut dyn Resettable); 4] = [
            ("search", &mut self.orchestrator),
            ("disambiguation", &mut self.disambiguator),
            ("viewport", &mut self.viewport),
            ("query string", &mut self.sync),
        ];
        for (name, resource) in resources {
            log::debug!("resetting {}", name);
            resource.reset();
        }
        self.focus = None;
        self.focus_id = None;
    }
}
