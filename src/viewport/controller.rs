//! The single owner of camera commands
//!
//! Search results, route changes, resets and user clicks all want to move the
//! camera, often during the same turn of the event loop. None of them talks to
//! the map directly. They are recorded as observations or as a pending intent,
//! and [`ViewportController::process`] picks one winner in fixed priority order:
//!
//! 1. initial focus on the facility the route points at, once its geometry is known
//! 2. a bumped reset counter
//! 3. fitting a changed result extent (when zoom-to-search is on)
//! 4. user selection: pan to an off-screen facility, or zoom into a cluster
//! 5. nothing
//!
//! Every observation is consumed by the pass that sees it, whichever rule wins.

use crate::core::config::ViewportConfig;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::viewport::Viewport;
use crate::data::facility::{FacilityCollection, FacilityFeature};
use crate::search::filters::Boundary;
use crate::spatial::disambiguation::ClusterDisambiguator;
use crate::ErrorKind;

/// A request for the camera to move, tagged with why it was requested
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportIntent {
    FitToExtent(LatLngBounds),
    CenterOnFeature(String),
    ZoomToCluster { center: LatLng, zoom: f64 },
    ResetToDefault,
    NoOp,
}

impl ViewportIntent {
    pub fn is_noop(&self) -> bool {
        matches!(self, ViewportIntent::NoOp)
    }
}

/// Camera commands understood by a map surface
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportCommand {
    SetView {
        center: LatLng,
        zoom: f64,
    },
    /// Move the center, keep the zoom
    PanTo {
        center: LatLng,
    },
    FitBounds {
        bounds: LatLngBounds,
        padding: f64,
        max_zoom: f64,
    },
}

/// Narrow command interface to whatever renders the map
pub trait MapSurface {
    fn issue_viewport_command(&mut self, command: &ViewportCommand);

    /// Whether a point is inside the visible area. The only camera state
    /// the controller ever reads back.
    fn contains(&self, point: &LatLng) -> bool;
}

impl MapSurface for Viewport {
    fn issue_viewport_command(&mut self, command: &ViewportCommand) {
        match command {
            ViewportCommand::SetView { center, zoom } => self.set_view(*center, *zoom),
            ViewportCommand::PanTo { center } => self.set_center(*center),
            ViewportCommand::FitBounds {
                bounds,
                padding,
                max_zoom,
            } => self.fit_bounds(bounds, *padding, Some(*max_zoom)),
        }
    }

    fn contains(&self, point: &LatLng) -> bool {
        Viewport::contains(self, point)
    }
}

impl<S: MapSurface + ?Sized> MapSurface for Box<S> {
    fn issue_viewport_command(&mut self, command: &ViewportCommand) {
        (**self).issue_viewport_command(command)
    }

    fn contains(&self, point: &LatLng) -> bool {
        (**self).contains(point)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    /// The route named a facility whose geometry has not arrived yet
    AwaitingDataForInitialFocus { id: String },
    Settled,
}

/// What the controller observes on each pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportSignals<'a> {
    /// External reset signal; any change since the last pass triggers a reset
    pub reset_counter: u64,
    pub collection: Option<&'a FacilityCollection>,
    /// Active custom search area, unioned into extent fits
    pub boundary: Option<&'a Boundary>,
    /// Detail record of the facility the route points at, once loaded
    pub focus: Option<&'a FacilityFeature>,
}

impl ViewportSignals<'_> {
    fn extent(&self) -> Option<LatLngBounds> {
        self.collection
            .and_then(FacilityCollection::extent_bounds)
    }

    fn position_of(&self, id: &str) -> Option<LatLng> {
        self.focus
            .filter(|feature| feature.id == id)
            .and_then(FacilityFeature::position)
            .or_else(|| {
                self.collection
                    .and_then(|collection| collection.get(id))
                    .and_then(FacilityFeature::position)
            })
    }
}

pub struct ViewportController<S> {
    config: ViewportConfig,
    surface: Option<S>,
    state: ControllerState,
    pending: Option<ViewportIntent>,
    last_reset_counter: u64,
    last_extent: Option<LatLngBounds>,
}

impl<S: MapSurface> ViewportController<S> {
    pub fn new(surface: S, config: ViewportConfig) -> Self {
        Self {
            config,
            surface: Some(surface),
            state: ControllerState::Idle,
            pending: None,
            last_reset_counter: 0,
            last_extent: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Turns fitting to each new result extent on or off
    pub fn set_zoom_to_search(&mut self, enabled: bool) {
        self.config.zoom_to_search = enabled;
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// The owned surface, or `None` after `dispose`
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.surface.is_none()
    }

    /// Waits for `id` to gain geometry, then centers on it at detail zoom
    pub fn begin_initial_focus(&mut self, id: impl Into<String>) {
        self.state = ControllerState::AwaitingDataForInitialFocus { id: id.into() };
    }

    /// Stops waiting for the initial focus, e.g. once the route no longer names
    /// the facility. Returns whether a focus was pending.
    pub fn cancel_initial_focus(&mut self) -> bool {
        if let ControllerState::AwaitingDataForInitialFocus { id } = &self.state {
            log::debug!("initial focus on {} abandoned", id);
            self.state = ControllerState::Idle;
            return true;
        }
        false
    }

    /// Queues a user intent for the next pass; a later request replaces an earlier one
    pub fn request(&mut self, intent: ViewportIntent) {
        if intent.is_noop() {
            return;
        }
        if let Some(previous) = self.pending.replace(intent) {
            log::debug!("viewport intent {:?} replaced before processing", previous);
        }
    }

    pub fn pending(&self) -> Option<&ViewportIntent> {
        self.pending.as_ref()
    }

    /// Runs one arbitration pass and issues at most one camera command
    pub fn process(
        &mut self,
        signals: &ViewportSignals<'_>,
        disambiguator: &mut ClusterDisambiguator,
    ) -> ViewportIntent {
        let pending = self.pending.take();
        let reset_changed = signals.reset_counter != self.last_reset_counter;
        self.last_reset_counter = signals.reset_counter;
        let extent = signals.extent();
        let extent_changed = extent != self.last_extent;
        // Only seen extents count as fitted, so enabling zoom-to-search later
        // still fits the results already on screen
        if self.config.zoom_to_search {
            self.last_extent = extent;
        }

        if self.surface.is_none() {
            log::debug!("viewport disposed, dropping camera intents");
            return ViewportIntent::NoOp;
        }

        let awaited = match &self.state {
            ControllerState::AwaitingDataForInitialFocus { id } => Some(id.clone()),
            _ => None,
        };
        if let Some(id) = awaited {
            if let Some(center) = signals.position_of(&id) {
                self.issue(ViewportCommand::SetView {
                    center,
                    zoom: self.config.clamp_zoom(self.config.detail_zoom),
                });
                self.state = ControllerState::Settled;
                return self.won(ViewportIntent::CenterOnFeature(id), pending);
            }
        }

        if reset_changed || matches!(pending, Some(ViewportIntent::ResetToDefault)) {
            disambiguator.close();
            self.issue(ViewportCommand::SetView {
                center: self.config.default_center,
                zoom: self.config.clamp_zoom(self.config.default_zoom),
            });
            self.state = ControllerState::Idle;
            return self.won(ViewportIntent::ResetToDefault, pending);
        }

        let fit = match &pending {
            Some(ViewportIntent::FitToExtent(bounds)) => Some(*bounds),
            _ if self.config.zoom_to_search && extent_changed => {
                extent.map(|extent| Self::with_boundary(extent, signals.boundary))
            }
            _ => None,
        };
        if let Some(bounds) = fit {
            self.issue(ViewportCommand::FitBounds {
                bounds,
                padding: self.config.fit_padding,
                max_zoom: self.config.clamp_zoom(self.config.fit_max_zoom),
            });
            return self.won(ViewportIntent::FitToExtent(bounds), pending);
        }

        match pending {
            Some(ViewportIntent::CenterOnFeature(id)) => self.bring_into_view(id, signals),
            Some(ViewportIntent::ZoomToCluster { center, zoom }) => {
                let zoom = self.config.clamp_zoom(zoom);
                self.issue(ViewportCommand::SetView { center, zoom });
                ViewportIntent::ZoomToCluster { center, zoom }
            }
            _ => ViewportIntent::NoOp,
        }
    }

    /// Pans (never zooms) to a selected facility that is off screen
    fn bring_into_view(&mut self, id: String, signals: &ViewportSignals<'_>) -> ViewportIntent {
        let Some(center) = signals.position_of(&id) else {
            log::debug!(
                "{:?}: facility {} has no geometry",
                ErrorKind::ViewportCommandSkipped,
                id
            );
            return ViewportIntent::NoOp;
        };
        let visible = self
            .surface
            .as_ref()
            .is_some_and(|surface| surface.contains(&center));
        if visible {
            log::debug!("facility {} already visible", id);
            return ViewportIntent::NoOp;
        }
        self.issue(ViewportCommand::PanTo { center });
        ViewportIntent::CenterOnFeature(id)
    }

    fn with_boundary(extent: LatLngBounds, boundary: Option<&Boundary>) -> LatLngBounds {
        match boundary.and_then(Boundary::bounds) {
            Some(area) => extent.union(&area),
            None => extent,
        }
    }

    fn won(&self, intent: ViewportIntent, dropped: Option<ViewportIntent>) -> ViewportIntent {
        if let Some(dropped) = dropped.filter(|dropped| *dropped != intent) {
            log::debug!("{:?} outranked {:?}", intent, dropped);
        }
        intent
    }

    fn issue(&mut self, command: ViewportCommand) {
        if let Some(surface) = self.surface.as_mut() {
            log::debug!("viewport command {:?}", command);
            surface.issue_viewport_command(&command);
        }
    }

    /// Releases the surface. No command can be issued afterwards.
    pub fn dispose(&mut self) -> Option<S> {
        self.pending = None;
        self.state = ControllerState::Idle;
        self.surface.take()
    }
}
