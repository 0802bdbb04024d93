pub mod controller;

// Re-export the essential types
pub use controller::{
    ControllerState, MapSurface, ViewportCommand, ViewportController, ViewportIntent,
    ViewportSignals,
};
