use foundation::math::{FitOptions, fit_bounds};
use geography::{BoundsStrategy, FeatureCollection, extract_fitting_box_with};
use runtime::event_bus::{ListenerId, Listeners};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Camera parameters of the map view.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for Viewport {
    /// Continental US.
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            longitude: -95.0,
            latitude: 35.0,
            zoom: 3.5,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportEvent {
    /// The camera was re-fitted; the map view should animate to it.
    FlyTo(Viewport),
    Resized(Viewport),
}

#[derive(Debug)]
pub struct ViewportStore {
    current: Viewport,
    fit: FitOptions,
    strategy: BoundsStrategy,
    listeners: Listeners<ViewportEvent>,
}

impl Default for ViewportStore {
    fn default() -> Self {
        Self::new(Viewport::default(), FitOptions::default(), BoundsStrategy::default())
    }
}

impl ViewportStore {
    pub fn new(initial: Viewport, fit: FitOptions, strategy: BoundsStrategy) -> Self {
        Self {
            current: initial,
            fit,
            strategy,
            listeners: Listeners::new(),
        }
    }

    pub fn current(&self) -> &Viewport {
        &self.current
    }

    /// Frame the target feature of `features`.
    ///
    /// Absent input, a collection without a target, or a target without
    /// usable geometry leave the camera untouched. Only longitude, latitude
    /// and zoom ever change. Returns whether the camera moved.
    pub fn zoom_to_geography(&mut self, features: Option<&FeatureCollection>) -> bool {
        let Some(features) = features.filter(|fc| !fc.is_empty()) else {
            return false;
        };
        let Some(bounds) = extract_fitting_box_with(features, self.strategy) else {
            debug!("no target geography to frame");
            return false;
        };
        let Some(fit) = fit_bounds(self.current.width, self.current.height, &bounds, &self.fit)
        else {
            return false;
        };

        self.current = Viewport {
            longitude: fit.longitude,
            latitude: fit.latitude,
            zoom: fit.zoom,
            ..self.current
        };
        debug!(
            longitude = fit.longitude,
            latitude = fit.latitude,
            zoom = fit.zoom,
            "viewport fitted to geography"
        );
        self.listeners.emit(&ViewportEvent::FlyTo(self.current));
        true
    }

    /// Window resize. Non-positive or non-finite sizes are ignored.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            return false;
        }
        if self.current.width == width && self.current.height == height {
            return false;
        }
        self.current.width = width;
        self.current.height = height;
        self.listeners.emit(&ViewportEvent::Resized(self.current));
        true
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ViewportEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}
