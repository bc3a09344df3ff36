//! Web-mercator projection and camera fitting.
//!
//! World coordinates follow the 512-pixel tile convention used by the
//! browser map stack: at zoom 0 the whole world spans `TILE_SIZE` pixels and
//! every zoom level doubles that. `y` grows northwards.

use std::f64::consts::{FRAC_PI_4, PI};

use super::Vec2;
use crate::bounds::{LngLat, LngLatBounds};

pub const TILE_SIZE: f64 = 512.0;

/// Latitude at which the square mercator world ends.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project a position to zoom-0 world pixels.
pub fn lnglat_to_world(p: LngLat) -> Vec2 {
    let lambda = p.lon.to_radians();
    let phi = p
        .lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    let x = TILE_SIZE * (lambda + PI) / (2.0 * PI);
    let y = TILE_SIZE * (PI + (FRAC_PI_4 + phi * 0.5).tan().ln()) / (2.0 * PI);
    Vec2::new(x, y)
}

/// Inverse of [`lnglat_to_world`].
pub fn world_to_lnglat(w: Vec2) -> LngLat {
    let lambda = (w.x / TILE_SIZE) * (2.0 * PI) - PI;
    let phi = 2.0 * (((w.y / TILE_SIZE) * (2.0 * PI) - PI).exp().atan() - FRAC_PI_4);
    LngLat::new(lambda.to_degrees(), phi.to_degrees())
}

/// Bring a longitude into `[-180, 180)`.
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    /// Margin kept free on every side of the viewport, in screen pixels.
    pub padding_px: f64,
    pub max_zoom: f64,
    /// Smallest projected extent (zoom-0 world pixels) considered when
    /// fitting. Keeps a single point from zooming past `max_zoom`.
    pub min_extent: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 20.0,
            max_zoom: 20.0,
            min_extent: 0.0,
        }
    }
}

/// Camera position that frames a rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFit {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

/// Fit `bounds` into a `width` x `height` pixel viewport.
///
/// Returns `None` for a degenerate viewport or non-finite bounds. When the
/// padding would leave no drawable area it is ignored.
pub fn fit_bounds(
    width: f64,
    height: f64,
    bounds: &LngLatBounds,
    options: &FitOptions,
) -> Option<CameraFit> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return None;
    }
    if !(bounds.min.is_finite() && bounds.max.is_finite()) {
        return None;
    }

    let nw = lnglat_to_world(LngLat::new(bounds.min.lon, bounds.max.lat));
    let se = lnglat_to_world(LngLat::new(bounds.max.lon, bounds.min.lat));
    let extent = (se - nw).abs();
    let size = Vec2::new(
        extent.x.max(options.min_extent),
        extent.y.max(options.min_extent),
    );

    let padding = options.padding_px.max(0.0);
    let mut target = Vec2::new(width - 2.0 * padding, height - 2.0 * padding);
    if target.x <= 0.0 || target.y <= 0.0 {
        target = Vec2::new(width, height);
    }

    // A zero extent divides to +inf, which the max-zoom clamp absorbs.
    let scale = (target.x / size.x).min(target.y / size.y);
    let zoom = scale.log2().min(options.max_zoom).max(0.0);

    let center = world_to_lnglat(nw.midpoint(se));
    Some(CameraFit {
        longitude: wrap_longitude(center.lon),
        latitude: center.lat,
        zoom,
    })
}
