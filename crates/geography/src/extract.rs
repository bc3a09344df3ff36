use foundation::bounds::{LngLat, LngLatBounds};
use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FeatureCollection};

/// How the fitting rectangle is derived from the target geometry.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsStrategy {
    /// Min/max over every vertex of every ring.
    #[default]
    VertexScan,
    /// Vertices 2 and 4 of the first outer ring. Only correct for the
    /// five-vertex envelope rectangles some backends emit.
    FixedRingOffsets,
}

/// Rectangle that frames the collection's target feature.
///
/// `None` when no feature is flagged `is_target` or the target has no usable
/// geometry.
pub fn extract_fitting_box(features: &FeatureCollection) -> Option<LngLatBounds> {
    extract_fitting_box_with(features, BoundsStrategy::default())
}

pub fn extract_fitting_box_with(
    features: &FeatureCollection,
    strategy: BoundsStrategy,
) -> Option<LngLatBounds> {
    let target = features.target()?;
    match strategy {
        BoundsStrategy::VertexScan => feature_bounds(target),
        BoundsStrategy::FixedRingOffsets => fixed_offset_bounds(target),
    }
}

/// True extent of a feature's geometry.
///
/// Boxes wider than a hemisphere are re-read around the seam: the widest
/// longitude stretch without vertices is left outside the box, so a target
/// split by the antimeridian (Aleutians, statewide Alaska) keeps its real
/// width, expressed with `max.lon` past 180.
pub fn feature_bounds(feature: &Feature) -> Option<LngLatBounds> {
    let geometry = feature.geometry.as_ref()?;
    let plain = LngLatBounds::from_points(geometry.vertices().map(|p| p.to_lnglat()))?;
    if plain.width_deg() <= 180.0 {
        return Some(plain);
    }

    let mut lons: Vec<f64> = geometry
        .vertices()
        .filter(|p| p.to_lnglat().is_finite())
        .map(|p| p.lon)
        .collect();
    lons.sort_by(f64::total_cmp);
    let (&first, &last) = (lons.first()?, lons.last()?);

    let (mut gap, mut west, mut east) = (first + 360.0 - last, first, last);
    for pair in lons.windows(2) {
        if pair[1] - pair[0] > gap {
            gap = pair[1] - pair[0];
            west = pair[1];
            east = pair[0] + 360.0;
        }
    }
    Some(LngLatBounds {
        min: LngLat::new(west, plain.min.lat),
        max: LngLat::new(east, plain.max.lat),
    })
}

fn fixed_offset_bounds(feature: &Feature) -> Option<LngLatBounds> {
    let ring = feature.geometry.as_ref()?.outer_ring()?;
    let a = ring.get(2)?.to_lnglat();
    let b = ring.get(4)?.to_lnglat();
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }
    Some(LngLatBounds::from_corners(a, b))
}

/// Combined extent of several features.
pub fn collection_bounds<'a, I>(features: I) -> Option<LngLatBounds>
where
    I: IntoIterator<Item = &'a Feature>,
{
    features
        .into_iter()
        .filter_map(feature_bounds)
        .reduce(|acc, b| acc.union(&b))
}
