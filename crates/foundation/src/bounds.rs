/// A geographic position in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// Axis-aligned geographic rectangle, `[[lon_min, lat_min], [lon_max, lat_max]]`.
///
/// Invariant: `min.lon <= max.lon` and `min.lat <= max.lat`. A rectangle
/// crossing the antimeridian keeps that order by letting `max.lon` run past
/// 180.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLatBounds {
    pub min: LngLat,
    pub max: LngLat,
}

impl LngLatBounds {
    /// Build a rectangle from two opposite corners in any order.
    pub fn from_corners(a: LngLat, b: LngLat) -> Self {
        Self {
            min: LngLat::new(a.lon.min(b.lon), a.lat.min(b.lat)),
            max: LngLat::new(a.lon.max(b.lon), a.lat.max(b.lat)),
        }
    }

    /// Smallest rectangle containing every finite point, or `None` when there
    /// are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LngLat>,
    {
        let mut out: Option<Self> = None;
        for p in points.into_iter().filter(LngLat::is_finite) {
            match out.as_mut() {
                Some(b) => b.extend(p),
                None => out = Some(Self { min: p, max: p }),
            }
        }
        out
    }

    pub fn extend(&mut self, p: LngLat) {
        self.min.lon = self.min.lon.min(p.lon);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lon = self.max.lon.max(p.lon);
        self.max.lat = self.max.lat.max(p.lat);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.extend(other.min);
        out.extend(other.max);
        out
    }

    pub fn width_deg(&self) -> f64 {
        self.max.lon - self.min.lon
    }

    /// The two-corner array form handed to camera-fit routines.
    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [[self.min.lon, self.min.lat], [self.max.lon, self.max.lat]]
    }
}

#[cfg(test)]
mod tests {
    use super::{LngLat, LngLatBounds};

    #[test]
    fn from_corners_normalizes_order() {
        let b = LngLatBounds::from_corners(LngLat::new(-80.0, 42.0), LngLat::new(-90.0, 38.0));
        assert_eq!(b.to_array(), [[-90.0, 38.0], [-80.0, 42.0]]);
    }

    #[test]
    fn from_points_skips_non_finite() {
        let b = LngLatBounds::from_points([
            LngLat::new(1.0, 2.0),
            LngLat::new(f64::NAN, 50.0),
            LngLat::new(-3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(b.min, LngLat::new(-3.0, 2.0));
        assert_eq!(b.max, LngLat::new(1.0, 4.0));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(LngLatBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn union_covers_both() {
        let a = LngLatBounds::from_corners(LngLat::new(0.0, 0.0), LngLat::new(2.0, 2.0));
        let b = LngLatBounds::from_corners(LngLat::new(4.0, -2.0), LngLat::new(6.0, 0.0));
        let u = a.union(&b);
        assert_eq!(u.to_array(), [[0.0, -2.0], [6.0, 2.0]]);
        assert_eq!(u.width_deg(), 6.0);
    }
}
