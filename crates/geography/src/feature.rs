//! GeoJSON feature collections as returned by the report backend.
//!
//! Only polygonal geometry is modelled; the backend never returns points or
//! lines for geographies.

use std::collections::BTreeMap;

use foundation::bounds::LngLat;
use serde::{Deserialize, Serialize};

/// `[longitude, latitude]`. Extra ordinates (altitude) are dropped on decode.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_lnglat(self) -> LngLat {
        LngLat::new(self.lon, self.lat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortPosition(pub usize);

impl std::fmt::Display for ShortPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position needs at least 2 ordinates, got {}", self.0)
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = ShortPosition;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [lon, lat, ..] => Ok(Position::new(*lon, *lat)),
            _ => Err(ShortPosition(v.len())),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lon, p.lat]
    }
}

/// Ordered ring vertices. GeoJSON rings repeat the first vertex at the end.
pub type Ring = Vec<Position>;

/// Outer ring at index 0, holes after it.
pub type PolygonRings = Vec<Ring>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
}

impl Geometry {
    pub fn polygons(&self) -> &[PolygonRings] {
        match self {
            Geometry::Polygon(rings) => std::slice::from_ref(rings),
            Geometry::MultiPolygon(polys) => polys,
        }
    }

    /// Outer ring of the first polygon.
    pub fn outer_ring(&self) -> Option<&Ring> {
        self.polygons().first().and_then(|rings| rings.first())
    }

    /// Every vertex of every ring, holes included.
    pub fn vertices(&self) -> impl Iterator<Item = Position> + '_ {
        self.polygons()
            .iter()
            .flat_map(|rings| rings.iter())
            .flat_map(|ring| ring.iter().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographyProperties {
    /// Set on the one geography the user searched for.
    #[serde(default)]
    pub is_target: bool,
    /// Data layer this geography belongs to (`justice40`, `county`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureTag,
    #[serde(default)]
    pub properties: GeographyProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(properties: GeographyProperties, geometry: Geometry) -> Self {
        Self {
            kind: FeatureTag::Feature,
            properties,
            geometry: Some(geometry),
        }
    }

    pub fn is_target(&self) -> bool {
        self.properties.is_target
    }

    pub fn geography_type(&self) -> Option<&str> {
        self.properties.geography_type.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: CollectionTag,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// The first feature flagged `is_target`.
    pub fn target(&self) -> Option<&Feature> {
        self.features.iter().find(|f| f.is_target())
    }

    /// Features whose `geography_type` equals `layer`, in collection order.
    pub fn tagged<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .iter()
            .filter(move |f| f.geography_type() == Some(layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"is_target": true, "geography_type": "county", "name": "Cook County", "fips": "17031"},
                "geometry": {"type": "Polygon", "coordinates": [[[-88.0, 41.5, 12.0], [-87.5, 41.5], [-87.5, 42.1], [-88.0, 42.1], [-88.0, 41.5]]]}
            },
            {
                "type": "Feature",
                "properties": {"geography_type": "justice40"},
                "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]], [[[5, 5], [6, 5], [6, 6], [5, 5]]]]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn decodes_polygons_and_multipolygons() {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(fc.len(), 3);

        let target = fc.target().unwrap();
        assert_eq!(target.properties.name.as_deref(), Some("Cook County"));
        assert_eq!(target.geography_type(), Some("county"));
        assert_eq!(
            target.properties.extra.get("fips"),
            Some(&serde_json::json!("17031"))
        );
        let ring = target.geometry.as_ref().unwrap().outer_ring().unwrap();
        assert_eq!(ring[0], Position::new(-88.0, 41.5));

        let multi = fc.features[1].geometry.as_ref().unwrap();
        assert_eq!(multi.polygons().len(), 2);
        assert_eq!(multi.vertices().count(), 8);

        assert!(fc.features[2].geometry.is_none());
        assert!(!fc.features[2].is_target());
    }

    #[test]
    fn tagged_filters_by_geography_type() {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(fc.tagged("justice40").count(), 1);
        assert_eq!(fc.tagged("energy").count(), 0);
    }

    #[test]
    fn short_position_is_a_decode_error() {
        let err = serde_json::from_str::<Geometry>(r#"{"type":"Polygon","coordinates":[[[1.0]]]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("at least 2 ordinates"), "{err}");
    }

    #[test]
    fn serializes_back_to_geojson_shape() {
        let f = Feature::new(
            GeographyProperties {
                is_target: true,
                ..Default::default()
            },
            Geometry::Polygon(vec![vec![Position::new(1.0, 2.0)]]),
        );
        let v = serde_json::to_value(FeatureCollection::new(vec![f])).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {"is_target": true},
                    "geometry": {"type": "Polygon", "coordinates": [[[1.0, 2.0]]]}
                }]
            })
        );
    }
}
