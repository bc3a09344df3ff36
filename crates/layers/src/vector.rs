use earcutr::earcut;
use foundation::bounds::LngLatBounds;
use geography::{Feature, Position, collection_bounds};

use crate::layer::{Layer, LayerId};
use crate::symbology::LayerStyle;

/// Drawable overlay handed to the render collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    id: LayerId,
    pub style: LayerStyle,
    pub features: Vec<Feature>,
    pub bounds: Option<LngLatBounds>,
    /// Flat fill triangle list (3 vertices per triangle), `[lon, lat]`.
    pub fill_triangles: Vec<[f64; 2]>,
}

impl LayerDescriptor {
    pub fn build(id: LayerId, features: Vec<Feature>) -> Self {
        let style = LayerStyle::for_layer(id);
        let bounds = collection_bounds(&features);
        let mut fill_triangles = Vec::new();
        if style.has_fill() {
            for geometry in features.iter().filter_map(|f| f.geometry.as_ref()) {
                for rings in geometry.polygons() {
                    fill_triangles.extend(triangulate_polygon(rings));
                }
            }
        }
        Self {
            id,
            style,
            features,
            bounds,
            fill_triangles,
        }
    }

    pub fn label(&self) -> &'static str {
        self.id.label()
    }

    pub fn triangle_count(&self) -> usize {
        self.fill_triangles.len() / 3
    }
}

impl Layer for LayerDescriptor {
    fn id(&self) -> LayerId {
        self.id
    }
}

/// Triangulate one polygon (outer ring + holes) in the lon/lat plane.
///
/// Returns an empty list for rings that cannot form a triangle.
fn triangulate_polygon(rings: &[Vec<Position>]) -> Vec<[f64; 2]> {
    let mut vertices: Vec<[f64; 2]> = Vec::new();
    let mut coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for (ring_i, ring) in rings.iter().enumerate() {
        let mut ring_pts: Vec<Position> = ring
            .iter()
            .copied()
            .filter(|p| p.lon.is_finite() && p.lat.is_finite())
            .collect();
        drop_closing_duplicate(&mut ring_pts);
        if ring_pts.len() < 3 {
            if ring_i == 0 {
                return Vec::new();
            }
            continue;
        }

        if ring_i > 0 {
            hole_indices.push(vertices.len());
        }

        for p in ring_pts {
            coords.push(p.lon);
            coords.push(p.lat);
            vertices.push([p.lon, p.lat]);
        }
    }

    let indices = match earcut(&coords, &hole_indices, 2) {
        Ok(ix) => ix,
        Err(_) => return Vec::new(),
    };

    indices
        .into_iter()
        .filter_map(|idx| vertices.get(idx).copied())
        .collect()
}

fn drop_closing_duplicate(points: &mut Vec<Position>) {
    if let [first, .., last] = points.as_slice()
        && (first.lon - last.lon).abs() < 1e-12
        && (first.lat - last.lat).abs() < 1e-12
    {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geography::{Geometry, GeographyProperties};

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Position> {
        vec![
            Position::new(x0, y0),
            Position::new(x0 + size, y0),
            Position::new(x0 + size, y0 + size),
            Position::new(x0, y0 + size),
            Position::new(x0, y0),
        ]
    }

    fn tagged(layer: LayerId, geometry: Geometry) -> Feature {
        Feature::new(
            GeographyProperties {
                geography_type: Some(layer.as_str().to_string()),
                ..Default::default()
            },
            geometry,
        )
    }

    #[test]
    fn square_becomes_two_triangles() {
        let tris = triangulate_polygon(&[square(0.0, 0.0, 1.0)]);
        assert_eq!(tris.len(), 6);
    }

    #[test]
    fn hole_adds_triangles_and_is_not_filled() {
        let outer = square(0.0, 0.0, 4.0);
        let hole = square(1.0, 1.0, 2.0);
        let tris = triangulate_polygon(&[outer, hole]);
        // 8 vertices with one hole: n + 2h - 2 = 8 triangles.
        assert_eq!(tris.len(), 24);

        let area: f64 = tris
            .chunks(3)
            .map(|t| {
                let cross = (t[1][0] - t[0][0]) * (t[2][1] - t[0][1])
                    - (t[2][0] - t[0][0]) * (t[1][1] - t[0][1]);
                cross.abs() * 0.5
            })
            .sum();
        assert!((area - 12.0).abs() < 1e-9, "area {area}");
    }

    #[test]
    fn degenerate_outer_ring_yields_nothing() {
        let ring = vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0), Position::new(0.0, 0.0)];
        assert!(triangulate_polygon(&[ring]).is_empty());
    }

    #[test]
    fn descriptor_collects_bounds_and_fill() {
        let features = vec![
            tagged(LayerId::Justice40, Geometry::Polygon(vec![square(0.0, 0.0, 1.0)])),
            tagged(
                LayerId::Justice40,
                Geometry::MultiPolygon(vec![
                    vec![square(3.0, 3.0, 1.0)],
                    vec![square(5.0, -1.0, 1.0)],
                ]),
            ),
        ];
        let d = LayerDescriptor::build(LayerId::Justice40, features);
        assert_eq!(d.id(), LayerId::Justice40);
        assert_eq!(d.triangle_count(), 6);
        assert_eq!(d.bounds.unwrap().to_array(), [[0.0, -1.0], [6.0, 4.0]]);
        assert_eq!(d.label(), "Justice 40 Communities");
    }

    #[test]
    fn outline_layers_skip_triangulation() {
        let d = LayerDescriptor::build(
            LayerId::County,
            vec![tagged(LayerId::County, Geometry::Polygon(vec![square(0.0, 0.0, 1.0)]))],
        );
        assert!(d.fill_triangles.is_empty());
        assert!(d.bounds.is_some());
    }
}
