use geography::FeatureCollection;
use layers::symbology::LayerStyle;
use layers::{Layer, LayerDescriptor, LayerId};
use serde::Serialize;

use crate::report::Notification;
use crate::viewport::Viewport;

/// Snapshot handed to the render collaborator and the control panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub viewport: Viewport,
    pub style_url: String,
    pub layers: Vec<ActiveLayer>,
    pub toggles: Vec<LayerToggle>,
    pub base_maps: Vec<BaseMapChoice>,
    pub notification: Option<Notification>,
    pub panel_expanded: bool,
    pub query: String,
}

/// One drawable overlay: the layer's features as GeoJSON plus the
/// pre-triangulated fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveLayer {
    pub id: LayerId,
    pub label: &'static str,
    pub style: LayerStyle,
    pub feature_count: usize,
    pub triangle_count: usize,
    pub bounds: Option<[[f64; 2]; 2]>,
    pub features: FeatureCollection,
    /// Flat `[lon, lat]` list, three vertices per triangle.
    pub fill_triangles: Vec<[f64; 2]>,
}

impl From<&LayerDescriptor> for ActiveLayer {
    fn from(d: &LayerDescriptor) -> Self {
        Self {
            id: d.id(),
            label: d.label(),
            style: d.style,
            feature_count: d.features.len(),
            triangle_count: d.triangle_count(),
            bounds: d.bounds.map(|b| b.to_array()),
            features: FeatureCollection::new(d.features.clone()),
            fill_triangles: d.fill_triangles.clone(),
        }
    }
}

/// One checkbox row. `enabled` is false while the layer has no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerToggle {
    pub id: LayerId,
    pub label: &'static str,
    pub checked: bool,
    pub enabled: bool,
}

/// One radio row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseMapChoice {
    pub map_type: String,
    pub name: String,
    pub checked: bool,
}
