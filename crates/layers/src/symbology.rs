use serde::Serialize;

use crate::layer::LayerId;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    /// Straight RGBA, 0..1.
    pub fill: [f32; 4],
    pub line: [f32; 4],
    pub line_width_px: f32,
}

impl LayerStyle {
    pub const fn new(fill: [f32; 4], line: [f32; 4], line_width_px: f32) -> Self {
        Self {
            fill,
            line,
            line_width_px,
        }
    }

    /// Palette per dataset. Boundary layers are outline-only.
    pub const fn for_layer(id: LayerId) -> Self {
        match id {
            LayerId::Justice40 => Self::new([0.55, 0.16, 0.62, 0.45], [0.42, 0.10, 0.49, 1.0], 1.0),
            LayerId::LowIncome => Self::new([0.95, 0.61, 0.07, 0.45], [0.80, 0.47, 0.02, 1.0], 1.0),
            LayerId::Energy => Self::new([0.13, 0.59, 0.95, 0.45], [0.05, 0.45, 0.80, 1.0], 1.0),
            LayerId::Distressed => {
                Self::new([0.90, 0.22, 0.21, 0.40], [0.72, 0.11, 0.11, 1.0], 1.0)
            }
            LayerId::RuralCoop => Self::new([0.30, 0.69, 0.31, 0.40], [0.18, 0.49, 0.20, 1.0], 1.0),
            LayerId::MunicipalUtil => {
                Self::new([0.00, 0.59, 0.53, 0.40], [0.00, 0.41, 0.36, 1.0], 1.0)
            }
            LayerId::State => Self::new([0.0, 0.0, 0.0, 0.0], [0.13, 0.13, 0.13, 1.0], 2.0),
            LayerId::County => Self::new([0.0, 0.0, 0.0, 0.0], [0.38, 0.38, 0.38, 1.0], 1.5),
            LayerId::Municipality => Self::new([0.0, 0.0, 0.0, 0.0], [0.47, 0.33, 0.28, 1.0], 1.0),
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill[3] > 0.0
    }
}
