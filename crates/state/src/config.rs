use foundation::math::FitOptions;
use geography::BoundsStrategy;
use serde::{Deserialize, Serialize};

use crate::basemap::{BaseMapOption, default_base_maps};
use crate::panel::MOBILE_BREAKPOINT_PX;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub padding_px: f64,
    pub max_zoom: f64,
    /// Floor on the fitted extent in zoom-0 world pixels. Small targets
    /// (a single block group, a point) stop zooming in once they reach it.
    pub min_extent: f64,
    pub bounds_strategy: BoundsStrategy,
}

impl Default for FitConfig {
    fn default() -> Self {
        let options = FitOptions::default();
        Self {
            padding_px: options.padding_px,
            max_zoom: options.max_zoom,
            min_extent: options.min_extent,
            bounds_strategy: BoundsStrategy::default(),
        }
    }
}

impl FitConfig {
    pub fn options(&self) -> FitOptions {
        FitOptions {
            padding_px: self.padding_px,
            max_zoom: self.max_zoom,
            min_extent: self.min_extent,
        }
    }
}

/// Session settings for a [`Dashboard`](crate::Dashboard). Every field has a
/// default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Quiet period before typed text becomes the search query.
    pub debounce_ms: u64,
    pub fit: FitConfig,
    pub initial_viewport: Viewport,
    pub base_maps: Vec<BaseMapOption>,
    pub default_base_map: String,
    pub mobile_breakpoint_px: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            fit: FitConfig::default(),
            initial_viewport: Viewport::default(),
            base_maps: default_base_maps(),
            default_base_map: "streets".to_string(),
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DashboardConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.initial_viewport;
        if !(v.width > 0.0 && v.height > 0.0) {
            return Err(ConfigError::Invalid(
                "initial_viewport width and height must be positive".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&v.longitude) || !(-90.0..=90.0).contains(&v.latitude) {
            return Err(ConfigError::Invalid(
                "initial_viewport position out of range".into(),
            ));
        }
        if v.zoom < 0.0 {
            return Err(ConfigError::Invalid("initial_viewport zoom must be >= 0".into()));
        }
        let fit = &self.fit;
        if !(fit.max_zoom >= 0.0) || fit.padding_px < 0.0 || !(fit.min_extent >= 0.0) {
            return Err(ConfigError::Invalid(
                "fit max_zoom, padding_px and min_extent must be >= 0".into(),
            ));
        }
        Ok(())
    }
}
