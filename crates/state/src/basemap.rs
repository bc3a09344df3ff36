use std::collections::HashSet;

use runtime::event_bus::{ListenerId, Listeners};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMapSettings {
    pub name: String,
    /// Style URL understood by the tile renderer.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMapOption {
    pub map_type: String,
    #[serde(flatten)]
    pub settings: BaseMapSettings,
}

impl BaseMapOption {
    pub fn new(map_type: &str, name: &str, url: &str) -> Self {
        Self {
            map_type: map_type.to_string(),
            settings: BaseMapSettings {
                name: name.to_string(),
                url: url.to_string(),
            },
        }
    }
}

/// Built-in tile styles.
pub fn default_base_maps() -> Vec<BaseMapOption> {
    vec![
        BaseMapOption::new("streets", "Streets", "mapbox://styles/mapbox/streets-v12"),
        BaseMapOption::new(
            "satellite",
            "Satellite",
            "mapbox://styles/mapbox/satellite-streets-v12",
        ),
        BaseMapOption::new("light", "Light", "mapbox://styles/mapbox/light-v11"),
        BaseMapOption::new("dark", "Dark", "mapbox://styles/mapbox/dark-v11"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseMapError {
    NoOptions,
    DuplicateType(String),
    DuplicateName(String),
    UnknownDefault(String),
}

impl std::fmt::Display for BaseMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseMapError::NoOptions => write!(f, "at least one base map is required"),
            BaseMapError::DuplicateType(t) => write!(f, "duplicate base map type: {t}"),
            BaseMapError::DuplicateName(n) => write!(f, "duplicate base map name: {n}"),
            BaseMapError::UnknownDefault(t) => write!(f, "default base map not among options: {t}"),
        }
    }
}

impl std::error::Error for BaseMapError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseMapEvent {
    Selected(BaseMapOption),
}

/// Available tile styles and the selected one.
///
/// Types and names are unique, so the selected name identifies exactly one
/// option.
#[derive(Debug)]
pub struct BaseMapStore {
    options: Vec<BaseMapOption>,
    selected: usize,
    listeners: Listeners<BaseMapEvent>,
}

impl Default for BaseMapStore {
    fn default() -> Self {
        Self {
            options: default_base_maps(),
            selected: 0,
            listeners: Listeners::new(),
        }
    }
}

impl BaseMapStore {
    pub fn new(options: Vec<BaseMapOption>, default_type: &str) -> Result<Self, BaseMapError> {
        if options.is_empty() {
            return Err(BaseMapError::NoOptions);
        }
        let mut types = HashSet::new();
        let mut names = HashSet::new();
        for option in &options {
            if !types.insert(option.map_type.as_str()) {
                return Err(BaseMapError::DuplicateType(option.map_type.clone()));
            }
            if !names.insert(option.settings.name.as_str()) {
                return Err(BaseMapError::DuplicateName(option.settings.name.clone()));
            }
        }
        let selected = options
            .iter()
            .position(|o| o.map_type == default_type)
            .ok_or_else(|| BaseMapError::UnknownDefault(default_type.to_string()))?;

        Ok(Self {
            options,
            selected,
            listeners: Listeners::new(),
        })
    }

    pub fn options(&self) -> &[BaseMapOption] {
        &self.options
    }

    pub fn selected(&self) -> &BaseMapOption {
        &self.options[self.selected]
    }

    pub fn selected_url(&self) -> &str {
        &self.selected().settings.url
    }

    pub fn is_selected(&self, map_type: &str) -> bool {
        self.selected().map_type == map_type
    }

    /// Select by map type. Unknown types are ignored.
    pub fn set_map(&mut self, map_type: &str) -> bool {
        let Some(index) = self.options.iter().position(|o| o.map_type == map_type) else {
            warn!(map_type, "unknown base map");
            return false;
        };
        if index != self.selected {
            self.selected = index;
            debug!(map_type, "base map selected");
            self.listeners.emit(&BaseMapEvent::Selected(self.options[index].clone()));
        }
        true
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&BaseMapEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}
