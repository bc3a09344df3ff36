use serde::{Deserialize, Serialize};

/// One togglable data overlay, backed by a single community dataset.
///
/// The string form (`as_str`) is the `geography_type` the report backend
/// tags features with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Justice40,
    LowIncome,
    Energy,
    Distressed,
    RuralCoop,
    MunicipalUtil,
    State,
    County,
    Municipality,
}

impl LayerId {
    pub const COUNT: usize = 9;

    /// Display order of the layer toggles.
    pub const ALL: [LayerId; Self::COUNT] = [
        LayerId::Justice40,
        LayerId::LowIncome,
        LayerId::Energy,
        LayerId::Distressed,
        LayerId::RuralCoop,
        LayerId::MunicipalUtil,
        LayerId::State,
        LayerId::County,
        LayerId::Municipality,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::Justice40 => "justice40",
            LayerId::LowIncome => "low_income",
            LayerId::Energy => "energy",
            LayerId::Distressed => "distressed",
            LayerId::RuralCoop => "rural_coop",
            LayerId::MunicipalUtil => "municipal_util",
            LayerId::State => "state",
            LayerId::County => "county",
            LayerId::Municipality => "municipality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LayerId::Justice40 => "Justice 40 Communities",
            LayerId::LowIncome => "Low-Income Communities",
            LayerId::Energy => "Energy Communities",
            LayerId::Distressed => "Distressed Communities",
            LayerId::RuralCoop => "Rural Cooperatives",
            LayerId::MunicipalUtil => "Municipal Utilities",
            LayerId::State => "States",
            LayerId::County => "Counties",
            LayerId::Municipality => "Municipalities",
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayer(pub String);

impl std::fmt::Display for UnknownLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown layer: {}", self.0)
    }
}

impl std::error::Error for UnknownLayer {}

impl std::str::FromStr for LayerId {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;
}

#[cfg(test)]
mod tests {
    use super::LayerId;

    #[test]
    fn index_matches_display_order() {
        for (i, id) in LayerId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn string_form_round_trips() {
        for id in LayerId::ALL {
            assert_eq!(id.as_str().parse::<LayerId>(), Ok(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert!("wetlands".parse::<LayerId>().is_err());
    }
}
