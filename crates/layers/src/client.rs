use std::collections::BTreeMap;

use geography::FeatureCollection;
use tracing::debug;

use crate::layer::LayerId;
use crate::store::LayerStore;
use crate::vector::LayerDescriptor;

/// Derived view over the current report and the [`LayerStore`].
///
/// Holds one descriptor per layer that has data in the current report.
/// [`sync`](LayerClient::sync) is the only place availability is written, so
/// `layer(id).is_some()` and `store.get(id).has_data` always agree.
#[derive(Debug, Default)]
pub struct LayerClient {
    descriptors: BTreeMap<LayerId, LayerDescriptor>,
}

impl LayerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer identifiers in toggle order. Independent of data and state.
    pub fn toggle_options(&self) -> &'static [LayerId] {
        &LayerId::ALL
    }

    /// Rebuild descriptors from `report` and publish availability.
    ///
    /// Call whenever the report reference changes. `None` clears every layer.
    pub fn sync(&mut self, report: Option<&FeatureCollection>, store: &mut LayerStore) {
        self.descriptors.clear();
        for id in LayerId::ALL {
            let features: Vec<_> = report
                .map(|fc| fc.tagged(id.as_str()).cloned().collect())
                .unwrap_or_default();
            let has_data = !features.is_empty();
            if has_data {
                self.descriptors.insert(id, LayerDescriptor::build(id, features));
            }
            store.set_has_data(id, has_data);
        }
        debug!(available = self.descriptors.len(), "layers synced with report");
    }

    pub fn layer(&self, id: LayerId) -> Option<&LayerDescriptor> {
        self.descriptors.get(&id)
    }

    /// Descriptors that are visible and have data, in toggle order.
    pub fn active_layers<'a>(&'a self, store: &LayerStore) -> Vec<&'a LayerDescriptor> {
        store
            .renderable()
            .filter_map(|id| self.descriptors.get(&id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::LayerClient;
    use crate::layer::{Layer, LayerId};
    use crate::store::LayerStore;
    use geography::{Feature, FeatureCollection, Geometry, GeographyProperties, Position};
    use pretty_assertions::assert_eq;

    fn feature(layer: &str) -> Feature {
        Feature::new(
            GeographyProperties {
                geography_type: Some(layer.to_string()),
                ..Default::default()
            },
            Geometry::Polygon(vec![vec![
                Position::new(0.0, 0.0),
                Position::new(1.0, 0.0),
                Position::new(1.0, 1.0),
                Position::new(0.0, 0.0),
            ]]),
        )
    }

    fn report(layers: &[&str]) -> FeatureCollection {
        FeatureCollection::new(layers.iter().map(|l| feature(l)).collect())
    }

    #[test]
    fn toggle_options_are_stable() {
        let mut client = LayerClient::new();
        let mut store = LayerStore::new();
        let before = client.toggle_options().to_vec();

        client.sync(Some(&report(&["energy"])), &mut store);
        store.show_all_layers();
        assert_eq!(client.toggle_options(), before.as_slice());

        client.sync(None, &mut store);
        assert_eq!(client.toggle_options(), before.as_slice());
        assert_eq!(before.len(), LayerId::COUNT);
        assert_eq!(before[0], LayerId::Justice40);
    }

    #[test]
    fn availability_matches_descriptors() {
        let mut client = LayerClient::new();
        let mut store = LayerStore::new();
        client.sync(
            Some(&report(&["justice40", "county", "justice40", "unknown_type"])),
            &mut store,
        );

        for id in LayerId::ALL {
            assert_eq!(client.layer(id).is_some(), store.get(id).has_data, "{id}");
        }
        assert_eq!(client.layer(LayerId::Justice40).unwrap().features.len(), 2);
        assert!(client.layer(LayerId::Energy).is_none());
    }

    #[test]
    fn active_layers_need_visibility_and_data() {
        let mut client = LayerClient::new();
        let mut store = LayerStore::new();
        client.sync(Some(&report(&["justice40", "low_income"])), &mut store);
        assert!(client.active_layers(&store).is_empty());

        store.toggle_layer(LayerId::LowIncome);
        store.toggle_layer(LayerId::Energy);
        let ids: Vec<_> = client.active_layers(&store).iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![LayerId::LowIncome]);
    }

    #[test]
    fn visible_layer_reactivates_when_data_returns() {
        let mut client = LayerClient::new();
        let mut store = LayerStore::new();
        client.sync(Some(&report(&["energy"])), &mut store);
        store.toggle_layer(LayerId::Energy);

        client.sync(Some(&report(&["county"])), &mut store);
        assert!(client.active_layers(&store).is_empty());
        assert!(store.get(LayerId::Energy).visible);

        client.sync(Some(&report(&["energy"])), &mut store);
        let ids: Vec<_> = client.active_layers(&store).iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![LayerId::Energy]);
    }

    #[test]
    fn clearing_the_report_disables_everything() {
        let mut client = LayerClient::new();
        let mut store = LayerStore::new();
        client.sync(Some(&report(&["state", "county"])), &mut store);
        client.sync(None, &mut store);
        assert!(store.iter().all(|(_, s)| !s.has_data));
        assert!(LayerId::ALL.iter().all(|id| client.layer(*id).is_none()));
    }
}
