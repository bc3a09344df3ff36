use runtime::event_bus::{ListenerId, Listeners};
use serde::Serialize;
use tracing::{debug, warn};

use crate::layer::LayerId;

/// Per-layer user intent and data availability.
///
/// `visible` is what the user asked for and survives availability changes;
/// a layer is only drawn when it is also `has_data`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerState {
    pub visible: bool,
    pub has_data: bool,
}

impl LayerState {
    pub fn is_renderable(&self) -> bool {
        self.visible && self.has_data
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerEvent {
    Changed { id: LayerId, state: LayerState },
}

/// Visibility and availability for the fixed set of data layers.
///
/// Every operation is total: requests that cannot apply (toggling a layer
/// without data) are ignored and reported through the return value.
#[derive(Debug, Default)]
pub struct LayerStore {
    states: [LayerState; LayerId::COUNT],
    listeners: Listeners<LayerEvent>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: LayerId) -> LayerState {
        self.states[id.index()]
    }

    /// All layers in toggle order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, LayerState)> + '_ {
        LayerId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Layers that are both visible and backed by data, in toggle order.
    pub fn renderable(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.iter()
            .filter(|(_, state)| state.is_renderable())
            .map(|(id, _)| id)
    }

    /// Flip `visible`. Returns `false` (and changes nothing) when the layer
    /// has no data.
    pub fn toggle_layer(&mut self, id: LayerId) -> bool {
        let state = self.get(id);
        if !state.has_data {
            warn!(layer = %id, "ignoring toggle for layer without data");
            return false;
        }
        self.update(
            id,
            LayerState {
                visible: !state.visible,
                ..state
            },
        );
        true
    }

    /// Make every layer with data visible. Layers without data end up hidden.
    pub fn show_all_layers(&mut self) {
        for id in LayerId::ALL {
            let state = self.get(id);
            self.update(
                id,
                LayerState {
                    visible: state.has_data,
                    ..state
                },
            );
        }
    }

    pub fn hide_all_layers(&mut self) {
        for id in LayerId::ALL {
            let state = self.get(id);
            self.update(
                id,
                LayerState {
                    visible: false,
                    ..state
                },
            );
        }
    }

    /// Update availability only; `visible` is left as the user set it.
    pub fn set_has_data(&mut self, id: LayerId, has_data: bool) {
        let state = self.get(id);
        self.update(id, LayerState { has_data, ..state });
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&LayerEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    fn update(&mut self, id: LayerId, next: LayerState) {
        let slot = &mut self.states[id.index()];
        if *slot == next {
            return;
        }
        *slot = next;
        debug!(
            layer = %id,
            visible = next.visible,
            has_data = next.has_data,
            "layer state changed"
        );
        self.listeners.emit(&LayerEvent::Changed { id, state: next });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{LayerEvent, LayerState, LayerStore};
    use crate::layer::LayerId;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_hidden_and_empty() {
        let store = LayerStore::new();
        for (_, state) in store.iter() {
            assert_eq!(state, LayerState::default());
        }
        assert_eq!(store.renderable().count(), 0);
    }

    #[test]
    fn toggle_without_data_is_rejected() {
        let mut store = LayerStore::new();
        assert!(!store.toggle_layer(LayerId::Justice40));
        assert!(!store.toggle_layer(LayerId::Justice40));
        assert!(!store.get(LayerId::Justice40).visible);
    }

    #[test]
    fn toggle_with_data_flips_once_per_call() {
        let mut store = LayerStore::new();
        store.set_has_data(LayerId::Energy, true);
        assert!(store.toggle_layer(LayerId::Energy));
        assert!(store.get(LayerId::Energy).visible);
        assert!(store.toggle_layer(LayerId::Energy));
        assert!(!store.get(LayerId::Energy).visible);
    }

    #[test]
    fn visible_intent_survives_availability_changes() {
        let mut store = LayerStore::new();
        store.set_has_data(LayerId::LowIncome, true);
        store.toggle_layer(LayerId::LowIncome);

        store.set_has_data(LayerId::LowIncome, false);
        let state = store.get(LayerId::LowIncome);
        assert!(state.visible);
        assert!(!state.is_renderable());

        store.set_has_data(LayerId::LowIncome, true);
        assert_eq!(store.renderable().collect::<Vec<_>>(), vec![LayerId::LowIncome]);
    }

    #[test]
    fn bulk_operations_respect_availability() {
        let mut store = LayerStore::new();
        store.set_has_data(LayerId::Justice40, true);
        store.set_has_data(LayerId::County, true);
        // Intent left over from an earlier report.
        store.set_has_data(LayerId::Energy, true);
        store.toggle_layer(LayerId::Energy);
        store.set_has_data(LayerId::Energy, false);

        store.show_all_layers();
        for (_, state) in store.iter() {
            assert_eq!(state.visible, state.has_data);
        }
        assert_eq!(
            store.renderable().collect::<Vec<_>>(),
            vec![LayerId::Justice40, LayerId::County]
        );

        store.hide_all_layers();
        assert!(store.iter().all(|(_, s)| !s.visible));
        assert!(store.get(LayerId::County).has_data);
    }

    #[test]
    fn operations_are_idempotent() {
        let mut store = LayerStore::new();
        store.set_has_data(LayerId::State, true);
        store.set_has_data(LayerId::State, true);
        store.show_all_layers();
        store.show_all_layers();
        assert_eq!(
            store.get(LayerId::State),
            LayerState {
                visible: true,
                has_data: true
            }
        );
    }

    #[test]
    fn emits_only_real_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = LayerStore::new();
        let sink = Rc::clone(&events);
        let sub = store.subscribe(move |e| sink.borrow_mut().push(*e));

        store.set_has_data(LayerId::Distressed, true);
        store.set_has_data(LayerId::Distressed, true);
        store.toggle_layer(LayerId::RuralCoop);
        store.toggle_layer(LayerId::Distressed);

        assert_eq!(
            *events.borrow(),
            vec![
                LayerEvent::Changed {
                    id: LayerId::Distressed,
                    state: LayerState {
                        visible: false,
                        has_data: true
                    }
                },
                LayerEvent::Changed {
                    id: LayerId::Distressed,
                    state: LayerState {
                        visible: true,
                        has_data: true
                    }
                },
            ]
        );

        assert!(store.unsubscribe(sub));
        store.hide_all_layers();
        assert_eq!(events.borrow().len(), 2);
    }
}
