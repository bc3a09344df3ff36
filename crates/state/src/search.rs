use runtime::event_bus::{ListenerId, Listeners};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A pick from the search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographyRef {
    pub id: String,
    /// Display name; becomes the query when selected.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    QueryChanged(String),
    SelectionChanged(Option<GeographyRef>),
}

/// Free-text query and the committed selection. No validation happens here.
#[derive(Debug, Default)]
pub struct SearchStore {
    query: String,
    selected: Option<GeographyRef>,
    listeners: Listeners<SearchEvent>,
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<&GeographyRef> {
        self.selected.as_ref()
    }

    /// Replace the query. Expected to be driven by the debounced input path.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.query {
            return;
        }
        debug!(query = %text, "search query set");
        self.query = text;
        self.listeners.emit(&SearchEvent::QueryChanged(self.query.clone()));
    }

    /// Commit an explicit pick; the query follows the pick's display name.
    pub fn set_selected(&mut self, geography: GeographyRef) {
        self.set_query(geography.name.clone());
        if self.selected.as_ref() == Some(&geography) {
            return;
        }
        debug!(id = %geography.id, "search selection set");
        self.selected = Some(geography);
        self.listeners.emit(&SearchEvent::SelectionChanged(self.selected.clone()));
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.listeners.emit(&SearchEvent::SelectionChanged(None));
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SearchEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}
