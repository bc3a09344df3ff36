use geography::FeatureCollection;
use runtime::event_bus::{ListenerId, Listeners};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl ReportStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ReportStatus::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ReportStatus::Error(_))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Loading,
    Error,
}

/// Non-blocking banner shown over the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    StatusChanged(ReportStatus),
    /// A new report was stored; carries its feature count.
    ReportChanged(usize),
}

/// Result of the most recent geography lookup.
///
/// `status().is_success()` holds exactly when `report()` is `Some`.
#[derive(Debug, Default)]
pub struct ReportStore {
    status: ReportStatus,
    report: Option<FeatureCollection>,
    listeners: Listeners<ReportEvent>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ReportStatus {
        &self.status
    }

    pub fn report(&self) -> Option<&FeatureCollection> {
        self.report.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == ReportStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ReportStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Move to idle, loading or error. Drops the current report.
    ///
    /// `Success` is rejected here: it is only reachable through
    /// [`set_report`](ReportStore::set_report).
    pub fn set_status(&mut self, status: ReportStatus) -> bool {
        if status.is_success() {
            warn!("success status requires a report; ignoring");
            return false;
        }
        let had_report = self.report.take().is_some();
        if status == self.status && !had_report {
            return true;
        }
        debug!(?status, "report status changed");
        self.status = status;
        self.listeners.emit(&ReportEvent::StatusChanged(self.status.clone()));
        true
    }

    pub fn set_report(&mut self, report: FeatureCollection) {
        let count = report.len();
        let status_changed = !self.status.is_success();
        self.report = Some(report);
        self.status = ReportStatus::Success;
        debug!(features = count, "report stored");
        self.listeners.emit(&ReportEvent::ReportChanged(count));
        if status_changed {
            self.listeners.emit(&ReportEvent::StatusChanged(ReportStatus::Success));
        }
    }

    /// Banner for the current status: shown while a lookup is outstanding
    /// or after it failed.
    pub fn notification(&self) -> Option<Notification> {
        match &self.status {
            ReportStatus::Idle | ReportStatus::Success => None,
            ReportStatus::Loading => Some(Notification {
                kind: NotificationKind::Loading,
                text: "Loading geographies...".to_string(),
            }),
            ReportStatus::Error(msg) => Some(Notification {
                kind: NotificationKind::Error,
                text: format!("Could not load geographies: {msg}"),
            }),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ReportEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use pretty_assertions::assert_eq;

    fn success_matches_report(store: &ReportStore) -> bool {
        store.status().is_success() == store.report().is_some()
    }

    #[test]
    fn success_gate_tracks_report_presence() {
        let mut store = ReportStore::new();
        assert!(success_matches_report(&store));

        store.set_status(ReportStatus::Loading);
        assert!(success_matches_report(&store));
        assert!(store.is_loading());

        store.set_report(FeatureCollection::default());
        assert!(success_matches_report(&store));
        assert!(store.status().is_success());

        store.set_status(ReportStatus::Error("timeout".into()));
        assert!(success_matches_report(&store));
        assert_eq!(store.error(), Some("timeout"));
        assert!(store.report().is_none());
    }

    #[test]
    fn bare_success_status_is_rejected() {
        let mut store = ReportStore::new();
        assert!(!store.set_status(ReportStatus::Success));
        assert_eq!(*store.status(), ReportStatus::Idle);
    }

    #[test]
    fn notification_follows_status() {
        let mut store = ReportStore::new();
        assert_eq!(store.notification(), None);

        store.set_status(ReportStatus::Loading);
        assert_eq!(
            store.notification().map(|n| n.kind),
            Some(NotificationKind::Loading)
        );

        store.set_status(ReportStatus::Error("HTTP 502".into()));
        let n = store.notification().unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert!(n.text.contains("HTTP 502"));

        store.set_report(FeatureCollection::default());
        assert_eq!(store.notification(), None);
    }

    #[test]
    fn emits_report_then_status() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = ReportStore::new();
        let sink = Rc::clone(&events);
        store.subscribe(move |e: &ReportEvent| sink.borrow_mut().push(e.clone()));

        store.set_status(ReportStatus::Loading);
        store.set_report(FeatureCollection::default());
        store.set_report(FeatureCollection::default());

        assert_eq!(
            *events.borrow(),
            vec![
                ReportEvent::StatusChanged(ReportStatus::Loading),
                ReportEvent::ReportChanged(0),
                ReportEvent::StatusChanged(ReportStatus::Success),
                ReportEvent::ReportChanged(0),
            ]
        );
    }

    #[test]
    fn status_serializes_with_message() {
        let v = serde_json::to_value(ReportStatus::Error("boom".into())).unwrap();
        assert_eq!(v, serde_json::json!({"status": "error", "message": "boom"}));
        let v = serde_json::to_value(ReportStatus::Loading).unwrap();
        assert_eq!(v, serde_json::json!({"status": "loading"}));
    }
}
