use foundation::time::Millis;
use geography::FeatureCollection;
use layers::{LayerClient, LayerDescriptor, LayerEvent, LayerId, LayerStore};
use runtime::debounce::Debouncer;
use runtime::event_bus::ListenerId;
use tracing::{debug, info, warn};

use crate::basemap::{BaseMapEvent, BaseMapStore};
use crate::config::{ConfigError, DashboardConfig};
use crate::lookup::{LookupError, LookupRequest, RequestId};
use crate::panel::ControlPanel;
use crate::render::{ActiveLayer, BaseMapChoice, LayerToggle, RenderState};
use crate::report::{ReportEvent, ReportStatus, ReportStore};
use crate::search::{GeographyRef, SearchEvent, SearchStore};
use crate::viewport::{ViewportEvent, ViewportStore};

/// Stores for one dashboard session, wired along the
/// search → report → layers → viewport flow.
///
/// All mutation goes through these methods; each store is written only by
/// its own operations. Lookups are not run here: the host receives a
/// [`LookupRequest`], performs it, and hands the outcome back to
/// [`on_lookup_result`](Dashboard::on_lookup_result).
#[derive(Debug)]
pub struct Dashboard {
    search: SearchStore,
    report: ReportStore,
    layers: LayerStore,
    base_map: BaseMapStore,
    viewport: ViewportStore,
    panel: ControlPanel,
    layer_client: LayerClient,
    query_input: Debouncer<String>,
    next_request: u64,
    in_flight: Option<LookupRequest>,
}

impl Dashboard {
    pub fn new(
        search: SearchStore,
        report: ReportStore,
        layers: LayerStore,
        base_map: BaseMapStore,
        viewport: ViewportStore,
        panel: ControlPanel,
        debounce_ms: u64,
    ) -> Self {
        Self {
            search,
            report,
            layers,
            base_map,
            viewport,
            panel,
            layer_client: LayerClient::new(),
            query_input: Debouncer::new(debounce_ms),
            next_request: 0,
            in_flight: None,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_map = BaseMapStore::new(config.base_maps.clone(), &config.default_base_map)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let viewport = ViewportStore::new(
            config.initial_viewport,
            config.fit.options(),
            config.fit.bounds_strategy,
        );
        Ok(Self::new(
            SearchStore::new(),
            ReportStore::new(),
            LayerStore::new(),
            base_map,
            viewport,
            ControlPanel::new(config.mobile_breakpoint_px, config.initial_viewport.width),
            config.debounce_ms,
        ))
    }

    pub fn search(&self) -> &SearchStore {
        &self.search
    }

    pub fn report(&self) -> &ReportStore {
        &self.report
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn base_map(&self) -> &BaseMapStore {
        &self.base_map
    }

    pub fn viewport(&self) -> &ViewportStore {
        &self.viewport
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn layer_client(&self) -> &LayerClient {
        &self.layer_client
    }

    pub fn in_flight(&self) -> Option<&LookupRequest> {
        self.in_flight.as_ref()
    }

    // --- search ---

    /// A keystroke in the search box. The text only reaches the search store
    /// once typing pauses for the debounce period.
    pub fn on_text_input(&mut self, now: Millis, text: impl Into<String>) {
        if self.query_input.push(now, text.into()) {
            debug!("pending query superseded");
        }
    }

    /// When [`poll`](Dashboard::poll) next has work, if anything is pending.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.query_input.deadline()
    }

    /// Commit the debounced query if its quiet period is over.
    ///
    /// Returns the lookup to run, if the committed query warrants one. Blank
    /// queries are committed but never looked up; re-committing the current
    /// query does not refetch unless the last lookup failed. Typing away from
    /// a picked geography's name drops the pick.
    pub fn poll(&mut self, now: Millis) -> Option<LookupRequest> {
        let text = self.query_input.poll(now)?;
        let unchanged = text == self.search.query();
        if self.search.selected().is_some_and(|g| g.name != text) {
            self.search.clear_selection();
        }
        self.search.set_query(text);

        let query = self.search.query().trim().to_string();
        if query.is_empty() {
            return None;
        }
        if unchanged && !self.report.status().is_error() {
            return None;
        }
        Some(self.begin_lookup(query))
    }

    /// Commit a pick from the result list. Cancels any pending typed query.
    pub fn on_select(&mut self, geography: GeographyRef) -> LookupRequest {
        self.query_input.cancel();
        let query = geography.name.clone();
        self.search.set_selected(geography);
        self.begin_lookup(query)
    }

    fn begin_lookup(&mut self, query: String) -> LookupRequest {
        let request = LookupRequest {
            id: RequestId(self.next_request),
            query,
        };
        self.next_request += 1;
        info!(request = request.id.0, query = %request.query, "geography lookup started");
        self.report.set_status(ReportStatus::Loading);
        self.in_flight = Some(request.clone());
        request
    }

    // --- report ---

    /// Apply the outcome of a lookup.
    ///
    /// Answers to anything but the latest request are dropped. On success the
    /// layers and the camera follow the new report; on failure they keep
    /// their last state and the report store carries the error.
    pub fn on_lookup_result(
        &mut self,
        request: RequestId,
        result: Result<FeatureCollection, LookupError>,
    ) -> bool {
        if self.in_flight.as_ref().map(|r| r.id) != Some(request) {
            debug!(request = request.0, "dropping stale lookup result");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(report) => {
                info!(request = request.0, features = report.len(), "geography lookup finished");
                self.report.set_report(report);
                self.layer_client.sync(self.report.report(), &mut self.layers);
                self.viewport.zoom_to_geography(self.report.report());
            }
            Err(err) => {
                warn!(request = request.0, error = %err, "geography lookup failed");
                self.report.set_status(ReportStatus::Error(err.to_string()));
            }
        }
        true
    }

    // --- layers ---

    pub fn toggle_layer(&mut self, id: LayerId) -> bool {
        self.layers.toggle_layer(id)
    }

    pub fn show_all_layers(&mut self) {
        self.layers.show_all_layers();
    }

    pub fn hide_all_layers(&mut self) {
        self.layers.hide_all_layers();
    }

    pub fn active_layers(&self) -> Vec<&LayerDescriptor> {
        self.layer_client.active_layers(&self.layers)
    }

    // --- base map, window, panel ---

    pub fn set_base_map(&mut self, map_type: &str) -> bool {
        self.base_map.set_map(map_type)
    }

    /// Window resize: the map keeps its pixel size in sync and the control
    /// panel re-checks the mobile breakpoint.
    pub fn on_window_resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.panel.on_window_resize(width);
    }

    pub fn toggle_panel(&mut self) {
        self.panel.toggle();
    }

    // --- observation ---

    pub fn subscribe_search(&mut self, callback: impl FnMut(&SearchEvent) + 'static) -> ListenerId {
        self.search.subscribe(callback)
    }

    pub fn subscribe_report(&mut self, callback: impl FnMut(&ReportEvent) + 'static) -> ListenerId {
        self.report.subscribe(callback)
    }

    pub fn subscribe_layers(&mut self, callback: impl FnMut(&LayerEvent) + 'static) -> ListenerId {
        self.layers.subscribe(callback)
    }

    pub fn subscribe_base_map(
        &mut self,
        callback: impl FnMut(&BaseMapEvent) + 'static,
    ) -> ListenerId {
        self.base_map.subscribe(callback)
    }

    pub fn subscribe_viewport(
        &mut self,
        callback: impl FnMut(&ViewportEvent) + 'static,
    ) -> ListenerId {
        self.viewport.subscribe(callback)
    }

    /// Release timers and listeners when the owning view goes away.
    pub fn teardown(&mut self) {
        self.query_input.cancel();
        self.in_flight = None;
        self.search.clear_listeners();
        self.report.clear_listeners();
        self.layers.clear_listeners();
        self.base_map.clear_listeners();
        self.viewport.clear_listeners();
        debug!("dashboard torn down");
    }

    pub fn render_state(&self) -> RenderState {
        let toggles = self
            .layer_client
            .toggle_options()
            .iter()
            .map(|&id| {
                let state = self.layers.get(id);
                LayerToggle {
                    id,
                    label: id.label(),
                    checked: state.visible,
                    enabled: state.has_data,
                }
            })
            .collect();

        let base_maps = self
            .base_map
            .options()
            .iter()
            .map(|o| BaseMapChoice {
                map_type: o.map_type.clone(),
                name: o.settings.name.clone(),
                checked: self.base_map.is_selected(&o.map_type),
            })
            .collect();

        RenderState {
            viewport: *self.viewport.current(),
            style_url: self.base_map.selected_url().to_string(),
            layers: self.active_layers().into_iter().map(ActiveLayer::from).collect(),
            toggles,
            base_maps,
            notification: self.report.notification(),
            panel_expanded: self.panel.is_expanded(),
            query: self.search.query().to_string(),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        let config = DashboardConfig::default();
        Self::new(
            SearchStore::new(),
            ReportStore::new(),
            LayerStore::new(),
            BaseMapStore::default(),
            ViewportStore::default(),
            ControlPanel::new(config.mobile_breakpoint_px, config.initial_viewport.width),
            config.debounce_ms,
        )
    }
}
