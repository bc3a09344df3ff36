/// Widths at or below this are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Expansion state of the layer/base-map control panel.
///
/// Collapsed on narrow windows, expanded otherwise. The breakpoint is
/// applied to the window width at mount and again on every resize,
/// overriding a manual toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    expanded: bool,
    breakpoint_px: f64,
}

impl ControlPanel {
    pub fn new(breakpoint_px: f64, window_width: f64) -> Self {
        Self {
            expanded: window_width > breakpoint_px,
            breakpoint_px,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn on_window_resize(&mut self, window_width: f64) {
        self.expanded = window_width > self.breakpoint_px;
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}
