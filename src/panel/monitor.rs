//! Monitor enumeration and edge anchoring.
//!
//! Monitor rectangles are in virtual-desktop coordinates. The panel anchors
//! to the outer edge of the left-most or right-most monitor, so on a
//! multi-monitor desktop it never docks to an edge shared between two
//! screens.

use super::state::DockSide;
use crate::constants::RESIZE_BORDER_WIDTH;
use crate::error::MonitorError;
use crate::geometry::{Point, Rect};

/// Platform hook listing the connected monitors.
pub trait MonitorSource {
    fn monitors(&self) -> Result<Vec<Rect>, MonitorError>;
}

/// Fixed monitor list, for hosts without hot-plug support.
#[derive(Debug, Clone, Default)]
pub struct StaticMonitors(pub Vec<Rect>);

impl MonitorSource for StaticMonitors {
    fn monitors(&self) -> Result<Vec<Rect>, MonitorError> {
        Ok(self.0.clone())
    }
}

/// The monitor whose outer edge the panel docks to.
pub fn anchor_monitor(monitors: &[Rect], side: DockSide) -> Option<Rect> {
    match side {
        DockSide::Left => monitors
            .iter()
            .copied()
            .min_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))),
        DockSide::Right => monitors
            .iter()
            .copied()
            .max_by(|a, b| a.right().total_cmp(&b.right()).then(b.y.total_cmp(&a.y))),
    }
}

/// Where the panel lives on its anchor monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    pub monitor: Rect,
    pub side: DockSide,
}

impl PanelGeometry {
    pub fn new(monitor: Rect, side: DockSide) -> Self {
        Self { monitor, side }
    }

    /// Panel x when fully shown.
    pub fn shown_x(&self, width: f64) -> f64 {
        match self.side {
            DockSide::Left => self.monitor.x,
            DockSide::Right => self.monitor.right() - width,
        }
    }

    /// Panel x when fully hidden, just past the outer edge.
    pub fn hidden_x(&self, width: f64) -> f64 {
        match self.side {
            DockSide::Left => self.monitor.x - width,
            DockSide::Right => self.monitor.right(),
        }
    }

    pub fn panel_rect(&self, x: f64, width: f64) -> Rect {
        Rect::new(x, self.monitor.y, width, self.monitor.height)
    }

    /// Is `cursor` within `zone` px of the anchored edge of the monitor?
    pub fn in_activation_zone(&self, cursor: Point, zone: f64) -> bool {
        let m = &self.monitor;
        if cursor.y < m.y || cursor.y > m.bottom() || cursor.x < m.x || cursor.x > m.right() {
            return false;
        }
        match self.side {
            DockSide::Left => cursor.x - m.x <= zone,
            DockSide::Right => m.right() - cursor.x <= zone,
        }
    }

    /// The width-drag handle: a band along the inner edge of the panel.
    pub fn resize_band(&self, x: f64, width: f64) -> Rect {
        let band = RESIZE_BORDER_WIDTH.min(width);
        match self.side {
            DockSide::Left => Rect::new(x + width - band, self.monitor.y, band, self.monitor.height),
            DockSide::Right => Rect::new(x, self.monitor.y, band, self.monitor.height),
        }
    }
}
