//! Edge-docked, auto-hiding panel hosting the canvas.
//!
//! - `state`: visibility states and dock side
//! - `monitor`: monitor enumeration and edge anchoring
//! - `animation`: eased slide of the panel x
//! - `ticker`: interval gate for polling and rescans
//! - `controller`: the state machine tying them together

mod animation;
mod controller;
mod monitor;
mod state;
mod ticker;

pub use animation::{SlideAnimation, ease_out_cubic};
pub use controller::{PanelController, PanelEvent};
pub use monitor::{MonitorSource, PanelGeometry, StaticMonitors, anchor_monitor};
pub use state::{DockSide, PanelState};
pub use ticker::Ticker;
