//! Crate-wide constants.
//!
//! Centralizes magic numbers and layout values to make the codebase
//! more maintainable and self-documenting.

// ============================================================================
// Item Geometry
// ============================================================================

/// Minimum content-area size (both axes) an item can be resized to
pub const MIN_ITEM_SIZE: f64 = 50.0;

/// Height of the header strip shown on items in edit mode
pub const HEADER_HEIGHT: f64 = 28.0;

/// Side length of the close button inside the header
pub const CLOSE_BUTTON_SIZE: f64 = 16.0;

/// Gap between the close button and the header's top/right edges
pub const CLOSE_BUTTON_MARGIN: f64 = 6.0;

/// Side length of the square resize handles on corners and edge midpoints
pub const HANDLE_SIZE: f64 = 8.0;

/// Width of the border band along each edge that acts as a pure edge drag
pub const EDGE_BAND_WIDTH: f64 = 6.0;

/// Default content size used when a provider reports a degenerate size
pub const FALLBACK_ITEM_SIZE: (f64, f64) = (200.0, 100.0);

// ============================================================================
// Canvas
// ============================================================================

/// Extra space kept below the lowest item when the scene grows
pub const SCENE_MARGIN: f64 = 50.0;

/// Minimum scene height regardless of viewport size
pub const MIN_SCENE_HEIGHT: f64 = 600.0;

/// Diagonal step applied between auto-placement attempts
pub const PLACEMENT_STEP: f64 = 30.0;

/// Maximum number of auto-placement candidates tried before accepting overlap
pub const PLACEMENT_MAX_ATTEMPTS: usize = 50;

/// Minimum size for marquee selection to trigger (prevents accidental selection)
pub const MIN_MARQUEE_SIZE: f64 = 5.0;

// ============================================================================
// Panel
// ============================================================================

/// Minimum panel width
pub const MIN_PANEL_WIDTH: f64 = 300.0;

/// Maximum panel width
pub const MAX_PANEL_WIDTH: f64 = 1000.0;

/// Default panel width
pub const DEFAULT_PANEL_WIDTH: f64 = 600.0;

/// Width of the inner border band that acts as the width-drag handle
pub const RESIZE_BORDER_WIDTH: f64 = 10.0;

/// Height of the toolbar strip (menu, edit and pin buttons) above the canvas
pub const PANEL_TOOLBAR_HEIGHT: f64 = 40.0;

/// Width of the activation zone at the anchored screen edge
pub const ACTIVATION_ZONE: f64 = 5.0;

/// Cursor movement inside the activation zone that restarts the dwell timer
pub const DWELL_JITTER: f64 = 5.0;

// ============================================================================
// Timing
// ============================================================================

/// Time the cursor must rest in the activation zone before the panel shows
pub const DWELL_DELAY_MS: u64 = 500;

/// Cursor polling period for edge activation and leave-to-hide
pub const POLL_INTERVAL_MS: u64 = 300;

/// Monitor topology rescan period
pub const RESCAN_INTERVAL_MS: u64 = 2000;

/// Slide-in / slide-out animation duration
pub const ANIMATION_MS: u64 = 250;

/// Delay between the first tick that sees the layout dirty and the save
pub const SAVE_DEBOUNCE_MS: u64 = 500;
