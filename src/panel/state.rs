//! Panel visibility state.
//!
//! ## State Transitions
//!
//! ```text
//! Hidden  -> Showing   (dwell at the anchored edge, or show())
//! Showing -> Shown     (slide-in finished)
//! Shown   -> Hiding    (cursor left the panel while unpinned, or hide())
//! Hiding  -> Hidden    (slide-out finished)
//! Hiding  -> Showing   (show() reverses from the current x)
//! Showing -> Hiding    (hide() reverses from the current x)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

impl PanelState {
    /// Any part of the panel may be on screen.
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Showing | Self::Hiding)
    }

    /// Heading towards (or at) the shown position.
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Showing | Self::Shown)
    }
}

/// Screen edge the panel docks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
    Left,
    #[default]
    Right,
}
