//! Pointer interaction state for the canvas.
//!
//! A single explicit state value replaces scattered drag/resize flags, so a
//! move and a resize can never be in flight together.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Moving       (press on a header drag zone)
//! Idle -> Resizing     (press on a resize handle or edge band)
//! Idle -> RubberBand   (press on empty canvas in edit mode)
//!
//! Any -> Idle          (pointer up or Escape)
//! ```

use crate::constants::MIN_MARQUEE_SIZE;
use crate::geometry::{Point, Rect};
use crate::item::{ItemId, ResizeHandle};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub enum Interaction {
    /// No pointer operation in progress
    #[default]
    Idle,

    /// Translating one item or a whole selection in lock-step
    Moving {
        /// Item under the pointer when the move began
        primary: ItemId,
        /// Every moving item with its outer bounds at press time
        origins: Vec<(ItemId, Rect)>,
        /// Pointer position at press time
        start: Point,
        /// Last applied (clamped) delta
        delta: Point,
        /// Selection to collapse to if the press ends without movement
        collapse_to: Option<ItemId>,
    },

    /// Resizing a single item from one handle
    Resizing {
        item_id: ItemId,
        handle: ResizeHandle,
        /// Outer bounds at press time
        start_rect: Rect,
        start_pos: Point,
    },

    /// Rubber-band selection
    RubberBand {
        start: Point,
        current: Point,
        /// Modifier held: add to `base` instead of replacing it
        additive: bool,
        /// Selection at press time
        base: HashSet<ItemId>,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    pub fn is_rubber_band(&self) -> bool {
        matches!(self, Self::RubberBand { .. })
    }

    /// Current band rectangle, if rubber-band selecting.
    pub fn band_rect(&self) -> Option<Rect> {
        match self {
            Self::RubberBand { start, current, .. } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// Reset to idle, returning the previous state.
    pub fn take(&mut self) -> Interaction {
        std::mem::take(self)
    }
}

/// Whether a band is large enough to select anything.
pub fn band_is_significant(band: &Rect) -> bool {
    band.width > MIN_MARQUEE_SIZE || band.height > MIN_MARQUEE_SIZE
}
