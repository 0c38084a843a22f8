//! A single placed content block.
//!
//! An [`Item`] stores its origin and its *content-area* size. The header
//! strip shown in edit mode is chrome on top of that: it adds
//! [`HEADER_HEIGHT`] to the outer bounds without touching the content size,
//! so toggling edit mode on and off is lossless.
//!
//! ```text
//!  position ─► ┌──────────────────────────┐ ┐
//!              │ header (edit mode)   [x] │ │ HEADER_HEIGHT
//!              ├──────────────────────────┤ ┘
//!              │                          │
//!              │       content area       │ content_size.height
//!              │                          │
//!              └──────────────────────────┘
//! ```

use crate::constants::{
    CLOSE_BUTTON_MARGIN, CLOSE_BUTTON_SIZE, EDGE_BAND_WIDTH, HANDLE_SIZE, HEADER_HEIGHT,
    MIN_ITEM_SIZE,
};
use crate::content::ContentProvider;
use crate::geometry::{Point, Rect, Size};
use crate::layout::LayoutNode;
use std::fmt;
use uuid::Uuid;

pub type ItemId = Uuid;

/// One of the eight resize directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ResizeHandle {
    /// Hit-test priority order.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Left,
        ResizeHandle::Right,
        ResizeHandle::BottomLeft,
        ResizeHandle::Bottom,
        ResizeHandle::BottomRight,
    ];

    pub fn moves_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn moves_right_edge(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    pub fn moves_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Centre of this handle on `bounds`.
    pub fn anchor(self, bounds: &Rect) -> Point {
        let cx = bounds.x + bounds.width / 2.0;
        let cy = bounds.y + bounds.height / 2.0;
        let x = if self.moves_left_edge() {
            bounds.x
        } else if self.moves_right_edge() {
            bounds.right()
        } else {
            cx
        };
        let y = if self.moves_top_edge() {
            bounds.y
        } else if self.moves_bottom_edge() {
            bounds.bottom()
        } else {
            cy
        };
        Point::new(x, y)
    }

    pub fn cursor(self) -> CursorHint {
        match self {
            Self::Left | Self::Right => CursorHint::ResizeHorizontal,
            Self::Top | Self::Bottom => CursorHint::ResizeVertical,
            Self::TopLeft | Self::BottomRight => CursorHint::ResizeDiagonal,
            Self::TopRight | Self::BottomLeft => CursorHint::ResizeAntiDiagonal,
        }
    }
}

/// Result of [`Item::hit_test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    None,
    HeaderDragZone,
    CloseButton,
    ResizeHandle(ResizeHandle),
    ContentBody,
}

impl HitZone {
    pub fn is_hit(self) -> bool {
        !matches!(self, HitZone::None)
    }

    pub fn cursor(self) -> CursorHint {
        match self {
            HitZone::ResizeHandle(handle) => handle.cursor(),
            HitZone::HeaderDragZone => CursorHint::Move,
            _ => CursorHint::Arrow,
        }
    }
}

/// Cursor shape a host should show while hovering a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Arrow,
    Move,
    ResizeHorizontal,
    ResizeVertical,
    /// Top-left to bottom-right
    ResizeDiagonal,
    /// Top-right to bottom-left
    ResizeAntiDiagonal,
}

pub fn cursor_for(zone: HitZone) -> CursorHint {
    zone.cursor()
}

/// Resize `start` from `handle` by the pointer `delta`.
///
/// Width and height are clamped to `min` first. Handles on the left/top
/// edge then place the origin at `far edge - size`, so the opposite edge
/// keeps its exact coordinate, including at the clamp.
pub fn resize_rect(start: Rect, handle: ResizeHandle, delta: Point, min: Size) -> Rect {
    let mut rect = start;

    if handle.moves_left_edge() {
        rect.width = (start.width - delta.x).max(min.width);
        rect.x = start.right() - rect.width;
    } else if handle.moves_right_edge() {
        rect.width = (start.width + delta.x).max(min.width);
    }

    if handle.moves_top_edge() {
        rect.height = (start.height - delta.y).max(min.height);
        rect.y = start.bottom() - rect.height;
    } else if handle.moves_bottom_edge() {
        rect.height = (start.height + delta.y).max(min.height);
    }

    rect
}

/// A placed content block.
pub struct Item {
    id: ItemId,
    content_type: String,
    position: Point,
    content_size: Size,
    editable: bool,
    selected: bool,
    content: Box<dyn ContentProvider>,
}

impl Item {
    pub fn new(
        id: ItemId,
        content_type: impl Into<String>,
        position: Point,
        content_size: Size,
        content: Box<dyn ContentProvider>,
    ) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            position,
            content_size,
            editable: false,
            selected: false,
            content,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Size of the content area, excluding the edit-mode header.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn header_height(&self) -> f64 {
        if self.editable { HEADER_HEIGHT } else { 0.0 }
    }

    /// Outer size including the header when editable.
    pub fn size(&self) -> Size {
        Size::new(
            self.content_size.width,
            self.content_size.height + self.header_height(),
        )
    }

    /// Outer bounds in scene coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y + self.header_height(),
            self.content_size.width,
            self.content_size.height,
        )
    }

    pub fn header_rect(&self) -> Option<Rect> {
        self.editable.then(|| {
            Rect::new(
                self.position.x,
                self.position.y,
                self.content_size.width,
                HEADER_HEIGHT,
            )
        })
    }

    pub fn close_button_rect(&self) -> Option<Rect> {
        self.editable.then(|| {
            let right = self.position.x + self.content_size.width;
            Rect::new(
                right - CLOSE_BUTTON_MARGIN - CLOSE_BUTTON_SIZE,
                self.position.y + (HEADER_HEIGHT - CLOSE_BUTTON_SIZE) / 2.0,
                CLOSE_BUTTON_SIZE,
                CLOSE_BUTTON_SIZE,
            )
        })
    }

    /// The eight handle squares, in hit-test priority order.
    pub fn resize_handles(&self) -> [(ResizeHandle, Rect); 8] {
        let bounds = self.bounds();
        ResizeHandle::ALL
            .map(|handle| (handle, Rect::centered_square(handle.anchor(&bounds), HANDLE_SIZE)))
    }

    /// Smallest outer size a resize may produce.
    pub fn min_size(&self) -> Size {
        Size::new(MIN_ITEM_SIZE, MIN_ITEM_SIZE + self.header_height())
    }

    /// Replace position and size from new outer bounds.
    pub fn apply_bounds(&mut self, bounds: Rect) {
        self.position = bounds.origin();
        self.content_size = Size::new(bounds.width, bounds.height - self.header_height());
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Show or hide the header strip. Returns true if the flag changed.
    ///
    /// Leaving edit mode also drops the selection.
    pub fn set_editable(&mut self, editable: bool) -> bool {
        if self.editable == editable {
            return false;
        }
        self.editable = editable;
        if !editable {
            self.selected = false;
        }
        self.content.on_edit_mode_changed(editable);
        true
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Classify `point` (scene coordinates) against this item.
    pub fn hit_test(&self, point: Point) -> HitZone {
        let bounds = self.bounds();

        if self.editable {
            for (handle, rect) in self.resize_handles() {
                if rect.contains(point) {
                    return HitZone::ResizeHandle(handle);
                }
            }

            let within_x = point.x > bounds.x && point.x < bounds.right();
            let within_y = point.y > bounds.y && point.y < bounds.bottom();
            if (point.x - bounds.x).abs() < EDGE_BAND_WIDTH && within_y {
                return HitZone::ResizeHandle(ResizeHandle::Left);
            }
            if (point.x - bounds.right()).abs() < EDGE_BAND_WIDTH && within_y {
                return HitZone::ResizeHandle(ResizeHandle::Right);
            }
            if (point.y - bounds.y).abs() < EDGE_BAND_WIDTH && within_x {
                return HitZone::ResizeHandle(ResizeHandle::Top);
            }
            if (point.y - bounds.bottom()).abs() < EDGE_BAND_WIDTH && within_x {
                return HitZone::ResizeHandle(ResizeHandle::Bottom);
            }
        }

        if !bounds.contains(point) {
            return HitZone::None;
        }

        if let Some(close) = self.close_button_rect() {
            if close.contains(point) {
                return HitZone::CloseButton;
            }
        }
        if let Some(header) = self.header_rect() {
            if header.contains(point) {
                return HitZone::HeaderDragZone;
            }
        }
        HitZone::ContentBody
    }

    /// Convert a scene point to content-area coordinates.
    pub fn to_content_local(&self, point: Point) -> Point {
        point - self.content_rect().origin()
    }

    pub fn content(&self) -> &dyn ContentProvider {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn ContentProvider {
        self.content.as_mut()
    }

    /// Snapshot for persistence.
    pub fn to_node(&self) -> LayoutNode {
        LayoutNode {
            wid: self.id,
            content_type: self.content_type.clone(),
            x: self.position.x,
            y: self.position.y,
            width: self.content_size.width,
            height: self.content_size.height,
            config: self.content.get_config(),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("content_type", &self.content_type)
            .field("position", &self.position)
            .field("content_size", &self.content_size)
            .field("editable", &self.editable)
            .field("selected", &self.selected)
            .finish()
    }
}
