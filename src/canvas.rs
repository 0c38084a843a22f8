//! The free-form item canvas.
//!
//! Owns the z-ordered item list, the spatial index, the selection set and
//! the in-flight pointer [`Interaction`]. All positions handled here are in
//! scene coordinates unless a method says otherwise; the host passes pointer
//! positions in view coordinates (relative to the visible viewport) and the
//! canvas adds the vertical scroll offset.
//!
//! ## Performance Notes
//!
//! Pointer handling is a hot path. Hit testing goes through the R-tree
//! spatial index, then walks only the candidates in reverse z-order.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use crate::constants::{
    EDGE_BAND_WIDTH, FALLBACK_ITEM_SIZE, HEADER_HEIGHT, MIN_ITEM_SIZE, MIN_SCENE_HEIGHT,
    PLACEMENT_MAX_ATTEMPTS, PLACEMENT_STEP, SCENE_MARGIN,
};
use crate::content::{ContentConfig, ContentProvider, ContentRegistry};
use crate::error::{ContentError, LoadError};
use crate::geometry::{Point, Rect, Size};
use crate::interaction::{Interaction, band_is_significant};
use crate::item::{CursorHint, HitZone, Item, ItemId, resize_rect};
use crate::layout::{Layout, LayoutNode};
use crate::profile_scope;
use crate::selection::SelectionManager;
use crate::spatial_index::SpatialIndex;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Keyboard modifier state accompanying a pointer or key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
    };

    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
    };

    /// Either modifier toggles selection membership.
    pub fn is_multi_select(&self) -> bool {
        self.shift || self.control
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Character(char),
}

/// A pending, unconfirmed delete of one or more items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    ids: Vec<ItemId>,
}

impl DeleteRequest {
    fn new(ids: Vec<ItemId>) -> Self {
        Self { ids }
    }

    /// Ids in z-order.
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Confirmation text for the host's dialog.
    pub fn prompt(&self) -> String {
        match self.ids.len() {
            1 => "Delete 1 item?".to_string(),
            n => format!("Delete {} items?", n),
        }
    }
}

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing on the canvas reacted
    Ignored,
    /// Selection or an interaction changed; redraw
    Handled,
    /// A press on a content body, passed to the item's provider
    Forwarded { item_id: ItemId, local: Point },
    /// The close button was pressed; confirm with [`Canvas::resolve_delete`]
    DeleteRequested(DeleteRequest),
    /// A move or resize finished with changed geometry
    Committed,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    DeleteRequested(DeleteRequest),
}

/// A layout record that could not be restored.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// `None` when the record had no readable id
    pub wid: Option<Uuid>,
    pub content_type: String,
    pub reason: LoadError,
}

/// Result of [`Canvas::deserialize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct Canvas {
    items: Vec<Item>,
    index: SpatialIndex,
    selection: SelectionManager,
    interaction: Interaction,
    viewport: Size,
    scene: Size,
    scroll_y: f64,
    edit_mode: bool,
    dirty: bool,
    pending_delete: Option<DeleteRequest>,
}

impl Canvas {
    pub fn new(viewport: Size) -> Self {
        let mut canvas = Self {
            items: Vec::new(),
            index: SpatialIndex::new(),
            selection: SelectionManager::new(),
            interaction: Interaction::Idle,
            viewport,
            scene: viewport,
            scroll_y: 0.0,
            edit_mode: false,
            dirty: false,
            pending_delete: None,
        };
        canvas.update_scene_rect();
        canvas
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in z-order, bottom first.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn content_mut(&mut self, id: ItemId) -> Option<&mut dyn ContentProvider> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .map(|item| item.content_mut())
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Selected ids in z-order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .map(|item| item.id())
            .filter(|id| self.selection.contains(*id))
            .collect()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scene_size(&self) -> Size {
        self.scene
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn pending_delete(&self) -> Option<&DeleteRequest> {
        self.pending_delete.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Return and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// A provider changed its own config; schedule a save.
    pub fn notify_content_changed(&mut self, id: ItemId) -> bool {
        if self.item(id).is_some() {
            self.dirty = true;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Viewport and scene
    // ------------------------------------------------------------------

    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.update_scene_rect();
    }

    pub fn set_scroll(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, dy: f64) {
        self.set_scroll(self.scroll_y + dy);
    }

    fn max_scroll(&self) -> f64 {
        (self.scene.height - self.viewport.height).max(0.0)
    }

    pub fn view_to_scene(&self, point: Point) -> Point {
        Point::new(point.x, point.y + self.scroll_y)
    }

    pub fn scene_to_view(&self, point: Point) -> Point {
        Point::new(point.x, point.y - self.scroll_y)
    }

    /// Recompute the scene size from the viewport and the lowest item.
    ///
    /// A view scrolled to the top stays at the top; any other offset is
    /// clamped into the new range.
    fn update_scene_rect(&mut self) {
        let was_at_top = self.scroll_y <= 0.0;

        let lowest = self
            .items
            .iter()
            .map(|item| item.bounds().bottom())
            .fold(None, |acc: Option<f64>, b| Some(acc.map_or(b, |a| a.max(b))));
        let min_height = self.viewport.height.max(MIN_SCENE_HEIGHT);
        let height = match lowest {
            Some(bottom) => min_height.max(bottom + SCENE_MARGIN),
            None => min_height,
        };
        self.scene = Size::new(self.viewport.width, height);

        if was_at_top {
            self.scroll_y = 0.0;
        } else {
            self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
        }
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    /// Show or hide item chrome. Leaving edit mode drops the selection,
    /// any in-flight interaction and any unconfirmed delete.
    pub fn set_edit_mode(&mut self, editing: bool) {
        if self.edit_mode == editing {
            return;
        }
        if !editing {
            self.cancel_interaction();
            self.selection.clear();
            self.pending_delete = None;
        }
        self.edit_mode = editing;
        for item in &mut self.items {
            item.set_editable(editing);
        }
        self.sync_selection_flags();
        self.rebuild_index();
        self.update_scene_rect();
        debug!(editing, items = self.items.len(), "canvas edit mode changed");
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Topmost item and zone under a scene point.
    pub fn hit_test(&self, point: Point) -> Option<(ItemId, HitZone)> {
        profile_scope!("canvas_hit_test");

        let tolerance = if self.edit_mode { EDGE_BAND_WIDTH } else { 0.0 };
        let candidates: HashSet<ItemId> =
            self.index.query_point(point, tolerance).into_iter().collect();
        if candidates.is_empty() {
            return None;
        }

        self.items
            .iter()
            .rev()
            .filter(|item| candidates.contains(&item.id()))
            .find_map(|item| {
                let zone = item.hit_test(point);
                zone.is_hit().then(|| (item.id(), zone))
            })
    }

    /// Topmost item under a scene point.
    pub fn item_at(&self, point: Point) -> Option<ItemId> {
        self.hit_test(point).map(|(id, _)| id)
    }

    /// Cursor to show while hovering a view point.
    pub fn cursor_at(&self, view_point: Point) -> CursorHint {
        match self.hit_test(self.view_to_scene(view_point)) {
            Some((_, zone)) => zone.cursor(),
            None => CursorHint::Arrow,
        }
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, view_point: Point, modifiers: Modifiers) -> PointerOutcome {
        profile_scope!("canvas_pointer_down");

        if !self.interaction.is_idle() {
            return PointerOutcome::Ignored;
        }

        let point = self.view_to_scene(view_point);
        let multi = modifiers.is_multi_select();

        let Some((id, zone)) = self.hit_test(point) else {
            if !self.edit_mode {
                return PointerOutcome::Ignored;
            }
            if !multi {
                self.selection.clear();
                self.sync_selection_flags();
            }
            self.interaction = Interaction::RubberBand {
                start: point,
                current: point,
                additive: multi,
                base: self.selection.snapshot(),
            };
            return PointerOutcome::Handled;
        };

        match zone {
            HitZone::CloseButton => {
                let request = DeleteRequest::new(vec![id]);
                self.pending_delete = Some(request.clone());
                PointerOutcome::DeleteRequested(request)
            }
            HitZone::ResizeHandle(handle) => {
                if !self.selection.contains(id) {
                    self.selection.select_only(id);
                    self.sync_selection_flags();
                }
                let Some(start_rect) = self.item(id).map(|item| item.bounds()) else {
                    return PointerOutcome::Ignored;
                };
                self.interaction = Interaction::Resizing {
                    item_id: id,
                    handle,
                    start_rect,
                    start_pos: point,
                };
                PointerOutcome::Handled
            }
            HitZone::HeaderDragZone => {
                let mut collapse_to = None;
                if multi {
                    if !self.selection.toggle(id) {
                        self.sync_selection_flags();
                        return PointerOutcome::Handled;
                    }
                } else if self.selection.is_multi_member(id) {
                    collapse_to = Some(id);
                } else {
                    self.selection.select_only(id);
                }
                self.sync_selection_flags();
                self.begin_move(id, point, collapse_to);
                PointerOutcome::Handled
            }
            HitZone::ContentBody => {
                if self.edit_mode {
                    if multi {
                        self.selection.toggle(id);
                    } else {
                        self.selection.select_only(id);
                    }
                    self.sync_selection_flags();
                }
                let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
                    return PointerOutcome::Ignored;
                };
                let local = item.to_content_local(point);
                item.content_mut().on_click(local);
                PointerOutcome::Forwarded { item_id: id, local }
            }
            HitZone::None => PointerOutcome::Ignored,
        }
    }

    fn begin_move(&mut self, primary: ItemId, start: Point, collapse_to: Option<ItemId>) {
        let origins: Vec<(ItemId, Rect)> = self
            .items
            .iter()
            .filter(|item| self.selection.contains(item.id()))
            .map(|item| (item.id(), item.bounds()))
            .collect();
        debug!(?primary, count = origins.len(), "move started");
        self.interaction = Interaction::Moving {
            primary,
            origins,
            start,
            delta: Point::ZERO,
            collapse_to,
        };
    }

    pub fn pointer_move(&mut self, view_point: Point) -> PointerOutcome {
        profile_scope!("canvas_pointer_move");

        let point = self.view_to_scene(view_point);
        let mut state = self.interaction.take();

        let outcome = match &mut state {
            Interaction::Idle => PointerOutcome::Ignored,
            Interaction::Moving {
                origins,
                start,
                delta,
                collapse_to,
                ..
            } => {
                let raw = point - *start;
                let clamped = self.clamp_group_delta(origins, raw);
                if raw != Point::ZERO {
                    *collapse_to = None;
                }
                if clamped != *delta {
                    *delta = clamped;
                    for (id, origin) in origins.iter() {
                        self.set_item_position(*id, origin.origin() + clamped);
                    }
                    self.dirty = true;
                }
                PointerOutcome::Handled
            }
            Interaction::Resizing {
                item_id,
                handle,
                start_rect,
                start_pos,
            } => {
                let mut d = point - *start_pos;
                if handle.moves_left_edge() {
                    d.x = d.x.max(-start_rect.x);
                } else if handle.moves_right_edge() {
                    d.x = d.x.min(self.scene.width - start_rect.right());
                }
                if handle.moves_top_edge() {
                    d.y = d.y.max(-start_rect.y);
                }

                let id = *item_id;
                if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
                    let rect = resize_rect(*start_rect, *handle, d, item.min_size());
                    if rect != item.bounds() {
                        item.apply_bounds(rect);
                        self.index.update(id, rect);
                        self.dirty = true;
                    }
                }
                PointerOutcome::Handled
            }
            Interaction::RubberBand {
                start,
                current,
                additive,
                base,
            } => {
                *current = point;
                let band = Rect::from_corners(*start, *current);
                self.apply_band(&band, *additive, base);
                PointerOutcome::Handled
            }
        };

        self.interaction = state;
        outcome
    }

    pub fn pointer_up(&mut self, view_point: Point) -> PointerOutcome {
        profile_scope!("canvas_pointer_up");

        let outcome = match self.pointer_move(view_point) {
            PointerOutcome::Ignored => return PointerOutcome::Ignored,
            _ => PointerOutcome::Handled,
        };

        match self.interaction.take() {
            Interaction::Moving {
                delta, collapse_to, ..
            } => {
                if delta != Point::ZERO {
                    self.update_scene_rect();
                    return PointerOutcome::Committed;
                }
                if let Some(id) = collapse_to {
                    self.selection.select_only(id);
                    self.sync_selection_flags();
                }
                outcome
            }
            Interaction::Resizing {
                item_id, start_rect, ..
            } => {
                let changed = self
                    .item(item_id)
                    .is_some_and(|item| item.bounds() != start_rect);
                if changed {
                    self.update_scene_rect();
                    PointerOutcome::Committed
                } else {
                    outcome
                }
            }
            Interaction::RubberBand { .. } => outcome,
            Interaction::Idle => PointerOutcome::Ignored,
        }
    }

    /// Abort the in-flight interaction, restoring any moved or resized
    /// geometry.
    pub fn cancel_interaction(&mut self) -> bool {
        match self.interaction.take() {
            Interaction::Idle => return false,
            Interaction::Moving { origins, delta, .. } => {
                if delta != Point::ZERO {
                    for (id, origin) in origins {
                        self.set_item_position(id, origin.origin());
                    }
                }
            }
            Interaction::Resizing {
                item_id, start_rect, ..
            } => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id() == item_id) {
                    if item.bounds() != start_rect {
                        item.apply_bounds(start_rect);
                        self.index.update(item_id, start_rect);
                    }
                }
            }
            Interaction::RubberBand { .. } => {}
        }
        self.update_scene_rect();
        true
    }

    /// Largest translation not exceeding `raw` that keeps every rect inside
    /// the left, top and right scene bounds.
    fn clamp_group_delta(&self, rects: &[(ItemId, Rect)], raw: Point) -> Point {
        if rects.is_empty() {
            return raw;
        }
        let min_x = rects.iter().map(|(_, r)| r.x).fold(f64::INFINITY, f64::min);
        let min_y = rects.iter().map(|(_, r)| r.y).fold(f64::INFINITY, f64::min);
        let max_right = rects
            .iter()
            .map(|(_, r)| r.right())
            .fold(f64::NEG_INFINITY, f64::max);

        let dx = raw.x.min(self.scene.width - max_right).max(-min_x);
        let dy = raw.y.max(-min_y);
        Point::new(dx, dy)
    }

    fn apply_band(&mut self, band: &Rect, additive: bool, base: &HashSet<ItemId>) {
        let hits = if band_is_significant(band) {
            self.index.query_rect(band)
        } else {
            Vec::new()
        };
        if additive {
            self.selection.replace(base.iter().copied());
            self.selection.extend(hits);
        } else {
            self.selection.replace(hits);
        }
        self.sync_selection_flags();
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    pub fn key_press(&mut self, key: Key, modifiers: Modifiers) -> KeyOutcome {
        match key {
            Key::Delete | Key::Backspace => {
                if !self.edit_mode || self.selection.is_empty() || !self.interaction.is_idle() {
                    return KeyOutcome::Ignored;
                }
                let request = DeleteRequest::new(self.selected_ids());
                self.pending_delete = Some(request.clone());
                KeyOutcome::DeleteRequested(request)
            }
            Key::Escape => {
                let cancelled = self.cancel_interaction();
                let had_selection = !self.selection.is_empty();
                self.selection.clear();
                self.sync_selection_flags();
                if cancelled || had_selection {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Character(c) if modifiers.control && c.eq_ignore_ascii_case(&'a') => {
                if self.select_all() {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Character(_) => KeyOutcome::Ignored,
        }
    }

    /// Select every item. Edit mode only.
    pub fn select_all(&mut self) -> bool {
        if !self.edit_mode || self.items.is_empty() {
            return false;
        }
        self.selection
            .replace(self.items.iter().map(|item| item.id()));
        self.sync_selection_flags();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.sync_selection_flags();
    }

    fn sync_selection_flags(&mut self) {
        for item in &mut self.items {
            item.set_selected(self.selection.contains(item.id()));
        }
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Answer the pending delete confirmation. Returns the number of items
    /// removed; declining removes nothing.
    pub fn resolve_delete(&mut self, confirmed: bool) -> usize {
        let Some(request) = self.pending_delete.take() else {
            return 0;
        };
        if !confirmed {
            debug!(count = request.count(), "delete declined");
            return 0;
        }
        self.remove_items(request.ids())
    }

    fn remove_items(&mut self, ids: &[ItemId]) -> usize {
        let doomed: HashSet<ItemId> = ids.iter().copied().collect();
        let before = self.items.len();
        self.items.retain(|item| !doomed.contains(&item.id()));
        let removed = before - self.items.len();

        for id in &doomed {
            self.index.remove(*id);
            self.selection.remove(*id);
        }
        if removed > 0 {
            self.dirty = true;
            self.update_scene_rect();
            info!(removed, remaining = self.items.len(), "items deleted");
        }
        removed
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.interaction = Interaction::Idle;
        self.pending_delete = None;
        self.selection.clear();
        if !self.items.is_empty() {
            self.items.clear();
            self.dirty = true;
        }
        self.index.clear();
        self.update_scene_rect();
    }

    // ------------------------------------------------------------------
    // Adding items
    // ------------------------------------------------------------------

    /// Create a fresh item of `type_id` at an auto-placed position.
    pub fn add_content(
        &mut self,
        registry: &ContentRegistry,
        type_id: &str,
    ) -> Result<ItemId, ContentError> {
        self.add_content_inner(registry, type_id, None)
    }

    /// Create a fresh item of `type_id` at an explicit scene position.
    pub fn add_content_at(
        &mut self,
        registry: &ContentRegistry,
        type_id: &str,
        position: Point,
    ) -> Result<ItemId, ContentError> {
        self.add_content_inner(registry, type_id, Some(position))
    }

    fn add_content_inner(
        &mut self,
        registry: &ContentRegistry,
        type_id: &str,
        position: Option<Point>,
    ) -> Result<ItemId, ContentError> {
        profile_scope!("canvas_add_content");

        let mut provider = registry.instantiate(type_id)?;
        provider.set_config(&ContentConfig::new())?;
        let content_size = sanitize_size(provider.default_size());

        let header = if self.edit_mode { HEADER_HEIGHT } else { 0.0 };
        let outer = Size::new(content_size.width, content_size.height + header);
        let position = match position {
            Some(p) => Point::new(p.x.max(0.0), p.y.max(0.0)),
            None => self.place_new(outer),
        };

        let id = Uuid::new_v4();
        let mut item = Item::new(id, type_id, position, content_size, provider);
        item.set_editable(self.edit_mode);
        self.insert_item(item);
        self.dirty = true;
        debug!(%id, content_type = type_id, x = position.x, y = position.y, "item added");
        Ok(id)
    }

    fn insert_item(&mut self, item: Item) {
        self.index.insert(item.id(), item.bounds());
        self.items.push(item);
        self.update_scene_rect();
    }

    /// Pick a position for a new item of outer size `size`.
    ///
    /// Starts centred in the visible viewport and steps diagonally until the
    /// candidate overlaps nothing. When every attempt collides, the last
    /// candidate is used.
    pub fn place_new(&self, size: Size) -> Point {
        profile_scope!("canvas_place_new");

        let max_x = (self.scene.width - size.width).max(0.0);
        let center = Point::new(
            self.viewport.width / 2.0,
            self.scroll_y + self.viewport.height / 2.0,
        );
        let base = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);

        let mut candidate = Point::ZERO;
        for attempt in 0..PLACEMENT_MAX_ATTEMPTS {
            let offset = attempt as f64 * PLACEMENT_STEP;
            candidate = Point::new(
                (base.x + offset).clamp(0.0, max_x),
                (base.y + offset).max(0.0),
            );
            let rect = Rect::from_origin_size(candidate, size);
            if self.index.query_rect(&rect).is_empty() {
                return candidate;
            }
        }
        debug!(x = candidate.x, y = candidate.y, "placement attempts exhausted");
        candidate
    }

    fn set_item_position(&mut self, id: ItemId, position: Point) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            item.set_position(position);
            self.index.update(id, item.bounds());
        }
    }

    fn rebuild_index(&mut self) {
        self.index
            .rebuild(self.items.iter().map(|item| (item.id(), item.bounds())));
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Snapshot every item in z-order.
    pub fn serialize(&self) -> Layout {
        Layout::new(self.items.iter().map(Item::to_node).collect())
    }

    /// Replace the canvas contents with `layout`.
    ///
    /// Records with an unknown content type, a rejected config, an id
    /// already used earlier in the layout, or that failed to decode are
    /// skipped and reported. The canvas is clean afterwards.
    pub fn deserialize(&mut self, layout: &Layout, registry: &ContentRegistry) -> LoadReport {
        profile_scope!("canvas_deserialize");

        self.clear();
        let mut report = LoadReport::default();
        let mut seen = HashSet::new();

        for node in &layout.nodes {
            match self.restore_node(node, registry, &mut seen) {
                Ok(item) => {
                    self.items.push(item);
                    report.loaded += 1;
                }
                Err(reason) => {
                    warn!(wid = %node.wid, content_type = %node.content_type, "skipping layout record: {}", reason);
                    report.skipped.push(SkippedRecord {
                        wid: Some(node.wid),
                        content_type: node.content_type.clone(),
                        reason,
                    });
                }
            }
        }

        for bad in &layout.malformed {
            warn!(wid = ?bad.wid, content_type = %bad.content_type, "skipping malformed layout record: {}", bad.reason);
            report.skipped.push(SkippedRecord {
                wid: bad.wid,
                content_type: bad.content_type.clone(),
                reason: LoadError::Malformed(bad.reason.clone()),
            });
        }

        self.rebuild_index();
        self.update_scene_rect();
        self.dirty = false;
        info!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "layout restored"
        );
        report
    }

    fn restore_node(
        &self,
        node: &LayoutNode,
        registry: &ContentRegistry,
        seen: &mut HashSet<ItemId>,
    ) -> Result<Item, LoadError> {
        if !seen.insert(node.wid) {
            return Err(LoadError::DuplicateId(node.wid));
        }
        let mut provider = registry.instantiate(&node.content_type)?;
        provider.set_config(&node.config)?;

        let mut item = Item::new(
            node.wid,
            node.content_type.clone(),
            node.position(),
            node.size(),
            provider,
        );
        item.set_editable(self.edit_mode);
        Ok(item)
    }
}

/// Replace unusable default sizes and enforce the floor.
fn sanitize_size(size: Size) -> Size {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    let size = if valid(size.width) && valid(size.height) {
        size
    } else {
        Size::new(FALLBACK_ITEM_SIZE.0, FALLBACK_ITEM_SIZE.1)
    };
    Size::new(size.width.max(MIN_ITEM_SIZE), size.height.max(MIN_ITEM_SIZE))
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("interaction", &self.interaction)
            .field("viewport", &self.viewport)
            .field("scene", &self.scene)
            .field("scroll_y", &self.scroll_y)
            .field("edit_mode", &self.edit_mode)
            .field("dirty", &self.dirty)
            .finish()
    }
}
