//! The edge-docked panel controller.
//!
//! Owns the visibility state machine, the pinned and edit-mode flags,
//! dwell detection, monitor anchoring, width dragging and save scheduling.
//! It hosts exactly one [`Canvas`] and one [`LayoutStore`].
//!
//! The host drives it from a timer or frame callback:
//!
//! ```ignore
//! let events = panel.tick(Instant::now(), os_cursor_position());
//! ```
//!
//! `tick` never reads a clock itself. Cursor polling and monitor rescans are
//! gated by internal [`Ticker`]s, so the host may call it as often as it
//! likes.

use super::animation::SlideAnimation;
use super::monitor::{MonitorSource, PanelGeometry, anchor_monitor};
use super::state::{DockSide, PanelState};
use super::ticker::Ticker;
use crate::canvas::{Canvas, DeleteRequest, Key, KeyOutcome, LoadReport, Modifiers, PointerOutcome};
use crate::constants::PANEL_TOOLBAR_HEIGHT;
use crate::content::{ContentRegistry, MenuCategory};
use crate::error::{ContentError, StoreError};
use crate::geometry::{Point, Rect, Size};
use crate::item::ItemId;
use crate::profile_scope;
use crate::settings::{PanelSettings, clamp_width};
use crate::store::LayoutStore;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Something the host may want to react to after a [`PanelController::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    StateChanged(PanelState),
    /// The panel moved to a new anchor monitor
    Reanchored(Rect),
    Saved,
    SaveFailed,
}

#[derive(Debug, Clone, Copy)]
struct Dwell {
    since: Instant,
    anchor: Point,
}

#[derive(Debug, Clone, Copy)]
struct WidthDrag {
    start_cursor_x: f64,
    start_width: f64,
}

pub struct PanelController<M, S> {
    settings: PanelSettings,
    monitors: M,
    store: S,
    registry: ContentRegistry,
    canvas: Canvas,

    geometry: Option<PanelGeometry>,
    state: PanelState,
    x: f64,
    width: f64,
    animation: Option<SlideAnimation>,

    pinned: bool,
    pinned_before_edit: bool,
    edit_mode: bool,

    dwell: Option<Dwell>,
    width_drag: Option<WidthDrag>,
    poll: Ticker,
    rescan: Ticker,
    dirty_since: Option<Instant>,
    /// Events raised outside `tick`, handed out by the next `tick`
    queued: Vec<PanelEvent>,
}

impl<M: MonitorSource, S: LayoutStore> PanelController<M, S> {
    pub fn new(settings: PanelSettings, monitors: M, store: S, registry: ContentRegistry) -> Self {
        let settings = settings.clamped();
        let width = settings.width;
        let mut controller = Self {
            poll: Ticker::new(settings.poll_interval()),
            rescan: Ticker::new(settings.rescan_interval()),
            settings,
            monitors,
            store,
            registry,
            canvas: Canvas::new(Size::new(width, 0.0)),
            geometry: None,
            state: PanelState::Hidden,
            x: 0.0,
            width,
            animation: None,
            pinned: false,
            pinned_before_edit: false,
            edit_mode: false,
            dwell: None,
            width_drag: None,
            dirty_since: None,
            queued: Vec::new(),
        };
        controller.rescan_monitors();
        controller
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_width_dragging(&self) -> bool {
        self.width_drag.is_some()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Current panel x in screen coordinates.
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn geometry(&self) -> Option<PanelGeometry> {
        self.geometry
    }

    /// The panel's current screen rectangle.
    pub fn panel_rect(&self) -> Option<Rect> {
        self.geometry.map(|g| g.panel_rect(self.x, self.width))
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ------------------------------------------------------------------
    // Startup and settings
    // ------------------------------------------------------------------

    /// Restore the saved width and layout.
    pub fn load(&mut self) -> Result<LoadReport, StoreError> {
        if let Some(width) = self.store.load_width()? {
            self.width = clamp_width(width);
            self.settle();
            self.sync_viewport();
        }

        let report = match self.store.load_layout()? {
            Some(layout) => self.canvas.deserialize(&layout, &self.registry),
            None => {
                info!("no saved layout; starting empty");
                LoadReport::default()
            }
        };
        self.dirty_since = None;
        Ok(report)
    }

    /// Apply hot-reloaded settings. A changed dock side re-anchors at once.
    ///
    /// The saved width wins over `settings.width`, which only seeds a fresh
    /// install.
    pub fn apply_settings(&mut self, settings: PanelSettings) {
        let settings = settings.clamped();
        let side_changed = settings.side != self.settings.side;
        self.poll.set_interval(settings.poll_interval());
        self.rescan.set_interval(settings.rescan_interval());
        self.settings = settings;
        if side_changed {
            self.rescan_monitors();
        }
        info!(side = ?self.settings.side, "panel settings applied");
    }

    /// Re-read the settings file at `path` and apply it. Hosts call this
    /// when their [`SettingsWatcher`](crate::settings_watcher::SettingsWatcher)
    /// reports a change.
    pub fn reload_settings(&mut self, path: &Path) -> crate::Result<()> {
        let settings = PanelSettings::load(path)?;
        self.apply_settings(settings);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance animations, poll the cursor, rescan monitors and save a
    /// dirty layout once `save_debounce` has passed since the first tick
    /// that saw it dirty.
    ///
    /// A failed immediate save (after a commit, a delete or leaving edit
    /// mode) is reported here as [`PanelEvent::SaveFailed`].
    pub fn tick(&mut self, now: Instant, cursor: Point) -> Vec<PanelEvent> {
        profile_scope!("panel_tick");

        let mut events = std::mem::take(&mut self.queued);

        if self.rescan.fire(now) {
            if let Some(monitor) = self.rescan_monitors() {
                events.push(PanelEvent::Reanchored(monitor));
            }
        }

        if let Some(state) = self.advance_animation(now) {
            events.push(PanelEvent::StateChanged(state));
        }

        if self.poll.fire(now) {
            let before = self.state;
            self.poll_cursor(now, cursor);
            if self.state != before {
                events.push(PanelEvent::StateChanged(self.state));
            }
        }

        if self.canvas.is_dirty() {
            let since = *self.dirty_since.get_or_insert(now);
            let quiet = now.saturating_duration_since(since) >= self.settings.save_debounce();
            if quiet && self.canvas.interaction().is_idle() && self.width_drag.is_none() {
                match self.flush_save() {
                    Ok(()) => events.push(PanelEvent::Saved),
                    Err(_) => {
                        self.dirty_since = Some(now);
                        events.push(PanelEvent::SaveFailed);
                    }
                }
            }
        } else {
            self.dirty_since = None;
        }

        events
    }

    fn advance_animation(&mut self, now: Instant) -> Option<PanelState> {
        let animation = self.animation?;
        self.x = animation.sample(now);
        if !animation.is_finished(now) {
            return None;
        }
        self.animation = None;
        self.state = match self.state {
            PanelState::Showing => PanelState::Shown,
            PanelState::Hiding => PanelState::Hidden,
            settled => settled,
        };
        debug!(state = ?self.state, x = self.x, "slide finished");
        Some(self.state)
    }

    fn poll_cursor(&mut self, now: Instant, cursor: Point) {
        let Some(geometry) = self.geometry else {
            return;
        };

        match self.state {
            PanelState::Hidden => {
                if self.dwell_elapsed(now, cursor, &geometry) {
                    self.show(now);
                }
            }
            PanelState::Shown => {
                self.dwell = None;
                if self.pinned || self.width_drag.is_some() {
                    return;
                }
                let rect = geometry.panel_rect(self.x, self.width);
                if !rect.contains(cursor) {
                    self.hide(now);
                }
            }
            PanelState::Showing | PanelState::Hiding => self.dwell = None,
        }
    }

    /// Track how long the cursor has rested in the activation zone.
    fn dwell_elapsed(&mut self, now: Instant, cursor: Point, geometry: &PanelGeometry) -> bool {
        if !geometry.in_activation_zone(cursor, self.settings.activation_zone) {
            self.dwell = None;
            return false;
        }

        match self.dwell {
            None => {
                self.dwell = Some(Dwell {
                    since: now,
                    anchor: cursor,
                });
                false
            }
            Some(dwell) if dwell.anchor.chebyshev_distance(cursor) > self.settings.dwell_jitter => {
                self.dwell = Some(Dwell {
                    since: now,
                    anchor: cursor,
                });
                false
            }
            Some(dwell) => now.saturating_duration_since(dwell.since) >= self.settings.dwell_delay(),
        }
    }

    // ------------------------------------------------------------------
    // Show / hide
    // ------------------------------------------------------------------

    /// Slide the panel in. From `Hiding` the slide reverses from the
    /// current x. Ignored while already showing or shown.
    pub fn show(&mut self, now: Instant) -> bool {
        if self.geometry.is_none() || self.state.is_opening() {
            return false;
        }
        self.dwell = None;
        self.start_slide(now, PanelState::Showing);
        info!(state = ?self.state, "panel show");
        true
    }

    /// Slide the panel out. No effect while pinned, hidden or hiding.
    pub fn hide(&mut self, now: Instant) -> bool {
        if self.pinned {
            debug!("hide ignored while pinned");
            return false;
        }
        if self.geometry.is_none() || !self.state.is_opening() {
            return false;
        }
        self.start_slide(now, PanelState::Hiding);
        info!(state = ?self.state, "panel hide");
        true
    }

    fn start_slide(&mut self, now: Instant, direction: PanelState) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let target = match direction {
            PanelState::Showing => geometry.shown_x(self.width),
            _ => geometry.hidden_x(self.width),
        };
        let duration = self.settings.animation();
        if duration.is_zero() {
            self.animation = None;
            self.x = target;
            self.state = match direction {
                PanelState::Showing => PanelState::Shown,
                _ => PanelState::Hidden,
            };
            return;
        }
        self.state = direction;
        self.animation = Some(SlideAnimation::new(self.x, target, now, duration));
    }

    /// Drop any animation and put the panel at its resting x for the
    /// current geometry and width.
    fn settle(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };
        self.animation = None;
        self.dwell = None;
        self.width_drag = None;
        self.state = match self.state {
            PanelState::Showing | PanelState::Shown => PanelState::Shown,
            PanelState::Hiding | PanelState::Hidden => PanelState::Hidden,
        };
        self.x = match self.state {
            PanelState::Shown => geometry.shown_x(self.width),
            _ => geometry.hidden_x(self.width),
        };
    }

    // ------------------------------------------------------------------
    // Pinned / edit mode
    // ------------------------------------------------------------------

    /// While editing, only the value restored on leaving edit mode changes.
    pub fn set_pinned(&mut self, pinned: bool) {
        if self.edit_mode {
            self.pinned_before_edit = pinned;
            return;
        }
        if self.pinned == pinned {
            return;
        }
        self.pinned = pinned;
        if !pinned {
            self.width_drag = None;
        }
        info!(pinned, "panel pin changed");
    }

    /// Entering edit mode pins the panel and shows item chrome; leaving it
    /// restores the previous pin, saves the width and flushes the layout.
    pub fn set_edit_mode(&mut self, editing: bool) {
        if self.edit_mode == editing {
            return;
        }
        if editing {
            self.pinned_before_edit = self.pinned;
            self.pinned = true;
        } else {
            self.width_drag = None;
            self.pinned = self.pinned_before_edit;
            self.persist_width();
        }
        self.edit_mode = editing;
        self.canvas.set_edit_mode(editing);
        if !editing && self.canvas.is_dirty() {
            self.flush_save_queued();
        }
        info!(editing, pinned = self.pinned, "edit mode changed");
    }

    // ------------------------------------------------------------------
    // Width drag
    // ------------------------------------------------------------------

    /// Start a width drag if `cursor` is on the inner resize band of a
    /// shown panel that is pinned and in edit mode.
    pub fn begin_width_drag(&mut self, cursor: Point) -> bool {
        if !(self.pinned && self.edit_mode) || self.state != PanelState::Shown {
            return false;
        }
        if self.width_drag.is_some() || !self.canvas.interaction().is_idle() {
            return false;
        }
        let Some(geometry) = self.geometry else {
            return false;
        };
        if !geometry.resize_band(self.x, self.width).contains(cursor) {
            return false;
        }
        self.width_drag = Some(WidthDrag {
            start_cursor_x: cursor.x,
            start_width: self.width,
        });
        debug!(width = self.width, "width drag started");
        true
    }

    /// Follow the cursor, keeping the outer edge fixed.
    pub fn drag_width(&mut self, cursor: Point) -> bool {
        let (Some(drag), Some(geometry)) = (self.width_drag, self.geometry) else {
            return false;
        };
        let dx = cursor.x - drag.start_cursor_x;
        let width = clamp_width(match geometry.side {
            DockSide::Right => drag.start_width - dx,
            DockSide::Left => drag.start_width + dx,
        });
        if width == self.width {
            return false;
        }
        self.width = width;
        self.x = geometry.shown_x(width);
        self.sync_viewport();
        true
    }

    /// Finish a width drag and persist the width.
    pub fn end_width_drag(&mut self) -> bool {
        if self.width_drag.take().is_none() {
            return false;
        }
        self.persist_width();
        true
    }

    fn persist_width(&mut self) {
        match self.store.save_width(self.width) {
            Ok(()) => debug!(width = self.width, "panel width saved"),
            Err(e) => error!("failed to save panel width: {}", e),
        }
    }

    fn sync_viewport(&mut self) {
        let height = self
            .geometry
            .map(|g| (g.monitor.height - PANEL_TOOLBAR_HEIGHT).max(0.0))
            .unwrap_or(0.0);
        self.canvas.set_viewport(Size::new(self.width, height));
    }

    // ------------------------------------------------------------------
    // Monitors
    // ------------------------------------------------------------------

    /// Re-read the monitor list. Returns the new anchor monitor when it
    /// changed. Failures keep the last geometry.
    fn rescan_monitors(&mut self) -> Option<Rect> {
        let monitors = match self.monitors.monitors() {
            Ok(monitors) => monitors,
            Err(e) => {
                warn!("{}; keeping last panel geometry", e);
                return None;
            }
        };
        let Some(anchor) = anchor_monitor(&monitors, self.settings.side) else {
            warn!("no monitors reported; keeping last panel geometry");
            return None;
        };

        let geometry = PanelGeometry::new(anchor, self.settings.side);
        if self.geometry == Some(geometry) {
            return None;
        }
        info!(
            x = anchor.x,
            y = anchor.y,
            width = anchor.width,
            height = anchor.height,
            side = ?self.settings.side,
            "panel anchored to monitor"
        );
        self.geometry = Some(geometry);
        self.settle();
        self.sync_viewport();
        Some(anchor)
    }

    // ------------------------------------------------------------------
    // Canvas routing
    // ------------------------------------------------------------------

    /// Screen point to panel-local canvas view point (below the toolbar).
    fn screen_to_view(&self, point: Point) -> Option<Point> {
        let geometry = self.geometry?;
        Some(Point::new(
            point.x - self.x,
            point.y - geometry.monitor.y - PANEL_TOOLBAR_HEIGHT,
        ))
    }

    /// Screen point to canvas scene coordinates.
    pub fn screen_to_canvas(&self, point: Point) -> Option<Point> {
        self.screen_to_view(point)
            .map(|view| self.canvas.view_to_scene(view))
    }

    /// Canvas scene coordinates to screen coordinates.
    pub fn canvas_to_screen(&self, scene: Point) -> Option<Point> {
        let geometry = self.geometry?;
        let view = self.canvas.scene_to_view(scene);
        Some(Point::new(
            view.x + self.x,
            view.y + geometry.monitor.y + PANEL_TOOLBAR_HEIGHT,
        ))
    }

    pub fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) -> PointerOutcome {
        if !self.state.is_visible() {
            return PointerOutcome::Ignored;
        }
        if self.begin_width_drag(screen) {
            return PointerOutcome::Handled;
        }
        let Some(view) = self.screen_to_view(screen) else {
            return PointerOutcome::Ignored;
        };
        let viewport = self.canvas.viewport();
        if view.x < 0.0 || view.y < 0.0 || view.x > viewport.width || view.y > viewport.height {
            return PointerOutcome::Ignored;
        }
        self.canvas.pointer_down(view, modifiers)
    }

    pub fn pointer_move(&mut self, screen: Point) -> PointerOutcome {
        if self.width_drag.is_some() {
            return if self.drag_width(screen) {
                PointerOutcome::Handled
            } else {
                PointerOutcome::Ignored
            };
        }
        match self.screen_to_view(screen) {
            Some(view) => self.canvas.pointer_move(view),
            None => PointerOutcome::Ignored,
        }
    }

    /// Finish the pointer gesture. A committed move or resize is saved
    /// immediately.
    pub fn pointer_up(&mut self, screen: Point) -> PointerOutcome {
        if self.end_width_drag() {
            return PointerOutcome::Handled;
        }
        let Some(view) = self.screen_to_view(screen) else {
            return PointerOutcome::Ignored;
        };
        let outcome = self.canvas.pointer_up(view);
        if outcome == PointerOutcome::Committed {
            self.flush_save_queued();
        }
        outcome
    }

    pub fn key_press(&mut self, key: Key, modifiers: Modifiers) -> KeyOutcome {
        self.canvas.key_press(key, modifiers)
    }

    pub fn pending_delete(&self) -> Option<&DeleteRequest> {
        self.canvas.pending_delete()
    }

    /// Answer a delete confirmation. Confirmed deletes are saved
    /// immediately.
    pub fn resolve_delete(&mut self, confirmed: bool) -> usize {
        let removed = self.canvas.resolve_delete(confirmed);
        if removed > 0 {
            self.flush_save_queued();
        }
        removed
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Registered content types grouped by category.
    pub fn content_menu(&self) -> Vec<MenuCategory> {
        self.registry.menu()
    }

    pub fn add_content(&mut self, type_id: &str) -> Result<ItemId, ContentError> {
        self.canvas.add_content(&self.registry, type_id)
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Save on behalf of a user action; a failure surfaces from the next
    /// `tick`.
    fn flush_save_queued(&mut self) {
        if self.flush_save().is_err() {
            self.queued.push(PanelEvent::SaveFailed);
        }
    }

    /// Write the layout now. On failure the canvas stays dirty and the
    /// debounced save retries.
    pub fn flush_save(&mut self) -> Result<(), StoreError> {
        profile_scope!("panel_flush_save");

        let layout = self.canvas.serialize();
        match self.store.save_layout(&layout) {
            Ok(()) => {
                self.canvas.mark_clean();
                self.dirty_since = None;
                debug!(items = layout.len(), "layout saved");
                Ok(())
            }
            Err(e) => {
                self.canvas.mark_dirty();
                error!("failed to save layout: {}", e);
                Err(e)
            }
        }
    }
}
