//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `StubContent` - a content provider that records edit-mode and click calls
//! - `TestCanvasBuilder` - Builder pattern for creating canvases with items
//! - `FakeMonitors` - a monitor source tests can re-plug or break mid-run
//! - Panel fixtures and timing helpers

#![allow(dead_code)]

use dockboard::canvas::Canvas;
use dockboard::content::{ContentConfig, ContentProvider, ContentRegistry, ContentTypeInfo};
use dockboard::error::{ContentError, MonitorError};
use dockboard::geometry::{Point, Rect, Size};
use dockboard::item::{Item, ItemId};
use dockboard::panel::{MonitorSource, PanelController, PanelState};
use dockboard::settings::PanelSettings;
use dockboard::store::MemoryStore;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ============================================================================
// StubContent - recording content provider
// ============================================================================

/// Shared log of provider callbacks, e.g. `"edit:true"` or `"click:50,70"`.
pub type EventLog = Rc<RefCell<Vec<String>>>;

/// Content provider with a fixed default size that keeps whatever config it
/// is given. A config containing `"reject": true` is refused.
pub struct StubContent {
    size: Size,
    config: ContentConfig,
    log: EventLog,
}

impl StubContent {
    pub fn new(size: Size, log: EventLog) -> Self {
        Self {
            size,
            config: ContentConfig::new(),
            log,
        }
    }
}

impl ContentProvider for StubContent {
    fn default_size(&self) -> Size {
        self.size
    }

    fn get_config(&self) -> ContentConfig {
        self.config.clone()
    }

    fn set_config(&mut self, config: &ContentConfig) -> Result<(), ContentError> {
        if config.get("reject") == Some(&Value::Bool(true)) {
            return Err(ContentError::rejected("stub", "reject flag set"));
        }
        self.config = config.clone();
        Ok(())
    }

    fn on_edit_mode_changed(&mut self, editing: bool) {
        self.log.borrow_mut().push(format!("edit:{}", editing));
    }

    fn on_click(&mut self, local: Point) {
        self.log
            .borrow_mut()
            .push(format!("click:{},{}", local.x, local.y));
    }
}

/// Registry with four stub types:
///
/// | id    | default size | category |
/// |-------|--------------|----------|
/// | note  | 300x200      | Basics   |
/// | clock | 240x120      | Time     |
/// | tiny  | 10x10        | Basics   |
/// | wall  | 2000x4000    | Basics   |
pub fn registry_with_log() -> (ContentRegistry, EventLog) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let types = [
        ("note", "Note", "Basics", Size::new(300.0, 200.0)),
        ("clock", "Clock", "Time", Size::new(240.0, 120.0)),
        ("tiny", "Tiny", "Basics", Size::new(10.0, 10.0)),
        ("wall", "Wall", "Basics", Size::new(2000.0, 4000.0)),
    ];

    let mut registry = ContentRegistry::new();
    for (id, name, category, size) in types {
        let log = log.clone();
        registry
            .register(ContentTypeInfo::new(id, name, category), move || {
                Box::new(StubContent::new(size, log.clone()))
            })
            .unwrap();
    }
    (registry, log)
}

pub fn registry() -> ContentRegistry {
    registry_with_log().0
}

/// Build a config map from `key = value` pairs.
pub fn config(pairs: &[(&str, Value)]) -> ContentConfig {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ============================================================================
// TestCanvasBuilder - Builder pattern for creating test canvases
// ============================================================================

/// Builder for canvases with items at explicit positions.
///
/// Items are added outside edit mode (so `position` is the item origin and
/// the size is the type's default content size), then edit mode is applied.
///
/// # Example
/// ```ignore
/// let fixture = TestCanvasBuilder::new()
///     .with_item("note", (100.0, 100.0))
///     .with_item("note", (500.0, 100.0))
///     .editing()
///     .build();
/// ```
pub struct TestCanvasBuilder {
    viewport: Size,
    items: Vec<(&'static str, Point)>,
    edit_mode: bool,
}

/// A canvas together with the registry and log its items were created from.
pub struct CanvasFixture {
    pub canvas: Canvas,
    pub registry: ContentRegistry,
    pub log: EventLog,
    /// Ids in insertion (z) order.
    pub ids: Vec<ItemId>,
}

impl Default for TestCanvasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCanvasBuilder {
    /// A 1200x800 viewport with no items.
    pub fn new() -> Self {
        Self {
            viewport: Size::new(1200.0, 800.0),
            items: Vec::new(),
            edit_mode: false,
        }
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    pub fn with_item(mut self, content_type: &'static str, position: (f64, f64)) -> Self {
        self.items
            .push((content_type, Point::new(position.0, position.1)));
        self
    }

    pub fn editing(mut self) -> Self {
        self.edit_mode = true;
        self
    }

    pub fn build(self) -> CanvasFixture {
        let (registry, log) = registry_with_log();
        let mut canvas = Canvas::new(self.viewport);
        let ids = self
            .items
            .iter()
            .map(|(content_type, position)| {
                canvas
                    .add_content_at(&registry, content_type, *position)
                    .unwrap()
            })
            .collect();
        canvas.set_edit_mode(self.edit_mode);
        canvas.mark_clean();
        log.borrow_mut().clear();
        CanvasFixture {
            canvas,
            registry,
            log,
            ids,
        }
    }
}

/// An empty 1200x800 canvas.
pub fn empty_canvas() -> Canvas {
    Canvas::new(Size::new(1200.0, 800.0))
}

/// A point inside the item's header drag zone (edit mode only).
pub fn header_point(item: &Item) -> Point {
    item.position() + Point::new(20.0, 14.0)
}

pub fn position_of(canvas: &Canvas, id: ItemId) -> Point {
    canvas.item(id).unwrap().position()
}

/// Assert that an item sits at the expected position.
pub fn assert_position(canvas: &Canvas, id: ItemId, x: f64, y: f64) {
    assert_eq!(
        position_of(canvas, id),
        Point::new(x, y),
        "unexpected position for {}",
        id
    );
}

// ============================================================================
// FakeMonitors - re-pluggable monitor source
// ============================================================================

/// Monitor source backed by shared state, so a test can hot-plug or break
/// monitors after the controller took ownership of its copy.
#[derive(Clone)]
pub struct FakeMonitors(Rc<RefCell<Result<Vec<Rect>, MonitorError>>>);

impl FakeMonitors {
    pub fn new(monitors: Vec<Rect>) -> Self {
        Self(Rc::new(RefCell::new(Ok(monitors))))
    }

    pub fn set(&self, monitors: Vec<Rect>) {
        *self.0.borrow_mut() = Ok(monitors);
    }

    pub fn fail(&self, reason: &str) {
        *self.0.borrow_mut() = Err(MonitorError(reason.to_string()));
    }
}

impl MonitorSource for FakeMonitors {
    fn monitors(&self) -> Result<Vec<Rect>, MonitorError> {
        self.0.borrow().clone()
    }
}

// ============================================================================
// Panel fixtures
// ============================================================================

/// 1920x1080 at the desktop origin.
pub const PRIMARY: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

/// 2560x1440 to the right of [`PRIMARY`].
pub const SECONDARY: Rect = Rect::new(1920.0, 0.0, 2560.0, 1440.0);

pub type TestPanel = PanelController<FakeMonitors, MemoryStore>;

pub fn panel_with(settings: PanelSettings, store: MemoryStore) -> (TestPanel, FakeMonitors) {
    let monitors = FakeMonitors::new(vec![PRIMARY]);
    let panel = PanelController::new(settings, monitors.clone(), store, registry());
    (panel, monitors)
}

/// Right-docked, default settings, empty store.
pub fn panel() -> (TestPanel, FakeMonitors) {
    panel_with(PanelSettings::default(), MemoryStore::new())
}

/// Settings with an instant slide.
pub fn instant_settings() -> PanelSettings {
    PanelSettings {
        animation_ms: 0,
        ..PanelSettings::default()
    }
}

/// A right-docked panel that is already `Shown` and in edit mode.
pub fn editing_panel(t0: Instant) -> TestPanel {
    let (mut panel, _) = panel_with(instant_settings(), MemoryStore::new());
    assert!(panel.show(t0));
    assert_eq!(panel.state(), PanelState::Shown);
    panel.set_edit_mode(true);
    panel
}

pub fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

/// Resting on the right edge of [`PRIMARY`].
pub fn edge_cursor() -> Point {
    Point::new(1919.0, 540.0)
}

/// Well away from the right-docked panel.
pub fn away_cursor() -> Point {
    Point::new(400.0, 540.0)
}

/// Dwell at the edge until the panel has slid in with default settings.
///
/// Polls fire at 0, 300 and 600 ms; the dwell completes at 600 and the
/// 250 ms slide finishes at 850. Returns the time of the last tick.
pub fn dwell_until_shown(panel: &mut TestPanel, t0: Instant) -> Instant {
    for ms in [0, 300, 600, 850] {
        panel.tick(at(t0, ms), edge_cursor());
    }
    assert_eq!(panel.state(), PanelState::Shown);
    at(t0, 850)
}
