//! dockboard: an edge-docked, auto-hiding panel hosting a free-form canvas
//! of content items.
//!
//! The crate is headless. A host application supplies rendering, pointer and
//! keyboard events, cursor polling and a monitor list; dockboard owns the
//! state:
//!
//! - [`canvas::Canvas`]: items, hit testing, selection, move/resize,
//!   auto-placement, delete confirmation and layout (de)serialization
//! - [`panel::PanelController`]: show/hide/pin/edit state machine, dwell
//!   detection, monitor anchoring, width drag and save scheduling
//! - [`content::ContentRegistry`]: string-keyed factories for the
//!   [`content::ContentProvider`]s displayed inside items
//!
//! Time is always passed in, so every state transition is reproducible in
//! tests.

pub mod canvas;
pub mod constants;
pub mod content;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod item;
pub mod layout;
pub mod logging;
pub mod panel;
pub mod perf;
pub mod selection;
pub mod settings;
pub mod settings_watcher;
pub mod spatial_index;
pub mod store;

pub use canvas::{Canvas, DeleteRequest, Key, KeyOutcome, LoadReport, Modifiers, PointerOutcome};
pub use content::{ContentConfig, ContentProvider, ContentRegistry, ContentTypeInfo};
pub use error::{ContentError, Error, Result, StoreError};
pub use geometry::{Point, Rect, Size};
pub use item::{HitZone, Item, ItemId, ResizeHandle};
pub use layout::{Layout, LayoutNode};
pub use panel::{DockSide, PanelController, PanelEvent, PanelState};
pub use settings::PanelSettings;
pub use store::{JsonFileStore, LayoutStore, MemoryStore};
