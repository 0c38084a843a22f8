//! Content providers and the content-type registry.
//!
//! The canvas never knows what an item displays. Each item owns a boxed
//! [`ContentProvider`] that the surrounding application supplies through a
//! [`ContentRegistry`], populated by explicit registration at startup:
//!
//! ```ignore
//! let registry = ContentRegistry::new()
//!     .with_type(ContentTypeInfo::new("note", "Note", "Basics"), || Box::new(NoteCard::default()))
//!     .with_type(ContentTypeInfo::new("clock", "Clock", "Time"), || Box::new(ClockCard::default()));
//! ```
//!
//! Persisted layouts refer to providers only by their string id, so an id
//! that is no longer registered makes a record unloadable but never breaks
//! the rest of the layout.

use crate::error::ContentError;
use crate::geometry::{Point, Size};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Opaque, provider-defined configuration map persisted with each item.
pub type ContentConfig = serde_json::Map<String, serde_json::Value>;

/// Static metadata describing a content type, used to populate the
/// "add content" menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeInfo {
    /// Stable registry id written into persisted layouts
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Menu category the type is listed under
    pub category: String,
    /// Icon identifier understood by the host (e.g. an icon-font name)
    pub icon: Option<String>,
    /// Tooltip text
    pub description: String,
}

impl ContentTypeInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            icon: None,
            description: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The contract every content block exposes to the canvas.
pub trait ContentProvider {
    /// Size of the content area when the item is first created.
    fn default_size(&self) -> Size;

    /// Current configuration. Called on every save.
    fn get_config(&self) -> ContentConfig;

    /// Apply a configuration map. Must be idempotent; called with an empty
    /// map on fresh creation and with the saved map on restore.
    fn set_config(&mut self, config: &ContentConfig) -> Result<(), ContentError>;

    /// Notified whenever the panel enters or leaves edit mode.
    fn on_edit_mode_changed(&mut self, _editing: bool) {}

    /// A press on the content body, in content-area coordinates.
    fn on_click(&mut self, _local: Point) {}
}

type ContentFactory = Box<dyn Fn() -> Box<dyn ContentProvider>>;

struct RegistryEntry {
    info: ContentTypeInfo,
    factory: ContentFactory,
}

/// One category of the "add content" menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCategory {
    pub category: String,
    pub types: Vec<ContentTypeInfo>,
}

/// String-keyed mapping from content-type id to provider factory.
#[derive(Default)]
pub struct ContentRegistry {
    entries: Vec<RegistryEntry>,
    by_id: HashMap<String, usize>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a content type. Ids must be unique.
    pub fn register<F>(&mut self, info: ContentTypeInfo, factory: F) -> Result<(), ContentError>
    where
        F: Fn() -> Box<dyn ContentProvider> + 'static,
    {
        if self.by_id.contains_key(&info.id) {
            return Err(ContentError::DuplicateType(info.id));
        }
        debug!(id = %info.id, category = %info.category, "registered content type");
        self.by_id.insert(info.id.clone(), self.entries.len());
        self.entries.push(RegistryEntry {
            info,
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Builder-style registration. A duplicate id is logged and ignored,
    /// keeping the first registration.
    pub fn with_type<F>(mut self, info: ContentTypeInfo, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ContentProvider> + 'static,
    {
        if let Err(e) = self.register(info, factory) {
            warn!("{}", e);
        }
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn info(&self, id: &str) -> Option<&ContentTypeInfo> {
        self.by_id.get(id).map(|&i| &self.entries[i].info)
    }

    /// All registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &ContentTypeInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Create a fresh provider for `id`.
    pub fn instantiate(&self, id: &str) -> Result<Box<dyn ContentProvider>, ContentError> {
        let index = self
            .by_id
            .get(id)
            .ok_or_else(|| ContentError::UnknownType(id.to_string()))?;
        Ok((self.entries[*index].factory)())
    }

    /// Registered types grouped by category, categories in order of first
    /// appearance.
    pub fn menu(&self) -> Vec<MenuCategory> {
        let mut menu: Vec<MenuCategory> = Vec::new();
        for entry in &self.entries {
            match menu.iter_mut().find(|c| c.category == entry.info.category) {
                Some(category) => category.types.push(entry.info.clone()),
                None => menu.push(MenuCategory {
                    category: entry.info.category.clone(),
                    types: vec![entry.info.clone()],
                }),
            }
        }
        menu
    }
}

impl fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.info.id))
            .finish()
    }
}
