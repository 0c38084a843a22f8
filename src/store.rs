//! Layout persistence.
//!
//! Two values are persisted: the canvas [`Layout`] and the panel width.
//! [`JsonFileStore`] keeps them in `layout.json` and `panel.json` under the
//! config directory and replaces each file atomically.

use crate::error::StoreError;
use crate::layout::Layout;
use crate::settings::default_config_dir;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const LAYOUT_FILE: &str = "layout.json";
pub const PANEL_FILE: &str = "panel.json";

/// Load/save hook for persisted panel state.
pub trait LayoutStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load_layout(&self) -> Result<Option<Layout>, StoreError>;
    fn save_layout(&mut self, layout: &Layout) -> Result<(), StoreError>;
    fn load_width(&self) -> Result<Option<f64>, StoreError>;
    fn save_width(&mut self, width: f64) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PanelRecord {
    width: f64,
}

/// JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in `<config_dir>/dockboard`.
    pub fn in_config_dir() -> Result<Self, StoreError> {
        default_config_dir()
            .map(Self::new)
            .ok_or(StoreError::NoConfigDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn layout_path(&self) -> PathBuf {
        self.dir.join(LAYOUT_FILE)
    }

    pub fn panel_path(&self) -> PathBuf {
        self.dir.join(PANEL_FILE)
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write `value` to a temp file in the same directory, then rename it
    /// over `path`.
    fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, value)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(path)?;
        debug!(path = %path.display(), "wrote");
        Ok(())
    }
}

impl LayoutStore for JsonFileStore {
    fn load_layout(&self) -> Result<Option<Layout>, StoreError> {
        Self::read(&self.layout_path())
    }

    fn save_layout(&mut self, layout: &Layout) -> Result<(), StoreError> {
        self.write(&self.layout_path(), layout)
    }

    fn load_width(&self) -> Result<Option<f64>, StoreError> {
        Ok(Self::read::<PanelRecord>(&self.panel_path())?.map(|r| r.width))
    }

    fn save_width(&mut self, width: f64) -> Result<(), StoreError> {
        self.write(&self.panel_path(), &PanelRecord { width })
    }
}

/// In-memory store for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    layout: Option<Layout>,
    width: Option<f64>,
    layout_saves: usize,
    width_saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn layout_saves(&self) -> usize {
        self.layout_saves
    }

    pub fn width_saves(&self) -> usize {
        self.width_saves
    }

    /// Make every following save fail with an IO error.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io(std::io::Error::other("store is read-only")));
        }
        Ok(())
    }
}

impl LayoutStore for MemoryStore {
    fn load_layout(&self) -> Result<Option<Layout>, StoreError> {
        Ok(self.layout.clone())
    }

    fn save_layout(&mut self, layout: &Layout) -> Result<(), StoreError> {
        self.check_writable()?;
        self.layout = Some(layout.clone());
        self.layout_saves += 1;
        Ok(())
    }

    fn load_width(&self) -> Result<Option<f64>, StoreError> {
        Ok(self.width)
    }

    fn save_width(&mut self, width: f64) -> Result<(), StoreError> {
        self.check_writable()?;
        self.width = Some(width);
        self.width_saves += 1;
        Ok(())
    }
}
