//! Settings file watcher for hot reload.
//!
//! Watches the directory containing the settings file (so creating or
//! deleting the file is seen too) and reports events for that file only.
//! `poll` never blocks; the host calls it from its tick.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use tracing::debug;

pub use crate::settings::default_settings_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    Modified,
    Created,
    Deleted,
    Error(String),
}

pub struct SettingsWatcher {
    path: PathBuf,
    // Dropping the watcher stops notifications.
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

impl SettingsWatcher {
    pub fn new(path: PathBuf) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), "watching settings file");

        Ok(Self {
            path,
            _watcher: watcher,
            rx,
        })
    }

    /// Watch `<config_dir>/dockboard/settings.json`.
    pub fn for_default_path() -> Option<Self> {
        default_settings_path().and_then(|p| Self::new(p).ok())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next event for the settings file, if any is queued.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        loop {
            let event = match self.rx.try_recv() {
                Ok(Ok(event)) => event,
                Ok(Err(e)) => return Some(SettingsEvent::Error(e.to_string())),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    return Some(SettingsEvent::Error("watcher disconnected".to_string()));
                }
            };

            if !event.paths.iter().any(|p| self.is_settings_file(p)) {
                continue;
            }
            match event.kind {
                EventKind::Create(_) => return Some(SettingsEvent::Created),
                EventKind::Modify(_) => return Some(SettingsEvent::Modified),
                EventKind::Remove(_) => return Some(SettingsEvent::Deleted),
                _ => continue,
            }
        }
    }

    fn is_settings_file(&self, candidate: &Path) -> bool {
        candidate == self.path || candidate.file_name() == self.path.file_name()
    }
}
