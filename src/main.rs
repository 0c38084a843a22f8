//! dockboard-replay: drive a scripted panel session without a UI.
//!
//! Loads saved state, dwells at the screen edge until the panel slides in,
//! enters edit mode, adds and rearranges a few items, deletes two of them
//! and lets the panel hide again. Useful for eyeballing logs and the
//! persisted files.

use anyhow::{Context, Result};
use clap::Parser;
use dockboard::canvas::{Key, KeyOutcome, Modifiers};
use dockboard::content::{ContentConfig, ContentProvider, ContentRegistry, ContentTypeInfo};
use dockboard::error::ContentError;
use dockboard::geometry::{Point, Rect, Size};
use dockboard::panel::{DockSide, PanelController, StaticMonitors};
use dockboard::perf::PerfRecorder;
use dockboard::settings::PanelSettings;
use dockboard::store::{JsonFileStore, LayoutStore, MemoryStore};
use dockboard::logging;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Replay a scripted dockboard session
#[derive(Parser)]
#[command(name = "dockboard-replay")]
#[command(about = "Drive a scripted dockboard session headlessly")]
struct Cli {
    /// Directory holding layout.json and panel.json (default: in memory)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Settings file to load
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Screen edge to dock to
    #[arg(long, default_value = "right", value_parser = ["left", "right"])]
    side: String,

    /// Print the final layout as JSON
    #[arg(long)]
    print_layout: bool,
}

#[derive(Default)]
struct NoteCard {
    text: String,
}

impl ContentProvider for NoteCard {
    fn default_size(&self) -> Size {
        Size::new(300.0, 200.0)
    }

    fn get_config(&self) -> ContentConfig {
        let mut config = ContentConfig::new();
        config.insert("text".into(), Value::String(self.text.clone()));
        config
    }

    fn set_config(&mut self, config: &ContentConfig) -> Result<(), ContentError> {
        self.text = match config.get("text") {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(_) => return Err(ContentError::rejected("note", "text must be a string")),
        };
        Ok(())
    }
}

#[derive(Default)]
struct ClockCard {
    timezone: String,
}

impl ContentProvider for ClockCard {
    fn default_size(&self) -> Size {
        Size::new(240.0, 120.0)
    }

    fn get_config(&self) -> ContentConfig {
        let mut config = ContentConfig::new();
        config.insert("timezone".into(), Value::String(self.timezone.clone()));
        config
    }

    fn set_config(&mut self, config: &ContentConfig) -> Result<(), ContentError> {
        self.timezone = config
            .get("timezone")
            .and_then(Value::as_str)
            .unwrap_or("UTC")
            .to_string();
        Ok(())
    }
}

fn registry() -> ContentRegistry {
    ContentRegistry::new()
        .with_type(
            ContentTypeInfo::new("note", "Note", "Basics")
                .with_icon("note")
                .with_description("Free-form text"),
            || Box::new(NoteCard::default()),
        )
        .with_type(
            ContentTypeInfo::new("clock", "Clock", "Time").with_icon("clock"),
            || Box::new(ClockCard::default()),
        )
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => PanelSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => PanelSettings::default(),
    };
    settings.side = match cli.side.as_str() {
        "left" => DockSide::Left,
        _ => DockSide::Right,
    };

    let monitors = StaticMonitors(vec![
        Rect::new(0.0, 0.0, 1920.0, 1080.0),
        Rect::new(1920.0, 0.0, 2560.0, 1440.0),
    ]);

    match cli.store {
        Some(dir) => {
            let store = JsonFileStore::new(dir);
            replay(PanelController::new(settings, monitors, store, registry()), cli.print_layout)
        }
        None => {
            let store = MemoryStore::new();
            replay(PanelController::new(settings, monitors, store, registry()), cli.print_layout)
        }
    }
}

fn replay<S: LayoutStore>(
    mut panel: PanelController<StaticMonitors, S>,
    print_layout: bool,
) -> Result<()> {
    let mut perf = PerfRecorder::new();
    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);

    let report = panel.load().context("loading saved panel state")?;
    info!(loaded = report.loaded, skipped = report.skipped.len(), "state loaded");

    let geometry = panel.geometry().context("no monitor to anchor to")?;
    let monitor = geometry.monitor;
    let edge = match geometry.side {
        DockSide::Right => Point::new(monitor.right() - 1.0, monitor.center().y),
        DockSide::Left => Point::new(monitor.x + 1.0, monitor.center().y),
    };

    let mut ms = 0;
    while ms <= 1200 {
        perf.time("tick", || panel.tick(at(ms), edge));
        ms += 50;
    }
    println!("after dwell: {:?}", panel.state());

    panel.set_edit_mode(true);
    for type_id in ["note", "clock", "note"] {
        let id = perf
            .time("add_content", || panel.add_content(type_id))
            .with_context(|| format!("adding {}", type_id))?;
        println!("added {} {}", type_id, id);
    }

    let headers: Vec<Point> = panel
        .canvas()
        .items()
        .map(|item| item.position() + Point::new(20.0, 14.0))
        .collect();

    if let Some(first) = headers.first().and_then(|p| panel.canvas_to_screen(*p)) {
        panel.pointer_down(first, Modifiers::NONE);
        perf.time("pointer_move", || {
            panel.pointer_move(first + Point::new(40.0, 60.0))
        });
        let outcome = panel.pointer_up(first + Point::new(40.0, 60.0));
        println!("moved first item: {:?}", outcome);
    }

    let screen: Vec<Point> = headers
        .iter()
        .skip(1)
        .filter_map(|p| panel.canvas_to_screen(*p))
        .collect();
    if let [second, third] = screen.as_slice() {
        panel.pointer_down(*second, Modifiers::NONE);
        panel.pointer_up(*second);
        panel.pointer_down(*third, Modifiers::SHIFT);
        panel.pointer_up(*third);
    }

    if let KeyOutcome::DeleteRequested(request) = panel.key_press(Key::Delete, Modifiers::NONE) {
        println!("{} -> yes", request.prompt());
        let removed = panel.resolve_delete(true);
        println!("removed {} items, {} left", removed, panel.canvas().len());
    }

    panel.set_edit_mode(false);

    let away = Point::new(monitor.center().x, monitor.center().y);
    let mut t = ms;
    while t <= ms + 1500 {
        perf.time("tick", || panel.tick(at(t), away));
        t += 50;
    }
    println!("after leaving: {:?}", panel.state());

    if print_layout {
        let layout = panel.canvas().serialize();
        println!(
            "{}",
            serde_json::to_string_pretty(&layout).context("serializing layout")?
        );
    }

    perf.log_summary();
    Ok(())
}
