//! Snapshot tests using the insta crate.
//!
//! These pin the on-disk formats (`layout.json`, `panel.json` and the
//! settings file) so a change to them shows up as a reviewable diff.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```
//!
//! Or review changes interactively:
//! ```sh
//! cargo insta review
//! ```

use crate::helpers::{config, empty_canvas, registry};
use dockboard::layout::{Layout, LayoutNode};
use dockboard::settings::PanelSettings;
use dockboard::store::{JsonFileStore, LayoutStore};
use serde_json::json;
use std::fs;
use tempfile::tempdir;
use uuid::Uuid;

fn node(n: u128, content_type: &str, x: f64, y: f64, width: f64, height: f64) -> LayoutNode {
    LayoutNode {
        wid: Uuid::from_u128(n),
        content_type: content_type.into(),
        x,
        y,
        width,
        height,
        config: Default::default(),
    }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn snapshot_layout_after_canvas_round_trip() {
    let mut note = node(1, "note", 40.0, 60.0, 300.0, 200.0);
    note.config = config(&[("pinned", json!(true)), ("text", json!("groceries"))]);
    let layout = Layout::new(vec![note, node(2, "clock", 380.0, 60.0, 240.0, 120.0)]);

    let mut canvas = empty_canvas();
    let report = canvas.deserialize(&layout, &registry());
    assert!(report.is_clean());

    let json = serde_json::to_string_pretty(&canvas.serialize()).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "nodes": [
        {
          "wid": "00000000-0000-0000-0000-000000000001",
          "content_type": "note",
          "x": 40.0,
          "y": 60.0,
          "width": 300.0,
          "height": 200.0,
          "config": {
            "pinned": true,
            "text": "groceries"
          }
        },
        {
          "wid": "00000000-0000-0000-0000-000000000002",
          "content_type": "clock",
          "x": 380.0,
          "y": 60.0,
          "width": 240.0,
          "height": 120.0,
          "config": {}
        }
      ]
    }
    "#);
}

#[test]
fn snapshot_edit_mode_does_not_leak_header_into_layout() {
    let layout = Layout::new(vec![node(7, "note", 0.0, 0.0, 300.0, 200.0)]);
    let mut canvas = empty_canvas();
    canvas.deserialize(&layout, &registry());
    canvas.set_edit_mode(true);

    let json = serde_json::to_string_pretty(&canvas.serialize()).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "nodes": [
        {
          "wid": "00000000-0000-0000-0000-000000000007",
          "content_type": "note",
          "x": 0.0,
          "y": 0.0,
          "width": 300.0,
          "height": 200.0,
          "config": {}
        }
      ]
    }
    "#);
}

// ============================================================================
// Panel record and settings
// ============================================================================

#[test]
fn snapshot_panel_file() {
    let dir = tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path());
    store.save_width(640.0).unwrap();

    let contents = fs::read_to_string(store.panel_path()).unwrap();
    insta::assert_snapshot!(contents, @r#"
    {
      "width": 640.0
    }
    "#);
}

#[test]
fn snapshot_default_settings() {
    let json = serde_json::to_string_pretty(&PanelSettings::default()).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "side": "right",
      "width": 600.0,
      "dwell_delay_ms": 500,
      "poll_interval_ms": 300,
      "rescan_interval_ms": 2000,
      "animation_ms": 250,
      "activation_zone": 5.0,
      "dwell_jitter": 5.0,
      "save_debounce_ms": 500
    }
    "#);
}
