//! Persisted layout format.
//!
//! ```json
//! { "nodes": [ { "wid": "<uuid>", "content_type": "note",
//!                "x": 40.0, "y": 60.0, "width": 300.0, "height": 200.0,
//!                "config": { ... } } ] }
//! ```
//!
//! `width`/`height` are the item's content-area size; the edit-mode header
//! strip is never persisted.
//!
//! Records are decoded one at a time. A record that does not decode is kept
//! aside in [`Layout::malformed`] instead of failing the whole document, so
//! the rest of the layout still loads.

use crate::content::ContentConfig;
use crate::geometry::{Point, Size};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One persisted item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub wid: Uuid,
    pub content_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub config: ContentConfig,
}

impl LayoutNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A record that could not be decoded as a [`LayoutNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedNode {
    /// The record's id, when it had a valid one
    pub wid: Option<Uuid>,
    /// The record's content type, or empty when missing
    pub content_type: String,
    pub reason: String,
}

impl MalformedNode {
    fn from_value(value: &Value, error: serde_json::Error) -> Self {
        Self {
            wid: value
                .get("wid")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok()),
            content_type: value
                .get("content_type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            reason: error.to_string(),
        }
    }
}

/// Ordered list of persisted items; order is z-order (later on top).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    /// Records skipped while decoding; never written back
    #[serde(skip)]
    pub malformed: Vec<MalformedNode>,
}

#[derive(Deserialize)]
struct RawLayout {
    #[serde(default)]
    nodes: Vec<Value>,
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawLayout::deserialize(deserializer)?;
        Ok(Layout::from_values(raw.nodes))
    }
}

impl Layout {
    pub fn new(nodes: Vec<LayoutNode>) -> Self {
        Self {
            nodes,
            malformed: Vec::new(),
        }
    }

    /// Decode each record on its own, setting aside the ones that fail.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut layout = Layout::default();
        for value in values {
            match LayoutNode::deserialize(&value) {
                Ok(node) => layout.nodes.push(node),
                Err(e) => layout.malformed.push(MalformedNode::from_value(&value, e)),
            }
        }
        layout
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
