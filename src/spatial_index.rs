//! Spatial Index Module
//!
//! Provides R-tree based spatial indexing for hit testing, rubber-band
//! selection and placement collision checks on the canvas.
//! This reduces point and range queries from O(n) to O(log n).

use crate::geometry::{Point, Rect};
use crate::item::ItemId;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A spatial entry representing an item's outer bounds.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub item_id: ItemId,
    pub bounds: Rect,
}

impl SpatialEntry {
    pub fn new(item_id: ItemId, bounds: Rect) -> Self {
        Self { item_id, bounds }
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.x, self.bounds.y],
            [self.bounds.right(), self.bounds.bottom()],
        )
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.item_id == other.item_id
    }
}

/// Spatial index for canvas items using an R-tree.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<ItemId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Build a spatial index from an iterator of items.
    pub fn from_items<I>(items: I) -> Self
    where
        I: Iterator<Item = (ItemId, Rect)>,
    {
        let mut index = Self::new();
        index.rebuild(items);
        index
    }

    /// Insert or replace the bounds of `item_id`.
    pub fn insert(&mut self, item_id: ItemId, bounds: Rect) {
        if let Some(old_entry) = self.entries.remove(&item_id) {
            self.tree.remove(&old_entry);
        }

        let entry = SpatialEntry::new(item_id, bounds);
        self.tree.insert(entry);
        self.entries.insert(item_id, entry);
    }

    pub fn remove(&mut self, item_id: ItemId) -> bool {
        if let Some(entry) = self.entries.remove(&item_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    pub fn update(&mut self, item_id: ItemId, bounds: Rect) {
        self.insert(item_id, bounds);
    }

    /// Items whose bounds, grown by `tolerance`, contain `point`.
    ///
    /// The tolerance lets resize handles that straddle an item's border be
    /// found from just outside it.
    pub fn query_point(&self, point: Point, tolerance: f64) -> Vec<ItemId> {
        let envelope = AABB::from_corners(
            [point.x - tolerance, point.y - tolerance],
            [point.x + tolerance, point.y + tolerance],
        );

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.bounds.inflated(tolerance).contains(point))
            .map(|entry| entry.item_id)
            .collect()
    }

    /// Items overlapping `rect` with positive area.
    pub fn query_rect(&self, rect: &Rect) -> Vec<ItemId> {
        let envelope = AABB::from_corners([rect.x, rect.y], [rect.right(), rect.bottom()]);

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.bounds.intersects(rect))
            .map(|entry| entry.item_id)
            .collect()
    }

    pub fn bounds(&self, item_id: ItemId) -> Option<Rect> {
        self.entries.get(&item_id).map(|e| e.bounds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rebuild<I>(&mut self, items: I)
    where
        I: Iterator<Item = (ItemId, Rect)>,
    {
        let entries: Vec<SpatialEntry> = items
            .map(|(id, bounds)| SpatialEntry::new(id, bounds))
            .collect();

        self.entries = entries.iter().map(|e| (e.item_id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
