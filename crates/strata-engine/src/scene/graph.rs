use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use crate::coords::{Rect, Vec2};
use crate::error::EngineError;
use crate::shape::{HitResult, ShapeRegistry, hit_shape};
use crate::style::Style;
use crate::surface::Surface;

use super::{ShapeId, ShapePatch, ShapeRecord, ZLevel};

/// Traversal order over the scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Order {
    /// Lowest z first, insertion order within a level. Painting order.
    Ascending,
    /// Highest z first, most recent first within a level. Hit-test order.
    Descending,
}

/// Retained record store with z-buckets and per-level dirty tracking.
///
/// Owns every [`ShapeRecord`]. Layers are addressed by [`ZLevel`]; any
/// mutation marks the affected levels dirty so the compositor repaints only
/// what changed.
#[derive(Debug)]
pub struct Scene {
    registry: Rc<ShapeRegistry>,
    records: HashMap<ShapeId, ShapeRecord>,
    buckets: BTreeMap<ZLevel, Vec<ShapeId>>,
    dirty: BTreeSet<ZLevel>,
    max_z: ZLevel,
    next_id: u64,
}

impl Scene {
    pub fn new(registry: Rc<ShapeRegistry>) -> Self {
        Self {
            registry,
            records: HashMap::new(),
            buckets: BTreeMap::new(),
            dirty: BTreeSet::new(),
            max_z: ZLevel::default(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest z-level seen since the last [`clear`](Self::clear).
    #[inline]
    pub fn max_z(&self) -> ZLevel {
        self.max_z
    }

    /// Fresh id of the form `<prefix>_<n>`, never colliding with a live record.
    pub fn new_id(&mut self, prefix: &str) -> ShapeId {
        loop {
            let id = ShapeId::new(format!("{prefix}_{}", self.next_id));
            self.next_id += 1;
            if !self.records.contains_key(&id) {
                return id;
            }
        }
    }

    // ── records ───────────────────────────────────────────────────────────

    /// Inserts `record`, replacing any record with the same id.
    pub fn add(&mut self, mut record: ShapeRecord) -> ShapeId {
        let id = match record.id() {
            Some(id) => id.clone(),
            None => {
                let id = self.new_id("shape");
                record.set_id(id.clone());
                id
            }
        };

        if let Some(old) = self.records.remove(&id) {
            self.unlink(&id, old.z());
            self.dirty.insert(old.z());
        }

        let z = record.z();
        self.buckets.entry(z).or_default().push(id.clone());
        self.records.insert(id.clone(), record);
        self.dirty.insert(z);
        self.max_z = self.max_z.max(z);
        log::trace!("scene add: {id} at {z}");
        id
    }

    #[inline]
    pub fn get(&self, id: &ShapeId) -> Option<&ShapeRecord> {
        self.records.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.records.contains_key(id)
    }

    /// Removes one record. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &ShapeId) -> Option<ShapeRecord> {
        let record = self.records.remove(id)?;
        self.unlink(id, record.z());
        self.dirty.insert(record.z());
        Some(record)
    }

    pub fn remove_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a ShapeId>) -> usize {
        ids.into_iter().filter_map(|id| self.remove(id)).count()
    }

    /// Removes everything and marks every existing level dirty.
    pub fn clear(&mut self) {
        self.mark_all_dirty();
        self.records.clear();
        self.buckets.clear();
        self.max_z = ZLevel::default();
    }

    /// Merges `patch` into the record. Returns `false` for unknown ids.
    pub fn modify(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        let old_z = record.apply(patch);
        let new_z = record.z();
        if old_z != new_z {
            self.unlink(id, old_z);
            self.buckets.entry(new_z).or_default().push(id.clone());
            self.max_z = self.max_z.max(new_z);
        }
        self.dirty.insert(old_z);
        self.dirty.insert(new_z);
        true
    }

    /// Moves a record by `(dx, dy)` through its plugin's drift capability.
    pub fn drift(&mut self, id: &ShapeId, dx: f32, dy: f32) -> bool {
        let registry = Rc::clone(&self.registry);
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        let delta = Vec2::new(dx, dy);
        match registry.get(record.shape()) {
            Some(plugin) => record.drift_with(plugin, delta),
            None => record.set_position(record.position() + delta),
        }
        self.dirty.insert(record.z());
        true
    }

    /// Replaces position and style wholesale. Used to roll back a cancelled drag.
    pub(crate) fn restore(&mut self, id: &ShapeId, position: Vec2, style: Style) -> bool {
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        record.set_position(position);
        *record.style_mut() = style;
        self.dirty.insert(record.z());
        true
    }

    /// Raw mutable access. Callers mark the record's level dirty themselves.
    pub(crate) fn get_mut(&mut self, id: &ShapeId) -> Option<&mut ShapeRecord> {
        self.records.get_mut(id)
    }

    fn unlink(&mut self, id: &ShapeId, z: ZLevel) {
        if let Some(bucket) = self.buckets.get_mut(&z) {
            bucket.retain(|x| x != id);
            if bucket.is_empty() {
                self.buckets.remove(&z);
            }
        }
    }

    // ── traversal ─────────────────────────────────────────────────────────

    /// Lazy traversal in `order`.
    pub fn iter(&self, order: Order) -> Box<dyn Iterator<Item = &ShapeRecord> + '_> {
        match order {
            Order::Ascending => Box::new(
                self.buckets
                    .values()
                    .flat_map(|ids| ids.iter())
                    .filter_map(|id| self.records.get(id)),
            ),
            Order::Descending => Box::new(
                self.buckets
                    .values()
                    .rev()
                    .flat_map(|ids| ids.iter().rev())
                    .filter_map(|id| self.records.get(id)),
            ),
        }
    }

    /// First record in `order` matching `pred`.
    pub fn find(
        &self,
        order: Order,
        mut pred: impl FnMut(&ShapeRecord) -> bool,
    ) -> Option<&ShapeRecord> {
        self.iter(order).find(|r| pred(r))
    }

    /// One level in insertion order.
    pub fn bucket(&self, z: ZLevel) -> impl Iterator<Item = &ShapeRecord> + '_ {
        self.buckets
            .get(&z)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.records.get(id))
    }

    /// Levels that currently hold at least one record.
    pub fn levels(&self) -> impl Iterator<Item = ZLevel> + '_ {
        self.buckets.keys().copied()
    }

    /// Layer-space bounds of a record.
    pub fn bounds(&self, id: &ShapeId) -> Option<Rect> {
        let record = self.records.get(id)?;
        let plugin = self.registry.get(record.shape())?;
        Some(record.world_bounds(plugin))
    }

    // ── hit testing ───────────────────────────────────────────────────────

    /// Topmost visible, interactive record under `point`, skipping `exclude`.
    pub fn hit_test(
        &self,
        point: Vec2,
        exclude: Option<&ShapeId>,
        mut scratch: Option<&mut dyn Surface>,
    ) -> Option<ShapeId> {
        for record in self.iter(Order::Descending) {
            if record.invisible || !record.is_interactive() || record.id() == exclude {
                continue;
            }
            let Some(plugin) = self.registry.get(record.shape()) else {
                continue;
            };
            if !record.world_bounds(plugin).contains_inclusive(point) {
                continue;
            }
            let world = record.world_transform();
            let scratch = scratch.as_mut().map(|p| &mut **p as &mut dyn Surface);
            match hit_shape(plugin, record.style(), world, point, scratch) {
                HitResult::Hit => return record.id().cloned(),
                HitResult::Miss => {}
                HitResult::Unsupported => {
                    if let Some(id) = record.id() {
                        let err = EngineError::UnsupportedHitTest(id.clone());
                        log::debug!("{err}; treated as miss");
                    }
                }
            }
        }
        None
    }

    // ── dirty tracking ────────────────────────────────────────────────────

    pub fn dirty(&self) -> impl Iterator<Item = ZLevel> + '_ {
        self.dirty.iter().copied()
    }

    #[inline]
    pub fn is_dirty(&self, z: ZLevel) -> bool {
        self.dirty.contains(&z)
    }

    #[inline]
    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn mark_dirty(&mut self, z: ZLevel) {
        self.dirty.insert(z);
    }

    /// Marks every level from 0 to the max level dirty.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend((0..=self.max_z.0).map(ZLevel));
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::keys;

    fn scene() -> Scene {
        Scene::new(Rc::new(ShapeRegistry::with_builtins()))
    }

    fn circle(id: &str, z: u32, x: f32, y: f32, r: f32) -> ShapeRecord {
        ShapeRecord::new("circle")
            .with_id(id)
            .with_z(z)
            .with_style(Style::new().with(keys::X, x).with(keys::Y, y).with(keys::R, r))
    }

    fn ids<'a>(it: impl Iterator<Item = &'a ShapeRecord>) -> Vec<String> {
        it.map(|r| r.id().map(|i| i.to_string()).unwrap_or_default()).collect()
    }

    // ── records ───────────────────────────────────────────────────────────

    #[test]
    fn add_assigns_ids_and_get_returns_last_write() {
        let mut s = scene();
        let a = s.add(ShapeRecord::new("circle"));
        let b = s.add(ShapeRecord::new("circle"));
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "shape_0");

        s.add(circle("c", 0, 1.0, 1.0, 1.0));
        s.add(circle("c", 2, 9.0, 9.0, 1.0));
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(&"c".into()).map(|r| r.z()), Some(ZLevel(2)));
        assert_eq!(s.bucket(ZLevel(0)).count(), 2);

        s.remove(&"c".into());
        assert!(s.get(&"c".into()).is_none());
    }

    #[test]
    fn new_id_skips_live_ids() {
        let mut s = scene();
        s.add(ShapeRecord::new("circle").with_id("shape_0"));
        assert_eq!(s.new_id("shape").as_str(), "shape_1");
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut s = scene();
        assert!(s.remove(&"ghost".into()).is_none());
        assert!(!s.modify(&"ghost".into(), &ShapePatch::new()));
        assert!(!s.drift(&"ghost".into(), 1.0, 1.0));
        assert!(!s.has_dirty());
    }

    #[test]
    fn clear_removes_everything() {
        let mut s = scene();
        s.add(circle("a", 0, 0.0, 0.0, 1.0));
        s.add(circle("b", 3, 0.0, 0.0, 1.0));
        s.clear_dirty();
        s.clear();
        assert!(s.is_empty());
        assert!(s.is_dirty(ZLevel(3)));
        assert_eq!(s.iter(Order::Ascending).count(), 0);
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn descending_is_reverse_of_ascending() {
        let mut s = scene();
        s.add(circle("a", 1, 0.0, 0.0, 1.0));
        s.add(circle("b", 0, 0.0, 0.0, 1.0));
        s.add(circle("c", 1, 0.0, 0.0, 1.0));
        s.add(circle("d", 0, 0.0, 0.0, 1.0));
        let asc = ids(s.iter(Order::Ascending));
        let mut desc = ids(s.iter(Order::Descending));
        assert_eq!(asc, ["b", "d", "a", "c"]);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn find_stops_at_first_match() {
        let mut s = scene();
        s.add(circle("a", 0, 0.0, 0.0, 1.0));
        s.add(circle("b", 0, 0.0, 0.0, 1.0));
        let mut visited = 0;
        let hit = s.find(Order::Descending, |_| {
            visited += 1;
            true
        });
        assert_eq!(hit.and_then(|r| r.id()).map(|i| i.as_str()), Some("b"));
        assert_eq!(visited, 1);
    }

    // ── modify ────────────────────────────────────────────────────────────

    #[test]
    fn modify_merges_and_moves_buckets() {
        let mut s = scene();
        s.add(circle("a", 0, 1.0, 1.0, 1.0));
        s.clear_dirty();

        let id = ShapeId::from("a");
        assert!(s.modify(&id, &ShapePatch::new().style(Style::new().with(keys::X, 5.0))));
        assert!(s.modify(&id, &ShapePatch::new()));
        assert_eq!(s.get(&id).and_then(|r| r.style().number(keys::X)), Some(5.0));

        s.clear_dirty();
        s.modify(&id, &ShapePatch::new().z(4));
        assert!(s.is_dirty(ZLevel(0)) && s.is_dirty(ZLevel(4)));
        assert_eq!(s.bucket(ZLevel(4)).count(), 1);
        assert_eq!(s.bucket(ZLevel(0)).count(), 0);
        assert_eq!(s.max_z(), ZLevel(4));
    }

    #[test]
    fn drift_offsets_position_and_dirties() {
        let mut s = scene();
        s.add(circle("a", 2, 0.0, 0.0, 1.0));
        s.clear_dirty();
        assert!(s.drift(&"a".into(), 3.0, -2.0));
        assert_eq!(s.get(&"a".into()).map(|r| r.position()), Some(Vec2::new(3.0, -2.0)));
        assert!(s.is_dirty(ZLevel(2)));
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn topmost_level_wins() {
        let mut s = scene();
        s.add(circle("c1", 0, 10.0, 10.0, 5.0));
        s.add(circle("c2", 1, 10.0, 10.0, 5.0));
        assert_eq!(s.hit_test(Vec2::new(10.0, 10.0), None, None), Some(ShapeId::from("c2")));
        let c2 = ShapeId::from("c2");
        assert_eq!(s.hit_test(Vec2::new(10.0, 10.0), Some(&c2), None), Some(ShapeId::from("c1")));
    }

    #[test]
    fn circle_boundary_and_outside_miss() {
        let mut s = scene();
        s.add(circle("c", 0, 10.0, 10.0, 5.0));
        assert!(s.hit_test(Vec2::new(12.0, 10.0), None, None).is_some());
        assert!(s.hit_test(Vec2::new(15.0, 10.0), None, None).is_none());
        assert!(s.hit_test(Vec2::new(40.0, 10.0), None, None).is_none());
    }

    #[test]
    fn invisible_and_inert_records_are_skipped() {
        let mut s = scene();
        s.add(circle("a", 0, 0.0, 0.0, 5.0).invisible(true));
        s.add(circle("b", 0, 0.0, 0.0, 5.0).hoverable(false));
        assert!(s.hit_test(Vec2::zero(), None, None).is_none());
    }

    #[test]
    fn hit_test_follows_the_transform() {
        let mut s = scene();
        s.add(circle("a", 0, 0.0, 0.0, 5.0).with_position(Vec2::new(100.0, 100.0)));
        assert!(s.hit_test(Vec2::new(101.0, 101.0), None, None).is_some());
        assert!(s.hit_test(Vec2::new(1.0, 1.0), None, None).is_none());
    }
}
