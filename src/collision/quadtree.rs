// Implements a region quadtree for broadphase collision detection.

use crate::collision::aabb::Aabb;
use crate::math::vec2::Vec2;

/// A body filed in the tree: its index in the world's body list, its
/// position, and its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    index: usize,
    position: Vec2,
    bounds: Aabb,
}

/// A quadtree node. A node is either a leaf holding entries directly, or an
/// internal node with exactly four children; never both.
///
/// An entry whose bounds straddle a quadrant boundary is filed in every
/// child it overlaps, so [`QuadTree::query`] deduplicates its results.
#[derive(Debug, Clone)]
pub struct QuadTree {
    region: Aabb,
    capacity: usize,
    depth: usize,
    max_depth: usize,
    entries: Vec<Entry>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    /// Creates an empty root covering `region`.
    ///
    /// # Arguments
    /// * `capacity` - Entries a leaf holds before it subdivides (at least 1).
    /// * `max_depth` - Leaves at this depth never subdivide; they just grow.
    pub fn new(region: Aabb, capacity: usize, max_depth: usize) -> Self {
        Self::node(region, capacity.max(1), 0, max_depth)
    }

    fn node(region: Aabb, capacity: usize, depth: usize, max_depth: usize) -> Self {
        QuadTree {
            region,
            capacity,
            depth,
            max_depth,
            entries: Vec::new(),
            children: None,
        }
    }

    pub fn region(&self) -> &Aabb {
        &self.region
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Drops every entry and collapses the tree back to a single leaf.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children = None;
    }

    /// Clears the tree and moves the root to cover `region`.
    pub fn reset(&mut self, region: Aabb) {
        self.clear();
        self.region = region;
    }

    /// Files a body in the tree.
    ///
    /// Returns `false`, leaving the tree untouched, if `position` lies
    /// outside the root region.
    pub fn insert(&mut self, index: usize, position: Vec2, bounds: Aabb) -> bool {
        if !self.region.contains(position) {
            return false;
        }
        self.insert_entry(Entry {
            index,
            position,
            bounds,
        });
        true
    }

    fn accepts(&self, entry: &Entry) -> bool {
        region_accepts(&self.region, entry)
    }

    fn insert_entry(&mut self, entry: Entry) {
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.accepts(&entry) {
                    child.insert_entry(entry);
                }
            }
            return;
        }

        self.entries.push(entry);
        if self.entries.len() > self.capacity
            && self.depth < self.max_depth
            && self.split_separates()
        {
            self.subdivide();
        }
    }

    /// The four child regions, in top-left, top-right, bottom-left,
    /// bottom-right order.
    fn quadrants(&self) -> [Aabb; 4] {
        let half_width = self.region.half_width * 0.5;
        let half_height = self.region.half_height * 0.5;
        let center = self.region.center;
        let quadrant = |dx: f64, dy: f64| {
            Aabb::new(
                Vec2::new(center.x + dx * half_width, center.y + dy * half_height),
                half_width,
                half_height,
            )
        };
        [
            quadrant(-1.0, 1.0),
            quadrant(1.0, 1.0),
            quadrant(-1.0, -1.0),
            quadrant(1.0, -1.0),
        ]
    }

    /// A split only helps if some entry would stay out of some quadrant.
    /// When every entry covers all four, the leaf is left over-full.
    fn split_separates(&self) -> bool {
        let quadrants = self.quadrants();
        self.entries.iter().any(|entry| {
            quadrants
                .iter()
                .any(|quadrant| !region_accepts(quadrant, entry))
        })
    }

    /// Splits this leaf into four quadrants and pushes its entries down.
    fn subdivide(&mut self) {
        let depth = self.depth + 1;
        let mut children = Box::new(self.quadrants().map(|region| {
            QuadTree::node(region, self.capacity, depth, self.max_depth)
        }));

        for entry in self.entries.drain(..) {
            for child in children.iter_mut() {
                if child.accepts(&entry) {
                    child.insert_entry(entry);
                }
            }
        }
        self.children = Some(children);
    }

    /// Appends to `found` the index of every body whose position lies in
    /// `region`. The appended indices are sorted and unique.
    pub fn query(&self, region: &Aabb, found: &mut Vec<usize>) {
        let start = found.len();
        self.collect(region, found);

        let mut appended = found.split_off(start);
        appended.sort_unstable();
        appended.dedup();
        found.extend(appended);
    }

    fn collect(&self, region: &Aabb, found: &mut Vec<usize>) {
        if !self.region.overlaps(region) {
            return;
        }

        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.collect(region, found);
                }
            }
            None => found.extend(
                self.entries
                    .iter()
                    .filter(|entry| region.contains(entry.position))
                    .map(|entry| entry.index),
            ),
        }
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(QuadTree::node_count).sum())
    }
}

fn region_accepts(region: &Aabb, entry: &Entry) -> bool {
    region.contains(entry.position) || region.overlaps(&entry.bounds)
}
