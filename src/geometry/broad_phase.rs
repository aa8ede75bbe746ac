//! A dynamic AABB tree broadphase (spec §4.2): fattened leaf AABBs absorb
//! small motion without a tree update, `detect` walks overlapping leaf
//! pairs, and `raycast` prunes subtrees whose AABB the ray misses.

use crate::data::{Arena, Index};
use crate::geometry::aabb::Aabb;
use crate::geometry::ray::Ray;
use crate::math::{Point, Real, Vector};

/// How far a leaf's AABB is fattened beyond the tight shape bounds, so a
/// body can move a little each step without forcing a tree update.
pub const AABB_MARGIN: Real = 0.1;
/// Multiplies predicted displacement before extending a fattened AABB in
/// its direction of travel, absorbing fast-but-not-quite-CCD motion.
const PREDICTION_FACTOR: Real = 4.0;

type NodeIndex = Index;

struct Node {
    aabb: Aabb,
    parent: Option<NodeIndex>,
    // Leaves have both children `None`; internal nodes have both `Some`.
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
    height: i32,
    /// The caller-supplied payload, only meaningful on leaves.
    user_data: Option<Index>,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.left.is_none()
    }
}

/// A dynamic bounding-volume hierarchy keyed by fixture handle, per spec
/// §4.2's "broadphase holds fattened AABBs keyed by fixture identity".
pub struct DynamicTree {
    nodes: Arena<Node>,
    root: Option<NodeIndex>,
    // A `BTreeMap` rather than a `HashMap`: `detect()` walks these keys to
    // seed pair generation, and `HashMap`'s per-process random iteration
    // order would make the solver's contact order (and so its output)
    // nondeterministic across runs of the same inputs (spec §5, §8).
    leaves: std::collections::BTreeMap<Index, NodeIndex>,
}

impl Default for DynamicTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicTree {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            leaves: std::collections::BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn fattened(aabb: &Aabb, displacement: Vector) -> Aabb {
        let mut fat = aabb.expand(AABB_MARGIN);
        fat = fat.extend_by_displacement(displacement * PREDICTION_FACTOR);
        fat
    }

    /// Inserts a new leaf for `key` with tight bounds `aabb`. Panics (via
    /// the caller-visible `PhysicsError::DuplicateBody`-style contract one
    /// layer up) are avoided here; a duplicate key simply updates in place.
    pub fn insert(&mut self, key: Index, aabb: Aabb) {
        if self.leaves.contains_key(&key) {
            self.update(key, aabb, Vector::zeros());
            return;
        }
        let fat = Self::fattened(&aabb, Vector::zeros());
        let leaf = self.nodes.insert(Node {
            aabb: fat,
            parent: None,
            left: None,
            right: None,
            height: 0,
            user_data: Some(key),
        });
        self.leaves.insert(key, leaf);
        self.insert_leaf(leaf);
    }

    pub fn remove(&mut self, key: Index) {
        if let Some(leaf) = self.leaves.remove(&key) {
            self.remove_leaf(leaf);
            self.nodes.remove(leaf);
        }
    }

    /// Re-fattens and re-inserts the leaf for `key` only if its tight
    /// `aabb` has escaped the current fattened bounds (spec §4.2: "a
    /// fattened AABB absorbs motion until the tight bounds escape it").
    pub fn update(&mut self, key: Index, aabb: Aabb, displacement: Vector) -> bool {
        let Some(&leaf) = self.leaves.get(&key) else {
            return false;
        };
        let current = self.nodes.get(leaf).unwrap().aabb;
        if current.contains(&aabb) {
            return false;
        }
        self.remove_leaf(leaf);
        let fat = Self::fattened(&aabb, displacement);
        self.nodes.get_mut(leaf).unwrap().aabb = fat;
        self.insert_leaf(leaf);
        true
    }

    pub fn fat_aabb(&self, key: Index) -> Option<Aabb> {
        self.leaves.get(&key).and_then(|&n| self.nodes.get(n)).map(|n| n.aabb)
    }

    fn insert_leaf(&mut self, leaf: NodeIndex) {
        let Some(root) = self.root else {
            self.root = Some(leaf);
            self.nodes.get_mut(leaf).unwrap().parent = None;
            return;
        };

        // Descend, at each step picking the child whose enlargement (to
        // include the new leaf) is cheapest, per the classic dynamic-tree
        // insertion heuristic.
        let mut index = root;
        while !self.nodes.get(index).unwrap().is_leaf() {
            let node = self.nodes.get(index).unwrap();
            let left = node.left.unwrap();
            let right = node.right.unwrap();
            let leaf_aabb = self.nodes.get(leaf).unwrap().aabb;

            let combined = node.aabb.union(&leaf_aabb);
            let cost = combined.perimeter();
            let inherited = cost - node.aabb.perimeter();

            let cost_left = {
                let child = self.nodes.get(left).unwrap();
                let merged = child.aabb.union(&leaf_aabb).perimeter();
                if child.is_leaf() {
                    merged + inherited
                } else {
                    (merged - child.aabb.perimeter()) + inherited
                }
            };
            let cost_right = {
                let child = self.nodes.get(right).unwrap();
                let merged = child.aabb.union(&leaf_aabb).perimeter();
                if child.is_leaf() {
                    merged + inherited
                } else {
                    (merged - child.aabb.perimeter()) + inherited
                }
            };

            if cost_left < cost_right {
                index = left;
            } else {
                index = right;
            }
        }

        let sibling = index;
        let old_parent = self.nodes.get(sibling).unwrap().parent;
        let leaf_aabb = self.nodes.get(leaf).unwrap().aabb;
        let sibling_aabb = self.nodes.get(sibling).unwrap().aabb;

        let new_parent = self.nodes.insert(Node {
            aabb: sibling_aabb.union(&leaf_aabb),
            parent: old_parent,
            left: Some(sibling),
            right: Some(leaf),
            height: self.nodes.get(sibling).unwrap().height + 1,
            user_data: None,
        });

        self.nodes.get_mut(sibling).unwrap().parent = Some(new_parent);
        self.nodes.get_mut(leaf).unwrap().parent = Some(new_parent);

        match old_parent {
            Some(p) => {
                let parent_node = self.nodes.get_mut(p).unwrap();
                if parent_node.left == Some(sibling) {
                    parent_node.left = Some(new_parent);
                } else {
                    parent_node.right = Some(new_parent);
                }
            }
            None => self.root = Some(new_parent),
        }

        self.refit_ancestors(new_parent);
    }

    fn remove_leaf(&mut self, leaf: NodeIndex) {
        let parent = match self.nodes.get(leaf).unwrap().parent {
            Some(p) => p,
            None => {
                self.root = None;
                return;
            }
        };
        let grandparent = self.nodes.get(parent).unwrap().parent;
        let parent_node = self.nodes.get(parent).unwrap();
        let sibling = if parent_node.left == Some(leaf) {
            parent_node.right.unwrap()
        } else {
            parent_node.left.unwrap()
        };

        match grandparent {
            Some(g) => {
                let g_node = self.nodes.get_mut(g).unwrap();
                if g_node.left == Some(parent) {
                    g_node.left = Some(sibling);
                } else {
                    g_node.right = Some(sibling);
                }
                self.nodes.get_mut(sibling).unwrap().parent = Some(g);
                self.nodes.remove(parent);
                self.refit_ancestors(g);
            }
            None => {
                self.nodes.get_mut(sibling).unwrap().parent = None;
                self.nodes.remove(parent);
                self.root = Some(sibling);
            }
        }
    }

    fn refit_ancestors(&mut self, from: NodeIndex) {
        let mut index = Some(from);
        while let Some(i) = index {
            let node = self.nodes.get(i).unwrap();
            let (left, right) = (node.left.unwrap(), node.right.unwrap());
            let left_aabb = self.nodes.get(left).unwrap().aabb;
            let right_aabb = self.nodes.get(right).unwrap().aabb;
            let height = 1 + self
                .nodes
                .get(left)
                .unwrap()
                .height
                .max(self.nodes.get(right).unwrap().height);
            let node = self.nodes.get_mut(i).unwrap();
            node.aabb = left_aabb.union(&right_aabb);
            node.height = height;
            index = node.parent;
        }
    }

    /// Every pair of leaves whose fattened AABBs overlap, as `(a, b)` with
    /// `a < b` by fixture id to avoid duplicate ordered pairs (spec §4.2:
    /// "detect produces unordered pairs once per overlap") and, since
    /// `leaves` is a `BTreeMap`, in a deterministic order driven only by
    /// fixture id rather than hash-seed-dependent iteration (spec §5, §8).
    pub fn detect(&self) -> Vec<(Index, Index)> {
        let mut pairs = Vec::new();
        let keys: Vec<Index> = self.leaves.keys().copied().collect();
        for &key in &keys {
            let leaf = self.leaves[&key];
            let aabb = self.nodes.get(leaf).unwrap().aabb;
            self.query(aabb, &mut |other_data| {
                if other_data > key {
                    pairs.push((key, other_data));
                }
            });
        }
        pairs
    }

    /// Calls `visitor` with the user data of every leaf whose AABB
    /// overlaps `aabb`.
    pub fn query(&self, aabb: Aabb, visitor: &mut dyn FnMut(Index)) {
        let Some(root) = self.root else { return };
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let node = self.nodes.get(index).unwrap();
            if !node.aabb.intersects(&aabb) {
                continue;
            }
            if node.is_leaf() {
                visitor(node.user_data.unwrap());
            } else {
                stack.push(node.left.unwrap());
                stack.push(node.right.unwrap());
            }
        }
    }

    /// Casts `ray` through the tree, calling `visitor` with every leaf
    /// whose AABB the ray hits and the entry `toi` into that AABB; subtrees
    /// the ray misses are pruned (spec §4.2: "raycast is a pruned descent,
    /// not a linear scan"). The per-shape surface normal is computed later,
    /// by the narrowphase's own `Shape::raycast`.
    pub fn raycast(&self, ray: &Ray, max_toi: Real, visitor: &mut dyn FnMut(Index, Real)) {
        let Some(root) = self.root else { return };
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let node = self.nodes.get(index).unwrap();
            let Some(toi) = ray.intersects_aabb(&node.aabb, max_toi) else {
                continue;
            };
            if node.is_leaf() {
                visitor(node.user_data.unwrap(), toi);
            } else {
                stack.push(node.left.unwrap());
                stack.push(node.right.unwrap());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(n: u32) -> Index {
        Index::from_raw_parts(n, 0)
    }

    #[test]
    fn insert_then_detect_overlap() {
        let mut tree = DynamicTree::new();
        tree.insert(key(0), Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
        tree.insert(key(1), Aabb::new(Point::new(0.5, 0.5), Point::new(1.5, 1.5)));
        tree.insert(key(2), Aabb::new(Point::new(10.0, 10.0), Point::new(11.0, 11.0)));

        let pairs = tree.detect();
        assert!(pairs.contains(&(key(0), key(1))) || pairs.contains(&(key(1), key(0))));
        assert!(!pairs.iter().any(|&(a, b)| (a, b) == (key(0), key(2)) || (a, b) == (key(2), key(0))));
    }

    #[test]
    fn remove_drops_leaf() {
        let mut tree = DynamicTree::new();
        tree.insert(key(0), Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
        tree.remove(key(0));
        assert!(tree.is_empty());
    }
}
