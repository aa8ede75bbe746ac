//! A generational free-list arena keyed by a stable [`Index`].
//!
//! Bodies, fixtures, contacts and joints reference each other by id instead
//! of by pointer (spec §9, "arena with stable ids"): this is the shared
//! backing store for all of them, in the same spirit as the handle-based
//! `RigidBodyBuilder`/`ColliderBuilder` APIs the teacher exposes
//! (`fixed_joint.rs`, `physics_pipeline.rs`).

use std::fmt;

#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Index {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({}v{})", self.index, self.generation)
    }
}

impl Index {
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }

    /// A sentinel value that never matches a live entry.
    pub fn invalid() -> Self {
        Self {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }
}

#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
enum Entry<T> {
    // `generation` is the generation the *next* occupant of this slot will
    // receive, so a stale `Index` into a freed-then-reused slot never
    // aliases the new occupant.
    Free { next_free: Option<u32>, generation: u32 },
    Occupied { generation: u32, value: T },
}

/// A generational arena: O(1) insert/remove, stable ids across removals,
/// and reuse of freed slots to keep the backing vector compact.
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> Index {
        if let Some(free) = self.free_head {
            let (next_free, generation) = match self.entries[free as usize] {
                Entry::Free {
                    next_free,
                    generation,
                } => (next_free, generation),
                Entry::Occupied { .. } => unreachable!("free list corruption"),
            };
            self.free_head = next_free;
            self.entries[free as usize] = Entry::Occupied { generation, value };
            self.len += 1;
            Index::from_raw_parts(free, generation)
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(Entry::Occupied {
                generation: 0,
                value,
            });
            self.len += 1;
            Index::from_raw_parts(index, 0)
        }
    }

    pub fn remove(&mut self, index: Index) -> Option<T> {
        let slot = self.entries.get_mut(index.index as usize)?;
        match slot {
            Entry::Occupied { generation, .. } if *generation == index.generation => {
                let next_generation = generation.wrapping_add(1);
                let old = std::mem::replace(
                    slot,
                    Entry::Free {
                        next_free: self.free_head,
                        generation: next_generation,
                    },
                );
                self.free_head = Some(index.index);
                self.len -= 1;
                match old {
                    Entry::Occupied { value, .. } => Some(value),
                    Entry::Free { .. } => None,
                }
            }
            _ => None,
        }
    }

    pub fn get(&self, index: Index) -> Option<&T> {
        match self.entries.get(index.index as usize)? {
            Entry::Occupied { generation, value } if *generation == index.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, index: Index) -> Option<&mut T> {
        match self.entries.get_mut(index.index as usize)? {
            Entry::Occupied { generation, value } if *generation == index.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn contains(&self, index: Index) -> bool {
        self.get(index).is_some()
    }

    /// Mutable access to two distinct entries at once, needed whenever a
    /// contact or joint (which only ever holds two distinct `Index`es)
    /// touches both of its bodies in the same borrow. Panics if `a == b`;
    /// returns `None` for either slot that isn't a live occupant.
    pub fn get2_mut(&mut self, a: Index, b: Index) -> (Option<&mut T>, Option<&mut T>) {
        assert_ne!(a, b, "get2_mut requires two distinct indices");
        if a.index == b.index {
            // Same slot, different (necessarily stale) generation: at most
            // one of the two can be live.
            return match self.get_mut(a) {
                Some(v) => (Some(v), None),
                None => (None, self.get_mut(b)),
            };
        }
        let (lo, hi) = if a.index < b.index { (a, b) } else { (b, a) };
        let (left, right) = self.entries.split_at_mut(hi.index as usize);
        let a_val = match &mut left[lo.index as usize] {
            Entry::Occupied { generation, value } if *generation == lo.generation => {
                Some(value)
            }
            _ => None,
        };
        let b_val = match &mut right[0] {
            Entry::Occupied { generation, value } if *generation == hi.generation => {
                Some(value)
            }
            _ => None,
        };
        if a.index < b.index {
            (a_val, b_val)
        } else {
            (b_val, a_val)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.entries.iter().enumerate().filter_map(|(i, e)| {
            if let Entry::Occupied { generation, value } = e {
                Some((Index::from_raw_parts(i as u32, *generation), value))
            } else {
                None
            }
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index, &mut T)> {
        self.entries.iter_mut().enumerate().filter_map(|(i, e)| {
            if let Entry::Occupied { generation, value } = e {
                Some((Index::from_raw_parts(i as u32, *generation), value))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_index_does_not_alias_reused_slot() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.remove(a);
        let c = arena.insert(2);
        assert_eq!(c.index, a.index);
        assert_ne!(c.generation, a.generation);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(c), Some(&2));
    }
}
