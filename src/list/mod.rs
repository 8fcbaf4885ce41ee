//! Ordered, rank-indexable skip list.
//!
//! A classic one-value-per-node skip list whose links also record how many
//! elements they jump over. The widths turn it into an order-statistics
//! structure: positional lookup (`at`), inverse lookup (`index`) and range
//! extraction (`at_seq`) all run in O(log n) on average, next to the usual
//! insert, remove and membership test.
//!
//! # Operations
//!
//! - `insert(value)`: O(log n) - splice after every equal value
//! - `remove(value)`: O(log n) - unlink the first equal value and hand it back
//! - `has(value)` / `index(value)`: O(log n) - membership and rank
//! - `at(index)`: O(log n) - select by rank, negative indices count from the end
//! - `at_seq(start, length)`: O(log n + length)
//! - `len()`: O(1)
//! - `lacks_integrity()`: O(n log n) - full structural self-check
//!
//! This type is not synchronized; wrap it in [`SharedSkipList`] to share it
//! between threads.
//!
//! [`SharedSkipList`]: crate::shared::SharedSkipList

mod dot;
mod integrity;
pub(crate) mod node;

use std::fmt;

use log::debug;
use log::trace;
use smallvec::SmallVec;
use smallvec::smallvec;

use crate::compare::Compare;
use crate::compare::Natural;
use crate::error::Error;
use crate::error::Result;
use crate::height::HeightGenerator;
use crate::options::DEFAULT_MAX_HEIGHT;
use crate::options::Options;

pub use integrity::IntegrityCheck;
use node::Arena;
use node::HEAD;
use node::Idx;
use node::Link;
use node::NIL;

/// The predecessor at each level of a search, with its position.
type Path = SmallVec<[(Idx, usize); 16]>;

/// An ordered multiset with positional access.
pub struct SkipList<T, C = Natural> {
    arena: Arena<T>,
    len: usize,
    max_height: usize,
    heights: HeightGenerator,
    cmp: C,
}

impl<T: PartialOrd> SkipList<T, Natural> {
    /// An empty list in natural order with default options.
    pub fn new() -> Self {
        return SkipList::with_comparator(Natural);
    }
}

impl<T: PartialOrd> Default for SkipList<T, Natural> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T, C: Compare<T>> SkipList<T, C> {
    /// An empty list ordered by `cmp`, with a fair coin seeded from OS
    /// entropy.
    pub fn with_comparator(cmp: C) -> Self {
        return SkipList::with_height_generator(cmp, DEFAULT_MAX_HEIGHT, HeightGenerator::fair());
    }

    /// An empty list ordered by `cmp`, configured by `options`.
    pub fn with_options(cmp: C, options: Options) -> Result<Self> {
        options.validate()?;
        return Ok(SkipList::with_height_generator(
            cmp,
            options.max_height,
            options.height_generator()?,
        ));
    }

    /// An empty list drawing heights from `heights`, capped at `max_height`.
    pub fn with_height_generator(cmp: C, max_height: usize, heights: HeightGenerator) -> Self {
        return SkipList {
            arena: Arena::new(),
            len: 0,
            max_height: max_height.max(1),
            heights,
            cmp,
        };
    }

    // --- Search ---

    /// Descend from the head's top level, recording the last node visited at
    /// each level. With `past_equal` the search moves past values equal to
    /// `value`; otherwise it stops in front of them.
    fn descend(&self, value: &T, past_equal: bool) -> Result<Path> {
        let head_height = self.arena.head().height();
        let mut path: Path = smallvec![(HEAD, 0); head_height];
        let mut idx = HEAD;
        let mut pos = 0usize;

        for level in (0..head_height).rev() {
            loop {
                let link = self.arena.node(idx).links[level];
                let Some(next_value) = self.arena.value(link.next) else {
                    break;
                };
                let advance = if past_equal {
                    !self.cmp.less(value, next_value)?
                } else {
                    self.cmp.less(next_value, value)?
                };
                if !advance {
                    break;
                }
                pos += link.width;
                idx = link.next;
            }
            path[level] = (idx, pos);
        }

        return Ok(path);
    }

    /// Rank of the first value equal to `value`, if any.
    fn find(&self, value: &T) -> Result<Option<usize>> {
        self.cmp.admit(value)?;
        let path = self.descend(value, false)?;
        let (pred, pred_pos) = path[0];
        let candidate = self.arena.node(pred).next(0);
        let Some(found) = self.arena.value(candidate) else {
            return Ok(None);
        };
        // Nothing before the candidate is less than `value`, so it is equal
        // unless `value` is less than it.
        if self.cmp.less(value, found)? {
            return Ok(None);
        }
        return Ok(Some(pred_pos));
    }

    // --- Mutation ---

    /// Insert `value`. Equal values keep their insertion order.
    pub fn insert(&mut self, value: T) -> Result<()> {
        self.cmp.admit(&value)?;
        let path = self.descend(&value, true)?;

        let height = self.heights.next_height(self.max_height);
        let new_idx = self.arena.alloc(value, height)?;
        self.grow_head(height);

        let rank = path[0].1;
        let new_pos = rank + 1;
        let head_height = self.arena.head().height();

        for level in 0..head_height {
            let (pred, pred_pos) = path.get(level).copied().unwrap_or((HEAD, 0));
            if level < height {
                // Split the predecessor's link around the new node. Its old
                // target moves one position to the right.
                let old = self.arena.node(pred).links[level];
                let target_pos = pred_pos + old.width + 1;
                self.arena.node_mut(new_idx).links[level] = Link::new(old.next, target_pos - new_pos);
                self.arena.node_mut(pred).links[level] = Link::new(new_idx, new_pos - pred_pos);
            } else {
                self.arena.node_mut(pred).links[level].width += 1;
            }
        }

        self.len += 1;
        trace!("inserted at rank {} with height {}", rank, height);
        return Ok(());
    }

    /// Raise the head to `height` levels; new levels link straight to the end.
    fn grow_head(&mut self, height: usize) {
        let old_height = self.arena.head().height();
        if height <= old_height {
            return;
        }
        let span = self.len + 1;
        self.arena.head_mut().links.resize(height, Link::new(NIL, span));
        debug!("skip list head grew from {} to {} levels", old_height, height);
    }

    /// Remove the first value equal to `value` and return the stored value.
    pub fn remove(&mut self, value: &T) -> Result<T> {
        self.cmp.admit(value)?;
        let path = self.descend(value, false)?;
        let (pred, rank) = path[0];
        let target = self.arena.node(pred).next(0);
        let Some(found) = self.arena.value(target) else {
            return Err(Error::NotFound);
        };
        if self.cmp.less(value, found)? {
            return Err(Error::NotFound);
        }

        let target_height = self.arena.node(target).height();
        for (level, &(pred, _)) in path.iter().enumerate() {
            if level < target_height {
                // Every predecessor at the node's levels links to it directly.
                let gone = self.arena.node(target).links[level];
                let link = &mut self.arena.node_mut(pred).links[level];
                link.next = gone.next;
                link.width += gone.width - 1;
            } else {
                self.arena.node_mut(pred).links[level].width -= 1;
            }
        }

        self.len -= 1;
        trace!("removed rank {} with height {}", rank, target_height);
        return self.arena.release(target).ok_or(Error::NotFound);
    }

    /// Remove every value, keeping the comparator and height generator.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.len = 0;
    }

    /// Reseed this list's height generator.
    pub fn seed(&mut self, seed: u64) {
        self.heights.reseed(seed);
    }

    // --- Queries ---

    /// True if a value equal to `value` is present.
    pub fn has(&self, value: &T) -> Result<bool> {
        return Ok(self.find(value)?.is_some());
    }

    /// Rank of the first value equal to `value`.
    pub fn index(&self, value: &T) -> Result<usize> {
        return self.find(value)?.ok_or(Error::NotFound);
    }
}

impl<T, C> SkipList<T, C> {
    /// Number of values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of values; alias of [`SkipList::len`].
    pub fn size(&self) -> usize {
        self.len
    }

    /// Number of levels in the head, i.e. the tallest node ever allocated.
    pub fn height(&self) -> usize {
        self.arena.head().height()
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Value at `index`. Negative indices count back from the end.
    pub fn at(&self, index: i64) -> Result<&T> {
        let rank = self.rank_of(index)?;
        return self.arena.value(self.locate_rank(rank)).ok_or(Error::NotFound);
    }

    /// `length` consecutive values starting at rank `start`.
    pub fn at_seq(&self, start: usize, length: usize) -> Result<Vec<&T>> {
        if length == 0 {
            return Ok(Vec::new());
        }
        let in_range = start
            .checked_add(length)
            .is_some_and(|end| end <= self.len);
        if !in_range {
            return Err(Error::SequenceOutOfRange {
                start,
                length,
                size: self.len,
            });
        }

        let mut out = Vec::with_capacity(length);
        let mut idx = self.locate_rank(start);
        while out.len() < length {
            let Some(value) = self.arena.value(idx) else {
                break;
            };
            out.push(value);
            idx = self.arena.node(idx).next(0);
        }
        return Ok(out);
    }

    /// Number of levels of the node at `index`. Negative indices count back
    /// from the end.
    pub fn node_height(&self, index: i64) -> Result<usize> {
        let idx = self.node_at(index)?;
        return Ok(self.arena.node(idx).height());
    }

    /// Width of the link at `level` of the node at `index`.
    pub fn node_width(&self, index: i64, level: usize) -> Result<usize> {
        let node = self.arena.node(self.node_at(index)?);
        if level >= node.height() {
            return Err(Error::LevelOutOfRange {
                level,
                height: node.height(),
            });
        }
        return Ok(node.width(level));
    }

    /// Iterate values in sorted order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            list: self,
            current: self.arena.head().next(0),
            remaining: self.len,
        }
    }

    /// Estimate of the bytes used by this list, excluding heap data owned by
    /// the values themselves.
    pub fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() - std::mem::size_of::<Arena<T>>() + self.arena.size_of()
    }

    fn node_at(&self, index: i64) -> Result<Idx> {
        let rank = self.rank_of(index)?;
        return Ok(self.locate_rank(rank));
    }

    fn rank_of(&self, index: i64) -> Result<usize> {
        let size = i64::try_from(self.len).unwrap_or(i64::MAX);
        let rank = if index < 0 { index + size } else { index };
        if rank < 0 || rank >= size {
            return Err(Error::IndexOutOfRange {
                index,
                size: self.len,
            });
        }
        return Ok(rank as usize);
    }

    /// The node at rank `rank`, which must be below `len`.
    ///
    /// Only widths are consulted, never values.
    fn locate_rank(&self, rank: usize) -> Idx {
        let target = rank + 1;
        let mut idx = HEAD;
        let mut pos = 0usize;

        for level in (0..self.arena.head().height()).rev() {
            loop {
                let link = self.arena.node(idx).links[level];
                if link.next == NIL || pos + link.width > target {
                    break;
                }
                pos += link.width;
                idx = link.next;
            }
            if pos == target {
                break;
            }
        }

        idx
    }
}

pub struct Iter<'a, T, C> {
    list: &'a SkipList<T, C>,
    current: Idx,
    remaining: usize,
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.arena.value(self.current)?;
        self.current = self.list.arena.node(self.current).next(0);
        self.remaining = self.remaining.saturating_sub(1);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, C> IntoIterator for &'a SkipList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display, C> fmt::Display for SkipList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SkipList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
