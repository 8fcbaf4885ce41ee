//! Structural self-check.
//!
//! [`SkipList::lacks_integrity`] walks the whole structure and reports the
//! first violated invariant it finds. It never panics and never mutates the
//! list, so it is safe to call between any two operations, including from the
//! threads of a stress test.

use std::fmt;

use log::warn;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use super::SkipList;
use super::node::HEAD;
use super::node::Idx;
use super::node::NIL;
use crate::compare::Compare;

/// Result of a structural self-check. `Success` is zero; every failure has a
/// stable, non-zero code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum IntegrityCheck {
    Success = 0,

    // Widths of a single node.
    WidthZeroNotUnity = 100,
    WidthDecreasing = 101,

    // Links of a single node.
    NodeHeightZero = 200,
    NodeHeightExceedsHead = 201,
    NodeNonNilAfterNil = 202,
    NodeSelfReference = 203,
    NodeReferenceNotInList = 204,

    // The list as a whole.
    HeadCountMismatch = 301,
    HeadLevelWidthsMismatch = 302,
    HeadCyclicReference = 303,
    HeadOutOfOrder = 304,
}

impl IntegrityCheck {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_ok(self) -> bool {
        self == IntegrityCheck::Success
    }

    pub fn description(self) -> &'static str {
        match self {
            IntegrityCheck::Success => "structure is sound",
            IntegrityCheck::WidthZeroNotUnity => "level 0 width is not 1",
            IntegrityCheck::WidthDecreasing => "width decreases on a higher level",
            IntegrityCheck::NodeHeightZero => "node has no levels",
            IntegrityCheck::NodeHeightExceedsHead => "node is taller than the head",
            IntegrityCheck::NodeNonNilAfterNil => "link continues above a link to the end",
            IntegrityCheck::NodeSelfReference => "node links to itself",
            IntegrityCheck::NodeReferenceNotInList => "link targets a node outside the list",
            IntegrityCheck::HeadCountMismatch => "element count disagrees with the size",
            IntegrityCheck::HeadLevelWidthsMismatch => "widths disagree with element positions",
            IntegrityCheck::HeadCyclicReference => "a level contains a cycle",
            IntegrityCheck::HeadOutOfOrder => "values are out of order",
        }
    }
}

impl fmt::Display for IntegrityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

impl<T, C: Compare<T>> SkipList<T, C> {
    /// Check every structural invariant. Returns [`IntegrityCheck::Success`]
    /// for a sound list, otherwise the first violation found.
    pub fn lacks_integrity(&self) -> IntegrityCheck {
        let result = self.check_integrity();
        if !result.is_ok() {
            warn!("skip list of {} values lacks integrity: {}", self.len, result);
        }
        result
    }

    fn check_integrity(&self) -> IntegrityCheck {
        let live = self.live_slots();

        if let Err(check) = self.check_heights(&live) {
            return check;
        }
        if let Err(check) = self.check_links(&live) {
            return check;
        }
        if let Err(check) = self.check_acyclic() {
            return check;
        }
        let positions = match self.check_count(&live) {
            Ok(positions) => positions,
            Err(check) => return check,
        };
        if let Err(check) = self.check_widths(&positions) {
            return check;
        }
        if let Err(check) = self.check_order() {
            return check;
        }
        IntegrityCheck::Success
    }

    /// The head followed by every slot currently holding a value.
    fn live_slots(&self) -> Vec<Idx> {
        let mut slots = vec![HEAD];
        slots.extend((1..self.arena.slots() as Idx).filter(|&idx| self.arena.is_live(idx)));
        slots
    }

    // --- Per-node checks ---

    fn check_heights(&self, live: &[Idx]) -> Result<(), IntegrityCheck> {
        let head_height = self.arena.head().height();
        if head_height == 0 {
            return Err(IntegrityCheck::NodeHeightZero);
        }
        for &idx in live {
            let height = self.arena.node(idx).height();
            if height == 0 {
                return Err(IntegrityCheck::NodeHeightZero);
            }
            if height > head_height {
                return Err(IntegrityCheck::NodeHeightExceedsHead);
            }
        }
        return Ok(());
    }

    fn check_links(&self, live: &[Idx]) -> Result<(), IntegrityCheck> {
        for &idx in live {
            let links = &self.arena.node(idx).links;
            for (level, link) in links.iter().enumerate() {
                if link.next == idx {
                    return Err(IntegrityCheck::NodeSelfReference);
                }
                if level == 0 {
                    if link.width != 1 {
                        return Err(IntegrityCheck::WidthZeroNotUnity);
                    }
                } else {
                    let below = links[level - 1];
                    if below.next == NIL && link.next != NIL {
                        return Err(IntegrityCheck::NodeNonNilAfterNil);
                    }
                    if link.width < below.width {
                        return Err(IntegrityCheck::WidthDecreasing);
                    }
                }
                if link.next != NIL {
                    let reaches = self
                        .arena
                        .get(link.next)
                        .is_some_and(|target| target.value.is_some() && target.height() > level);
                    if !reaches {
                        return Err(IntegrityCheck::NodeReferenceNotInList);
                    }
                }
            }
        }
        return Ok(());
    }

    // --- Whole-list checks ---

    /// No level may revisit a node. A chain of distinct nodes is shorter
    /// than the arena.
    fn check_acyclic(&self) -> Result<(), IntegrityCheck> {
        let limit = self.arena.slots();
        for level in 0..self.arena.head().height() {
            let mut idx = self.arena.head().next(level);
            let mut steps = 0usize;
            while idx != NIL {
                steps += 1;
                if steps > limit {
                    return Err(IntegrityCheck::HeadCyclicReference);
                }
                idx = self.arena.node(idx).next(level);
            }
        }
        return Ok(());
    }

    /// Every live node must sit on level 0, and there must be `len` of them.
    /// Returns the position of each node.
    fn check_count(&self, live: &[Idx]) -> Result<FxHashMap<Idx, usize>, IntegrityCheck> {
        let mut positions = FxHashMap::default();
        positions.insert(HEAD, 0);
        let mut seen = FxHashSet::default();
        let mut idx = self.arena.head().next(0);
        while idx != NIL {
            seen.insert(idx);
            positions.insert(idx, seen.len());
            idx = self.arena.node(idx).next(0);
        }
        if seen.len() != self.len || live.len() - 1 != self.len {
            return Err(IntegrityCheck::HeadCountMismatch);
        }
        return Ok(positions);
    }

    /// At every level each link must span exactly the positions between its
    /// ends, and the spans must add up to `len + 1`.
    fn check_widths(&self, positions: &FxHashMap<Idx, usize>) -> Result<(), IntegrityCheck> {
        let end = self.len + 1;
        for level in 0..self.arena.head().height() {
            let mut idx = HEAD;
            let mut pos = 0usize;
            loop {
                let link = self.arena.node(idx).links[level];
                pos += link.width;
                if link.next == NIL {
                    break;
                }
                if positions.get(&link.next) != Some(&pos) {
                    return Err(IntegrityCheck::HeadLevelWidthsMismatch);
                }
                idx = link.next;
            }
            if pos != end {
                return Err(IntegrityCheck::HeadLevelWidthsMismatch);
            }
        }
        return Ok(());
    }

    fn check_order(&self) -> Result<(), IntegrityCheck> {
        let mut values = self.iter();
        let Some(mut prev) = values.next() else {
            return Ok(());
        };
        for value in values {
            match self.cmp.less(value, prev) {
                Ok(false) => prev = value,
                _ => return Err(IntegrityCheck::HeadOutOfOrder),
            }
        }
        return Ok(());
    }
}
