//! A skip list shared between threads.
//!
//! One mutex guards the whole body of every operation, reads included, so
//! operations never overlap and the structure is sound between any two
//! calls. There is no reader/writer split.

use std::fmt;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use log::debug;

use crate::compare::Compare;
use crate::compare::Natural;
use crate::error::Result;
use crate::list::IntegrityCheck;
use crate::list::SkipList;
use crate::options::Options;
use crate::value::Predicate;
use crate::value::Value;
use crate::value::ValueKind;
use crate::value::ValueOrder;

/// A skip list whose values are chosen at run time from [`ValueKind`].
pub type ValueSkipList = SharedSkipList<Value, ValueOrder>;

pub struct SharedSkipList<T, C = Natural> {
    inner: Mutex<SkipList<T, C>>,
}

impl<T: PartialOrd> SharedSkipList<T, Natural> {
    pub fn new() -> Self {
        return SharedSkipList::from_list(SkipList::new());
    }
}

impl<T: PartialOrd> Default for SharedSkipList<T, Natural> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T, C> SharedSkipList<T, C> {
    pub fn from_list(list: SkipList<T, C>) -> Self {
        return SharedSkipList {
            inner: Mutex::new(list),
        };
    }

    pub fn into_inner(self) -> SkipList<T, C> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every mutation either completes or leaves the list untouched, so a
    /// poisoned lock still guards a sound list.
    fn lock(&self) -> MutexGuard<'_, SkipList<T, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access, for sequences of operations that must
    /// not interleave with other threads.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut SkipList<T, C>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn height(&self) -> usize {
        self.lock().height()
    }

    pub fn node_height(&self, index: i64) -> Result<usize> {
        self.lock().node_height(index)
    }

    pub fn node_width(&self, index: i64, level: usize) -> Result<usize> {
        self.lock().node_width(index, level)
    }

    pub fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() - std::mem::size_of::<SkipList<T, C>>() + self.lock().size_of()
    }
}

impl<T, C: Compare<T>> SharedSkipList<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        return SharedSkipList::from_list(SkipList::with_comparator(cmp));
    }

    pub fn with_options(cmp: C, options: Options) -> Result<Self> {
        return Ok(SharedSkipList::from_list(SkipList::with_options(cmp, options)?));
    }

    pub fn insert(&self, value: T) -> Result<()> {
        self.lock().insert(value)
    }

    /// Remove the first value equal to `value`, returning the stored value.
    pub fn remove(&self, value: &T) -> Result<T> {
        self.lock().remove(value)
    }

    pub fn has(&self, value: &T) -> Result<bool> {
        self.lock().has(value)
    }

    pub fn index(&self, value: &T) -> Result<usize> {
        self.lock().index(value)
    }

    pub fn lacks_integrity(&self) -> IntegrityCheck {
        self.lock().lacks_integrity()
    }

    pub fn seed(&self, seed: u64) {
        self.lock().seed(seed);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Lookups hand out clones, since references can not outlive the lock.
impl<T: Clone, C> SharedSkipList<T, C> {
    pub fn at(&self, index: i64) -> Result<T> {
        return self.lock().at(index).cloned();
    }

    pub fn at_seq(&self, start: usize, length: usize) -> Result<Vec<T>> {
        let list = self.lock();
        let values = list.at_seq(start, length)?;
        return Ok(values.into_iter().cloned().collect());
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.lock().iter().cloned().collect()
    }
}

impl<T: fmt::Display, C> SharedSkipList<T, C> {
    pub fn dot_file(&self) -> String {
        self.lock().dot_file()
    }
}

impl<T: fmt::Display, C> fmt::Display for SharedSkipList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.lock(), f)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SharedSkipList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedSkipList").field(&*self.lock()).finish()
    }
}

impl SharedSkipList<Value, ValueOrder> {
    /// An empty list bound to `kind`. Only the `Object` kind takes a
    /// predicate, and it requires one.
    pub fn with_kind(kind: ValueKind, predicate: Option<Predicate>) -> Result<Self> {
        let order = ValueOrder::new(kind, predicate)?;
        debug!("constructed skip list of kind {}", kind);
        return Ok(SharedSkipList::with_comparator(order));
    }

    /// As [`SharedSkipList::with_kind`], with the kind given by name.
    pub fn from_kind_name(name: &str, predicate: Option<Predicate>) -> Result<Self> {
        return SharedSkipList::with_kind(name.parse()?, predicate);
    }

    pub fn kind(&self) -> ValueKind {
        self.lock().comparator().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn basic_operations() {
        let list = SharedSkipList::new();
        for v in [3i64, 1, 2] {
            list.insert(v).unwrap();
        }
        assert_eq!(list.size(), 3);
        assert_eq!(list.at(-1), Ok(3));
        assert_eq!(list.at_seq(0, 3), Ok(vec![1, 2, 3]));
        assert_eq!(list.index(&2), Ok(1));
        assert_eq!(list.has(&4), Ok(false));
        assert_eq!(list.remove(&1), Ok(1));
        assert_eq!(list.to_string(), "[2, 3]");
        assert_eq!(list.lacks_integrity(), IntegrityCheck::Success);
    }

    #[test]
    fn kinds_by_name() {
        let list = ValueSkipList::from_kind_name("double", None).unwrap();
        assert_eq!(list.kind(), ValueKind::Float);
        assert_eq!(
            ValueSkipList::from_kind_name("str", None).unwrap_err(),
            Error::UnsupportedKind("str".to_string())
        );
        assert_eq!(
            ValueSkipList::with_kind(ValueKind::Object, None).unwrap_err(),
            Error::MissingComparator
        );
    }

    #[test]
    fn with_lock_is_atomic() {
        let list = Arc::new(SharedSkipList::new());
        let handles: Vec<_> = (0..4i64)
            .map(|t| {
                let list = Arc::clone(&list);
                thread::spawn(move || {
                    for i in 0..100 {
                        list.with_lock(|l| {
                            let v = t * 1000 + i;
                            l.insert(v).unwrap();
                            assert_eq!(l.remove(&v), Ok(v));
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(list.is_empty());
        assert_eq!(list.lacks_integrity(), IntegrityCheck::Success);
    }
}
