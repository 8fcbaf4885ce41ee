//! The less-than relation a skip list is ordered by.
//!
//! Comparisons are fallible so that user predicates can report operands they
//! do not understand at the point of the comparison. A value that does not
//! compare equal to itself (NaN being the canonical case) can not be placed
//! in an ordering and is rejected by [`Compare::admit`] before any search.

use std::cmp::Ordering;

use crate::error::CompareError;
use crate::error::Error;

/// A strict weak ordering over `T`.
pub trait Compare<T: ?Sized> {
    /// Returns true if `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> Result<bool, CompareError>;

    /// Checks that `value` can take part in the ordering.
    fn admit(&self, value: &T) -> Result<(), Error> {
        if self.less(value, value)? {
            return Err(Error::Unorderable);
        }
        return Ok(());
    }
}

/// The natural ordering of any `PartialOrd` type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: PartialOrd + ?Sized> Compare<T> for Natural {
    fn less(&self, a: &T, b: &T) -> Result<bool, CompareError> {
        return Ok(a < b);
    }

    fn admit(&self, value: &T) -> Result<(), Error> {
        match value.partial_cmp(value) {
            Some(Ordering::Equal) => Ok(()),
            _ => Err(Error::Unorderable),
        }
    }
}

/// Orders values with an infallible less-than closure.
pub struct ByPredicate<F>(pub F);

impl<T: ?Sized, F> Compare<T> for ByPredicate<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, a: &T, b: &T) -> Result<bool, CompareError> {
        return Ok((self.0)(a, b));
    }
}
