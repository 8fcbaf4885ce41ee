//! Rolling medians over a sliding window.
//!
//! The window's values sit in a skip list, so each step is one insert, one
//! rank lookup and one remove: O(log w) per value rather than a sort per
//! window.

use std::collections::VecDeque;

use crate::error::Error;
use crate::error::Result;
use crate::list::SkipList;

/// A streaming median over the last `length` values pushed.
pub struct RollingMedian<T> {
    list: SkipList<T>,
    window: VecDeque<T>,
    length: usize,
}

impl<T: PartialOrd + Clone> RollingMedian<T> {
    pub fn new(length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::WindowLength);
        }
        return Ok(RollingMedian {
            list: SkipList::new(),
            window: VecDeque::with_capacity(length),
            length,
        });
    }

    pub fn window_length(&self) -> usize {
        self.length
    }

    /// Add `value`. Once the window is full, returns the value at rank
    /// `length / 2` of the window, the upper middle value for even lengths,
    /// and drops the oldest value.
    pub fn push(&mut self, value: T) -> Result<Option<T>> {
        self.list.insert(value.clone())?;
        self.window.push_back(value);
        if self.window.len() < self.length {
            return Ok(None);
        }
        let median = self.list.at((self.length / 2) as i64)?.clone();
        self.evict()?;
        return Ok(Some(median));
    }

    fn evict(&mut self) -> Result<()> {
        if let Some(oldest) = self.window.pop_front() {
            self.list.remove(&oldest)?;
        }
        return Ok(());
    }
}

/// Median of every full window of `window` consecutive values in `src`,
/// taking rank `window / 2` of each. Yields `src.len() - window + 1` values,
/// or none when `src` is shorter than the window.
pub fn rolling_median<T: PartialOrd + Clone>(src: &[T], window: usize) -> Result<Vec<T>> {
    let mut median = RollingMedian::new(window)?;
    let mut out = Vec::with_capacity(src.len().saturating_sub(window) + 1);
    for value in src {
        if let Some(m) = median.push(value.clone())? {
            out.push(m);
        }
    }
    return Ok(out);
}

/// As [`rolling_median`], but for even windows the result is the mean of
/// the two middle values.
pub fn rolling_median_mean(src: &[f64], window: usize) -> Result<Vec<f64>> {
    if window % 2 == 1 {
        return rolling_median(src, window);
    }
    if window == 0 {
        return Err(Error::WindowLength);
    }

    let mut list = SkipList::new();
    let mut out = Vec::with_capacity(src.len().saturating_sub(window) + 1);
    for (i, &value) in src.iter().enumerate() {
        list.insert(value)?;
        if i + 1 >= window {
            let middle = list.at_seq((window - 1) / 2, 2)?;
            // Halve first so the sum of two large values can not overflow.
            out.push(middle[0] / 2.0 + middle[1] / 2.0);
            list.remove(&src[i + 1 - window])?;
        }
    }
    return Ok(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(rolling_median::<i64>(&[1, 2], 0).unwrap_err(), Error::WindowLength);
        assert_eq!(rolling_median_mean(&[1.0], 0).unwrap_err(), Error::WindowLength);
        assert!(RollingMedian::<i64>::new(0).is_err());
    }

    #[test]
    fn odd_window() {
        let src = [1i64, 5, 3, 8, 2, 7, 4];
        assert_eq!(rolling_median(&src, 3).unwrap(), vec![3, 5, 3, 7, 4]);
    }

    #[test]
    fn even_window_takes_upper_middle() {
        let src = [4i64, 1, 3, 2];
        // Windows [4, 1] [1, 3] [3, 2], sorted: [1, 4] [1, 3] [2, 3].
        assert_eq!(rolling_median(&src, 2).unwrap(), vec![4, 3, 3]);
    }

    #[test]
    fn even_window_mean() {
        let src = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(rolling_median_mean(&src, 2).unwrap(), vec![2.5, 2.0, 2.5]);
        assert_eq!(rolling_median_mean(&src, 4).unwrap(), vec![2.5]);
        assert_eq!(rolling_median_mean(&src, 3).unwrap(), vec![3.0, 2.0]);
    }

    #[test]
    fn mean_of_extremes_does_not_overflow() {
        let src = [f64::MAX, f64::MAX];
        assert_eq!(rolling_median_mean(&src, 2).unwrap(), vec![f64::MAX]);
    }

    #[test]
    fn short_source_yields_nothing() {
        assert_eq!(rolling_median(&[1i64, 2], 5).unwrap(), Vec::<i64>::new());
        assert_eq!(rolling_median_mean(&[1.0, 2.0], 4).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn window_of_one_is_identity() {
        let src = [3i64, 1, 2];
        assert_eq!(rolling_median(&src, 1).unwrap(), src.to_vec());
    }

    #[test]
    fn matches_sorting_each_window() {
        let src: Vec<i64> = (0..200).map(|i| (i * 7919) % 113).collect();
        for window in [1, 2, 5, 16, 31] {
            let expected: Vec<i64> = src
                .windows(window)
                .map(|w| {
                    let mut sorted = w.to_vec();
                    sorted.sort();
                    sorted[window / 2]
                })
                .collect();
            assert_eq!(rolling_median(&src, window).unwrap(), expected);
        }
    }

    #[test]
    fn nan_is_rejected() {
        assert_eq!(
            rolling_median(&[1.0, f64::NAN, 2.0], 2).unwrap_err(),
            Error::Unorderable
        );
    }

    #[test]
    fn streaming() {
        let mut median = RollingMedian::new(3).unwrap();
        assert_eq!(median.window_length(), 3);
        assert_eq!(median.push(9), Ok(None));
        assert_eq!(median.push(1), Ok(None));
        assert_eq!(median.push(5), Ok(Some(5)));
        assert_eq!(median.push(0), Ok(Some(1)));
    }
}
