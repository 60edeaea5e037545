//! Bounded rolling history owned by an estimator instance.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent accepted estimates.
///
/// Pushing into a full history drops the oldest entry. A capacity of zero
/// keeps nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// Create an empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl History<f32> {
    /// Median of the stored values (mean of the middle pair for even counts).
    pub fn median(&self) -> Option<f32> {
        if self.entries.is_empty() {
            return None;
        }
        let mut sorted: Vec<f32> = self.entries.iter().copied().collect();
        sorted.sort_by(f32::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }
}

impl<const N: usize> History<[f32; N]> {
    /// Element-wise mean of the stored arrays.
    pub fn mean(&self) -> Option<[f32; N]> {
        if self.entries.is_empty() {
            return None;
        }
        let mut sum = [0.0f32; N];
        for entry in &self.entries {
            for (acc, v) in sum.iter_mut().zip(entry) {
                *acc += v;
            }
        }
        let count = self.entries.len() as f32;
        Some(sum.map(|v| v / count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = History::new(3);
        for v in 1..=5 {
            history.push(v);
        }
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(history.latest(), Some(&5));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = History::new(0);
        history.push(1.0f32);
        assert!(history.is_empty());
    }

    #[test]
    fn median_odd_and_even() {
        let mut history = History::new(5);
        assert_eq!(history.median(), None);
        for v in [300.0, 100.0, 200.0] {
            history.push(v);
        }
        assert_eq!(history.median(), Some(200.0));
        history.push(400.0);
        assert_eq!(history.median(), Some(250.0));
    }

    #[test]
    fn mean_of_pairs() {
        let mut history = History::new(5);
        history.push([400.0, 1000.0]);
        history.push([600.0, 1400.0]);
        assert_eq!(history.mean(), Some([500.0, 1200.0]));
        history.clear();
        assert_eq!(history.mean(), None);
    }
}
