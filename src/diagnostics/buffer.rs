// SPDX-License-Identifier: MPL-2.0
//! Memory-bounded ring buffer for diagnostic events.

use std::collections::VecDeque;

/// Events kept before the oldest are evicted.
pub const DEFAULT_CAPACITY: usize = 500;

/// Fixed-capacity buffer; pushing into a full buffer evicts the oldest
/// element. Iteration is oldest first.
///
/// # Example
///
/// ```
/// use race_ana::diagnostics::CircularBuffer;
///
/// let mut buffer = CircularBuffer::new(2);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
///
/// let items: Vec<_> = buffer.iter().copied().collect();
/// assert_eq!(items, vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    /// Creates a buffer holding at most `capacity` elements (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T> Default for CircularBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_evicts_oldest() {
        let mut buffer = CircularBuffer::new(3);
        for i in 1..=5 {
            buffer.push(i);
        }
        let items: Vec<_> = buffer.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buffer = CircularBuffer::new(0);
        buffer.push("a");
        buffer.push("b");
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.iter().next(), Some(&"b"));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buffer: CircularBuffer<u8> = CircularBuffer::default();
        buffer.push(1);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
    }
}
