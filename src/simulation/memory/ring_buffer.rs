//! Fixed-capacity FIFO used for the memory window and the location trail.

/// A circular buffer that hands back the oldest element when it overflows.
///
/// Capacity is chosen at runtime so the window length can come from
/// configuration. A zero-capacity buffer stores nothing.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    head: usize,
    len: usize,
}

impl<T: Default + Copy> RingBuffer<T> {
    /// Creates a new empty ring buffer holding at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity],
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of items held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Pushes a new item, returning the evicted oldest item if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Some(item);
        }
        let evicted = if self.len == capacity {
            Some(self.buffer[self.head])
        } else {
            self.len += 1;
            None
        };
        self.buffer[self.head] = item;
        self.head = (self.head + 1) % capacity;
        evicted
    }

    /// Returns the number of items currently in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over items from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let capacity = self.capacity().max(1);
        let start = (self.head + capacity - self.len) % capacity;
        (0..self.len).map(move |index| &self.buffer[(start + index) % capacity])
    }

    /// Clears the buffer.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_len() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(4);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());

        assert_eq!(buf.push(1), None);
        assert_eq!(buf.len(), 1);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_overflow_returns_oldest() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.push(4), Some(1));

        assert_eq!(buf.len(), 3);
        let items: Vec<_> = buf.iter().copied().collect();
        assert_eq!(items, vec![2, 3, 4]); // Oldest is now 2
    }

    #[test]
    fn test_iter_before_wrap() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(4);
        buf.push(10);
        buf.push(20);
        buf.push(30);

        let items: Vec<_> = buf.iter().copied().collect();
        assert_eq!(items, vec![10, 20, 30]);
    }

    #[test]
    fn test_iter_after_overflow() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(3);
        for i in 1..=5 {
            buf.push(i);
        }

        let collected: Vec<_> = buf.iter().copied().collect();
        assert_eq!(collected, vec![3, 4, 5]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(0);
        assert_eq!(buf.push(7), Some(7));
        assert!(buf.is_empty());
        assert_eq!(buf.iter().count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut buf: RingBuffer<i32> = RingBuffer::new(4);
        buf.push(1);
        buf.push(2);
        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.iter().count(), 0);
    }
}
