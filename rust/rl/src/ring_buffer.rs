use crate::{Error, Result};

/// Fixed-capacity circular buffer. Once full, each push overwrites the slot at the
/// write index, which then advances modulo the capacity.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: Vec<T>,
    capacity: usize,
    next: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                "ring buffer capacity must be positive".into(),
            ));
        }

        Ok(Self {
            items: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        })
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            self.items[self.next] = item;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Slot the next push writes to.
    pub fn write_index(&self) -> usize {
        self.next
    }

    /// Item in storage slot `index`, not in insertion order.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Items in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around_and_overwrites_oldest_slot() {
        let mut rb = RingBuffer::new(3).unwrap();
        for i in 0..3 {
            rb.push(i);
        }
        assert!(rb.is_full());
        assert_eq!(rb.write_index(), 0);

        rb.push(3);
        rb.push(4);
        assert_eq!(rb.as_slice(), &[3, 4, 2]);
        assert_eq!(rb.write_index(), 2);
        assert_eq!(rb.len(), 3);
    }

    #[test]
    fn write_index_is_push_count_modulo_capacity() {
        let mut rb = RingBuffer::new(4).unwrap();
        for i in 0..11 {
            rb.push(i);
            assert_eq!(rb.write_index(), (i + 1) % 4);
        }
        assert_eq!(rb.as_slice(), &[8, 9, 10, 7]);
    }

    #[test]
    fn clear_resets_write_index() {
        let mut rb = RingBuffer::new(2).unwrap();
        rb.push('a');
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.write_index(), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            RingBuffer::<u8>::new(0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
