use std::fmt;

use crate::{Error, LinkedList, Result, list::Iter};

/// FIFO queue. Enqueue appends at the tail of a [`LinkedList`], dequeue
/// unlinks its head, so both ends are O(1).
pub struct Queue<T> {
    inner: LinkedList<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            inner: LinkedList::new(),
        }
    }

    pub fn bounded(limit: usize) -> Self {
        Self {
            inner: LinkedList::bounded(limit),
        }
    }

    pub fn enqueue(&mut self, value: T) -> Result<()> {
        self.inner.push_back(value)
    }

    pub fn dequeue(&mut self) -> Result<T> {
        self.inner.pop_front().ok_or(Error::EmptyQueue)
    }

    /// Returns the element that the next [`Queue::dequeue`] would remove.
    pub fn peek(&self) -> Result<&T> {
        self.inner.front().ok_or(Error::EmptyQueue)
    }

    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        self.inner.iter()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
