use std::fmt;

use crate::{Error, Result, Vector};

/// LIFO stack. The top is the last element of the underlying [`Vector`].
pub struct Stack<T> {
    inner: Vector<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self {
            inner: Vector::new(),
        }
    }

    /// Fixed capacity stack.
    pub fn bounded(limit: usize) -> Self {
        Self {
            inner: Vector::bounded(limit),
        }
    }

    /// Pushes `value` on top. Amortized O(1).
    pub fn push(&mut self, value: T) -> Result<()> {
        self.inner.push(value)
    }

    pub fn pop(&mut self) -> Result<T> {
        self.inner.pop().ok_or(Error::EmptyStack)
    }

    pub fn peek(&self) -> Result<&T> {
        self.inner.last().ok_or(Error::EmptyStack)
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

    /// Iterates from the top of the stack down.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.inner.iter().rev()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// The last item yielded ends up on top.
impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
