use crate::Result;

/// The List ADT: an ordered collection with positional access.
///
/// Valid positions are `0..size()`. [`List::insert`] additionally accepts
/// `size()` to append.
pub trait List<T> {
    /// Returns a reference to the element at `index`.
    fn get(&self, index: usize) -> Result<&T>;

    /// Inserts `value` at `index`, shifting every element at or after it one
    /// position later.
    fn insert(&mut self, index: usize, value: T) -> Result<()>;

    /// Removes the first element equal to `value` and returns it.
    fn remove(&mut self, value: &T) -> Result<T>
    where
        T: PartialEq;

    /// Removes and returns the element at `index`.
    fn remove_at(&mut self, index: usize) -> Result<T>;

    /// Replaces the element at `index`, returning the previous one.
    fn replace(&mut self, index: usize, value: T) -> Result<T>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Only a bounded container can ever be full.
    fn is_full(&self) -> bool;

    fn push_back(&mut self, value: T) -> Result<()> {
        self.insert(self.size(), value)
    }

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        (0..self.size()).any(|i| self.get(i).is_ok_and(|elem| elem == value))
    }
}
