//! Array-backed binary min-heap.
//!
//! The tree is stored level by level in a [`Vector`]: the children of
//! position `i` live at `2i + 1` and `2i + 2`, its parent at `(i - 1) / 2`.
//! Every parent compares less than or equal to its children, so the minimum
//! is always at position 0.
//!
//! For max-heap behaviour store [`std::cmp::Reverse`] values.

use std::fmt;

use crate::{Error, Result, Vector};

#[inline]
fn parent(pos: usize) -> usize {
    (pos - 1) / 2
}

#[inline]
fn left_child(pos: usize) -> usize {
    2 * pos + 1
}

pub struct MinHeap<T> {
    data: Vector<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self {
            data: Vector::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vector::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at array position `index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.data.as_slice().get(index).ok_or(Error::OutOfRange {
            index,
            len: self.data.len(),
        })
    }

    /// The heap array in storage order.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Ord> MinHeap<T> {
    /// Returns the smallest element. O(1).
    pub fn peek_min(&self) -> Result<&T> {
        self.data.first().ok_or(Error::EmptyHeap)
    }

    /// Adds `value` at the next free slot and sifts it up. O(log n).
    pub fn insert(&mut self, value: T) {
        self.data.push_unbounded(value);
        self.sift_up(self.data.len() - 1);
    }

    /// Removes and returns the smallest element. O(log n).
    pub fn extract_min(&mut self) -> Result<T> {
        let mut last = self.data.pop().ok_or(Error::EmptyHeap)?;
        if let Some(root) = self.data.first_mut() {
            std::mem::swap(root, &mut last);
            self.sift_down(0);
        }
        Ok(last)
    }

    /// Lowers the element at `index` to `new_value` and restores heap order.
    ///
    /// Raising an element is rejected with [`Error::InvalidArgument`] and
    /// leaves the heap untouched.
    pub fn decrease_key(&mut self, index: usize, new_value: T) -> Result<()> {
        let len = self.data.len();
        let Some(current) = self.data.get_mut(index) else {
            return Err(Error::OutOfRange { index, len });
        };
        if new_value > *current {
            return Err(Error::InvalidArgument(
                "new value is greater than current value",
            ));
        }
        *current = new_value;
        self.sift_up(index);
        Ok(())
    }

    /// Removes and returns the element at array position `index`. O(log n).
    ///
    /// The last element takes its place and is sifted whichever way the
    /// heap order requires.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let len = self.data.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        self.data.swap(index, len - 1);
        let removed = self.data.pop().ok_or(Error::EmptyHeap)?;
        if index < self.data.len() {
            self.sift_up(index);
            self.sift_down(index);
        }
        Ok(removed)
    }

    /// Consumes the heap, returning its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Ok(min) = self.extract_min() {
            sorted.push(min);
        }
        sorted
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = parent(pos);
            if self.data[pos] >= self.data[parent] {
                break;
            }
            self.data.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.data.len();
        loop {
            let left = left_child(pos);
            if left >= len {
                break;
            }
            // Equal children: either one keeps the heap valid.
            let right = left + 1;
            let child = if right < len && self.data[right] < self.data[left] {
                right
            } else {
                left
            };
            if self.data[child] >= self.data[pos] {
                break;
            }
            self.data.swap(pos, child);
            pos = child;
        }
    }

    /// Bottom-up heap construction, O(n).
    fn heapify(&mut self) {
        for pos in (0..self.data.len() / 2).rev() {
            self.sift_down(pos);
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for MinHeap<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MinHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: Ord> From<Vec<T>> for MinHeap<T> {
    fn from(value: Vec<T>) -> Self {
        let mut heap = Self {
            data: Vector::from(value),
        };
        heap.heapify();
        heap
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self {
            data: iter.into_iter().collect(),
        };
        heap.heapify();
        heap
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::MinHeap;
    use crate::Error;

    fn assert_heap_order<T: Ord>(heap: &MinHeap<T>) {
        let data = heap.as_slice();
        for pos in 1..data.len() {
            assert!(data[(pos - 1) / 2] <= data[pos], "heap order violated at {pos}");
        }
    }

    #[test]
    fn new_is_empty() {
        let mut heap = MinHeap::<i32>::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek_min(), Err(Error::EmptyHeap));
        assert_eq!(heap.extract_min(), Err(Error::EmptyHeap));
    }

    #[test]
    fn insert_then_extract() {
        let mut heap = MinHeap::new();
        for value in [7, 2, 9, 1] {
            heap.insert(value);
        }

        assert_eq!(heap.peek_min(), Ok(&1));
        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.extract_min(), Ok(2));
        assert_eq!(heap.extract_min(), Ok(7));
        assert_eq!(heap.extract_min(), Ok(9));
        assert_eq!(heap.extract_min(), Err(Error::EmptyHeap));
    }

    #[test]
    fn duplicates() {
        let mut heap: MinHeap<_> = [3, 1, 3, 1, 2].into_iter().collect();
        assert_heap_order(&heap);
        assert_eq!(heap.len(), 5);
        heap.insert(1);
        assert_eq!(heap.into_sorted_vec(), vec![1, 1, 1, 2, 3, 3]);
    }

    #[test]
    fn decrease_key() {
        let mut heap = MinHeap::from(vec![10, 20, 30, 40, 50]);
        let index = heap.as_slice().iter().position(|v| *v == 50).unwrap();

        heap.decrease_key(index, 5).unwrap();
        assert_eq!(heap.peek_min(), Ok(&5));
        assert_heap_order(&heap);

        // Equal value is allowed and changes nothing.
        heap.decrease_key(0, 5).unwrap();
        assert_eq!(heap.len(), 5);
    }

    #[test]
    fn decrease_key_errors() {
        let mut heap = MinHeap::from(vec![1, 2, 3]);
        let before = heap.as_slice().to_vec();

        assert_eq!(
            heap.decrease_key(1, 100),
            Err(Error::InvalidArgument("new value is greater than current value"))
        );
        assert_eq!(
            heap.decrease_key(3, 0),
            Err(Error::OutOfRange { index: 3, len: 3 })
        );
        assert_eq!(heap.as_slice(), before.as_slice());
    }

    #[test]
    fn get() {
        let heap = MinHeap::from(vec![4, 8]);
        assert_eq!(heap.get(0), Ok(&4));
        assert_eq!(heap.get(2), Err(Error::OutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn max_heap_with_reverse() {
        let mut heap = MinHeap::new();
        for value in [7, 2, 9, 1] {
            heap.insert(Reverse(value));
        }
        assert_eq!(heap.extract_min(), Ok(Reverse(9)));
        assert_eq!(heap.peek_min(), Ok(&Reverse(7)));
    }

    #[test]
    fn stress_push_pop() {
        let mut rng = SmallRng::seed_from_u64(99999);
        let mut heap = MinHeap::new();
        let mut model: Vec<u32> = Vec::new();

        for _ in 0..5_000 {
            if rng.random_range(0..100) < 60 {
                let value = rng.random_range(0..10_000);
                heap.insert(value);
                model.push(value);
            } else {
                let expected = model.iter().min().copied();
                if let Some(min) = expected {
                    let pos = model.iter().position(|v| *v == min).unwrap();
                    model.swap_remove(pos);
                }
                assert_eq!(heap.extract_min().ok(), expected);
            }
            assert_eq!(heap.peek_min().ok(), model.iter().min());
        }
        assert_heap_order(&heap);

        let mut previous = None;
        while let Ok(value) = heap.extract_min() {
            assert!(previous <= Some(value));
            previous = Some(value);
        }
    }

    #[test]
    fn remove_arbitrary() {
        let mut heap = MinHeap::from(vec![1, 5, 2, 6, 7, 3, 4]);

        assert_eq!(heap.remove(7), Err(Error::OutOfRange { index: 7, len: 7 }));

        // Removing an inner node pulls the last element in and sifts it.
        let index = heap.as_slice().iter().position(|v| *v == 5).unwrap();
        assert_eq!(heap.remove(index), Ok(5));
        assert_heap_order(&heap);

        // Removing the root and the last slot.
        assert_eq!(heap.remove(0), Ok(1));
        let last = heap.len() - 1;
        let expected = heap.as_slice()[last];
        assert_eq!(heap.remove(last), Ok(expected));
        assert_heap_order(&heap);
        assert_eq!(heap.len(), 4);
    }

    #[test]
    fn stress_remove() {
        let mut rng = SmallRng::seed_from_u64(4242);
        let mut heap = MinHeap::new();
        let mut model: Vec<u32> = Vec::new();

        for _ in 0..5_000 {
            if model.is_empty() || rng.random_range(0..100) < 55 {
                let value = rng.random_range(0..1_000);
                heap.insert(value);
                model.push(value);
            } else {
                let index = rng.random_range(0..heap.len());
                let removed = heap.remove(index).unwrap();
                let pos = model.iter().position(|v| *v == removed).unwrap();
                model.swap_remove(pos);
                assert_heap_order(&heap);
            }
            assert_eq!(heap.len(), model.len());
            assert_eq!(heap.peek_min().ok(), model.iter().min());
        }

        model.sort();
        assert_eq!(heap.into_sorted_vec(), model);
    }

    #[test]
    fn with_capacity_and_clear() {
        let mut heap = MinHeap::with_capacity(16);
        assert!(heap.is_empty());
        heap.insert(3);
        heap.insert(1);
        assert_eq!(heap.len(), 2);

        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.peek_min(), Err(Error::EmptyHeap));
        heap.insert(2);
        assert_eq!(heap.peek_min(), Ok(&2));
    }

    #[test]
    fn heapify_random() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let values: Vec<i64> = (0..1_000).map(|_| rng.random_range(-500..500)).collect();

        let heap = MinHeap::from(values.clone());
        assert_heap_order(&heap);

        let mut sorted = values;
        sorted.sort();
        assert_eq!(heap.into_sorted_vec(), sorted);
    }
}
