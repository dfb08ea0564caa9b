use std::{
    alloc, fmt, marker, mem,
    ops::{Deref, DerefMut},
    ptr,
    ptr::NonNull,
};

use crate::{Error, List, Result};

/// Buffer of fixed capacity that stores the values.
struct Buffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: marker::PhantomData<T>,
}

unsafe impl<T: Send> Send for Buffer<T> {}
unsafe impl<T: Sync> Sync for Buffer<T> {}

fn layout<T>(cap: usize) -> alloc::Layout {
    match alloc::Layout::array::<T>(cap) {
        Ok(layout) => layout,
        Err(_) => panic!("capacity overflow"),
    }
}

impl<T> Buffer<T> {
    /// Creates a buffer with zero capacity. Zero sized types never allocate,
    /// so their capacity is unlimited from the start.
    fn new() -> Self {
        let cap = if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            0
        };

        Self {
            ptr: NonNull::dangling(),
            cap,
            _marker: marker::PhantomData,
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        if capacity > buf.cap {
            buf.grow_to(capacity);
        }
        buf
    }

    /// Allocates a buffer of one element if the capacity is zero, otherwise
    /// doubles the capacity.
    fn grow(&mut self) {
        let new_cap = if self.cap == 0 {
            1
        } else {
            match self.cap.checked_mul(2) {
                Some(cap) => cap,
                None => panic!("capacity overflow"),
            }
        };
        self.grow_to(new_cap);
    }

    /// `new_cap` must be greater than the current capacity.
    fn grow_to(&mut self, new_cap: usize) {
        // Zero sized types report usize::MAX capacity and never get here.
        assert!(mem::size_of::<T>() != 0, "capacity overflow");
        debug_assert!(new_cap > self.cap);

        let new_layout = layout::<T>(new_cap);
        let new_ptr = if self.cap == 0 {
            unsafe { alloc::alloc(new_layout) }
        } else {
            unsafe {
                alloc::realloc(
                    self.ptr.as_ptr() as *mut u8,
                    layout::<T>(self.cap),
                    new_layout.size(),
                )
            }
        };

        self.ptr = match NonNull::new(new_ptr as *mut T) {
            Some(ptr) => ptr,
            None => alloc::handle_alloc_error(new_layout),
        };

        self.cap = new_cap;
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        if self.cap != 0 && mem::size_of::<T>() != 0 {
            unsafe {
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout::<T>(self.cap));
            }
        }
    }
}

/// List data structure stored as a contiguous array.
///
/// Growth doubles the buffer, so [`Vector::push`] is amortized O(1) while
/// [`List::insert`] and [`List::remove_at`] shift the trailing elements.
/// A vector created with [`Vector::bounded`] refuses to grow past its limit.
pub struct Vector<T> {
    buf: Buffer<T>,
    len: usize,
    limit: Option<usize>,
}

impl<T> Vector<T> {
    fn ptr(&self) -> *mut T {
        self.buf.ptr.as_ptr()
    }

    /// Creates an empty, unbounded vector without allocating.
    pub fn new() -> Self {
        Self {
            buf: Buffer::new(),
            len: 0,
            limit: None,
        }
    }

    /// Creates an empty, unbounded vector with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Buffer::with_capacity(capacity),
            len: 0,
            limit: None,
        }
    }

    /// Creates an empty vector that holds at most `limit` elements.
    pub fn bounded(limit: usize) -> Self {
        Self {
            buf: Buffer::new(),
            len: 0,
            limit: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buf.cap
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.len >= limit)
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn check_limit(&self) -> Result<()> {
        match self.limit {
            Some(limit) if self.len >= limit => Err(Error::CapacityExceeded { limit }),
            _ => Ok(()),
        }
    }

    /// Appends `value`, ignoring the limit.
    pub(crate) fn push_unbounded(&mut self, value: T) {
        if self.len == self.buf.cap {
            self.buf.grow();
        }

        unsafe {
            ptr::write(self.ptr().add(self.len), value);
        }

        self.len += 1;
    }

    /// Appends `value` at the end.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.check_limit()?;
        self.push_unbounded(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            unsafe { Some(ptr::read(self.ptr().add(self.len))) }
        }
    }

    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    /// Linear search for the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|elem| elem == value)
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::OutOfRange {
            index,
            len: self.len,
        }
    }
}

impl<T> List<T> for Vector<T> {
    fn get(&self, index: usize) -> Result<&T> {
        self.as_slice()
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(self.out_of_range(index));
        }
        self.check_limit()?;

        if self.buf.cap == self.len {
            self.buf.grow();
        }

        unsafe {
            ptr::copy(
                self.ptr().add(index),
                self.ptr().add(index + 1),
                self.len - index,
            );

            ptr::write(self.ptr().add(index), value);
        }

        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, value: &T) -> Result<T>
    where
        T: PartialEq,
    {
        let index = self.find(value).ok_or(Error::NotFound)?;
        self.remove_at(index)
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(self.out_of_range(index));
        }

        unsafe {
            let value = ptr::read(self.ptr().add(index));

            ptr::copy(
                self.ptr().add(index + 1),
                self.ptr().add(index),
                self.len - index - 1,
            );

            self.len -= 1;
            Ok(value)
        }
    }

    fn replace(&mut self, index: usize, value: T) -> Result<T> {
        let len = self.len;
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => Ok(mem::replace(slot, value)),
            None => Err(Error::OutOfRange { index, len }),
        }
    }

    fn size(&self) -> usize {
        self.len
    }

    fn is_full(&self) -> bool {
        Vector::is_full(self)
    }

    fn push_back(&mut self, value: T) -> Result<()> {
        self.push(value)
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        unsafe { std::slice::from_raw_parts(self.ptr(), self.len) }
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { std::slice::from_raw_parts_mut(self.ptr(), self.len) }
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        let mut vec = Vector::with_capacity(self.len);
        vec.limit = self.limit;
        for elem in self.iter() {
            vec.push_unbounded(elem.clone());
        }
        vec
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut vec = Vector::with_capacity(iter.size_hint().0);
        for value in iter {
            vec.push_unbounded(value);
        }
        vec
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(value: Vec<T>) -> Self {
        value.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        unsafe {
            let iter = RawIter::new(&self);

            let buf = ptr::read(&self.buf);

            mem::forget(self);

            IntoIter { iter, _buf: buf }
        }
    }
}

struct RawIter<T> {
    start: *const T,
    end: *const T,
}

impl<T> RawIter<T> {
    fn new(slice: &[T]) -> Self {
        let start = slice.as_ptr();
        let end = if mem::size_of::<T>() == 0 {
            // Zero sized elements all live at the same address; count with bytes.
            start.wrapping_byte_add(slice.len())
        } else {
            unsafe { start.add(slice.len()) }
        };
        RawIter { start, end }
    }
}

impl<T> Iterator for RawIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        unsafe {
            if mem::size_of::<T>() == 0 {
                self.start = self.start.wrapping_byte_add(1);
                Some(ptr::read(NonNull::<T>::dangling().as_ptr()))
            } else {
                let old_ptr = self.start;
                self.start = self.start.add(1);
                Some(ptr::read(old_ptr))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let bytes = self.end as usize - self.start as usize;
        let len = bytes / mem::size_of::<T>().max(1);
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for RawIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        unsafe {
            if mem::size_of::<T>() == 0 {
                self.end = self.end.wrapping_byte_sub(1);
                Some(ptr::read(NonNull::<T>::dangling().as_ptr()))
            } else {
                self.end = self.end.sub(1);
                Some(ptr::read(self.end))
            }
        }
    }
}

/// Owning iterator returned by `Vector::into_iter`.
pub struct IntoIter<T> {
    _buf: Buffer<T>,
    iter: RawIter<T>,
}

unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}
