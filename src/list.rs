use std::{fmt, marker::PhantomData, mem, ptr::NonNull};

use crate::{Error, List, Result};

struct Node<T> {
    elem: T,
    next: Link<T>,
}

/// Nodes are owned through raw pointers so `tail` can alias the last one.
type Link<T> = Option<NonNull<Node<T>>>;

impl<T> Node<T> {
    /// Allocates a node and leaks it into a raw pointer. The list frees it
    /// again with `Box::from_raw`.
    fn new(elem: T, next: Link<T>) -> NonNull<Node<T>> {
        unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node { elem, next }))) }
    }
}

/// Singly linked list with a tail pointer.
///
/// Appending and removing the first element are O(1); positional access
/// walks from the head.
pub struct LinkedList<T> {
    head: Link<T>,
    tail: Link<T>,
    size: usize,
    limit: Option<usize>,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for LinkedList<T> {}
unsafe impl<T: Sync> Sync for LinkedList<T> {}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        LinkedList {
            head: None,
            tail: None,
            size: 0,
            limit: None,
            _marker: PhantomData,
        }
    }

    /// Creates an empty list that holds at most `limit` elements.
    pub fn bounded(limit: usize) -> Self {
        LinkedList {
            head: None,
            tail: None,
            size: 0,
            limit: Some(limit),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.size >= limit)
    }

    fn check_limit(&self) -> Result<()> {
        match self.limit {
            Some(limit) if self.size >= limit => Err(Error::CapacityExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::OutOfRange {
            index,
            len: self.size,
        }
    }

    /// Appends `elem` after the current tail, ignoring the limit.
    fn append(&mut self, elem: T) {
        let node = Node::new(elem, None);

        match self.tail {
            Some(tail) => unsafe {
                (*tail.as_ptr()).next = Some(node);
            },
            None => self.head = Some(node),
        }

        self.tail = Some(node);

        self.size += 1;
    }

    /// Appends `elem` at the end of the list.
    pub fn push_back(&mut self, elem: T) -> Result<()> {
        self.check_limit()?;
        self.append(elem);
        Ok(())
    }

    /// Removes the first node from the list and returns its value.
    pub fn pop_front(&mut self) -> Option<T> {
        self.head.map(|head| {
            let head = unsafe { Box::from_raw(head.as_ptr()) };
            self.head = head.next;

            if self.head.is_none() {
                self.tail = None;
            }

            self.size -= 1;

            head.elem
        })
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| unsafe { &(*node.as_ptr()).elem })
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|node| unsafe { &(*node.as_ptr()).elem })
    }

    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head,
            remaining: self.size,
            _marker: PhantomData,
        }
    }

    fn node_at(&self, index: usize) -> Link<T> {
        let mut node = self.head;
        for _ in 0..index {
            node = unsafe { (*node?.as_ptr()).next };
        }
        node
    }
}

impl<T> List<T> for LinkedList<T> {
    fn get(&self, index: usize) -> Result<&T> {
        self.node_at(index)
            .map(|node| unsafe { &(*node.as_ptr()).elem })
            .ok_or_else(|| self.out_of_range(index))
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.size {
            return Err(self.out_of_range(index));
        }
        self.check_limit()?;

        if index == self.size {
            self.append(value);
            return Ok(());
        }

        if index == 0 {
            self.head = Some(Node::new(value, self.head));
        } else {
            let Some(prev) = self.node_at(index - 1) else {
                return Err(self.out_of_range(index));
            };
            unsafe {
                let next = (*prev.as_ptr()).next;
                (*prev.as_ptr()).next = Some(Node::new(value, next));
            }
        }

        // The tail is untouched: the new node always has a successor.
        self.size += 1;
        Ok(())
    }

    fn remove(&mut self, value: &T) -> Result<T>
    where
        T: PartialEq,
    {
        let index = self
            .iter()
            .position(|elem| elem == value)
            .ok_or(Error::NotFound)?;
        self.remove_at(index)
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.size {
            return Err(self.out_of_range(index));
        }

        if index == 0 {
            return self.pop_front().ok_or_else(|| self.out_of_range(index));
        }

        let Some(prev) = self.node_at(index - 1) else {
            return Err(self.out_of_range(index));
        };
        let Some(removed) = (unsafe { (*prev.as_ptr()).next }) else {
            return Err(self.out_of_range(index));
        };

        let removed = unsafe { Box::from_raw(removed.as_ptr()) };
        unsafe {
            (*prev.as_ptr()).next = removed.next;
        }
        if removed.next.is_none() {
            self.tail = Some(prev);
        }

        self.size -= 1;
        Ok(removed.elem)
    }

    fn replace(&mut self, index: usize, value: T) -> Result<T> {
        match self.node_at(index) {
            Some(node) => Ok(unsafe { mem::replace(&mut (*node.as_ptr()).elem, value) }),
            None => Err(self.out_of_range(index)),
        }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn is_full(&self) -> bool {
        LinkedList::is_full(self)
    }

    fn push_back(&mut self, value: T) -> Result<()> {
        LinkedList::push_back(self, value)
    }

    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|elem| elem == value)
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        while self.pop_front().is_some() {}
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        for elem in iter {
            list.append(elem);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`LinkedList`], head to tail.
pub struct Iter<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            let node: &'a Node<T> = unsafe { &*node.as_ptr() };
            self.next = node.next;
            self.remaining -= 1;
            &node.elem
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
