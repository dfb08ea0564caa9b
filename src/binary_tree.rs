use std::{cmp::Ordering, collections::VecDeque, fmt, iter::FusedIterator};

use crate::{Error, Result};

/// BST node. Each child is exclusively owned by its parent.
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Unbalanced binary search tree mapping unique keys to values.
///
/// Every key in a left subtree is less than its parent's key and every key
/// in a right subtree is greater. Search, insert and remove are O(h), where
/// h is the height of the tree.
pub struct Bst<K, V> {
    root: Link<K, V>,
    size: usize,
}

impl<K, V> Bst<K, V> {
    /// Creates a new tree with no elements.
    pub fn new() -> Self {
        Bst {
            root: None,
            size: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of nodes on the longest root-to-leaf path. An empty tree has
    /// height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }
        height
    }

    /// Entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Entry with the largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        // Detach nodes one by one so a degenerate tree doesn't recurse
        // through Box's drop.
        let mut pending: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.size = 0;
    }

    /// Left-Root-Right traversal, i.e. ascending key order.
    pub fn inorder(&self) -> Inorder<'_, K, V> {
        let mut iter = Inorder {
            stack: Vec::new(),
            remaining: self.size,
        };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Root-Left-Right traversal.
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        Preorder {
            stack: self.root.as_deref().into_iter().collect(),
            remaining: self.size,
        }
    }

    /// Left-Right-Root traversal.
    pub fn postorder(&self) -> Postorder<'_, K, V> {
        Postorder {
            stack: self
                .root
                .as_deref()
                .map(|node| (node, false))
                .into_iter()
                .collect(),
            remaining: self.size,
        }
    }

    /// Breadth-first traversal, one depth level at a time.
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        LevelOrder {
            queue: self.root.as_deref().into_iter().collect(),
            remaining: self.size,
        }
    }

    /// Alias of [`Bst::inorder`].
    pub fn iter(&self) -> Inorder<'_, K, V> {
        self.inorder()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + Clone {
        self.inorder().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + Clone {
        self.inorder().map(|(_, value)| value)
    }
}

impl<K: Ord, V> Bst<K, V> {
    /// Descends from `link` comparing against `key`, and returns the link
    /// that either holds the matching node or is the empty slot where it
    /// would be inserted.
    fn locate<'a>(mut link: &'a mut Link<K, V>, key: &K) -> &'a mut Link<K, V> {
        loop {
            match link.as_deref().map(|node| key.cmp(&node.key)) {
                None | Some(Ordering::Equal) => return link,
                Some(Ordering::Less) => {
                    if let Some(node) = link {
                        link = &mut node.left;
                    }
                }
                Some(Ordering::Greater) => {
                    if let Some(node) = link {
                        link = &mut node.right;
                    }
                }
            }
        }
    }

    /// Detaches the leftmost node below `link`, splicing its right child
    /// into its place.
    fn take_min(mut link: &mut Link<K, V>) -> Link<K, V> {
        while link.as_ref().is_some_and(|node| node.left.is_some()) {
            if let Some(node) = link {
                link = &mut node.left;
            }
        }
        let mut min = link.take()?;
        *link = min.right.take();
        Some(min)
    }

    /// Inserts a new key. Equal keys are rejected and the tree is left as
    /// it was.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let link = Self::locate(&mut self.root, &key);
        if link.is_some() {
            return Err(Error::DuplicateKey);
        }
        *link = Some(Node::new(key, value));
        self.size += 1;
        Ok(())
    }

    pub fn search(&self, key: &K) -> Result<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Ok(&node.value),
            };
        }
        Err(Error::NotFound)
    }

    pub fn search_mut(&mut self, key: &K) -> Result<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Ok(&mut node.value),
            };
        }
        Err(Error::NotFound)
    }

    /// Returns `true` if `key` is in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    /// Removes `key` and returns its value.
    ///
    /// A leaf is detached, a node with a single child is replaced by that
    /// child, and a node with two children is replaced by its in-order
    /// successor (the leftmost node of its right subtree), which is first
    /// unlinked from where it was.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let link = Self::locate(&mut self.root, key);
        let Some(mut node) = link.take() else {
            return Err(Error::NotFound);
        };

        *link = match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(child),
            (Some(left), Some(right)) => {
                let mut right = Some(right);
                let Some(mut successor) = Self::take_min(&mut right) else {
                    unreachable!("right subtree is not empty")
                };
                successor.left = Some(left);
                successor.right = right;
                Some(successor)
            }
        };

        self.size -= 1;
        Ok(node.value)
    }
}

impl<K, V> Default for Bst<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Bst<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Bst<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inorder()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Bst<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Inorder<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inorder()
    }
}

pub struct Inorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Inorder<'a, K, V> {
    fn push_left(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Inorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub struct Preorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Preorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right goes in first so the left subtree comes out first.
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// The flag marks nodes whose children are already on the stack.
pub struct Postorder<'a, K, V> {
    stack: Vec<(&'a Node<K, V>, bool)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Postorder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.stack.push((node, true));
            self.stack.extend(node.right.as_deref().map(|right| (right, false)));
            self.stack.extend(node.left.as_deref().map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub struct LevelOrder<'a, K, V> {
    queue: VecDeque<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for LevelOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left.as_deref());
        self.queue.extend(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

// Manual clones: deriving would require `K: Clone, V: Clone`.
impl<K, V> Clone for Inorder<'_, K, V> {
    fn clone(&self) -> Self {
        Inorder {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Clone for Preorder<'_, K, V> {
    fn clone(&self) -> Self {
        Preorder {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Clone for Postorder<'_, K, V> {
    fn clone(&self) -> Self {
        Postorder {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Clone for LevelOrder<'_, K, V> {
    fn clone(&self) -> Self {
        LevelOrder {
            queue: self.queue.clone(),
            remaining: self.remaining,
        }
    }
}

macro_rules! exact_size {
    ($($iter:ident),*) => {
        $(
            impl<K, V> ExactSizeIterator for $iter<'_, K, V> {}

            impl<K, V> FusedIterator for $iter<'_, K, V> {}
        )*
    };
}

exact_size!(Inorder, Preorder, Postorder, LevelOrder);

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::Bst;
    use crate::Error;

    fn tree_values() -> Vec<i32> {
        vec![40, 20, 60, 10, 30, 25, 35, 50, 45, 70, 80, 75]
    }

    fn build(keys: &[i32]) -> Bst<i32, String> {
        let mut tree = Bst::new();
        for key in keys {
            tree.insert(*key, key.to_string()).unwrap();
        }
        tree
    }

    fn keys<'a>(iter: impl Iterator<Item = (&'a i32, &'a String)>) -> Vec<i32> {
        iter.map(|(key, _)| *key).collect()
    }

    #[test]
    fn test_insert() {
        let numbers = tree_values();

        let mut tree = Bst::new();

        tree.insert(numbers[0], ()).unwrap();
        assert!(tree.contains(&numbers[0]));

        tree.insert(numbers[1], ()).unwrap();
        assert!(tree.contains(&numbers[1]));

        tree.insert(numbers[2], ()).unwrap();
        assert!(tree.contains(&numbers[2]));

        assert_eq!(tree.len(), 3);

        for n in &numbers[3..] {
            tree.insert(*n, ()).unwrap();
        }

        for n in &numbers {
            assert!(tree.contains(n));
        }

        assert_eq!(tree.len(), numbers.len());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut tree = build(&tree_values());
        let before = keys(tree.preorder());

        assert_eq!(tree.insert(30, "other".into()), Err(Error::DuplicateKey));
        assert_eq!(tree.search(&30), Ok(&"30".to_string()));
        assert_eq!(tree.len(), tree_values().len());
        assert_eq!(keys(tree.preorder()), before);
    }

    #[test]
    fn test_search() {
        let mut tree = build(&tree_values());

        assert_eq!(tree.search(&45), Ok(&"45".to_string()));
        assert_eq!(tree.search(&46), Err(Error::NotFound));

        tree.search_mut(&45).unwrap().push('!');
        assert_eq!(tree.search(&45), Ok(&"45!".to_string()));
        assert_eq!(tree.search_mut(&1), Err(Error::NotFound));
    }

    #[test]
    fn test_remove() {
        let mut tree = build(&tree_values());

        // Node with no children
        assert_eq!(tree.remove(&75), Ok("75".to_string()));
        assert!(!tree.contains(&75));

        // Node with one child to the right
        tree.remove(&70).unwrap();
        assert!(!tree.contains(&70));
        assert!(tree.contains(&80));

        // Node with one child to the left
        tree.remove(&50).unwrap();
        assert!(!tree.contains(&50));
        assert!(tree.contains(&45));

        // Node with two children
        tree.remove(&20).unwrap();
        assert!(!tree.contains(&20));
        assert!(tree.contains(&10));
        assert!(tree.contains(&30));

        // Root
        tree.remove(&40).unwrap();
        assert!(!tree.contains(&40));
        assert_eq!(tree.search(&40), Err(Error::NotFound));

        // Check remaining values
        assert_eq!(keys(tree.inorder()), vec![10, 25, 30, 35, 45, 60, 80]);
        assert_eq!(tree.len(), 7);

        // Missing key leaves the tree alone
        assert_eq!(tree.remove(&40), Err(Error::NotFound));
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_two_child_removal_uses_successor() {
        let mut tree = build(&tree_values());

        // 40's successor is 45, the leftmost node of its right subtree.
        tree.remove(&40).unwrap();
        assert_eq!(keys(tree.preorder())[0], 45);

        // 20's successor 25 sits directly under 30 and has no children.
        tree.remove(&20).unwrap();
        assert_eq!(
            keys(tree.level_order()),
            vec![45, 25, 60, 10, 30, 50, 70, 35, 80, 75]
        );
    }

    #[test]
    fn test_traversals() {
        //         4
        //     2       5
        //   1   3
        let tree = build(&[4, 2, 5, 1, 3]);

        assert_eq!(keys(tree.inorder()), vec![1, 2, 3, 4, 5]);
        assert_eq!(keys(tree.preorder()), vec![4, 2, 1, 3, 5]);
        assert_eq!(keys(tree.postorder()), vec![1, 3, 2, 5, 4]);
        assert_eq!(keys(tree.level_order()), vec![4, 2, 5, 1, 3]);
    }

    #[test]
    fn test_traversals_restart() {
        let tree = build(&[5, 3, 8, 1, 4]);

        assert_eq!(keys(tree.inorder()), vec![1, 3, 4, 5, 8]);

        let mut iter = tree.postorder();
        iter.next();
        let snapshot = iter.clone();
        assert_eq!(iter.len(), 4);
        assert_eq!(keys(iter), keys(snapshot));

        // A fresh call starts over.
        assert_eq!(keys(tree.postorder()), vec![1, 4, 3, 8, 5]);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
        assert_eq!(
            tree.values().map(String::as_str).collect::<Vec<_>>(),
            vec!["1", "3", "4", "5", "8"]
        );
        assert_eq!(keys(tree.iter()), keys(tree.inorder()));
        assert_eq!(keys((&tree).into_iter()), vec![1, 3, 4, 5, 8]);
    }

    #[test]
    fn test_empty_tree() {
        let mut tree: Bst<i32, String> = Bst::new();

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.inorder().next(), None);
        assert_eq!(tree.level_order().next(), None);
        assert_eq!(tree.search(&1), Err(Error::NotFound));
        assert_eq!(tree.remove(&1), Err(Error::NotFound));
    }

    #[test]
    fn test_shape_queries() {
        let tree = build(&tree_values());

        assert_eq!(tree.height(), 5);
        assert_eq!(tree.min(), Some((&10, &"10".to_string())));
        assert_eq!(tree.max(), Some((&80, &"80".to_string())));
        assert_eq!(format!("{:?}", build(&[2, 1])), r#"{1: "1", 2: "2"}"#);
    }

    #[test]
    fn test_degenerate_tree() {
        // Sorted inserts build a single right spine.
        let mut tree = Bst::new();
        for key in 0..5_000u32 {
            tree.insert(key, ()).unwrap();
        }
        assert_eq!(tree.height(), 5_000);
        assert_eq!(tree.postorder().next(), Some((&4_999, &())));
        assert_eq!(tree.remove(&0), Ok(()));
        assert_eq!(tree.len(), 4_999);
        drop(tree);
    }

    #[test]
    fn stress_random_operations() {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut tree = Bst::new();
        let mut model = BTreeMap::new();

        for _ in 0..10_000 {
            let key = rng.random_range(0..500);
            if rng.random_range(0..100) < 60 {
                let value = rng.random_range(0..u64::MAX);
                let result = tree.insert(key, value);
                if let std::collections::btree_map::Entry::Vacant(entry) = model.entry(key) {
                    entry.insert(value);
                    assert_eq!(result, Ok(()));
                    assert_eq!(tree.search(&key), Ok(&value));
                } else {
                    assert_eq!(result, Err(Error::DuplicateKey));
                }
            } else {
                assert_eq!(tree.remove(&key).ok(), model.remove(&key));
                assert_eq!(tree.search(&key), Err(Error::NotFound));
            }
        }

        assert_eq!(tree.len(), model.len());
        let inorder: Vec<_> = tree.inorder().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = model.into_iter().collect();
        assert_eq!(inorder, expected);
        assert!(inorder.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }
}
