pub mod adt;
pub mod binary_tree;
pub mod error;
pub mod heap;
pub mod list;
pub mod queue;
pub mod stack;
pub mod vec;

pub use adt::List;
pub use binary_tree::Bst;
pub use error::{Error, Result};
pub use heap::MinHeap;
pub use list::LinkedList;
pub use queue::Queue;
pub use stack::Stack;
pub use vec::Vector;
