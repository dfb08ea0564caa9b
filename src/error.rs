/// Errors returned by container operations.
///
/// A failed operation never leaves a container in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Index outside the valid bounds of the container.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    /// The searched or removed element is not present.
    #[error("element not found")]
    NotFound,
    #[error("stack is empty")]
    EmptyStack,
    #[error("queue is empty")]
    EmptyQueue,
    #[error("heap is empty")]
    EmptyHeap,
    /// Insert into a tree that already holds an equal key.
    #[error("key already present")]
    DuplicateKey,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Insert into a bounded container that is already full.
    #[error("capacity limit of {limit} reached")]
    CapacityExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
