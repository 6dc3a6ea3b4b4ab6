/// Errors that can occur in ring buffer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// The write does not fit in the free space; nothing was written.
    #[error("insufficient space ({requested} bytes requested, {available} free)")]
    InsufficientSpace { requested: usize, available: usize },

    /// Backing storage could not be allocated.
    #[error("failed to allocate {requested} bytes for ring buffer")]
    Alloc { requested: usize },

    /// A ring buffer needs at least one byte of storage.
    #[error("ring buffer capacity must be greater than zero")]
    ZeroCapacity,
}

pub type Result<T> = std::result::Result<T, RingError>;
