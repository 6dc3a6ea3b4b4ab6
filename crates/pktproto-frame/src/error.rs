/// Errors that can occur during frame encoding.
///
/// Malformed stream data is never reported here: the decoder and receiver
/// resynchronize silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Backing storage for a frame could not be obtained.
    #[error("failed to allocate {requested} bytes for frame")]
    Alloc { requested: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
