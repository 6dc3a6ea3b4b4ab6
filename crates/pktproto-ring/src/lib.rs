//! Bounded circular byte buffer.
//!
//! Writes are all-or-nothing and never overwrite unread data. Reads clamp to
//! what is available. The buffer is not synchronized; share it behind a
//! `Mutex` if producer and consumer live on different threads.

pub mod error;
pub mod ring;

pub use error::{Result, RingError};
pub use ring::{RingBuffer, RingDigest, DEFAULT_CAPACITY};
