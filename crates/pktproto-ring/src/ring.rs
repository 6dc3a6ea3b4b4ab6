use std::fmt;

use tracing::trace;

use crate::error::{Result, RingError};

/// Capacity used by [`RingBuffer::default`].
pub const DEFAULT_CAPACITY: usize = 1024;

const PLACEHOLDER: char = '.';

/// Fixed-capacity FIFO of bytes with wraparound.
///
/// ```text
///  0                                                   capacity
///  ┌──────────┬───────────────────────┬──────────────────┐
///  │   free   │    unread (length)    │       free       │
///  └──────────┴───────────────────────┴──────────────────┘
///             ▲                       ▲
///           tail                    head
/// ```
///
/// `length` disambiguates full from empty, so all `capacity` bytes are
/// usable.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Box<[u8]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl RingBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| RingError::Alloc {
                requested: capacity,
            })?;
        data.resize(capacity, 0);

        Ok(Self {
            data: data.into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    /// Total number of bytes the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes that can be written without failing.
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len
    }

    /// Bytes waiting to be read.
    #[inline]
    pub fn used_space(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Write offset.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Read offset.
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Append all of `data`, or nothing if it does not fit.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let available = self.free_space();
        if data.len() > available {
            trace!(requested = data.len(), available, "ring write refused");
            return Err(RingError::InsufficientSpace {
                requested: data.len(),
                available,
            });
        }

        let capacity = self.capacity();
        let len = data.len();
        if self.head + len > capacity {
            let first_len = capacity - self.head;
            self.data[self.head..].copy_from_slice(&data[..first_len]);
            self.data[..len - first_len].copy_from_slice(&data[first_len..]);
        } else {
            self.data[self.head..self.head + len].copy_from_slice(data);
        }

        self.head = (self.head + len) % capacity;
        self.len += len;
        Ok(())
    }

    /// Move up to `out.len()` unread bytes into `out`.
    ///
    /// Returns the number of bytes read, which is less than requested when
    /// the buffer holds fewer.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let len = out.len().min(self.len);
        self.copy_unread(&mut out[..len]);

        self.tail = (self.tail + len) % self.capacity();
        self.len -= len;
        len
    }

    /// Read up to `max_len` bytes into a new vector.
    pub fn read_to_vec(&mut self, max_len: usize) -> Vec<u8> {
        let mut out = vec![0u8; max_len.min(self.len)];
        let read = self.read(&mut out);
        out.truncate(read);
        out
    }

    /// Unread bytes in FIFO order as text, without consuming them.
    ///
    /// Invalid UTF-8 is replaced lossily.
    pub fn peek_string(&self) -> String {
        let mut unread = vec![0u8; self.len];
        self.copy_unread(&mut unread);
        String::from_utf8_lossy(&unread).into_owned()
    }

    /// Drop all unread data.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Snapshot of the indices and raw storage for debugging.
    pub fn digest(&self) -> RingDigest<'_> {
        RingDigest { ring: self }
    }

    fn copy_unread(&self, out: &mut [u8]) {
        let len = out.len();
        let capacity = self.capacity();
        if self.tail + len > capacity {
            let first_len = capacity - self.tail;
            out[..first_len].copy_from_slice(&self.data[self.tail..]);
            out[first_len..].copy_from_slice(&self.data[..len - first_len]);
        } else {
            out.copy_from_slice(&self.data[self.tail..self.tail + len]);
        }
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self {
            data: vec![0u8; DEFAULT_CAPACITY].into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }
}

/// Human-readable dump of a [`RingBuffer`].
///
/// Renders the whole backing store, read or not, with non-printable bytes
/// shown as `.`.
pub struct RingDigest<'a> {
    ring: &'a RingBuffer,
}

impl fmt::Display for RingDigest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring;
        write!(
            f,
            "Capacity: {}, Head: {}, Tail: {}, Length: {}, Full Content: ",
            ring.capacity(),
            ring.head,
            ring.tail,
            ring.len
        )?;
        for &byte in ring.data.iter() {
            let shown = if byte.is_ascii_graphic() || byte == b' ' {
                char::from(byte)
            } else {
                PLACEHOLDER
            };
            write!(f, "{shown}")?;
        }
        Ok(())
    }
}
