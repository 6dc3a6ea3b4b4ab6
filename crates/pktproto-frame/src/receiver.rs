//! Streaming reassembly of frames from arbitrarily chunked input.
//!
//! [`FrameReceiver`] owns a growable byte store and a [`FrameDecoder`].
//! Every [`FrameReceiver::append`] copies the new bytes in, drives the
//! decoder over them, and hands each validated frame to a [`FrameHandler`]
//! before returning.
//!
//! The receiver is not synchronized. Wrap it in a `Mutex` to share it
//! between threads.

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::codec::{frame_len, Frame};
use crate::decoder::{FrameDecoder, ParseStatus};
use crate::error::{FrameError, Result};

/// Default initial capacity of the receive buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Default ceiling the receive buffer may grow to.
pub const DEFAULT_MAX_CAPACITY: usize = 256 * 1024;

/// Receives every validated frame.
///
/// The payload slice is only valid for the duration of the call.
pub trait FrameHandler {
    fn on_frame(&mut self, frame_type: u8, payload: &[u8]);
}

impl<F> FrameHandler for F
where
    F: FnMut(u8, &[u8]),
{
    fn on_frame(&mut self, frame_type: u8, payload: &[u8]) {
        self(frame_type, payload)
    }
}

/// Handler that keeps an owned copy of every frame.
#[derive(Debug, Default, Clone)]
pub struct FrameCollector {
    frames: Vec<Frame>,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames collected so far, in arrival order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Take the collected frames, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl FrameHandler for FrameCollector {
    fn on_frame(&mut self, frame_type: u8, payload: &[u8]) {
        self.frames.push(Frame {
            frame_type,
            payload: Bytes::copy_from_slice(payload),
        });
    }
}

/// Sizing policy for the receive buffer.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Capacity allocated up front. Default: 256 bytes.
    pub initial_capacity: usize,
    /// Growth by doubling is refused beyond this. Default: 256 KiB.
    pub max_capacity: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// What a single [`FrameReceiver::append`] did with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendStatus {
    /// Bytes copied into the receive buffer.
    pub accepted: usize,
    /// Bytes dropped because the buffer could not hold them.
    pub discarded: usize,
    /// Frames delivered to the handler during this call.
    pub frames: usize,
}

/// Running totals over the receiver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub frames: u64,
    pub bytes_accepted: u64,
    pub bytes_discarded: u64,
    pub growths: u64,
}

/// Reassembles frames from bytes appended in arbitrary chunks.
///
/// Bytes in `[processed_pos, write_pos)` have not been fed to the decoder
/// yet; bytes before `processed_pos` are dead and get compacted away.
pub struct FrameReceiver<H> {
    buf: Vec<u8>,
    capacity: usize,
    processed_pos: usize,
    decoder: FrameDecoder,
    handler: H,
    config: ReceiverConfig,
    stats: ReceiverStats,
}

impl<H: FrameHandler> FrameReceiver<H> {
    /// Create a receiver with `capacity` bytes of initial buffer.
    pub fn new(capacity: usize, handler: H) -> Result<Self> {
        Self::with_config(
            ReceiverConfig {
                initial_capacity: capacity,
                max_capacity: DEFAULT_MAX_CAPACITY.max(capacity),
            },
            handler,
        )
    }

    /// Create a receiver with an explicit sizing policy.
    pub fn with_config(config: ReceiverConfig, handler: H) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(config.initial_capacity)
            .map_err(|_| FrameError::Alloc {
                requested: config.initial_capacity,
            })?;

        Ok(Self {
            buf,
            capacity: config.initial_capacity,
            processed_pos: 0,
            decoder: FrameDecoder::new(),
            handler,
            config,
            stats: ReceiverStats::default(),
        })
    }

    /// Append newly received bytes and deliver any frames they complete.
    ///
    /// Never fails: when the buffer cannot hold all of `data`, the excess is
    /// dropped and reported in the returned [`AppendStatus`].
    pub fn append(&mut self, data: &[u8]) -> AppendStatus {
        let mut status = AppendStatus::default();
        let mut len = data.len();

        if self.write_pos() + len > self.capacity {
            self.discard_processed();

            if self.write_pos() + len > self.capacity && !self.grow() {
                let available = self.capacity - self.write_pos();
                if available > 0 {
                    self.buf.extend_from_slice(&data[..available]);
                    warn!(
                        written = available,
                        discarded = len - available,
                        "receive buffer full, partial data written"
                    );
                } else {
                    warn!(discarded = len, "receive buffer full, all new data discarded");
                }
                status.accepted = available;
                status.discarded = len - available;
                status.frames = self.scan();
                self.record(&status);
                return status;
            }
        }

        let available = self.capacity - self.write_pos();
        if available < len {
            warn!(
                required = len,
                available, "receive buffer space check failed, clipping input"
            );
            status.discarded = len - available;
            len = available;
            if len == 0 {
                self.record(&status);
                return status;
            }
        }

        self.buf.extend_from_slice(&data[..len]);
        status.accepted = len;
        status.frames = self.scan();
        self.record(&status);
        status
    }

    /// Offset of the next free byte.
    pub fn write_pos(&self) -> usize {
        self.buf.len()
    }

    /// Offset of the first byte not yet fed to the decoder.
    pub fn processed_pos(&self) -> usize {
        self.processed_pos
    }

    /// Current buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sizing policy in effect.
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Lifetime totals.
    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Borrow the frame handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrow the frame handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the receiver and return the frame handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Feed `[processed_pos, write_pos)` to the decoder.
    fn scan(&mut self) -> usize {
        let write_pos = self.buf.len();
        let mut consumed = 0usize;
        let mut frames = 0usize;

        while self.processed_pos < write_pos {
            let byte = self.buf[self.processed_pos];
            if self.decoder.parse_byte(byte) == ParseStatus::Pending {
                self.processed_pos += 1;
                continue;
            }

            let total = frame_len(usize::from(self.decoder.payload_len()));
            let end = self.processed_pos + 1;
            match end.checked_sub(total) {
                Some(start) if end <= write_pos => {
                    self.handler
                        .on_frame(self.decoder.frame_type(), self.decoder.payload());
                    frames += 1;
                    trace!(start, end, "frame delivered");
                    self.processed_pos = end;
                    consumed = end;
                }
                _ => {
                    debug!(
                        end,
                        total, "frame extends before buffer start, not delivered"
                    );
                    self.processed_pos += 1;
                }
            }
            self.decoder.reset();
        }

        if consumed > 0 {
            self.buf.drain(..consumed);
            self.processed_pos -= consumed;
        }

        frames
    }

    fn discard_processed(&mut self) {
        if self.processed_pos > 0 {
            trace!(bytes = self.processed_pos, "compacting receive buffer");
            self.buf.drain(..self.processed_pos);
            self.processed_pos = 0;
        }
    }

    fn grow(&mut self) -> bool {
        let Some(new_capacity) = self.capacity.checked_mul(2) else {
            return false;
        };
        if new_capacity <= self.capacity || new_capacity > self.config.max_capacity {
            debug!(
                capacity = self.capacity,
                max = self.config.max_capacity,
                "receive buffer growth refused"
            );
            return false;
        }
        if self
            .buf
            .try_reserve_exact(new_capacity - self.buf.len())
            .is_err()
        {
            warn!(new_capacity, "receive buffer growth failed");
            return false;
        }

        debug!(from = self.capacity, to = new_capacity, "receive buffer grown");
        self.capacity = new_capacity;
        self.stats.growths += 1;
        true
    }

    fn record(&mut self, status: &AppendStatus) {
        self.stats.frames += status.frames as u64;
        self.stats.bytes_accepted += status.accepted as u64;
        self.stats.bytes_discarded += status.discarded as u64;
    }
}

impl<H> std::fmt::Debug for FrameReceiver<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReceiver")
            .field("capacity", &self.capacity)
            .field("write_pos", &self.buf.len())
            .field("processed_pos", &self.processed_pos)
            .field("decoder", &self.decoder)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
