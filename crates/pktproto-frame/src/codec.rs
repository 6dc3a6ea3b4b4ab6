use bytes::{BufMut, Bytes, BytesMut};

use crate::crc::{crc16, crc16_continue};
use crate::error::{FrameError, Result};

/// Header magic 0xAA55, serialized little-endian.
pub const HEADER_MAGIC: u16 = 0xAA55;

/// Tail magic 0x55AA, serialized little-endian.
pub const TAIL_MAGIC: u16 = 0x55AA;

/// Header: magic (2) + type (1) + length (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Trailer: crc (2) + tail magic (2) = 4 bytes.
pub const TRAILER_SIZE: usize = 4;

/// Bytes a frame adds around its payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + TRAILER_SIZE;

/// Default payload ceiling applied by the encoder.
pub const MAX_PAYLOAD_LEN: usize = 108;

/// Largest payload the 16-bit length field can describe.
pub const MAX_WIRE_PAYLOAD_LEN: usize = u16::MAX as usize;

/// A decoded frame with an owned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The type tag, carried verbatim.
    pub frame_type: u8,
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(frame_type: impl Into<u8>, payload: impl Into<Bytes>) -> Self {
        Self {
            frame_type: frame_type.into(),
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        frame_len(self.payload.len())
    }
}

/// Configuration for the frame encoder.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 108.
    ///
    /// Values above [`MAX_WIRE_PAYLOAD_LEN`] are clamped to it.
    pub max_payload_size: usize,
}

impl FrameConfig {
    fn effective_max(&self) -> usize {
        self.max_payload_size.min(MAX_WIRE_PAYLOAD_LEN)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_LEN,
        }
    }
}

/// Total encoded size of a frame carrying `payload_len` bytes.
#[inline]
pub fn frame_len(payload_len: usize) -> usize {
    FRAME_OVERHEAD + payload_len
}

/// Encode a frame into a freshly allocated buffer.
///
/// Wire format, little-endian throughout:
/// ```text
/// ┌────────────┬──────┬──────────┬───────────┬──────────┬────────────┐
/// │ Magic (2B) │ Type │ Length   │ Payload   │ CRC16    │ Tail (2B)  │
/// │ 0x55 0xAA  │ (1B) │ (2B LE)  │ (Length)  │ (2B LE)  │ 0xAA 0x55  │
/// └────────────┴──────┴──────────┴───────────┴──────────┴────────────┘
/// ```
///
/// The CRC covers everything before it. Payloads above
/// [`MAX_PAYLOAD_LEN`] are rejected.
pub fn encode_frame(frame_type: u8, payload: &[u8]) -> Result<Bytes> {
    check_payload_len(payload.len(), MAX_PAYLOAD_LEN)?;

    let total = frame_len(payload.len());
    let mut out = Vec::new();
    out.try_reserve_exact(total)
        .map_err(|_| FrameError::Alloc { requested: total })?;

    put_frame(&mut out, frame_type, payload);
    Ok(Bytes::from(out))
}

/// Append an encoded frame to `dst`, honoring the configured ceiling.
pub fn encode_frame_into(
    frame_type: u8,
    payload: &[u8],
    dst: &mut BytesMut,
    config: &FrameConfig,
) -> Result<()> {
    check_payload_len(payload.len(), config.effective_max())?;

    dst.reserve(frame_len(payload.len()));
    put_frame(dst, frame_type, payload);
    Ok(())
}

fn check_payload_len(size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(FrameError::PayloadTooLarge { size, max });
    }
    Ok(())
}

fn put_frame<B: BufMut>(dst: &mut B, frame_type: u8, payload: &[u8]) {
    let header = header_bytes(frame_type, payload.len() as u16);
    let crc = crc16_continue(crc16(&header), payload);

    dst.put_slice(&header);
    dst.put_slice(payload);
    dst.put_u16_le(crc);
    dst.put_u16_le(TAIL_MAGIC);
}

/// The serialized header of a frame, i.e. the bytes the CRC starts from.
pub(crate) fn header_bytes(frame_type: u8, payload_len: u16) -> [u8; HEADER_SIZE] {
    let [magic_lo, magic_hi] = HEADER_MAGIC.to_le_bytes();
    let [len_lo, len_hi] = payload_len.to_le_bytes();
    [magic_lo, magic_hi, frame_type, len_lo, len_hi]
}
