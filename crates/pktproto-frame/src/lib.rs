//! Magic-delimited, CRC16-checked framing for serial and radio links.
//!
//! Every frame on the wire carries:
//! - A 2-byte magic header (`55 AA`) for stream synchronization
//! - A 1-byte type tag and a 2-byte little-endian payload length
//! - The payload, a CRC16-CCITT over everything before it, and a 2-byte
//!   magic tail (`AA 55`)
//!
//! [`FrameDecoder`] consumes one byte at a time and resynchronizes on its own
//! after garbage or corruption. [`FrameReceiver`] wraps it with a growable
//! buffer so callers can push bytes in whatever chunks the link delivers.

pub mod codec;
pub mod crc;
pub mod decoder;
pub mod error;
pub mod frame_type;
pub mod receiver;

pub use codec::{
    encode_frame, encode_frame_into, frame_len, Frame, FrameConfig, FRAME_OVERHEAD, HEADER_MAGIC,
    HEADER_SIZE, MAX_PAYLOAD_LEN, MAX_WIRE_PAYLOAD_LEN, TAIL_MAGIC, TRAILER_SIZE,
};
pub use crc::{crc16, crc16_continue, CRC16_SEED};
pub use decoder::{FrameDecoder, ParseState, ParseStatus};
pub use error::{FrameError, Result};
pub use frame_type::{type_name, FrameType, CONTROL, LOG, SENSOR};
pub use receiver::{
    AppendStatus, FrameCollector, FrameHandler, FrameReceiver, ReceiverConfig, ReceiverStats,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY,
};
