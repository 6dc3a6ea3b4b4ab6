//! Byte-at-a-time frame decoder.
//!
//! The decoder never reports malformed input as an error. Bad magic, a bad
//! tail or a CRC mismatch drop the attempt and restart the search for a
//! header.

use bytes::Bytes;
use tracing::{trace, warn};

use crate::codec::{header_bytes, Frame, HEADER_MAGIC, TAIL_MAGIC};
use crate::crc::{crc16, crc16_continue};

const HEADER_FIRST: u8 = HEADER_MAGIC.to_le_bytes()[0];
const HEADER_SECOND: u8 = HEADER_MAGIC.to_le_bytes()[1];
const TAIL_FIRST: u8 = TAIL_MAGIC.to_le_bytes()[0];
const TAIL_SECOND: u8 = TAIL_MAGIC.to_le_bytes()[1];

/// The field the decoder expects next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    #[default]
    Header1,
    Header2,
    Type,
    Length1,
    Length2,
    Payload,
    Crc1,
    Crc2,
    Tail1,
    Tail2,
}

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// More bytes are needed.
    Pending,
    /// A frame was validated; read it before the next byte or [`FrameDecoder::reset`].
    Complete,
}

/// Incremental decoder for one byte stream.
///
/// The payload buffer exists only between the end of the length field and
/// the end of the attempt. After [`ParseStatus::Complete`] the frame stays
/// readable until the decoder is reset or fed another byte.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    state: ParseState,
    frame_type: u8,
    payload_len: u16,
    payload: Option<Vec<u8>>,
    crc: u16,
    complete: bool,
}

impl FrameDecoder {
    /// Create a decoder waiting for a header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte.
    pub fn parse_byte(&mut self, byte: u8) -> ParseStatus {
        if self.complete {
            self.reset();
        }

        match self.state {
            ParseState::Header1 => {
                if byte == HEADER_FIRST {
                    self.state = ParseState::Header2;
                }
            }
            ParseState::Header2 => {
                // The failing byte is not retried as a first header byte.
                if byte == HEADER_SECOND {
                    self.state = ParseState::Type;
                } else {
                    trace!(byte, "false header sync");
                    self.state = ParseState::Header1;
                }
            }
            ParseState::Type => {
                self.frame_type = byte;
                self.state = ParseState::Length1;
            }
            ParseState::Length1 => {
                self.payload_len = u16::from(byte);
                self.state = ParseState::Length2;
            }
            ParseState::Length2 => {
                self.payload_len |= u16::from(byte) << 8;
                self.begin_payload();
            }
            ParseState::Payload => self.push_payload(byte),
            ParseState::Crc1 => {
                self.crc = u16::from(byte);
                self.state = ParseState::Crc2;
            }
            ParseState::Crc2 => {
                self.crc |= u16::from(byte) << 8;
                self.state = ParseState::Tail1;
            }
            ParseState::Tail1 => {
                if byte == TAIL_FIRST {
                    self.state = ParseState::Tail2;
                } else {
                    trace!(byte, len = self.payload_len, "bad frame tail");
                    self.reset();
                }
            }
            ParseState::Tail2 => {
                if byte != TAIL_SECOND {
                    trace!(byte, len = self.payload_len, "bad frame tail");
                    self.reset();
                } else if self.checksum() != self.crc {
                    trace!(
                        expected = self.crc,
                        actual = self.checksum(),
                        "frame crc mismatch"
                    );
                    self.reset();
                } else {
                    self.complete = true;
                    return ParseStatus::Complete;
                }
            }
        }

        ParseStatus::Pending
    }

    /// Drop any in-flight frame and wait for a header again.
    ///
    /// Safe in every state; never allocates.
    pub fn reset(&mut self) {
        self.state = ParseState::Header1;
        self.frame_type = 0;
        self.payload_len = 0;
        self.payload = None;
        self.crc = 0;
        self.complete = false;
    }

    /// Current position in the frame layout.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// True while a validated frame is held.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Type byte of the frame being decoded.
    pub fn frame_type(&self) -> u8 {
        self.frame_type
    }

    /// Declared payload length of the frame being decoded.
    pub fn payload_len(&self) -> u16 {
        self.payload_len
    }

    /// Payload collected so far; the whole payload after `Complete`.
    pub fn payload(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    /// Move a completed frame out and reset.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !self.complete {
            return None;
        }
        let frame = Frame {
            frame_type: self.frame_type,
            payload: Bytes::from(self.payload.take().unwrap_or_default()),
        };
        self.reset();
        Some(frame)
    }

    fn begin_payload(&mut self) {
        let len = usize::from(self.payload_len);
        let mut buf = Vec::new();
        if buf.try_reserve_exact(len).is_err() {
            warn!(len, "cannot allocate frame payload, dropping frame");
            self.reset();
            return;
        }
        self.payload = Some(buf);
        self.state = if len == 0 {
            ParseState::Crc1
        } else {
            ParseState::Payload
        };
    }

    fn push_payload(&mut self, byte: u8) {
        let Some(buf) = self.payload.as_mut() else {
            self.reset();
            return;
        };
        buf.push(byte);
        if buf.len() >= usize::from(self.payload_len) {
            self.state = ParseState::Crc1;
        }
    }

    fn checksum(&self) -> u16 {
        let header = header_bytes(self.frame_type, self.payload_len);
        crc16_continue(crc16(&header), self.payload())
    }
}
