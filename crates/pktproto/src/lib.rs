//! Framing and buffering primitives for serial and radio byte streams.
//!
//! # Crate Structure
//!
//! - [`frame`] — CRC16-checked frame codec and streaming receiver
//! - [`ring`] — Bounded circular byte buffer

/// Re-export frame types.
pub mod frame {
    pub use pktproto_frame::*;
}

/// Re-export ring buffer types.
pub mod ring {
    pub use pktproto_ring::*;
}
