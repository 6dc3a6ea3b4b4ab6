//! Built-in frame type tags.
//!
//! The type byte is carried verbatim: values outside this set are legal on
//! the wire and are passed through to the frame handler.

/// Lower sentinel. Not used for real traffic.
pub const MIN: u8 = 0x00;

/// Sensor readings.
pub const SENSOR: u8 = 0x01;

/// Control commands.
pub const CONTROL: u8 = 0x02;

/// System log lines.
pub const LOG: u8 = 0x03;

/// Upper sentinel. Not used for real traffic.
pub const MAX: u8 = 0x04;

/// Enumerated view of the built-in type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    Min = MIN,
    Sensor = SENSOR,
    Control = CONTROL,
    Log = LOG,
    Max = MAX,
}

impl FrameType {
    /// Human-readable name of the tag.
    pub fn name(self) -> &'static str {
        type_name(self as u8)
    }
}

impl From<FrameType> for u8 {
    fn from(value: FrameType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for FrameType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            MIN => Ok(Self::Min),
            SENSOR => Ok(Self::Sensor),
            CONTROL => Ok(Self::Control),
            LOG => Ok(Self::Log),
            MAX => Ok(Self::Max),
            other => Err(other),
        }
    }
}

/// Returns a human-readable name for a type byte.
pub fn type_name(value: u8) -> &'static str {
    match value {
        MIN => "MIN",
        SENSOR => "SENSOR",
        CONTROL => "CONTROL",
        LOG => "LOG",
        MAX => "MAX",
        _ => "UNKNOWN",
    }
}

/// Returns true for the tags that carry application traffic.
pub fn is_data_type(value: u8) -> bool {
    value > MIN && value < MAX
}
