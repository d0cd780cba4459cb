use crate::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameErr {
    /// Message type field does not select a registered layout. Expected under radio noise.
    UnknownMessageType { direction: Direction, message_type: u8 },
    /// Bit count matches neither direction
    InvalidLength { found: usize },
    BufferEnded { field: Option<&'static str> },
}
