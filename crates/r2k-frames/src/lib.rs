//! Radiocom 2000 frame codec
//!
//! Transcodes between structured [`frame::Frame`] values and the bit strings sent over
//! the 1200 baud signalling channel:
//! - per (direction, message type) bit layouts
//! - Hagelbarger rate-1/2 convolutional error correction
//! - synchronization preamble

pub mod codec;
pub mod enums;
pub mod fields;
pub mod frame;
pub mod hagelbarger;
pub mod layouts;

pub use codec::{decode, decode_payload, encode};
pub use fields::FrameField;
pub use frame::Frame;
