//! Core utilities for the Radiocom 2000 base station
//!
//! This crate provides fundamental types used across the stack:
//! - BitBuffer for bit-level frame manipulation
//! - Direction of radio frames
//! - Timer with deferred arm/cancel requests
//! - Logging setup

pub mod bitbuffer;
pub mod debug;
pub mod direction;
pub mod frame_err;
pub mod timer;

// Re-export commonly used items
pub use bitbuffer::BitBuffer;
pub use direction::Direction;
pub use frame_err::FrameErr;
pub use timer::Timer;

/// Opaque handle into the telephony call-control interface, 0 when no call exists
pub type CallRef = u32;

/// Main channel signalling rate
pub const FRAME_BAUDRATE: f64 = 1200.0;
/// Supervisory tone channel rate
pub const SUPER_BAUDRATE: f64 = 50.0;
