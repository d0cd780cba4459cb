//! Radiocom 2000 base station entities
//!
//! - `phy`: frame and supervisory bit handling between the modem and the state machine
//! - `channel`: per channel call state machine and the channel pool

pub mod channel;
pub mod phy;

pub use channel::{CallControlUp, ChannelPool, ChannelState};
