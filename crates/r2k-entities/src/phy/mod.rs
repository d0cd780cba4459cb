//! Physical adaptation between the FSK modem bit streams and the channel state machine

pub mod frame_rx;
pub mod frame_tx;
pub mod history;
pub mod supervisory;

pub use frame_rx::{FrameRx, RxFrame};
pub use frame_tx::{FrameTx, TxBit};
pub use supervisory::{SuperDigit, SuperRx, SuperTx};
