//! Call and channel state machine

pub mod call_control;
pub mod channel;
pub mod pool;
mod rx;
pub mod state;
pub mod subscriber;
pub mod timers;
mod tx;

pub use call_control::CallControlUp;
pub use channel::{Channel, ChannelSystemInfo, PhyMode};
pub use pool::ChannelPool;
pub use state::ChannelState;
pub use subscriber::Subscriber;
