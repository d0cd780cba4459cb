use as_any::AsAny;
use r2k_config::{CfgChannel, ChannelType, PhyBackend, SharedConfig, StackConfig};
use r2k_core::{BitBuffer, Direction, FRAME_BAUDRATE, SUPER_BAUDRATE};
use r2k_entities::{ChannelPool, ChannelState};
use r2k_frames::codec;
use r2k_frames::enums::msg_type_mobile::MsgTypeMobile;
use r2k_frames::Frame;

use super::mock_call_control::MockCallControl;

pub const RELAIS: u16 = 200;
pub const NCONV: u8 = 3;
/// Subscriber used throughout the tests, number 120012345
pub const MOBILE_TYPE: u8 = 1;
pub const HOME_RELAIS: u16 = 200;
pub const MOBILE_ID: u16 = 12345;
pub const NUMBER: &str = "120012345";

/// Creates a default config for testing with the given channel layout (numbered from 1).
/// It can still be modified as needed before passing it to the PoolTest constructor
pub fn default_test_config(chan_types: &[ChannelType]) -> StackConfig {
    let channels = chan_types
        .iter()
        .enumerate()
        .map(|(i, &chan_type)| CfgChannel { number: i as u16 + 1, chan_type })
        .collect();
    let mut config = StackConfig::new(RELAIS, channels);
    config.relais.nconv = NCONV;

    // No modem in these tests
    config.phy_io.backend = PhyBackend::None;
    config
}

/// Infrastructure for testing the channel pool through its bit level interfaces,
/// with a simulated clock and a recording call control
pub struct PoolTest {
    pub pool: ChannelPool,
    pub now: f64,
}

impl PoolTest {
    pub fn new(config: StackConfig) -> Self {
        let config = SharedConfig::from_config(config);
        let pool = ChannelPool::new(config, Box::new(MockCallControl::new()));
        let mut test = Self { pool, now: 0.0 };
        test.tick();
        test
    }

    pub fn with_channels(chan_types: &[ChannelType]) -> Self {
        Self::new(default_test_config(chan_types))
    }

    pub fn cc(&mut self) -> &mut MockCallControl {
        self.pool
            .call_control_mut()
            .as_any_mut()
            .downcast_mut::<MockCallControl>()
            .expect("call control is not the mock")
    }

    pub fn state(&self, idx: usize) -> ChannelState {
        self.pool.state(idx)
    }

    /// Applies pending timer requests at the current time
    pub fn tick(&mut self) {
        self.pool.tick(self.now);
    }

    /// Advance the clock in steps of `step` seconds, ticking the pool at each step
    pub fn advance(&mut self, seconds: f64, step: f64) {
        let end = self.now + seconds;
        while self.now < end {
            self.now = (self.now + step).min(end);
            self.tick();
        }
    }

    /// Pulls one complete frame from the transmitter of `idx`. None if it stays silent.
    pub fn tx_frame(&mut self, idx: usize) -> Option<Frame> {
        let len = codec::frame_bits(Direction::BaseToMobile);
        let mut bits = Vec::with_capacity(len);
        while bits.len() < len {
            match self.pool.tx_bit(idx) {
                Some(bit) => bits.push(bit),
                None => break,
            }
        }
        self.now += bits.len() as f64 / FRAME_BAUDRATE;
        if bits.len() < len {
            assert!(bits.is_empty(), "transmission stopped within a frame");
            return None;
        }
        Some(codec::decode(&BitBuffer::from_bitarr(&bits)).expect("transmitted frame does not decode"))
    }

    /// Encodes a mobile frame and feeds it bit by bit into the receiver of `idx`
    pub fn rx_frame(&mut self, idx: usize, frame: &Frame) {
        for bit in codec::encode(frame).into_bitvec() {
            self.pool.rx_bit(idx, bit, 0.9, 1.0);
        }
        self.now += codec::frame_bits(Direction::MobileToBase) as f64 / FRAME_BAUDRATE;
    }

    /// Handset reflects the supervisory signal of `idx` for `seconds`
    pub fn reflect_supervisory(&mut self, idx: usize, seconds: f64, nconv: u8) {
        let mut tx = r2k_entities::phy::SuperTx::new(nconv, RELAIS);
        let bits = (seconds * SUPER_BAUDRATE) as usize;
        for _ in 0..bits {
            // Keep the base station transmitter running alongside
            self.pool.tx_super_bit(idx);
            self.pool.rx_super_bit(idx, tx.next_bit(), 0.9, 1.0);
            self.now += 1.0 / SUPER_BAUDRATE;
            self.tick();
        }
    }
}

/// Mobile frame for channel `channel`, addressed to the test relais, carrying the test identity
pub fn mobile_frame(msg: MsgTypeMobile, channel: u16, on_traffic: bool) -> Frame {
    let mut frame = Frame::new(Direction::MobileToBase, msg.into_raw());
    frame.channel_type_flag = on_traffic as u8;
    frame.channel = channel;
    frame.relais = RELAIS;
    if msg.carries_identity() {
        frame.set_identity(MOBILE_TYPE, HOME_RELAIS, MOBILE_ID);
    }
    frame
}

/// Dialing frame carrying up to ten digits, shorter batches get an end marker
pub fn dial_frame(msg: MsgTypeMobile, channel: u16, digits: &str) -> Frame {
    let mut frame = mobile_frame(msg, channel, true);
    frame.digits = [0xF; 10];
    for (slot, c) in frame.digits.iter_mut().zip(digits.chars()) {
        *slot = c.to_digit(10).expect("not a digit") as u8;
    }
    frame
}
