use r2k_core::BitBuffer;

/// Result of asking the transmitter for the next bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxBit {
    Bit(u8),
    /// Current frame is exhausted, the owner should load the next one
    NeedFrame,
    /// Transmission is suspended until a state change rearms it
    Idle,
}

/// Bit sink side of the main channel: serializes one frame at a time
#[derive(Debug, Default)]
pub struct FrameTx {
    bits: Vec<u8>,
    pos: usize,
    suspended: bool,
}

impl FrameTx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_bit(&mut self) -> TxBit {
        if self.pos < self.bits.len() {
            let bit = self.bits[self.pos];
            self.pos += 1;
            return TxBit::Bit(bit);
        }
        if self.suspended { TxBit::Idle } else { TxBit::NeedFrame }
    }

    /// Start sending `frame` (preamble included) from its first bit
    pub fn load(&mut self, frame: BitBuffer) {
        self.bits = frame.into_bitvec();
        self.pos = 0;
        self.suspended = false;
    }

    /// No frame was available. Stay quiet until `rearm`.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Ask for a new frame once the current one is finished
    pub fn rearm(&mut self) {
        self.suspended = false;
    }

    /// Drop whatever is left of the frame being sent
    pub fn abort(&mut self) {
        self.bits.clear();
        self.pos = 0;
    }
}
