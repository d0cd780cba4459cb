//! 50 baud supervisory tone channel
//!
//! Each word is 20 bits long, in time order: ten zero bits, the marker `11`, seven payload
//! bits least significant first and a framing `1`. The payload holds NCONV in its low three
//! bits and the low nibble of the relais number above it.

use super::history::History;

pub const SUPER_WORD_BITS: usize = 20;
/// Match mask over the 20-bit receive window, the two oldest zero bits are not checked
const SUPER_MASK: u32 = 0x3FF01;
const SUPER_PATTERN: u32 = 0x00301;
const PAYLOAD_BITS: usize = 7;

/// Builds the 7-bit supervisory digit
#[inline]
pub fn super_digit(nconv: u8, relais: u16) -> u8 {
    (nconv & 0x7) | (((relais & 0xF) as u8) << 3)
}

/// A supervisory word found in the received bit stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperDigit {
    pub digit: u8,
    pub level: f64,
    pub quality: f64,
}

impl SuperDigit {
    pub fn nconv(&self) -> u8 {
        self.digit & 0x7
    }

    pub fn relais_nibble(&self) -> u8 {
        self.digit >> 3
    }

    /// True if the handset reflects what this relais sends
    pub fn matches(&self, nconv: u8, relais: u16) -> bool {
        self.digit == super_digit(nconv, relais)
    }
}

/// Supervisory encoder, repeats its word for as long as it is polled
#[derive(Debug, Clone)]
pub struct SuperTx {
    word: [u8; SUPER_WORD_BITS],
    pos: usize,
}

impl SuperTx {
    pub fn new(nconv: u8, relais: u16) -> Self {
        let digit = super_digit(nconv, relais);
        let mut word = [0u8; SUPER_WORD_BITS];
        word[10] = 1;
        word[11] = 1;
        for i in 0..PAYLOAD_BITS {
            word[12 + i] = (digit >> i) & 1;
        }
        word[19] = 1;
        Self { word, pos: 0 }
    }

    pub fn next_bit(&mut self) -> u8 {
        let bit = self.word[self.pos];
        self.pos = (self.pos + 1) % SUPER_WORD_BITS;
        bit
    }

    /// Restart at the first bit of the word
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

/// Supervisory decoder over a rolling 20-bit window
pub struct SuperRx {
    register: u32,
    level: History<SUPER_WORD_BITS>,
    quality: History<SUPER_WORD_BITS>,
}

impl SuperRx {
    pub fn new() -> Self {
        Self { register: 0, level: History::new(), quality: History::new() }
    }

    pub fn push_bit(&mut self, bit: u8, quality: f64, level: f64) -> Option<SuperDigit> {
        self.register = ((self.register << 1) | (bit & 1) as u32) & 0xFFFFF;
        self.level.write(level);
        self.quality.write(quality);

        if !self.level.is_filled() || self.register & SUPER_MASK != SUPER_PATTERN {
            return None;
        }

        // Newest bit sits at position 0, payload bit i was received at window position 7 - i
        let mut digit = 0u8;
        for i in 0..PAYLOAD_BITS {
            digit |= (((self.register >> (7 - i)) & 1) as u8) << i;
        }
        Some(SuperDigit { digit, level: self.level.average(), quality: self.quality.average() })
    }
}

impl Default for SuperRx {
    fn default() -> Self {
        Self::new()
    }
}
