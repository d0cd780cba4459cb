use r2k_core::{BitBuffer, Direction};
use r2k_frames::codec::{self, SYNC_WORD};

use super::history::History;

/// Minimum average quality over the sync word for a frame to be accepted
pub const SYNC_QUALITY_THRESHOLD: f64 = 0.65;
const SYNC_BITS: usize = 16;

/// Coded payload collected after a sync match, preamble stripped
#[derive(Debug, Clone)]
pub struct RxFrame {
    pub bits: BitBuffer,
    /// Averaged over sync word and payload
    pub level: f64,
    pub quality: f64,
}

struct Collecting {
    bits: Vec<u8>,
    level_sum: f64,
    quality_sum: f64,
}

/// Bit source side of the main channel. Searches the received stream for the sync word
/// and cuts out the fixed-length payload following it.
pub struct FrameRx {
    payload_len: usize,
    register: u16,
    level: History<SYNC_BITS>,
    quality: History<SYNC_BITS>,
    collecting: Option<Collecting>,
}

impl FrameRx {
    /// Receiver for frames sent in `direction`
    pub fn new(direction: Direction) -> Self {
        Self::with_payload_len(codec::coded_bits(direction))
    }

    pub fn with_payload_len(payload_len: usize) -> Self {
        Self {
            payload_len,
            register: 0,
            level: History::new(),
            quality: History::new(),
            collecting: None,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.collecting.is_some()
    }

    /// Back to sync search, any partial frame is dropped
    pub fn reset(&mut self) {
        self.register = 0;
        self.level.clear();
        self.quality.clear();
        self.collecting = None;
    }

    /// Feed one demodulated bit. Returns the payload once it is complete.
    pub fn push_bit(&mut self, bit: u8, quality: f64, level: f64) -> Option<RxFrame> {
        if let Some(c) = &mut self.collecting {
            c.bits.push(bit & 1);
            c.level_sum += level;
            c.quality_sum += quality;
            if c.bits.len() < self.payload_len {
                return None;
            }

            let n = (SYNC_BITS + c.bits.len()) as f64;
            let frame = RxFrame {
                bits: BitBuffer::from_bitarr(&c.bits),
                level: (c.level_sum + self.level.average() * SYNC_BITS as f64) / n,
                quality: (c.quality_sum + self.quality.average() * SYNC_BITS as f64) / n,
            };
            tracing::trace!("frame received, level {:.2} quality {:.2}", frame.level, frame.quality);
            self.reset();
            return Some(frame);
        }

        self.register = (self.register << 1) | (bit & 1) as u16;
        self.level.write(level);
        self.quality.write(quality);

        if self.register == SYNC_WORD && self.quality.is_filled() {
            let avg = self.quality.average();
            if avg >= SYNC_QUALITY_THRESHOLD {
                tracing::trace!("sync found, quality {:.2}", avg);
                self.collecting = Some(Collecting {
                    bits: Vec::with_capacity(self.payload_len),
                    level_sum: 0.0,
                    quality_sum: 0.0,
                });
            } else {
                tracing::trace!("sync word with low quality {:.2}, ignored", avg);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use r2k_frames::Frame;

    fn push_word(rx: &mut FrameRx, word: u16, quality: f64) -> Option<RxFrame> {
        let mut out = None;
        for i in (0..16).rev() {
            out = rx.push_bit(((word >> i) & 1) as u8, quality, 1.0).or(out);
        }
        out
    }

    #[test]
    fn test_sync_below_threshold_ignored() {
        let mut rx = FrameRx::with_payload_len(8);
        push_word(&mut rx, 0xAAAA, 0.6);
        push_word(&mut rx, SYNC_WORD, 0.6);
        assert!(!rx.is_synced());
    }

    #[test]
    fn test_sync_at_threshold_accepted() {
        let mut rx = FrameRx::with_payload_len(8);
        push_word(&mut rx, 0xAAAA, 0.65);
        push_word(&mut rx, SYNC_WORD, 0.65);
        assert!(rx.is_synced());

        let mut frame = None;
        for bit in [1, 0, 1, 1, 0, 0, 1, 0] {
            frame = rx.push_bit(bit, 0.65, 0.5);
        }
        let frame = frame.unwrap();
        assert_eq!(frame.bits.to_bitstr(), "10110010");
        assert!((frame.quality - 0.65).abs() < 1e-9);
        assert!(!rx.is_synced());
    }

    #[test]
    fn test_partial_window_never_syncs() {
        // Fewer than 16 bits received, quality window not yet filled
        let mut rx = FrameRx::with_payload_len(8);
        for i in (0..11).rev() {
            rx.push_bit(((SYNC_WORD >> i) & 1) as u8, 1.0, 1.0);
        }
        assert!(!rx.is_synced());
    }

    #[test]
    fn test_receive_encoded_frame() {
        let mut frame = Frame::new(Direction::MobileToBase, 0);
        frame.channel = 1;
        frame.relais = 200;
        frame.set_identity(0, 120, 12345);

        let mut rx = FrameRx::new(Direction::MobileToBase);
        // Leading noise, then the frame
        for _ in 0..40 {
            rx.push_bit(rand::random_range(0..2), 0.3, 0.1);
        }
        let mut received = None;
        for bit in codec::encode(&frame).into_bitvec() {
            received = rx.push_bit(bit, 0.9, 1.0).or(received);
        }
        let received = received.unwrap();
        assert_eq!(received.bits.get_len(), 144);
        assert_eq!(codec::decode_payload(&received.bits).unwrap(), frame);
    }
}
