use std::fmt;

use crate::frame_err::FrameErr;

/// Bit-addressable buffer, most significant bit first within each byte.
/// Frames are assembled and parsed through it, so every field read and write
/// follows the same left-to-right bit order.
#[derive(Clone)]
pub struct BitBuffer {
    buffer: Vec<u8>,
    pos: usize,              // next bit offset for read/write
    end: usize,              // bits at or after this are out of window
}

impl BitBuffer {
    /// Create a zeroed buffer capable of holding exactly `len_bits` bits.
    pub fn new(len_bits: usize) -> Self {
        BitBuffer {
            buffer: vec![0; len_bits.div_ceil(8)],
            pos: 0,
            end: len_bits,
        }
    }

    /// Construct a BitBuffer directly from a string of '0'/'1' characters.
    /// Panics if any other character is encountered.
    pub fn from_bitstr(bitstr: &str) -> Self {
        let mut buf = BitBuffer::new(bitstr.len());
        for c in bitstr.chars() {
            match c {
                '0' => buf.write_bit(0),
                '1' => buf.write_bit(1),
                other => panic!("from_bitstr: invalid character `{}`; only '0' or '1' allowed", other),
            }
        }
        buf.pos = 0;
        buf
    }

    /// Construct a BitBuffer from a slice holding one bit (0 or 1) per byte.
    pub fn from_bitarr(data: &[u8]) -> Self {
        let mut buf = BitBuffer::new(data.len());
        buf.copy_bits_from_bitarr(data);
        buf.pos = 0;
        buf
    }

    /// Convert the entire window into a String of '0'/'1' characters.
    pub fn to_bitstr(&self) -> String {
        (0..self.end)
            .map(|i| if self.read_bit_at_unchecked(i) == 1 { '1' } else { '0' })
            .collect()
    }

    /// Peek `num_bits` at `offset` from the buffer start, without advancing.
    /// Returns None on overflow or if `num_bits>64`.
    pub fn peek_bits_startoffset(&self, offset: usize, num_bits: usize) -> Option<u64> {
        if num_bits > 64 || offset + num_bits > self.end {
            return None;
        }
        let mut v = 0u64;
        for i in 0..num_bits {
            v = (v << 1) | self.read_bit_at_unchecked(offset + i) as u64;
        }
        Some(v)
    }

    /// Read `num_bits` at the current pos, advancing on success.
    pub fn read_bits(&mut self, num_bits: usize) -> Option<u64> {
        let v = self.peek_bits_startoffset(self.pos, num_bits)?;
        self.pos += num_bits;
        Some(v)
    }

    /// Similar to read_bits, but returns FrameErr::BufferEnded naming the field if not enough bits are available.
    pub fn read_field(&mut self, num_bits: usize, field: &'static str) -> Result<u64, FrameErr> {
        self.read_bits(num_bits).ok_or(FrameErr::BufferEnded { field: Some(field) })
    }

    /// Write a single bit to pos
    pub fn write_bit(&mut self, value: u8) {
        assert!(value == 0 || value == 1, "write_bit: value must be 0 or 1");
        assert!(self.pos < self.end, "write would exceed buffer end");

        let index = self.pos / 8;
        let shift = 7 - (self.pos % 8);
        self.buffer[index] &= !(1 << shift);
        self.buffer[index] |= value << shift;
        self.pos += 1;
    }

    /// Write an arbitrary amount of zero-bits
    pub fn write_zeroes(&mut self, num_bits: usize) {
        for _ in 0..num_bits {
            self.write_bit(0);
        }
    }

    /// Write an arbitrary amount of one-bits
    pub fn write_ones(&mut self, num_bits: usize) {
        for _ in 0..num_bits {
            self.write_bit(1);
        }
    }

    /// Write the low `num_bits` of `value` (up to 64), most significant bit first, advancing pos.
    /// Panics if `value` does not fit in `num_bits`.
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can only write up to 64 bits");
        assert!(num_bits == 64 || value >> num_bits == 0, "value exceeds num_bits {} {}", value, num_bits);
        for i in (0..num_bits).rev() {
            self.write_bit(((value >> i) & 1) as u8);
        }
    }

    pub fn copy_bits_from_bitarr(&mut self, buf: &[u8]) {
        for &bit in buf {
            assert!(bit == 0 || bit == 1, "copy_bits_from_bitarr: invalid byte `{}`; only '0' or '1' allowed", bit);
            self.write_bit(bit);
        }
    }

    /// Convert entire window into an array with 0 or 1 value per byte
    pub fn into_bitvec(self) -> Vec<u8> {
        (0..self.end).map(|i| self.read_bit_at_unchecked(i)).collect()
    }

    /// Window length in bits
    pub fn get_len(&self) -> usize {
        self.end
    }

    /// Seek `pos` to `offset`.
    pub fn seek(&mut self, offset: usize) {
        assert!(offset <= self.end, "seek out of window: got {}, allowed [0,{}]", offset, self.end);
        self.pos = offset;
    }

    #[inline]
    fn read_bit_at_unchecked(&self, bit_pos: usize) -> u8 {
        (self.buffer[bit_pos / 8] >> (7 - (bit_pos % 8))) & 1
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ len: {}, pos: {}, bits: {} }}", self.end, self.pos, self.to_bitstr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unaligned_read_write_across_bytes() {
        let mut buf = BitBuffer::new(24);
        buf.write_bits(0b101, 3);
        buf.write_bits(0x1F3, 9);
        buf.write_bits(0xA5A, 12);
        buf.seek(0);
        assert_eq!(buf.read_bits(3), Some(0b101));
        assert_eq!(buf.read_bits(9), Some(0x1F3));
        assert_eq!(buf.read_bits(12), Some(0xA5A));
        assert_eq!(buf.read_bits(1), None);
    }

    #[test]
    fn test_read_overflow() {
        let mut buf = BitBuffer::new(7);
        assert_eq!(buf.read_bits(8), None);
        assert!(buf.read_field(8, "too_long").is_err());
    }

    #[test]
    #[should_panic]
    fn test_write_overflow() {
        let mut buf = BitBuffer::new(4);
        buf.write_bits(0x1F, 5);
    }

    #[test]
    fn test_write_runs() {
        let mut buf = BitBuffer::new(24);
        buf.write_ones(3);
        buf.write_zeroes(20);
        buf.write_bit(1);
        assert_eq!(buf.to_bitstr(), format!("111{}1", "0".repeat(20)));
    }

    #[test]
    fn test_bitarr_and_bitstr() {
        let buf = BitBuffer::from_bitstr("1100101");
        assert_eq!(buf.clone().into_bitvec(), vec![1, 1, 0, 0, 1, 0, 1]);
        let buf2 = BitBuffer::from_bitarr(&[1, 1, 0, 0, 1, 0, 1]);
        assert_eq!(buf2.to_bitstr(), "1100101");
        assert_eq!(buf2.peek_bits_startoffset(4, 3), Some(0b101));
    }
}
