use r2k_core::{BitBuffer, Direction, FrameErr};

use crate::fields::{FrameField, NUM_FIELD_SLOTS};
use crate::frame::Frame;
use crate::hagelbarger;
use crate::layouts::{self, FrameLayout, MESSAGE_TYPE_BITS, MESSAGE_TYPE_OFFSET};

/// Bit synchronization pattern sent ahead of the sync word
pub const PREAMBLE_BITSYNC: u16 = 0xAAAA;
/// Frame synchronization word the receiver searches for
pub const SYNC_WORD: u16 = 0x066B;
pub const PREAMBLE_BITS: usize = 32;

/// Coded length of a frame, preamble excluded
#[inline]
pub fn coded_bits(direction: Direction) -> usize {
    hagelbarger::coded_len(direction.message_bits())
}

/// Length of a transmitted frame including the preamble
#[inline]
pub fn frame_bits(direction: Direction) -> usize {
    PREAMBLE_BITS + coded_bits(direction)
}

fn layout_for(frame: &Frame) -> &'static FrameLayout {
    match layouts::find_layout(frame.direction, frame.message_type) {
        Some(layout) => layout,
        None => panic!("no layout for {:?} message type {}", frame.direction, frame.message_type),
    }
}

#[inline]
fn low_bits(value: u64, width: usize) -> u64 {
    if width >= 64 { value } else { value & ((1u64 << width) - 1) }
}

/// Assemble the raw message bits of a frame, without coding or preamble.
/// Values wider than their field are truncated to the field width.
/// Panics if the frame's direction and message type have no layout.
pub fn encode_message(frame: &Frame) -> BitBuffer {
    let layout = layout_for(frame);
    let mut buf = BitBuffer::new(layout.len());

    // Bits of each field already emitted, so fields split over several runs continue where they left off
    let mut consumed = [0usize; NUM_FIELD_SLOTS];

    for &(field, width) in layout.runs {
        match field {
            FrameField::Zero => buf.write_zeroes(width),
            FrameField::One => buf.write_ones(width),
            _ => {
                let Some(slot) = field.slot() else { unreachable!() };
                let total = layout.field_width(field);
                let value = low_bits(frame.get(field), total);
                let shift = total - consumed[slot] - width;
                buf.write_bits(low_bits(value >> shift, width), width);
                consumed[slot] += width;
            }
        }
    }
    buf.seek(0);
    buf
}

/// Encode a frame into the transmitted bit string: preamble followed by the coded message.
/// Panics if the frame's direction and message type have no layout.
pub fn encode(frame: &Frame) -> BitBuffer {
    encode_payload_with_preamble(&encode_message(frame))
}

fn encode_payload_with_preamble(message: &BitBuffer) -> BitBuffer {
    let coded = hagelbarger::encode(&message.clone().into_bitvec());

    let mut buf = BitBuffer::new(PREAMBLE_BITS + coded.len());
    buf.write_bits(PREAMBLE_BITSYNC as u64, 16);
    buf.write_bits(SYNC_WORD as u64, 16);
    buf.copy_bits_from_bitarr(&coded);
    buf.seek(0);
    buf
}

/// Fill a frame from raw message bits of the given direction
pub fn decode_message(direction: Direction, bits: &[u8]) -> Result<Frame, FrameErr> {
    if bits.len() != direction.message_bits() {
        return Err(FrameErr::InvalidLength { found: bits.len() });
    }
    let mut buf = BitBuffer::from_bitarr(bits);

    let message_type = buf
        .peek_bits_startoffset(MESSAGE_TYPE_OFFSET, MESSAGE_TYPE_BITS)
        .ok_or(FrameErr::BufferEnded { field: Some("message_type") })? as u8;
    let Some(layout) = layouts::find_layout(direction, message_type) else {
        return Err(FrameErr::UnknownMessageType { direction, message_type });
    };

    // Every field, message type included, is filled from its runs
    let mut frame = Frame::new(direction, 0);
    for &(field, width) in layout.runs {
        let bits = buf.read_field(width, layout.name)?;
        match field {
            FrameField::Zero | FrameField::One => {}
            _ => {
                let prev = frame.get(field);
                frame.set(field, (prev << width) | bits);
            }
        }
    }
    Ok(frame)
}

/// Decode the coded message bits (preamble already stripped). The direction follows from the length.
pub fn decode_payload(coded: &BitBuffer) -> Result<Frame, FrameErr> {
    let direction = match coded.get_len() {
        n if n == coded_bits(Direction::BaseToMobile) => Direction::BaseToMobile,
        n if n == coded_bits(Direction::MobileToBase) => Direction::MobileToBase,
        n => return Err(FrameErr::InvalidLength { found: n }),
    };

    let (message, corrected) = hagelbarger::decode(&coded.clone().into_bitvec());
    if corrected > 0 {
        tracing::trace!("fec corrected {} bits in {:?} frame", corrected, direction);
    }
    decode_message(direction, &message)
}

/// Decode a complete transmitted frame including its preamble
pub fn decode(bits: &BitBuffer) -> Result<Frame, FrameErr> {
    let len = bits.get_len();
    if len <= PREAMBLE_BITS {
        return Err(FrameErr::InvalidLength { found: len });
    }
    let payload: Vec<u8> = bits.clone().into_bitvec().split_off(PREAMBLE_BITS);
    decode_payload(&BitBuffer::from_bitarr(&payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::LAYOUTS;
    use r2k_core::debug;

    fn random_frame(layout: &FrameLayout) -> Frame {
        let mut frame = Frame::new(layout.direction, layout.message_type);
        for &(field, _) in layout.runs {
            if field.slot().is_none() || field == FrameField::MessageType {
                continue;
            }
            let width = layout.field_width(field);
            frame.set(field, rand::random_range(0..(1u64 << width)));
        }
        frame
    }

    #[test]
    fn test_round_trip_all_layouts() {
        debug::setup_logging_verbose();
        for layout in LAYOUTS {
            for _ in 0..20 {
                let frame = random_frame(layout);
                let bits = encode(&frame);
                assert_eq!(bits.get_len(), frame_bits(layout.direction));
                let decoded = decode(&bits).unwrap();
                assert_eq!(decoded, frame, "{} did not survive coding", layout.name);
            }
        }
    }

    #[test]
    fn test_message_type_preserved() {
        for layout in LAYOUTS {
            let frame = Frame::new(layout.direction, layout.message_type);
            let decoded = decode_message(layout.direction, &encode_message(&frame).into_bitvec()).unwrap();
            assert_eq!(decoded.message_type, layout.message_type, "{}", layout.name);
        }
        let release = decode(&encode(&Frame::new(Direction::BaseToMobile, 8))).unwrap();
        assert_eq!(release.message_type, 8);
    }

    #[test]
    fn test_preamble() {
        let frame = Frame::new(Direction::BaseToMobile, 0);
        let bits = encode(&frame);
        assert_eq!(bits.peek_bits_startoffset(0, 16), Some(PREAMBLE_BITSYNC as u64));
        assert_eq!(bits.peek_bits_startoffset(16, 16), Some(SYNC_WORD as u64));
    }

    #[test]
    fn test_header_positions() {
        let mut frame = Frame::new(Direction::MobileToBase, 6);
        frame.channel_type_flag = 1;
        frame.channel = 0xA5;
        frame.relais = 0x155;
        let msg = encode_message(&frame);
        assert_eq!(msg.get_len(), 64);
        assert_eq!(&msg.to_bitstr()[..22], "1101001011010101010110");
    }

    #[test]
    fn test_oversized_values_truncated() {
        let mut frame = Frame::new(Direction::BaseToMobile, 1);
        frame.channel = 0x1FF;
        frame.mobile_type = 0x1A;
        frame.registration_response_code = 0xF;
        let decoded = decode(&encode(&frame)).unwrap();
        assert_eq!(decoded.channel, 0xFF);
        assert_eq!(decoded.mobile_type, 0xA);
        assert_eq!(decoded.registration_response_code, 0x7);
    }

    #[test]
    fn test_sentinels_forced() {
        // Release carries four bits forced to one, everything after them zero
        let frame = Frame::new(Direction::BaseToMobile, 8);
        let msg = encode_message(&frame).to_bitstr();
        assert_eq!(&msg[51..55], "1111");
        assert!(msg[55..].chars().all(|c| c == '0'));
    }

    #[test]
    fn test_fec_tolerance() {
        for layout in LAYOUTS {
            let frame = random_frame(layout);
            let mut bits = encode(&frame).into_bitvec();
            // Two adjacent errors and one far away
            bits[PREAMBLE_BITS + 10] ^= 1;
            bits[PREAMBLE_BITS + 11] ^= 1;
            bits[PREAMBLE_BITS + 90] ^= 1;
            let decoded = decode(&BitBuffer::from_bitarr(&bits)).unwrap();
            assert_eq!(decoded, frame, "{}", layout.name);
        }
    }

    #[test]
    fn test_unknown_message_type() {
        let mut frame = Frame::new(Direction::MobileToBase, 0);
        frame.relais = 200;
        let mut raw = encode_message(&frame).into_bitvec();
        // Message type 15 has no layout
        for bit in &mut raw[MESSAGE_TYPE_OFFSET..MESSAGE_TYPE_OFFSET + MESSAGE_TYPE_BITS] {
            *bit = 1;
        }
        let coded = hagelbarger::encode(&raw);
        let result = decode_payload(&BitBuffer::from_bitarr(&coded));
        assert_eq!(
            result,
            Err(FrameErr::UnknownMessageType { direction: Direction::MobileToBase, message_type: 15 })
        );
    }

    #[test]
    fn test_invalid_length() {
        let bits = BitBuffer::new(100);
        assert_eq!(decode_payload(&bits), Err(FrameErr::InvalidLength { found: 100 }));
        assert_eq!(decode(&BitBuffer::new(20)), Err(FrameErr::InvalidLength { found: 20 }));
        assert_eq!(decode_message(Direction::BaseToMobile, &[0; 64]), Err(FrameErr::InvalidLength { found: 64 }));
    }

    #[test]
    fn test_dialed_digits() {
        let mut frame = Frame::new(Direction::MobileToBase, 3);
        frame.digits = [0, 6, 1, 2, 3, 4, 5, 6, 7, 8];
        let decoded = decode(&encode(&frame)).unwrap();
        assert_eq!(decoded.digits_str(), "0612345678");
        assert!(decoded.digits_complete());

        frame.digits = [1, 7, 0xF, 0, 0, 0, 0, 0, 0, 0];
        let decoded = decode(&encode(&frame)).unwrap();
        assert_eq!(decoded.digits_str(), "17");
        assert!(!decoded.digits_complete());
    }

    #[test]
    #[should_panic]
    fn test_missing_layout_panics() {
        let frame = Frame::new(Direction::BaseToMobile, 12);
        encode(&frame);
    }
}
