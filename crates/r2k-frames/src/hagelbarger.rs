// Hagelbarger-type rate 1/2 systematic convolutional code with majority-logic decoding

/// Delays of the information bits that feed each parity bit. The tap differences are all
/// distinct, which makes the four syndromes covering one information bit orthogonal.
pub const TAPS: [usize; 4] = [0, 1, 3, 7];
/// Zero bits appended to the message to flush the encoder
pub const TAIL_BITS: usize = 8;
/// Syndromes that must agree before an information bit is flipped
const MAJORITY: usize = 3;

/// Number of coded bits for a message of `message_bits`
#[inline]
pub fn coded_len(message_bits: usize) -> usize {
    2 * (message_bits + TAIL_BITS)
}

#[inline]
fn parity(info: &[u8], k: usize) -> u8 {
    TAPS.iter().filter(|&&t| k >= t).fold(0, |acc, &t| acc ^ info[k - t])
}

/// Encode `message` (one bit per byte) into `coded_len(message.len())` bits,
/// interleaved as info, parity, info, parity...
pub fn encode(message: &[u8]) -> Vec<u8> {
    let info: Vec<u8> = message.iter().map(|b| b & 1).chain(std::iter::repeat_n(0, TAIL_BITS)).collect();

    let mut out = Vec::with_capacity(info.len() * 2);
    for k in 0..info.len() {
        out.push(info[k]);
        out.push(parity(&info, k));
    }
    out
}

/// Decode coded bits (one bit per byte) back into the message, tail removed.
/// Returns the message and the number of information bits that were corrected.
///
/// Feedback decoding: after each correction the syndromes it caused are cleared, so any
/// two bit errors within one constraint span of 16 coded bits are corrected.
pub fn decode(coded: &[u8]) -> (Vec<u8>, usize) {
    assert!(coded.len() % 2 == 0, "coded length must be even");
    let n = coded.len() / 2;
    assert!(n > TAIL_BITS, "coded block too short");

    let mut info: Vec<u8> = (0..n).map(|k| coded[2 * k] & 1).collect();
    let mut syndrome: Vec<u8> = (0..n).map(|k| (coded[2 * k + 1] & 1) ^ parity(&info, k)).collect();

    let mut corrected = 0;
    for j in 0..n - TAIL_BITS {
        let votes = TAPS.iter().filter(|&&t| syndrome[j + t] == 1).count();
        if votes >= MAJORITY {
            info[j] ^= 1;
            for t in TAPS {
                syndrome[j + t] ^= 1;
            }
            corrected += 1;
        }
    }

    info.truncate(n - TAIL_BITS);
    (info, corrected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_message(len: usize) -> Vec<u8> {
        (0..len).map(|_| rand::random_range(0..2)).collect()
    }

    #[test]
    fn test_clean_channel() {
        let message = random_message(80);
        let coded = encode(&message);
        assert_eq!(coded.len(), coded_len(80));
        let (decoded, corrected) = decode(&coded);
        assert_eq!(decoded, message);
        assert_eq!(corrected, 0);
    }

    #[test]
    fn test_systematic_and_flushed() {
        let message = random_message(64);
        let coded = encode(&message);
        for (k, bit) in message.iter().enumerate() {
            assert_eq!(coded[2 * k], *bit);
        }
        // Tail info bits are zero
        assert!(coded[128..].iter().step_by(2).all(|&b| b == 0));
    }

    #[test]
    fn test_scattered_errors() {
        for _ in 0..50 {
            let message = random_message(80);
            let mut coded = encode(&message);
            // One error in every 20 coded bits, never two inside one constraint span
            let mut pos = rand::random_range(0..4);
            while pos < coded.len() {
                coded[pos] ^= 1;
                pos += 20 + rand::random_range(0..4);
            }
            let (decoded, _) = decode(&coded);
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn test_double_error_in_constraint_span() {
        let message = random_message(64);
        let clean = encode(&message);
        for first in (0..100).step_by(7) {
            for gap in 1..14 {
                let mut coded = clean.clone();
                coded[first] ^= 1;
                coded[first + gap] ^= 1;
                let (decoded, _) = decode(&coded);
                assert_eq!(decoded, message, "errors at {} and {}", first, first + gap);
            }
        }
    }

    #[test]
    fn test_info_error_counted() {
        let message = random_message(64);
        let mut coded = encode(&message);
        coded[20] ^= 1; // info bit 10
        let (decoded, corrected) = decode(&coded);
        assert_eq!(decoded, message);
        assert_eq!(corrected, 1);
    }
}
