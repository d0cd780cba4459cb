use r2k_frames::Frame;

/// Longest number a handset can dial, two batches of ten digits
pub const MAX_DIALING: usize = 20;

/// Identity of the handset currently served by a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub mobile_type: u8,
    pub home_relais: u16,
    pub mobile_id: u16,
    /// Digits dialed so far
    pub dialing: String,
}

impl Subscriber {
    pub fn new(mobile_type: u8, home_relais: u16, mobile_id: u16) -> Self {
        Subscriber { mobile_type, home_relais, mobile_id, dialing: String::new() }
    }

    /// Identity claimed by a mobile frame
    pub fn from_frame(frame: &Frame) -> Self {
        Self::new(frame.mobile_type, frame.home_relais, frame.mobile_id)
    }

    /// Parses a 9 digit subscriber number `T RRR NNNNN`. Returns None if it is malformed
    /// or a part does not fit its frame field.
    pub fn from_number(number: &str) -> Option<Self> {
        if number.len() != 9 || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mobile_type: u8 = number[0..1].parse().ok()?;
        let home_relais: u16 = number[1..4].parse().ok()?;
        let mobile_id: u32 = number[4..9].parse().ok()?;
        if home_relais > 511 || mobile_id > u16::MAX as u32 {
            return None;
        }
        Some(Self::new(mobile_type, home_relais, mobile_id as u16))
    }

    /// Dialable subscriber number
    pub fn number(&self) -> String {
        format!("{}{:03}{:05}", self.mobile_type, self.home_relais, self.mobile_id)
    }

    pub fn same_identity(&self, other: &Subscriber) -> bool {
        self.mobile_type == other.mobile_type && self.home_relais == other.home_relais && self.mobile_id == other.mobile_id
    }

    /// True if the identity fields of `frame` name this subscriber
    pub fn matches_frame(&self, frame: &Frame) -> bool {
        self.mobile_type == frame.mobile_type && self.home_relais == frame.home_relais && self.mobile_id == frame.mobile_id
    }

    /// Appends dialed digits, anything beyond the dialing buffer is dropped
    pub fn push_digits(&mut self, digits: &str) {
        let room = MAX_DIALING.saturating_sub(self.dialing.len());
        self.dialing.extend(digits.chars().take(room));
    }
}
