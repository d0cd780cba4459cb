use core::fmt;

use r2k_core::Direction;

use crate::fields::FrameField;

/// A decoded radio frame. Only the fields named by the layout of
/// (`direction`, `message_type`) are meaningful, all others stay zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub direction: Direction,
    /// 1 bit, 0 = control channel signalling, 1 = traffic channel signalling
    pub channel_type_flag: u8,
    /// 8 bits
    pub channel: u16,
    /// 9 bits, relais the frame is addressed to or sent from
    pub relais: u16,
    /// 4 bits
    pub message_type: u8,
    pub deport: u8,
    pub registration_class: u8,
    pub mobile_power_flag: u8,
    pub tariff_class: u8,
    /// 4 bits, first digit of the subscriber number
    pub mobile_type: u8,
    /// 9 bits, home relais of the subscriber
    pub home_relais: u16,
    /// 16 bits
    pub mobile_id: u16,
    pub called_fleet_id: u16,
    pub registration_response_code: u8,
    pub assigned_channel: u16,
    pub sequence_number: u8,
    pub invitation_code: u8,
    /// 3 bits, NCONV
    pub supervisory_value: u8,
    /// 4 bits each, values above 9 end the number
    pub digits: [u8; 10],
}

pub const CHANNEL_TYPE_FLAG_CC: u8 = 0;
pub const CHANNEL_TYPE_FLAG_TC: u8 = 1;

impl Frame {
    pub fn new(direction: Direction, message_type: u8) -> Self {
        Frame { direction, message_type, ..Default::default() }
    }

    /// Raw value of a field. Panics on the constant sentinels.
    pub fn get(&self, field: FrameField) -> u64 {
        match field {
            FrameField::Zero | FrameField::One => panic!("sentinel field {:?} has no value", field),
            FrameField::ChannelTypeFlag => self.channel_type_flag as u64,
            FrameField::Channel => self.channel as u64,
            FrameField::Relais => self.relais as u64,
            FrameField::MessageType => self.message_type as u64,
            FrameField::Deport => self.deport as u64,
            FrameField::RegistrationClass => self.registration_class as u64,
            FrameField::MobilePowerFlag => self.mobile_power_flag as u64,
            FrameField::TariffClass => self.tariff_class as u64,
            FrameField::MobileType => self.mobile_type as u64,
            FrameField::HomeRelais => self.home_relais as u64,
            FrameField::MobileId => self.mobile_id as u64,
            FrameField::CalledFleetId => self.called_fleet_id as u64,
            FrameField::RegistrationResponseCode => self.registration_response_code as u64,
            FrameField::AssignedChannel => self.assigned_channel as u64,
            FrameField::SequenceNumber => self.sequence_number as u64,
            FrameField::InvitationCode => self.invitation_code as u64,
            FrameField::SupervisoryValue => self.supervisory_value as u64,
            FrameField::Digit(n) => self.digits[n as usize] as u64,
        }
    }

    /// Set a field from a raw value. The value is expected to fit the layout width already.
    pub fn set(&mut self, field: FrameField, value: u64) {
        match field {
            FrameField::Zero | FrameField::One => panic!("sentinel field {:?} has no value", field),
            FrameField::ChannelTypeFlag => self.channel_type_flag = value as u8,
            FrameField::Channel => self.channel = value as u16,
            FrameField::Relais => self.relais = value as u16,
            FrameField::MessageType => self.message_type = value as u8,
            FrameField::Deport => self.deport = value as u8,
            FrameField::RegistrationClass => self.registration_class = value as u8,
            FrameField::MobilePowerFlag => self.mobile_power_flag = value as u8,
            FrameField::TariffClass => self.tariff_class = value as u8,
            FrameField::MobileType => self.mobile_type = value as u8,
            FrameField::HomeRelais => self.home_relais = value as u16,
            FrameField::MobileId => self.mobile_id = value as u16,
            FrameField::CalledFleetId => self.called_fleet_id = value as u16,
            FrameField::RegistrationResponseCode => self.registration_response_code = value as u8,
            FrameField::AssignedChannel => self.assigned_channel = value as u16,
            FrameField::SequenceNumber => self.sequence_number = value as u8,
            FrameField::InvitationCode => self.invitation_code = value as u8,
            FrameField::SupervisoryValue => self.supervisory_value = value as u8,
            FrameField::Digit(n) => self.digits[n as usize] = value as u8,
        }
    }

    /// Set the subscriber identity fields
    pub fn set_identity(&mut self, mobile_type: u8, home_relais: u16, mobile_id: u16) {
        self.mobile_type = mobile_type;
        self.home_relais = home_relais;
        self.mobile_id = mobile_id;
    }

    /// Decimal digits in order, stopping at the first end marker
    pub fn digits_str(&self) -> String {
        self.digits
            .iter()
            .take_while(|&&d| d <= 9)
            .map(|&d| char::from(b'0' + d))
            .collect()
    }

    /// True if all ten digit positions hold a digit
    pub fn digits_complete(&self) -> bool {
        self.digits.iter().all(|&d| d <= 9)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Frame {{ {:?} type: {} chan: {} flag: {} relais: {} mobile: {},{},{} }}",
            self.direction, self.message_type, self.channel, self.channel_type_flag, self.relais,
            self.mobile_type, self.home_relais, self.mobile_id,
        )
    }
}
