/// Symbolic owner of a bit position in a frame layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameField {
    /// Always transmitted as 0, ignored on receive
    Zero,
    /// Always transmitted as 1, ignored on receive
    One,
    ChannelTypeFlag,
    Channel,
    Relais,
    MessageType,
    Deport,
    RegistrationClass,
    MobilePowerFlag,
    TariffClass,
    MobileType,
    HomeRelais,
    MobileId,
    CalledFleetId,
    RegistrationResponseCode,
    AssignedChannel,
    SequenceNumber,
    InvitationCode,
    SupervisoryValue,
    /// Dialed digit, index 0..10
    Digit(u8),
}

/// Number of distinct value-carrying fields (digits counted individually)
pub const NUM_FIELD_SLOTS: usize = 27;

impl FrameField {
    /// Dense index of a value-carrying field, None for the constant sentinels
    pub fn slot(&self) -> Option<usize> {
        let slot = match self {
            FrameField::Zero | FrameField::One => return None,
            FrameField::ChannelTypeFlag => 0,
            FrameField::Channel => 1,
            FrameField::Relais => 2,
            FrameField::MessageType => 3,
            FrameField::Deport => 4,
            FrameField::RegistrationClass => 5,
            FrameField::MobilePowerFlag => 6,
            FrameField::TariffClass => 7,
            FrameField::MobileType => 8,
            FrameField::HomeRelais => 9,
            FrameField::MobileId => 10,
            FrameField::CalledFleetId => 11,
            FrameField::RegistrationResponseCode => 12,
            FrameField::AssignedChannel => 13,
            FrameField::SequenceNumber => 14,
            FrameField::InvitationCode => 15,
            FrameField::SupervisoryValue => 16,
            FrameField::Digit(n) => {
                assert!(*n < 10, "digit index {} out of range", n);
                17 + *n as usize
            }
        };
        Some(slot)
    }
}
