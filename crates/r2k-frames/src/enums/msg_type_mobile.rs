/// Message types sent by the mobile station (mobile to base station)
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgTypeMobile {
    /// Registration of the handset at this relais
    Inscription = 0,
    /// Outgoing call request on the control channel
    CallRequest = 1,
    /// Identity response on the assigned traffic channel
    IdentAck = 2,
    /// Dialed digits 1 to 10, carries no subscriber identity
    Dial1 = 3,
    /// Dialed digits 11 to 20, carries no subscriber identity
    Dial2 = 4,
    SuspendAck = 5,
    /// Handset answered the alert
    Answer = 6,
    Release = 7,
}

impl std::convert::TryFrom<u64> for MsgTypeMobile {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(MsgTypeMobile::Inscription),
            1 => Ok(MsgTypeMobile::CallRequest),
            2 => Ok(MsgTypeMobile::IdentAck),
            3 => Ok(MsgTypeMobile::Dial1),
            4 => Ok(MsgTypeMobile::Dial2),
            5 => Ok(MsgTypeMobile::SuspendAck),
            6 => Ok(MsgTypeMobile::Answer),
            7 => Ok(MsgTypeMobile::Release),
            _ => Err(()),
        }
    }
}

impl MsgTypeMobile {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        self as u8
    }

    /// Dialing messages carry digits in place of the subscriber identity
    pub fn carries_identity(self) -> bool {
        !matches!(self, MsgTypeMobile::Dial1 | MsgTypeMobile::Dial2)
    }
}
