/// Message types sent by the relais (base station to mobile)
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgTypeRelais {
    /// Continuous broadcast on an idle control channel
    Idle = 0,
    /// Acknowledge to an inscription (registration) request
    InscriptionAck = 1,
    /// Orders the handset to the traffic channel carried in the frame
    Assign = 2,
    /// Asks the handset on the traffic channel to identify
    Ident = 3,
    /// Invites the first ten dialed digits
    InviteDial1 = 4,
    /// Invites dialed digits 11 to 20
    InviteDial2 = 5,
    /// Parks the handset while the called party is reached
    Suspend = 6,
    /// Ringing
    Alert = 7,
    Release = 8,
}

impl std::convert::TryFrom<u64> for MsgTypeRelais {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(MsgTypeRelais::Idle),
            1 => Ok(MsgTypeRelais::InscriptionAck),
            2 => Ok(MsgTypeRelais::Assign),
            3 => Ok(MsgTypeRelais::Ident),
            4 => Ok(MsgTypeRelais::InviteDial1),
            5 => Ok(MsgTypeRelais::InviteDial2),
            6 => Ok(MsgTypeRelais::Suspend),
            7 => Ok(MsgTypeRelais::Alert),
            8 => Ok(MsgTypeRelais::Release),
            _ => Err(()),
        }
    }
}

impl MsgTypeRelais {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}
