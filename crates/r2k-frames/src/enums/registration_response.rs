/// Registration response code ("crins") carried in the inscription acknowledge
/// Bits: 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistrationResponse {
    Accepted = 0,
    Refused = 1,
    RetryLater = 2,
    /// Disables the handset for good. Only sent when explicitly allowed in the config.
    PermanentDeactivation = 3,
}

impl std::convert::TryFrom<u64> for RegistrationResponse {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(RegistrationResponse::Accepted),
            1 => Ok(RegistrationResponse::Refused),
            2 => Ok(RegistrationResponse::RetryLater),
            3 => Ok(RegistrationResponse::PermanentDeactivation),
            _ => Err(()),
        }
    }
}

impl RegistrationResponse {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}
