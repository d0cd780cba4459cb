/// Cause carried with a call release toward the telephony side, Q.850 numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReleaseCause {
    Normal = 16,
    Busy = 17,
    /// Called party or handset did not answer in time
    NoAnswer = 19,
    /// Handset never identified after paging
    OutOfOrder = 27,
    InvalidNumber = 28,
    /// No free control or traffic channel
    NoChannel = 34,
    /// Radio link lost during a call
    TempFail = 41,
}

impl std::convert::TryFrom<u64> for ReleaseCause {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            16 => Ok(ReleaseCause::Normal),
            17 => Ok(ReleaseCause::Busy),
            19 => Ok(ReleaseCause::NoAnswer),
            27 => Ok(ReleaseCause::OutOfOrder),
            28 => Ok(ReleaseCause::InvalidNumber),
            34 => Ok(ReleaseCause::NoChannel),
            41 => Ok(ReleaseCause::TempFail),
            _ => Err(()),
        }
    }
}

impl ReleaseCause {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for ReleaseCause {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?} ({})", self, self.into_raw())
    }
}
