/// Transmission direction of a radio frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Relais (base station) to mobile station, sent by us
    #[default]
    BaseToMobile,
    /// Mobile station to relais, received by us
    MobileToBase,
}

impl Direction {
    /// Length of the raw message before error-correction coding
    #[inline]
    pub fn message_bits(&self) -> usize {
        match self {
            Direction::BaseToMobile => 80,
            Direction::MobileToBase => 64,
        }
    }
}
