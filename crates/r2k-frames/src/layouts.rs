use r2k_core::Direction;

use crate::fields::FrameField::{self, *};

/// Bit template of one (direction, message type) combination. Runs are read left to right,
/// each field occupying its run most significant bit first.
#[derive(Debug)]
pub struct FrameLayout {
    pub direction: Direction,
    pub message_type: u8,
    pub name: &'static str,
    pub runs: &'static [(FrameField, usize)],
}

/// The message type sits at the same position in every layout of both directions
pub const MESSAGE_TYPE_OFFSET: usize = 18;
pub const MESSAGE_TYPE_BITS: usize = 4;

impl FrameLayout {
    /// Total width of a field in this layout, summed over all of its runs
    pub fn field_width(&self, field: FrameField) -> usize {
        self.runs.iter().filter(|(f, _)| *f == field).map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(|(_, w)| w).sum()
    }
}

/// Looks up the layout for a combination, None if nothing is registered for it
pub fn find_layout(direction: Direction, message_type: u8) -> Option<&'static FrameLayout> {
    LAYOUTS
        .iter()
        .copied()
        .find(|l| l.direction == direction && l.message_type == message_type)
}

// Relais to mobile, 80 bits each

const RELAIS_IDLE: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 0,
    name: "Idle",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (Deport, 3), (RegistrationClass, 3), (MobilePowerFlag, 1), (TariffClass, 2), (SupervisoryValue, 3), (One, 2), (Zero, 44)],
};

const RELAIS_INSCRIPTION_ACK: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 1,
    name: "InscriptionAck",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (RegistrationResponseCode, 3), (Zero, 26)],
};

const RELAIS_ASSIGN: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 2,
    name: "Assign",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (AssignedChannel, 8), (MobilePowerFlag, 1), (SupervisoryValue, 3), (Zero, 17)],
};

const RELAIS_IDENT: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 3,
    name: "Ident",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (InvitationCode, 4), (SequenceNumber, 3), (Zero, 22)],
};

const RELAIS_INVITE_DIAL1: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 4,
    name: "InviteDial1",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 1), (One, 1), (Zero, 27)],
};

const RELAIS_INVITE_DIAL2: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 5,
    name: "InviteDial2",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 1), (One, 1), (Zero, 27)],
};

const RELAIS_SUSPEND: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 6,
    name: "Suspend",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 29)],
};

const RELAIS_ALERT: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 7,
    name: "Alert",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 29)],
};

const RELAIS_RELEASE: FrameLayout = FrameLayout {
    direction: Direction::BaseToMobile,
    message_type: 8,
    name: "Release",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (One, 4), (Zero, 25)],
};

// Mobile to relais, 64 bits each

const MOBILE_INSCRIPTION: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 0,
    name: "Inscription",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 13)],
};

const MOBILE_CALL_REQUEST: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 1,
    name: "CallRequest",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (CalledFleetId, 12), (Zero, 1)],
};

const MOBILE_IDENT_ACK: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 2,
    name: "IdentAck",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 13)],
};

const MOBILE_DIAL1: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 3,
    name: "Dial1",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (Digit(0), 4), (Digit(1), 4), (Digit(2), 4), (Digit(3), 4), (Digit(4), 4), (Digit(5), 4), (Digit(6), 4), (Digit(7), 4), (Digit(8), 4), (Digit(9), 4), (Zero, 2)],
};

const MOBILE_DIAL2: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 4,
    name: "Dial2",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (Digit(0), 4), (Digit(1), 4), (Digit(2), 4), (Digit(3), 4), (Digit(4), 4), (Digit(5), 4), (Digit(6), 4), (Digit(7), 4), (Digit(8), 4), (Digit(9), 4), (Zero, 2)],
};

const MOBILE_SUSPEND_ACK: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 5,
    name: "SuspendAck",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 13)],
};

const MOBILE_ANSWER: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 6,
    name: "Answer",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (Zero, 13)],
};

const MOBILE_RELEASE: FrameLayout = FrameLayout {
    direction: Direction::MobileToBase,
    message_type: 7,
    name: "Release",
    runs: &[(ChannelTypeFlag, 1), (Channel, 8), (Relais, 9), (MessageType, 4), (MobileType, 4), (HomeRelais, 9), (MobileId, 16), (One, 4), (Zero, 9)],
};

pub static LAYOUTS: &[&FrameLayout] = &[
    &RELAIS_IDLE,
    &RELAIS_INSCRIPTION_ACK,
    &RELAIS_ASSIGN,
    &RELAIS_IDENT,
    &RELAIS_INVITE_DIAL1,
    &RELAIS_INVITE_DIAL2,
    &RELAIS_SUSPEND,
    &RELAIS_ALERT,
    &RELAIS_RELEASE,
    &MOBILE_INSCRIPTION,
    &MOBILE_CALL_REQUEST,
    &MOBILE_IDENT_ACK,
    &MOBILE_DIAL1,
    &MOBILE_DIAL2,
    &MOBILE_SUSPEND_ACK,
    &MOBILE_ANSWER,
    &MOBILE_RELEASE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_are_well_formed() {
        for layout in LAYOUTS {
            assert_eq!(layout.len(), layout.direction.message_bits(), "{} has wrong length", layout.name);

            // Message type at its fixed position
            let mut offset = 0;
            for (field, width) in layout.runs {
                if *field == MessageType {
                    assert_eq!(offset, MESSAGE_TYPE_OFFSET, "{}", layout.name);
                    assert_eq!(*width, MESSAGE_TYPE_BITS, "{}", layout.name);
                }
                offset += width;
            }
            assert!(layout.message_type < (1 << MESSAGE_TYPE_BITS));

            // Exactly one layout per combination
            let dupes = LAYOUTS
                .iter()
                .filter(|l| l.direction == layout.direction && l.message_type == layout.message_type)
                .count();
            assert_eq!(dupes, 1, "{} registered twice", layout.name);
        }
    }

    #[test]
    fn test_dialing_layouts_have_no_identity() {
        for t in [3, 4] {
            let layout = find_layout(Direction::MobileToBase, t).unwrap();
            assert_eq!(layout.field_width(MobileId), 0);
            assert_eq!(layout.field_width(Digit(9)), 4);
        }
        assert!(find_layout(Direction::MobileToBase, 15).is_none());
    }
}
