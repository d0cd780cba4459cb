use core::fmt;

use r2k_frames::frame::{CHANNEL_TYPE_FLAG_CC, CHANNEL_TYPE_FLAG_TC};

/// Protocol state of one channel. Starts in Idle and cycles forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    /// Registration received, acknowledge pending
    Inscription,
    OutAssign,
    InAssign,
    RecallAssign,
    OutIdent,
    InIdent,
    RecallIdent,
    OutDial1,
    OutDial2,
    /// Handset parked while the called party is reached
    Suspend,
    RecallWait,
    InAlert,
    OutAlert,
    RecallAlert,
    Active,
    ReleaseCc,
    ReleaseTc,
}

impl ChannelState {
    /// States signalled as control channel traffic. The handset listens on the
    /// control channel while the call is in one of these.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            ChannelState::Idle
                | ChannelState::Inscription
                | ChannelState::OutAssign
                | ChannelState::InAssign
                | ChannelState::RecallAssign
                | ChannelState::RecallWait
                | ChannelState::ReleaseCc
        )
    }

    /// Channel type flag carried by frames in both directions while in this state
    pub fn channel_type_flag(&self) -> u8 {
        if self.is_control() { CHANNEL_TYPE_FLAG_CC } else { CHANNEL_TYPE_FLAG_TC }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, ChannelState::ReleaseCc | ChannelState::ReleaseTc)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChannelState::Idle => "IDLE",
            ChannelState::Inscription => "INSCRIPTION",
            ChannelState::OutAssign => "OUT-ASSIGN",
            ChannelState::InAssign => "IN-ASSIGN",
            ChannelState::RecallAssign => "RECALL-ASSIGN",
            ChannelState::OutIdent => "OUT-IDENT",
            ChannelState::InIdent => "IN-IDENT",
            ChannelState::RecallIdent => "RECALL-IDENT",
            ChannelState::OutDial1 => "OUT-DIAL1",
            ChannelState::OutDial2 => "OUT-DIAL2",
            ChannelState::Suspend => "SUSPEND",
            ChannelState::RecallWait => "RECALL-WAIT",
            ChannelState::InAlert => "IN-ALERT",
            ChannelState::OutAlert => "OUT-ALERT",
            ChannelState::RecallAlert => "RECALL-ALERT",
            ChannelState::Active => "ACTIVE",
            ChannelState::ReleaseCc => "RELEASE-CC",
            ChannelState::ReleaseTc => "RELEASE-TC",
        }
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
