use r2k_core::Direction;
use r2k_frames::Frame;
use r2k_frames::enums::msg_type_relais::MsgTypeRelais;
use r2k_frames::enums::release_cause::ReleaseCause;

use super::channel::PhyMode;
use super::pool::ChannelPool;
use super::state::ChannelState;
use super::timers::IDENT_TIME;

impl ChannelPool {
    /// Header common to all frames sent on `idx` in its current state
    fn frame_header(&self, idx: usize, msg_type: MsgTypeRelais) -> Frame {
        let ch = &self.channels[idx];
        let mut frame = Frame::new(Direction::BaseToMobile, msg_type.into_raw());
        frame.channel_type_flag = ch.state().channel_type_flag();
        frame.channel = ch.sysinfo.number;
        frame.relais = ch.sysinfo.relais;
        if let Some(sub) = &ch.subscriber {
            frame.set_identity(sub.mobile_type, sub.home_relais, sub.mobile_id);
        }
        frame
    }

    fn frame_idle(&self, idx: usize) -> Frame {
        let info = &self.channels[idx].sysinfo;
        let mut frame = self.frame_header(idx, MsgTypeRelais::Idle);
        frame.deport = info.deport;
        frame.registration_class = info.registration_class;
        frame.mobile_power_flag = info.power;
        frame.tariff_class = info.tariff_class;
        frame.supervisory_value = info.nconv;
        frame
    }

    /// Assignment of the call on `idx` to a traffic channel. The call moves right away,
    /// the frame still goes out on the control channel. None if the call had to be released.
    fn frame_assign(&mut self, idx: usize) -> Option<Frame> {
        let ident = match self.channels[idx].state() {
            ChannelState::OutAssign => ChannelState::OutIdent,
            ChannelState::InAssign => ChannelState::InIdent,
            _ => ChannelState::RecallIdent,
        };

        let Some(tc) = self.traffic_channel_for(idx) else {
            tracing::info!("chan {}: no traffic channel free", self.channels[idx].sysinfo.number);
            self.release_call(idx, ReleaseCause::NoChannel);
            return None;
        };

        let mut frame = self.frame_header(idx, MsgTypeRelais::Assign);
        let info = &self.channels[idx].sysinfo;
        frame.mobile_power_flag = info.power;
        frame.supervisory_value = info.nconv;
        frame.assigned_channel = self.channels[tc].sysinfo.number;

        if tc != idx {
            self.move_call(idx, tc);
        }
        self.new_state(tc, ident);
        self.channels[tc].timer.start(IDENT_TIME);
        Some(frame)
    }

    /// Builds the frame for the next transmit opportunity on `idx`. States without
    /// frames switch the channel to audio.
    pub(crate) fn get_frame(&mut self, idx: usize) -> Option<Frame> {
        let count = self.channels[idx].count_tx_frame();
        let state = self.channels[idx].state();

        let frame = match state {
            ChannelState::Idle | ChannelState::RecallWait => Some(self.frame_idle(idx)),
            ChannelState::Inscription => {
                let mut frame = self.frame_header(idx, MsgTypeRelais::InscriptionAck);
                frame.registration_response_code = self.channels[idx].sysinfo.crins;
                self.go_idle(idx);
                Some(frame)
            }
            ChannelState::OutAssign | ChannelState::InAssign | ChannelState::RecallAssign => match self.frame_assign(idx) {
                Some(frame) => Some(frame),
                // Released, send the release frame instead
                None => return self.get_frame(idx),
            },
            ChannelState::OutIdent | ChannelState::InIdent | ChannelState::RecallIdent => {
                let mut frame = self.frame_header(idx, MsgTypeRelais::Ident);
                frame.sequence_number = (count & 0x7) as u8;
                Some(frame)
            }
            ChannelState::OutDial1 => Some(self.frame_header(idx, MsgTypeRelais::InviteDial1)),
            ChannelState::OutDial2 => Some(self.frame_header(idx, MsgTypeRelais::InviteDial2)),
            ChannelState::Suspend => Some(self.frame_header(idx, MsgTypeRelais::Suspend)),
            ChannelState::InAlert | ChannelState::OutAlert | ChannelState::RecallAlert => {
                Some(self.frame_header(idx, MsgTypeRelais::Alert))
            }
            ChannelState::ReleaseCc | ChannelState::ReleaseTc => Some(self.frame_header(idx, MsgTypeRelais::Release)),
            ChannelState::Active => None,
        };

        match frame {
            Some(frame) => {
                self.log_frame(idx, count, state, &frame);
                Some(frame)
            }
            None => {
                tracing::debug!("chan {}: no frame to send in {}, switching to audio", self.channels[idx].sysinfo.number, state);
                self.channels[idx].set_mode(PhyMode::Audio);
                None
            }
        }
    }

    fn log_frame(&self, idx: usize, count: u32, state: ChannelState, frame: &Frame) {
        let number = self.channels[idx].sysinfo.number;
        if count == 0 {
            tracing::debug!("chan {}: -> {} in {}", number, frame, state);
        } else {
            tracing::trace!("chan {}: -> type {} in {} (repeat {})", number, frame.message_type, state, count);
        }
    }
}
