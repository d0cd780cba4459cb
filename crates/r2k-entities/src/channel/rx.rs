use r2k_core::Direction;
use r2k_frames::Frame;
use r2k_frames::enums::msg_type_mobile::MsgTypeMobile;
use r2k_frames::enums::release_cause::ReleaseCause;

use super::pool::ChannelPool;
use super::state::ChannelState;
use super::subscriber::Subscriber;
use super::timers::*;

impl ChannelPool {
    /// Checks that a received frame is meant for this channel and the handset it serves
    fn validate_frame(&self, idx: usize, frame: &Frame, msg: MsgTypeMobile) -> Result<(), &'static str> {
        let ch = &self.channels[idx];
        if frame.direction != Direction::MobileToBase {
            return Err("not sent by a mobile");
        }
        if frame.channel_type_flag != ch.state().channel_type_flag() {
            return Err("channel type flag does not fit the state");
        }
        if frame.channel != ch.sysinfo.number {
            return Err("channel number mismatch");
        }
        if frame.relais != ch.sysinfo.relais {
            return Err("relais mismatch");
        }
        if msg.carries_identity() {
            if let Some(sub) = &ch.subscriber {
                if !sub.matches_frame(frame) {
                    return Err("subscriber identity mismatch");
                }
            }
        }
        Ok(())
    }

    /// Dispatches a decoded frame received on `idx`. Frames that do not fit are dropped.
    pub(crate) fn receive_frame(&mut self, idx: usize, frame: &Frame) {
        let number = self.channels[idx].sysinfo.number;
        let Ok(msg) = MsgTypeMobile::try_from(frame.message_type as u64) else {
            tracing::debug!("chan {}: dropping frame with message type {}", number, frame.message_type);
            return;
        };
        if let Err(reason) = self.validate_frame(idx, frame, msg) {
            tracing::debug!("chan {}: dropping {:?}: {} ({})", number, msg, reason, frame);
            return;
        }

        let state = self.channels[idx].state();
        tracing::debug!("chan {}: <- {:?} in {}", number, msg, state);
        let can_control = self.channels[idx].sysinfo.chan_type.can_control();

        match (msg, state) {
            (MsgTypeMobile::Release, s) if s != ChannelState::Idle => self.rx_release(idx),
            (MsgTypeMobile::Inscription, ChannelState::Idle) if can_control => self.rx_inscription(idx, frame),
            (MsgTypeMobile::CallRequest, ChannelState::Idle) if can_control => self.rx_call_request(idx, frame),
            (MsgTypeMobile::IdentAck, ChannelState::OutIdent | ChannelState::InIdent | ChannelState::RecallIdent) => {
                self.rx_ident_ack(idx)
            }
            (MsgTypeMobile::Dial1, ChannelState::OutDial1) => self.rx_dial1(idx, frame),
            (MsgTypeMobile::Dial2, ChannelState::OutDial2) => self.rx_dial2(idx, frame),
            (MsgTypeMobile::SuspendAck, ChannelState::Suspend) => self.rx_suspend_ack(idx),
            (MsgTypeMobile::Answer, ChannelState::InAlert | ChannelState::RecallAlert) => self.rx_answer(idx),
            _ => tracing::debug!("chan {}: ignoring {:?} in {}", number, msg, state),
        }
    }

    fn rx_inscription(&mut self, idx: usize, frame: &Frame) {
        let sub = Subscriber::from_frame(frame);
        tracing::info!("chan {}: registration of {}", self.channels[idx].sysinfo.number, sub.number());
        self.channels[idx].subscriber = Some(sub);
        self.new_state(idx, ChannelState::Inscription);
    }

    fn rx_call_request(&mut self, idx: usize, frame: &Frame) {
        let sub = Subscriber::from_frame(frame);
        tracing::info!("chan {}: call request from {}", self.channels[idx].sysinfo.number, sub.number());
        self.channels[idx].subscriber = Some(sub);

        if self.traffic_channel_for(idx).is_none() {
            tracing::info!("chan {}: no traffic channel free", self.channels[idx].sysinfo.number);
            self.release_call(idx, ReleaseCause::NoChannel);
            return;
        }
        self.new_state(idx, ChannelState::OutAssign);
    }

    fn rx_ident_ack(&mut self, idx: usize) {
        match self.channels[idx].state() {
            ChannelState::OutIdent => {
                self.new_state(idx, ChannelState::OutDial1);
                self.channels[idx].timer.start(DIAL1_TIME);
            }
            ChannelState::InIdent => {
                self.new_state(idx, ChannelState::InAlert);
                self.channels[idx].timer.start(ALERT_TIME);
                self.cc.alerting(self.channels[idx].callref);
            }
            _ => {
                self.new_state(idx, ChannelState::RecallAlert);
                self.channels[idx].timer.start(ALERT_TIME);
            }
        }
    }

    fn rx_dial1(&mut self, idx: usize, frame: &Frame) {
        let ch = &mut self.channels[idx];
        if let Some(sub) = &mut ch.subscriber {
            sub.dialing.clear();
            sub.push_digits(&frame.digits_str());
        }
        if frame.digits_complete() {
            self.new_state(idx, ChannelState::OutDial2);
            self.channels[idx].timer.start(DIAL2_TIME);
        } else {
            // End marker within the first ten digits
            self.dial_complete(idx);
        }
    }

    fn rx_dial2(&mut self, idx: usize, frame: &Frame) {
        if let Some(sub) = &mut self.channels[idx].subscriber {
            sub.push_digits(&frame.digits_str());
        }
        self.dial_complete(idx);
    }

    /// Handset parked. Move it back to a control channel and reach the called party.
    fn rx_suspend_ack(&mut self, idx: usize) {
        let Some(cc) = self.control_channel_for(idx) else {
            tracing::info!("chan {}: no control channel to park the call", self.channels[idx].sysinfo.number);
            self.release_call(idx, ReleaseCause::NoChannel);
            return;
        };
        if cc != idx {
            self.move_call(idx, cc);
        }
        // Parked on the control channel from here on
        self.new_state(cc, ChannelState::RecallWait);
        match self.offer_call(cc) {
            Ok(()) => self.channels[cc].timer.start(RECALL_TIME),
            Err(cause) => self.release_call(cc, cause),
        }
    }

    fn rx_answer(&mut self, idx: usize) {
        if self.channels[idx].state() == ChannelState::InAlert {
            self.cc.answer(self.channels[idx].callref);
        }
        self.go_active(idx);
    }

    fn rx_release(&mut self, idx: usize) {
        if self.channels[idx].state().is_release() {
            return;
        }
        tracing::info!("chan {}: handset released", self.channels[idx].sysinfo.number);
        self.release_call(idx, ReleaseCause::Normal);
    }
}
