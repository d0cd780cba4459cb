use r2k_config::{ChannelType, SharedConfig};
use r2k_core::CallRef;
use r2k_frames::codec;
use r2k_frames::enums::release_cause::ReleaseCause;

use crate::phy::TxBit;

use super::call_control::CallControlUp;
use super::channel::{Channel, ChannelSystemInfo, PhyMode};
use super::state::ChannelState;
use super::subscriber::Subscriber;
use super::timers::*;

/// All configured channels of the relais and the call control they report to.
///
/// Everything runs on the caller's thread: bit callbacks from the modem loop, timer
/// ticks and network requests. A call moved between channels is never observable half way.
pub struct ChannelPool {
    pub(crate) channels: Vec<Channel>,
    pub(crate) cc: Box<dyn CallControlUp>,
}

impl ChannelPool {
    pub fn new(config: SharedConfig, cc: Box<dyn CallControlUp>) -> Self {
        let cfg = config.config();
        let channels = cfg
            .channels
            .iter()
            .map(|ch| Channel::new(ChannelSystemInfo::new(&cfg.relais, ch)))
            .collect::<Vec<_>>();
        for ch in &channels {
            tracing::info!("chan {}: {:?} ready", ch.sysinfo.number, ch.sysinfo.chan_type);
        }
        Self { channels, cc }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel(&self, idx: usize) -> &Channel {
        &self.channels[idx]
    }

    pub fn state(&self, idx: usize) -> ChannelState {
        self.channels[idx].state()
    }

    pub fn call_control_mut(&mut self) -> &mut dyn CallControlUp {
        &mut *self.cc
    }

    pub fn find_by_callref(&self, callref: CallRef) -> Option<usize> {
        if callref == 0 {
            return None;
        }
        self.channels.iter().position(|ch| ch.callref == callref)
    }

    /// First idle channel of type `preferred`, else the first idle combined channel
    fn find_idle(&self, preferred: ChannelType, exclude: Option<usize>) -> Option<usize> {
        let idle_of = |wanted: ChannelType| {
            self.channels
                .iter()
                .enumerate()
                .position(|(i, ch)| Some(i) != exclude && ch.is_idle() && ch.sysinfo.chan_type == wanted)
        };
        idle_of(preferred).or_else(|| idle_of(ChannelType::CcTc))
    }

    /// Idle channel to carry a call, dedicated traffic channels first
    pub fn find_traffic_channel(&self, exclude: Option<usize>) -> Option<usize> {
        self.find_idle(ChannelType::Tc, exclude)
    }

    /// Idle channel to page or park a handset on, dedicated control channels first
    pub fn find_control_channel(&self, exclude: Option<usize>) -> Option<usize> {
        self.find_idle(ChannelType::Cc, exclude)
    }

    /// Traffic channel for the call on `idx`, or `idx` itself if it is a combined channel
    /// and nothing else is free
    pub(crate) fn traffic_channel_for(&self, idx: usize) -> Option<usize> {
        self.find_traffic_channel(Some(idx))
            .or_else(|| self.channels[idx].sysinfo.chan_type.can_traffic().then_some(idx))
    }

    /// Control channel for the handset on `idx`, or `idx` itself if it can serve as one
    pub(crate) fn control_channel_for(&self, idx: usize) -> Option<usize> {
        self.find_control_channel(Some(idx))
            .or_else(|| self.channels[idx].sysinfo.chan_type.can_control().then_some(idx))
    }

    /// Enter a new state and log the transition
    pub(crate) fn new_state(&mut self, idx: usize, state: ChannelState) {
        let ch = &mut self.channels[idx];
        let old = ch.new_state(state);
        if old != state {
            tracing::info!("chan {}: {} -> {}", ch.sysinfo.number, old, state);
        }
    }

    /// Hand the served handset and its call from `src` to `dst` and idle `src`
    pub(crate) fn move_call(&mut self, src: usize, dst: usize) {
        assert_ne!(src, dst);
        let subscriber = self.channels[src].subscriber.take();
        let callref = self.channels[src].callref;
        let page_try = self.channels[src].page_try;

        let d = &mut self.channels[dst];
        d.subscriber = subscriber;
        d.callref = callref;
        d.page_try = page_try;

        tracing::debug!("call moved from chan {} to chan {}", self.channels[src].sysinfo.number, self.channels[dst].sysinfo.number);
        self.go_idle(src);
    }

    pub(crate) fn go_idle(&mut self, idx: usize) {
        self.channels[idx].clear_call();
        self.new_state(idx, ChannelState::Idle);
    }

    pub(crate) fn go_active(&mut self, idx: usize) {
        self.new_state(idx, ChannelState::Active);
        self.channels[idx].timer.start(SUPER_INITIAL_TIME);
    }

    /// Start sending release frames, on the channel the handset is listening on
    pub(crate) fn release_radio(&mut self, idx: usize) {
        let state = self.channels[idx].state();
        if state.is_release() {
            return;
        }
        let next = if state.is_control() { ChannelState::ReleaseCc } else { ChannelState::ReleaseTc };
        self.new_state(idx, next);
        self.channels[idx].timer.start(RELEASE_TIME);
    }

    /// Release toward the network if a call reference exists, then release the radio link
    pub(crate) fn release_call(&mut self, idx: usize, cause: ReleaseCause) {
        let callref = std::mem::take(&mut self.channels[idx].callref);
        if callref != 0 {
            tracing::info!("chan {}: releasing call {} with cause {}", self.channels[idx].sysinfo.number, callref, cause);
            self.cc.release(callref, cause);
        } else {
            tracing::info!("chan {}: releasing handset, cause {}", self.channels[idx].sysinfo.number, cause);
        }
        self.release_radio(idx);
    }

    /// Apply pending timer requests, then run expiry handlers
    pub fn tick(&mut self, now: f64) {
        for ch in &mut self.channels {
            ch.timer.apply(now);
        }
        for idx in 0..self.channels.len() {
            if self.channels[idx].timer.poll_expired(now) {
                self.timeout(idx);
            }
        }
    }

    fn timeout(&mut self, idx: usize) {
        let number = self.channels[idx].sysinfo.number;
        match self.channels[idx].state() {
            ChannelState::OutIdent => {
                tracing::info!("chan {}: handset did not identify", number);
                self.release_call(idx, ReleaseCause::TempFail);
            }
            ChannelState::InIdent | ChannelState::RecallIdent => self.page_retry(idx),
            ChannelState::OutDial1 => {
                tracing::info!("chan {}: no digits dialed", number);
                self.release_call(idx, ReleaseCause::TempFail);
            }
            // Second batch is optional
            ChannelState::OutDial2 => self.dial_complete(idx),
            ChannelState::Suspend => {
                tracing::info!("chan {}: handset did not acknowledge suspend", number);
                self.release_call(idx, ReleaseCause::TempFail);
            }
            ChannelState::RecallWait | ChannelState::InAlert | ChannelState::OutAlert | ChannelState::RecallAlert => {
                tracing::info!("chan {}: no answer", number);
                self.release_call(idx, ReleaseCause::NoAnswer);
            }
            ChannelState::Active => {
                tracing::info!("chan {}: supervisory signal lost", number);
                self.release_call(idx, ReleaseCause::TempFail);
            }
            ChannelState::ReleaseCc | ChannelState::ReleaseTc => self.go_idle(idx),
            state => tracing::warn!("chan {}: timeout without handler in {}", number, state),
        }
    }

    /// The paged handset did not identify, page again from a control channel or give up
    fn page_retry(&mut self, idx: usize) {
        let ch = &self.channels[idx];
        if ch.page_try >= PAGE_TRIES {
            tracing::info!("chan {}: handset not reached after {} pages", ch.sysinfo.number, ch.page_try);
            self.release_call(idx, ReleaseCause::OutOfOrder);
            return;
        }
        let assign = if ch.state() == ChannelState::InIdent { ChannelState::InAssign } else { ChannelState::RecallAssign };

        let Some(cc) = self.control_channel_for(idx) else {
            tracing::info!("chan {}: no control channel to page again", ch.sysinfo.number);
            self.release_call(idx, ReleaseCause::NoChannel);
            return;
        };
        if cc != idx {
            self.move_call(idx, cc);
        }
        self.channels[cc].page_try += 1;
        tracing::debug!("chan {}: paging attempt {}", self.channels[cc].sysinfo.number, self.channels[cc].page_try);
        self.new_state(cc, assign);
    }

    /// Number fully dialed on `idx`
    pub(crate) fn dial_complete(&mut self, idx: usize) {
        let ch = &self.channels[idx];
        let Some(sub) = &ch.subscriber else {
            self.release_call(idx, ReleaseCause::TempFail);
            return;
        };
        if sub.dialing.is_empty() {
            tracing::info!("chan {}: empty number dialed", ch.sysinfo.number);
            self.release_call(idx, ReleaseCause::InvalidNumber);
            return;
        }
        tracing::info!("chan {}: {} dialed {}", ch.sysinfo.number, sub.number(), sub.dialing);

        if ch.sysinfo.recall {
            self.new_state(idx, ChannelState::Suspend);
            self.channels[idx].timer.start(SUSPEND_TIME);
            return;
        }
        match self.offer_call(idx) {
            Ok(()) => {
                self.new_state(idx, ChannelState::OutAlert);
                self.channels[idx].timer.start(ALERT_TIME);
            }
            Err(cause) => self.release_call(idx, cause),
        }
    }

    /// Place the call of the handset on `idx` toward the network
    pub(crate) fn offer_call(&mut self, idx: usize) -> Result<(), ReleaseCause> {
        let ch = &self.channels[idx];
        let Some(sub) = &ch.subscriber else {
            return Err(ReleaseCause::TempFail);
        };
        let callref = self.cc.setup(&sub.number(), &sub.dialing)?;
        tracing::info!("chan {}: call {} offered to network", ch.sysinfo.number, callref);
        self.channels[idx].callref = callref;
        Ok(())
    }

    // Network side

    /// Page the handset named by `dialed` for an incoming call
    pub fn call_setup(&mut self, callref: CallRef, dialed: &str) -> Result<(), ReleaseCause> {
        let Some(sub) = Subscriber::from_number(dialed) else {
            tracing::info!("call {}: invalid number '{}'", callref, dialed);
            return Err(ReleaseCause::InvalidNumber);
        };
        // A handset still being sent release frames counts as free
        let busy = self.channels.iter().any(|ch| {
            !ch.state().is_release() && ch.subscriber.as_ref().is_some_and(|s| s.same_identity(&sub))
        });
        if busy {
            tracing::info!("call {}: {} is busy", callref, dialed);
            return Err(ReleaseCause::Busy);
        }
        let Some(cc) = self.find_control_channel(None) else {
            tracing::info!("call {}: no free control channel", callref);
            return Err(ReleaseCause::NoChannel);
        };
        if self.traffic_channel_for(cc).is_none() {
            tracing::info!("call {}: no free traffic channel", callref);
            return Err(ReleaseCause::NoChannel);
        }

        tracing::info!("chan {}: paging {} for call {}", self.channels[cc].sysinfo.number, dialed, callref);
        let ch = &mut self.channels[cc];
        ch.subscriber = Some(sub);
        ch.callref = callref;
        ch.page_try = 1;
        self.new_state(cc, ChannelState::InAssign);
        Ok(())
    }

    /// Far end answered
    pub fn call_answer(&mut self, callref: CallRef) {
        let Some(idx) = self.find_by_callref(callref) else {
            tracing::debug!("call {}: answer for unknown call", callref);
            return;
        };
        match self.channels[idx].state() {
            ChannelState::OutAlert => self.go_active(idx),
            ChannelState::RecallWait => {
                self.channels[idx].page_try = 1;
                self.new_state(idx, ChannelState::RecallAssign);
            }
            state => tracing::debug!("call {}: answer ignored in {}", callref, state),
        }
    }

    /// Network disconnects the call. Confirmed with a release carrying the same cause.
    pub fn call_disconnect(&mut self, callref: CallRef, cause: ReleaseCause) {
        let Some(idx) = self.find_by_callref(callref) else {
            tracing::debug!("call {}: disconnect for unknown call", callref);
            return;
        };
        tracing::info!("chan {}: call {} disconnected by network, cause {}", self.channels[idx].sysinfo.number, callref, cause);
        self.release_call(idx, cause);
    }

    /// Network released the call, nothing is reported back
    pub fn call_release(&mut self, callref: CallRef, cause: ReleaseCause) {
        let Some(idx) = self.find_by_callref(callref) else {
            tracing::debug!("call {}: release for unknown call", callref);
            return;
        };
        tracing::info!("chan {}: call {} released by network, cause {}", self.channels[idx].sysinfo.number, callref, cause);
        self.channels[idx].callref = 0;
        self.release_radio(idx);
    }

    /// Audio from the network toward the handset
    pub fn call_audio(&mut self, callref: CallRef, samples: &[i16]) {
        if let Some(idx) = self.find_by_callref(callref) {
            let ch = &mut self.channels[idx];
            if ch.state() == ChannelState::Active {
                ch.queue_tx_audio(samples);
            }
        }
    }

    // Physical side

    /// Next bit for the main channel modulator, None while nothing is to be sent
    pub fn tx_bit(&mut self, idx: usize) -> Option<u8> {
        loop {
            if self.channels[idx].mode() != PhyMode::Frame {
                return None;
            }
            match self.channels[idx].frame_tx.next_bit() {
                TxBit::Bit(bit) => return Some(bit),
                TxBit::Idle => return None,
                TxBit::NeedFrame => match self.get_frame(idx) {
                    Some(frame) => self.channels[idx].frame_tx.load(codec::encode(&frame)),
                    None => self.channels[idx].frame_tx.suspend(),
                },
            }
        }
    }

    /// Bit from the main channel demodulator
    pub fn rx_bit(&mut self, idx: usize, bit: u8, quality: f64, level: f64) {
        let Some(rx) = self.channels[idx].frame_rx.push_bit(bit, quality, level) else {
            return;
        };
        match codec::decode_payload(&rx.bits) {
            Ok(frame) => {
                tracing::trace!("chan {}: frame level {:.2} quality {:.2}", self.channels[idx].sysinfo.number, rx.level, rx.quality);
                self.receive_frame(idx, &frame);
            }
            Err(e) => tracing::debug!("chan {}: undecodable frame: {:?}", self.channels[idx].sysinfo.number, e),
        }
    }

    /// Next supervisory bit. Sent while a handset is served on the traffic channel.
    pub fn tx_super_bit(&mut self, idx: usize) -> Option<u8> {
        let ch = &mut self.channels[idx];
        if ch.state().is_control() {
            return None;
        }
        Some(ch.super_tx.next_bit())
    }

    /// Bit from the supervisory demodulator
    pub fn rx_super_bit(&mut self, idx: usize, bit: u8, quality: f64, level: f64) {
        let ch = &mut self.channels[idx];
        let Some(digit) = ch.super_rx.push_bit(bit, quality, level) else {
            return;
        };
        if ch.state() != ChannelState::Active {
            return;
        }
        if digit.matches(ch.sysinfo.nconv, ch.sysinfo.relais) {
            tracing::trace!("chan {}: supervisory ok, quality {:.2}", ch.sysinfo.number, digit.quality);
            ch.timer.start(SUPER_RUNNING_TIME);
        } else {
            tracing::debug!(
                "chan {}: supervisory mismatch nconv {} relais {}, quality {:.2}",
                ch.sysinfo.number,
                digit.nconv(),
                digit.relais_nibble(),
                digit.quality
            );
        }
    }

    /// Audio from the handset
    pub fn rx_audio(&mut self, idx: usize, samples: &[i16]) {
        let ch = &self.channels[idx];
        if ch.state() == ChannelState::Active && ch.callref != 0 {
            self.cc.audio(ch.callref, samples);
        }
    }

    /// Audio queued for the handset on `idx`
    pub fn take_tx_audio(&mut self, idx: usize) -> Vec<i16> {
        self.channels[idx].take_tx_audio()
    }
}
