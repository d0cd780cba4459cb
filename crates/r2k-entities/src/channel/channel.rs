use r2k_config::{CfgChannel, CfgRelais, ChannelType};
use r2k_core::{CallRef, Direction, Timer};

use crate::phy::{FrameRx, FrameTx, SuperRx, SuperTx};

use super::state::ChannelState;
use super::subscriber::Subscriber;

/// Per channel system information, fixed at startup
#[derive(Debug, Clone)]
pub struct ChannelSystemInfo {
    pub number: u16,
    pub chan_type: ChannelType,
    pub relais: u16,
    pub deport: u8,
    pub registration_class: u8,
    pub power: u8,
    pub tariff_class: u8,
    /// Registration response code
    pub crins: u8,
    pub nconv: u8,
    pub recall: bool,
}

impl ChannelSystemInfo {
    pub fn new(relais: &CfgRelais, channel: &CfgChannel) -> Self {
        ChannelSystemInfo {
            number: channel.number,
            chan_type: channel.chan_type,
            relais: relais.relais,
            deport: relais.deport,
            registration_class: relais.registration_class,
            power: relais.power,
            tariff_class: relais.tariff_class,
            crins: relais.crins,
            nconv: relais.nconv,
            recall: relais.recall,
        }
    }
}

/// What the modem sends on this channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhyMode {
    /// Transmitter keyed off
    Off,
    /// Signalling frames
    Frame,
    /// Conversation audio
    Audio,
}

/// One logical radio channel
pub struct Channel {
    pub sysinfo: ChannelSystemInfo,
    state: ChannelState,
    mode: PhyMode,
    /// Present while a handset is served, cleared when the channel goes idle
    pub subscriber: Option<Subscriber>,
    /// 0 while no call exists on the telephony side
    pub callref: CallRef,
    pub timer: Timer,
    pub page_try: u8,
    /// Frames sent since the last state change
    tx_frame_count: u32,
    tx_audio: Vec<i16>,

    pub(crate) frame_tx: FrameTx,
    pub(crate) frame_rx: FrameRx,
    pub(crate) super_tx: SuperTx,
    pub(crate) super_rx: SuperRx,
}

impl Channel {
    pub fn new(sysinfo: ChannelSystemInfo) -> Self {
        let super_tx = SuperTx::new(sysinfo.nconv, sysinfo.relais);
        let mode = Self::mode_for(ChannelState::Idle, sysinfo.chan_type);
        Channel {
            sysinfo,
            state: ChannelState::Idle,
            mode,
            subscriber: None,
            callref: 0,
            timer: Timer::new(),
            page_try: 0,
            tx_frame_count: 0,
            tx_audio: Vec::new(),
            frame_tx: FrameTx::new(),
            frame_rx: FrameRx::new(Direction::MobileToBase),
            super_tx,
            super_rx: SuperRx::new(),
        }
    }

    fn mode_for(state: ChannelState, chan_type: ChannelType) -> PhyMode {
        match state {
            ChannelState::Idle if !chan_type.can_control() => PhyMode::Off,
            ChannelState::Active => PhyMode::Audio,
            _ => PhyMode::Frame,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn mode(&self) -> PhyMode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.state == ChannelState::Idle
    }

    /// Enter `state` and return the previous one. Cancels the timer, selects the
    /// transmit mode of the new state and lets the transmitter ask for a new frame.
    pub fn new_state(&mut self, state: ChannelState) -> ChannelState {
        let old = std::mem::replace(&mut self.state, state);
        self.tx_frame_count = 0;
        self.timer.stop();
        self.set_mode(Self::mode_for(state, self.sysinfo.chan_type));
        self.frame_tx.rearm();
        // A call entering traffic states starts on a supervisory word boundary
        if old.is_control() && !state.is_control() {
            self.super_tx.reset();
        }
        old
    }

    pub fn set_mode(&mut self, mode: PhyMode) {
        if mode != PhyMode::Frame {
            self.frame_tx.abort();
        }
        if mode != PhyMode::Audio {
            self.tx_audio.clear();
        }
        self.mode = mode;
    }

    /// Forget everything about the served handset
    pub fn clear_call(&mut self) {
        self.subscriber = None;
        self.callref = 0;
        self.page_try = 0;
        self.tx_audio.clear();
    }

    /// Returns the number of frames sent before this one in the current state
    pub fn count_tx_frame(&mut self) -> u32 {
        let count = self.tx_frame_count;
        self.tx_frame_count = self.tx_frame_count.saturating_add(1);
        count
    }

    pub fn tx_frame_count(&self) -> u32 {
        self.tx_frame_count
    }

    pub fn queue_tx_audio(&mut self, samples: &[i16]) {
        self.tx_audio.extend_from_slice(samples);
    }

    /// Audio waiting to be sent to the handset, drained
    pub fn take_tx_audio(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.tx_audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(chan_type: ChannelType) -> Channel {
        let relais = CfgRelais { relais: 200, ..Default::default() };
        Channel::new(ChannelSystemInfo::new(&relais, &CfgChannel { number: 5, chan_type }))
    }

    #[test]
    fn test_idle_mode_by_type() {
        assert_eq!(channel(ChannelType::Cc).mode(), PhyMode::Frame);
        assert_eq!(channel(ChannelType::CcTc).mode(), PhyMode::Frame);
        assert_eq!(channel(ChannelType::Tc).mode(), PhyMode::Off);
    }

    #[test]
    fn test_new_state_resets_per_state_data() {
        let mut ch = channel(ChannelType::Tc);
        ch.timer.start(1.0);
        ch.count_tx_frame();
        let old = ch.new_state(ChannelState::OutIdent);
        assert_eq!(old, ChannelState::Idle);
        assert_eq!(ch.mode(), PhyMode::Frame);
        assert_eq!(ch.tx_frame_count(), 0);
        assert!(!ch.timer.is_running());

        ch.new_state(ChannelState::Active);
        assert_eq!(ch.mode(), PhyMode::Audio);
        ch.queue_tx_audio(&[1, 2, 3]);
        assert_eq!(ch.take_tx_audio(), vec![1, 2, 3]);
        assert!(ch.take_tx_audio().is_empty());
    }

    #[test]
    fn test_supervisory_word_restarts_per_call() {
        let mut ch = channel(ChannelType::Tc);
        let mut fresh = SuperTx::new(ch.sysinfo.nconv, ch.sysinfo.relais);
        let word: Vec<u8> = (0..20).map(|_| fresh.next_bit()).collect();

        ch.new_state(ChannelState::InIdent);
        for _ in 0..7 {
            ch.super_tx.next_bit();
        }
        // Moving on within the call keeps the word running
        ch.new_state(ChannelState::InAlert);
        assert_eq!(ch.super_tx.next_bit(), word[7]);

        ch.new_state(ChannelState::Idle);
        ch.new_state(ChannelState::OutIdent);
        let sent: Vec<u8> = (0..20).map(|_| ch.super_tx.next_bit()).collect();
        assert_eq!(sent, word);
    }
}
