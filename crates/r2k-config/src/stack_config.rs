use serde::Deserialize;
use std::sync::Arc;

use r2k_frames::enums::registration_response::RegistrationResponse;

/// The PHY layer backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PhyBackend {
    Undefined,
    /// No modem attached, frames are generated but go nowhere. For testing and dry runs.
    None,
}

/// Role of a physical radio channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChannelType {
    /// Control channel: registration, paging and channel assignment
    Cc,
    /// Traffic channel: dialing, alerting and conversation
    Tc,
    /// Usable as either, taken when no dedicated channel of the needed type is free
    CcTc,
}

impl ChannelType {
    #[inline]
    pub fn can_control(&self) -> bool {
        matches!(self, ChannelType::Cc | ChannelType::CcTc)
    }

    #[inline]
    pub fn can_traffic(&self) -> bool {
        matches!(self, ChannelType::Tc | ChannelType::CcTc)
    }
}

/// PHY layer I/O configuration
#[derive(Debug, Clone)]
pub struct CfgPhyIo {
    pub backend: PhyBackend,
}

impl Default for CfgPhyIo {
    fn default() -> Self {
        Self { backend: PhyBackend::Undefined }
    }
}

/// Relais identity and the system information broadcast on every channel
#[derive(Debug, Clone)]
pub struct CfgRelais {
    /// 9 bits, relais (base station) number
    pub relais: u16,
    /// 3 bits
    pub deport: u8,
    /// 3 bits, registration class announced in the idle broadcast
    pub registration_class: u8,
    /// 1 bit, mobile transmit power flag
    pub power: u8,
    /// 2 bits
    pub tariff_class: u8,
    /// 3 bits, response code sent in each registration acknowledge
    pub crins: u8,
    /// Must be set to permit crins values that deactivate handsets for good
    pub allow_destruction: bool,
    /// 3 bits, supervisory value the handset has to reflect during a call
    pub nconv: u8,
    /// Park outgoing calls and recall the handset once the called party answers
    pub recall: bool,
}

impl Default for CfgRelais {
    fn default() -> Self {
        Self {
            relais: 0,
            deport: 0,
            registration_class: 0,
            power: 0,
            tariff_class: 0,
            crins: RegistrationResponse::Accepted.into_raw(),
            allow_destruction: false,
            nconv: 0,
            recall: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CfgChannel {
    /// 8 bits, radio channel number
    pub number: u16,
    pub chan_type: ChannelType,
}

#[derive(Debug, Clone)]
pub struct StackConfig {
    pub debug_log: Option<String>,
    pub phy_io: CfgPhyIo,
    pub relais: CfgRelais,
    pub channels: Vec<CfgChannel>,
}

impl StackConfig {
    pub fn new(relais: u16, channels: Vec<CfgChannel>) -> Self {
        StackConfig {
            debug_log: None,
            phy_io: CfgPhyIo::default(),
            relais: CfgRelais { relais, ..Default::default() },
            channels,
        }
    }

    /// Validate that all configuration fields are set and fit their wire widths.
    pub fn validate(&self) -> Result<(), &str> {
        if self.phy_io.backend == PhyBackend::Undefined {
            return Err("phy_io backend must be defined");
        }

        let r = &self.relais;
        if r.relais > 511 {
            return Err("relais must fit in 9 bits (0..=511)");
        }
        if r.deport > 7 || r.registration_class > 7 || r.nconv > 7 || r.crins > 7 {
            return Err("deport, registration_class, nconv and crins must fit in 3 bits (0..=7)");
        }
        if r.power > 1 {
            return Err("power is a flag (0 or 1)");
        }
        if r.tariff_class > 3 {
            return Err("tariff_class must fit in 2 bits (0..=3)");
        }
        if r.crins == RegistrationResponse::PermanentDeactivation.into_raw() && !r.allow_destruction {
            return Err("crins 3 permanently deactivates every registering handset, set allow_destruction = true if this is really intended");
        }

        if self.channels.is_empty() {
            return Err("at least one channel must be configured");
        }
        for (i, ch) in self.channels.iter().enumerate() {
            if ch.number > 255 {
                return Err("channel number must fit in 8 bits (0..=255)");
            }
            if self.channels[..i].iter().any(|other| other.number == ch.number) {
                return Err("channel numbers must be unique");
            }
        }
        if !self.channels.iter().any(|ch| ch.chan_type.can_control()) {
            return Err("at least one Cc or CcTc channel is required");
        }

        Ok(())
    }
}

/// Global shared configuration, immutable after construction.
#[derive(Clone)]
pub struct SharedConfig {
    cfg: Arc<StackConfig>,
}

impl SharedConfig {
    pub fn from_config(cfg: StackConfig) -> Self {
        // Check config for validity before returning the SharedConfig object
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid stack configuration: {}", e),
        }

        Self { cfg: Arc::new(cfg) }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<StackConfig> {
        Arc::clone(&self.cfg)
    }
}
