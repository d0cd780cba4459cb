use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::stack_config::{CfgChannel, CfgPhyIo, CfgRelais, ChannelType, PhyBackend, SharedConfig, StackConfig};

/// Build `SharedConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref phy) = root.phy_io {
        if !phy.extra.is_empty() {
            return Err(format!("Unrecognized fields: phy_io::{:?}", sorted_keys(&phy.extra)).into());
        }
    }
    if !root.relais.extra.is_empty() {
        return Err(format!("Unrecognized fields in relais: {:?}", sorted_keys(&root.relais.extra)).into());
    }
    for ch in root.channel.iter() {
        if !ch.extra.is_empty() {
            return Err(format!("Unrecognized fields in channel {}: {:?}", ch.number, sorted_keys(&ch.extra)).into());
        }
    }

    let mut cfg = StackConfig {
        debug_log: root.debug_log,
        phy_io: CfgPhyIo::default(),
        relais: CfgRelais::default(),
        channels: root
            .channel
            .iter()
            .map(|ch| CfgChannel {
                number: ch.number,
                chan_type: ch.chan_type,
            })
            .collect(),
    };

    if let Some(phy) = root.phy_io {
        cfg.phy_io.backend = phy.backend;
    }
    apply_relais_patch(&mut cfg.relais, root.relais);

    // Reject here instead of letting SharedConfig panic, the caller reports config errors itself
    cfg.validate().map_err(|e| e.to_string())?;

    Ok(SharedConfig::from_config(cfg))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    from_reader(f)
}

fn apply_relais_patch(dst: &mut CfgRelais, src: RelaisDto) {
    dst.relais = src.relais;

    if let Some(v) = src.deport {
        dst.deport = v;
    }
    if let Some(v) = src.registration_class {
        dst.registration_class = v;
    }
    if let Some(v) = src.power {
        dst.power = v;
    }
    if let Some(v) = src.tariff_class {
        dst.tariff_class = v;
    }
    if let Some(v) = src.crins {
        dst.crins = v;
    }
    if let Some(v) = src.allow_destruction {
        dst.allow_destruction = v;
    }
    if let Some(v) = src.nconv {
        dst.nconv = v;
    }
    if let Some(v) = src.recall {
        dst.recall = v;
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    phy_io: Option<PhyIoDto>,

    relais: RelaisDto,

    #[serde(default)]
    channel: Vec<ChannelDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct PhyIoDto {
    pub backend: PhyBackend,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct RelaisDto {
    pub relais: u16,
    pub deport: Option<u8>,
    pub registration_class: Option<u8>,
    pub power: Option<u8>,
    pub tariff_class: Option<u8>,
    pub crins: Option<u8>,
    pub allow_destruction: Option<bool>,
    pub nconv: Option<u8>,
    pub recall: Option<bool>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct ChannelDto {
    pub number: u16,
    pub chan_type: ChannelType,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
config_version = "0.1"

[phy_io]
backend = "None"

[relais]
relais = 200
nconv = 5
recall = true

[[channel]]
number = 10
chan_type = "Cc"

[[channel]]
number = 11
chan_type = "Tc"

[[channel]]
number = 12
chan_type = "CcTc"
"#;

    #[test]
    fn test_parse_example() {
        let cfg = from_toml_str(EXAMPLE).unwrap().config();
        assert_eq!(cfg.phy_io.backend, PhyBackend::None);
        assert_eq!(cfg.relais.relais, 200);
        assert_eq!(cfg.relais.nconv, 5);
        assert!(cfg.relais.recall);
        assert_eq!(cfg.relais.crins, 0);
        assert_eq!(cfg.channels.len(), 3);
        assert_eq!(cfg.channels[2].chan_type, ChannelType::CcTc);
    }

    #[test]
    fn test_shipped_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/example.toml");
        let cfg = from_file(path).unwrap().config();
        assert_eq!(cfg.relais.relais, 200);
        assert_eq!(cfg.channels.len(), 3);
        assert!(cfg.debug_log.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let s = EXAMPLE.replace("nconv = 5", "nconv = 5\nbogus = 1");
        assert!(from_toml_str(&s).is_err());
    }

    #[test]
    fn test_destructive_crins_rejected_without_confirmation() {
        let s = EXAMPLE.replace("nconv = 5", "nconv = 5\ncrins = 3");
        assert!(from_toml_str(&s).is_err());
        let s = EXAMPLE.replace("nconv = 5", "nconv = 5\ncrins = 3\nallow_destruction = true");
        assert!(from_toml_str(&s).is_ok());
    }

    #[test]
    fn test_wrong_version_rejected() {
        let s = EXAMPLE.replace("\"0.1\"", "\"0.5\"");
        assert!(from_toml_str(&s).is_err());
    }
}
