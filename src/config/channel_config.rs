use serde::Deserialize;
use std::fs;

use crate::errors::{ConfigError, ConfigResult};

/// Root configuration struct expecting `[[channel]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct ChannelConfig {
    #[serde(rename = "channel")]
    pub channels: Vec<ChannelEntry>,
}

/// One channel entry, matching each `[[channel]]` section
#[derive(Debug, Deserialize)]
pub struct ChannelEntry {
    pub id: String,
    pub driver: String,
    pub bus: String,
    pub address: u8,
    /// "temperature" or "humidity". Required for the channel to be
    /// built; entries without it are rejected with a diagnostic note.
    pub mode: Option<String>,
    pub label: Option<String>,
    /// Spool material code; supplies the label when none is given and
    /// the drying target reported at registration.
    pub material: Option<u32>,
}

/// Loads config from TOML file
pub fn load_channel_config(path: &str) -> ConfigResult<ChannelConfig> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
        path: path.to_string(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_entries() {
        let config: ChannelConfig = toml::from_str(
            r#"
            [[channel]]
            id = "chamber_temp"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "temperature"
            label = "Drying chamber"

            [[channel]]
            id = "chamber_hum"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "humidity"
            material = 3508469
            "#,
        )
        .unwrap();

        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.channels[0].id, "chamber_temp");
        assert_eq!(config.channels[0].address, 0x40);
        assert_eq!(config.channels[0].label.as_deref(), Some("Drying chamber"));
        assert!(config.channels[0].material.is_none());
        assert_eq!(config.channels[1].mode.as_deref(), Some("humidity"));
        assert!(config.channels[1].label.is_none());
        assert_eq!(config.channels[1].material, Some(3_508_469));
    }

    #[test]
    fn mode_is_optional_at_parse_time() {
        let config: ChannelConfig = toml::from_str(
            r#"
            [[channel]]
            id = "mystery"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x41
            "#,
        )
        .unwrap();

        assert!(config.channels[0].mode.is_none());
    }
}
