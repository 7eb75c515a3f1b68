use serde::Deserialize;
use std::fs;

use crate::errors::{ConfigError, ConfigResult};

/// Root configuration struct expecting `[[bus]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct BusConfig {
    #[serde(rename = "bus")]
    pub buses: Vec<BusEntry>,
}

/// One bus entry, matching each `[[bus]]` section
#[derive(Debug, Deserialize)]
pub struct BusEntry {
    pub id: String,
    pub r#type: String,
    pub path: String,
}

/// Loads config from TOML file
pub fn load_bus_config(path: &str) -> ConfigResult<BusConfig> {
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
    fn parses_bus_entries() {
        let config: BusConfig = toml::from_str(
            r#"
            [[bus]]
            id = "i2c0"
            type = "i2c"
            path = "/dev/i2c-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.buses.len(), 1);
        assert_eq!(config.buses[0].id, "i2c0");
        assert_eq!(config.buses[0].r#type, "i2c");
        assert_eq!(config.buses[0].path, "/dev/i2c-1");
    }
}
