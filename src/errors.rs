use crate::bus::BusFault;
use thiserror::Error;

/// Errors raised while building or bringing up a channel
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("channel '{channel}' initialization failed: {source}")]
    InitError {
        channel: String,
        #[source]
        source: BusFault,
    },

    #[error("unsupported channel driver: '{driver}'")]
    UnsupportedDriver { driver: String },

    #[error("channel '{channel}' has no mode selector (expected \"temperature\" or \"humidity\")")]
    MissingMode { channel: String },

    #[error("channel '{channel}' mode '{mode}' is not recognized")]
    InvalidMode { channel: String, mode: String },

    #[error("channel '{channel}' address {address:#04x} is outside the addressable range")]
    AddressRange { channel: String, address: u8 },

    #[error("channel '{channel}' claims the same bus slot as '{other}'")]
    SlotCollision { channel: String, other: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),
}

/// Registry and initialization errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("bus configuration failed: {0}")]
    BusInitError(#[from] ConfigError),

    #[error("failed to open bus '{bus}': {source}")]
    BusOpenError {
        bus: String,
        #[source]
        source: BusFault,
    },
}

/// Result type aliases for convenience
pub type SensorResult<T> = Result<T, SensorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
