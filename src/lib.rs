// Public modules
pub mod bus;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod messages;
pub mod profiles;
pub mod registry;
pub mod scheduler;
pub mod sensors;
pub mod slots;

// Re-export commonly used types
pub use config::channel_config::ChannelConfig;
pub use config::{load_bus_config, load_channel_config};
pub use errors::{ConfigError, RegistryError, SensorError};
pub use messages::{Reading, ReadingStore};
pub use registry::init_all;
pub use scheduler::run_polling_loop;
pub use sensors::{ChannelDriver, Mode, Outcome, PollContext};

use diagnostics::TracingSink;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

/// Run the hub with the given configuration directory
pub async fn run_hub(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("[TempHumHub] starting up...");

    let channel_config_path = format!("{}/channels.toml", config_path);
    let channel_config = load_channel_config(&channel_config_path)?;
    info!("[config] loaded {} channel(s)", channel_config.channels.len());

    let sink = TracingSink;
    let (channels, buses) = init_all(&channel_config, &sink).await?;
    info!("[registry] {} channel(s) ready", channels.len());

    let store = ReadingStore::new();
    run_polling_loop(channels, buses, store).await;

    Ok(())
}
