pub mod bus_config;
pub mod channel_config;

pub use bus_config::load_bus_config;
pub use channel_config::load_channel_config;
