#[cfg(feature = "hdc1010")]
pub mod hdc1010;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::bus::{Bus, BusFault};
use crate::errors::SensorResult;
use crate::messages::Reading;

/// Which quantity a channel measures. Fixed at construction; selects
/// the measurement command, the scaling formula, and the slot band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Temperature,
    Humidity,
}

/// Result category of a channel's most recent bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    BusError,
    Timeout,
    NotAcknowledged,
}

impl From<&BusFault> for Outcome {
    fn from(fault: &BusFault) -> Self {
        match fault {
            BusFault::Bus(_) => Outcome::BusError,
            BusFault::Timeout => Outcome::Timeout,
            BusFault::Nack => Outcome::NotAcknowledged,
        }
    }
}

/// Where a poll call originates. Restricted contexts (interrupt-like
/// callers that must not wait on the bus) always get the cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollContext {
    MainLoop,
    Restricted,
}

/// Injected wait used during bring-up sequencing, so the caller decides
/// how (and whether) the driver may pause between commands.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn delay_ms(&self, ms: u64);
}

/// Delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn delay_ms(&self, ms: u64) {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

#[async_trait]
pub trait ChannelDriver: Send + Sync {
    /// Device bring-up with bounded retry. Failure is recoverable: the
    /// channel keeps polling and reporting its cached value.
    async fn init(&mut self, bus: &mut dyn Bus, delay: &dyn Delay) -> SensorResult<()>;

    /// Single per-tick entry point. Issues at most one bus transaction
    /// and always returns the latest cached reading.
    async fn poll(&mut self, bus: &mut dyn Bus, now_ms: u64, ctx: PollContext) -> Reading;

    fn id(&self) -> &str;
    fn bus(&self) -> &str;
    fn label(&self) -> Option<&str>;
}

pub trait ChannelFactory: Sync {
    fn name(&self) -> &'static str;
    fn create(
        &self,
        id: String,
        bus_id: String,
        address: u8,
        mode: Mode,
        label: Option<String>,
    ) -> SensorResult<Box<dyn ChannelDriver + Send>>;
}

#[cfg(feature = "hdc1010")]
pub use self::hdc1010::HDC1010_FACTORY;

pub static CHANNEL_FACTORIES: &[&dyn ChannelFactory] = &[
    #[cfg(feature = "hdc1010")]
    &HDC1010_FACTORY,
];

pub fn create_channel_driver(
    driver: &str,
    id: String,
    bus_id: String,
    address: u8,
    mode: Mode,
    label: Option<String>,
) -> SensorResult<Box<dyn ChannelDriver + Send>> {
    CHANNEL_FACTORIES
        .iter()
        .find(|f| f.name() == driver)
        .ok_or_else(|| crate::errors::SensorError::UnsupportedDriver {
            driver: driver.to_string(),
        })?
        .create(id, bus_id, address, mode, label)
}
