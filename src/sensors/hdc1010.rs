//! HDC1010 temperature/humidity channel driver.
//!
//! Each channel owns one endpoint on a shared I2C bus and turns a
//! logical reading into two short bus transactions: a measurement-start
//! command issued in the channel's reserved slot, and a 2-byte read-back
//! once the device has had time to convert. Every other poll returns the
//! cached value without touching the bus, so the control loop never
//! waits on device conversion time.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::bus::Bus;
use crate::errors::{SensorError, SensorResult};
use crate::messages::Reading;
use crate::sensors::{ChannelDriver, ChannelFactory, Delay, Mode, Outcome, PollContext};
use crate::slots::slot_offset_ms;

/// Base I2C address; the two address pins select 0x40..=0x43.
pub const BASE_ADDRESS: u8 = 0x40;

/// Minimum interval between reading cycles, in milliseconds.
const MIN_READ_INTERVAL_MS: u64 = 2000;
/// Conversion settling time between the request and the read-back.
const SETTLE_MS: u64 = 10;
/// Bring-up attempts before giving up.
const INIT_ATTEMPTS: u32 = 3;
/// Pause between failed bring-up attempts.
const INIT_RETRY_DELAY_MS: u64 = 2000;
/// Pause between the software reset and the normal-operation command.
const RESET_SETTLE_MS: u64 = 5;

// Configuration register writes for bring-up.
const CMD_SOFT_RESET: [u8; 3] = [0x02, 0x80, 0x00];
const CMD_NORMAL_OPERATION: [u8; 3] = [0x02, 0x00, 0x00];
// Register pointers; writing one triggers the matching measurement.
const REG_TEMPERATURE: u8 = 0x00;
const REG_HUMIDITY: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingRequest,
    AwaitingCollection,
}

/// Scale a raw 16-bit conversion to engineering units.
fn convert(mode: Mode, raw: u16) -> f32 {
    match mode {
        Mode::Humidity => f32::from(raw) * 100.0 / 65536.0,
        Mode::Temperature => f32::from(raw) * 165.0 / 65536.0 - 40.0,
    }
}

fn measurement_register(mode: Mode) -> u8 {
    match mode {
        Mode::Temperature => REG_TEMPERATURE,
        Mode::Humidity => REG_HUMIDITY,
    }
}

pub struct Hdc1010Channel {
    id: String,
    bus_id: String,
    label: Option<String>,
    address: u8,
    mode: Mode,
    phase: Phase,
    /// Next instant a measurement request becomes due. Anchored to the
    /// channel's slot offset and advanced in whole cycles, so its window
    /// keeps a fixed separation from every other channel's.
    next_request_at_ms: u64,
    /// Earliest instant the pending conversion may be collected.
    collect_due_at_ms: u64,
    /// When the current reading cycle was requested.
    requested_at_ms: u64,
    value: f32,
    outcome: Outcome,
}

impl Hdc1010Channel {
    pub fn new(
        id: String,
        bus_id: String,
        address: u8,
        mode: Mode,
        label: Option<String>,
    ) -> SensorResult<Self> {
        let slot = address
            .checked_sub(BASE_ADDRESS)
            .and_then(|index| slot_offset_ms(index, mode))
            .ok_or(SensorError::AddressRange {
                channel: id.clone(),
                address,
            })?;

        Ok(Self {
            id,
            bus_id,
            label,
            address,
            mode,
            phase: Phase::AwaitingRequest,
            next_request_at_ms: slot,
            collect_due_at_ms: 0,
            requested_at_ms: 0,
            value: 0.0,
            outcome: Outcome::Success,
        })
    }

    fn reading(&self) -> Reading {
        Reading {
            channel_id: self.id.clone(),
            label: self.label.clone(),
            value: self.value,
            outcome: self.outcome,
            requested_at_ms: self.requested_at_ms,
        }
    }

    async fn try_configure(
        &self,
        bus: &mut dyn Bus,
        delay: &dyn Delay,
    ) -> Result<(), crate::bus::BusFault> {
        bus.transact(self.address, &CMD_SOFT_RESET, 0).await?;
        delay.delay_ms(RESET_SETTLE_MS).await;
        bus.transact(self.address, &CMD_NORMAL_OPERATION, 0).await?;
        Ok(())
    }

    async fn start_measurement(&mut self, bus: &mut dyn Bus, now_ms: u64) {
        let command = [measurement_register(self.mode)];
        match bus.transact(self.address, &command, 0).await {
            Ok(_) => self.outcome = Outcome::Success,
            Err(fault) => {
                self.outcome = Outcome::from(&fault);
                debug!(channel = %self.id, %fault, "measurement request failed");
            }
        }
        self.requested_at_ms = now_ms;
        self.collect_due_at_ms = now_ms + SETTLE_MS;
        // Keep the slot phase: advance in whole cycles past `now_ms` so a
        // stalled loop catches up without bursting requests.
        while self.next_request_at_ms <= now_ms {
            self.next_request_at_ms += MIN_READ_INTERVAL_MS;
        }
        self.phase = Phase::AwaitingCollection;
    }

    async fn collect_measurement(&mut self, bus: &mut dyn Bus) {
        match bus.transact(self.address, &[], 2).await {
            Ok(raw) => {
                self.value = convert(self.mode, raw as u16);
                self.outcome = Outcome::Success;
            }
            Err(fault) => {
                // Keep the previous value; a failed read-back must not
                // publish garbage.
                self.outcome = Outcome::from(&fault);
                warn!(channel = %self.id, %fault, "read-back failed, keeping previous value");
            }
        }
        self.phase = Phase::AwaitingRequest;
    }
}

#[async_trait]
impl ChannelDriver for Hdc1010Channel {
    async fn init(&mut self, bus: &mut dyn Bus, delay: &dyn Delay) -> SensorResult<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_configure(bus, delay).await {
                Ok(()) => {
                    self.outcome = Outcome::Success;
                    debug!(channel = %self.id, attempt, "channel configured");
                    return Ok(());
                }
                Err(fault) => {
                    self.outcome = Outcome::from(&fault);
                    warn!(channel = %self.id, attempt, %fault, "bring-up attempt failed");
                    if attempt >= INIT_ATTEMPTS {
                        return Err(SensorError::InitError {
                            channel: self.id.clone(),
                            source: fault,
                        });
                    }
                    delay.delay_ms(INIT_RETRY_DELAY_MS).await;
                }
            }
        }
    }

    async fn poll(&mut self, bus: &mut dyn Bus, now_ms: u64, ctx: PollContext) -> Reading {
        if ctx == PollContext::Restricted {
            return self.reading();
        }
        match self.phase {
            Phase::AwaitingRequest => {
                if now_ms >= self.next_request_at_ms {
                    self.start_measurement(bus, now_ms).await;
                }
            }
            Phase::AwaitingCollection => {
                if now_ms >= self.collect_due_at_ms {
                    self.collect_measurement(bus).await;
                }
            }
        }
        self.reading()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn bus(&self) -> &str {
        &self.bus_id
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

pub static HDC1010_FACTORY: Hdc1010Factory = Hdc1010Factory;

pub struct Hdc1010Factory;

impl ChannelFactory for Hdc1010Factory {
    fn name(&self) -> &'static str {
        "hdc1010"
    }

    fn create(
        &self,
        id: String,
        bus_id: String,
        address: u8,
        mode: Mode,
        label: Option<String>,
    ) -> SensorResult<Box<dyn ChannelDriver + Send>> {
        Ok(Box::new(Hdc1010Channel::new(id, bus_id, address, mode, label)?))
    }
}
