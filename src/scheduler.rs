use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, trace};

use crate::bus::i2c::I2cBus;
use crate::messages::ReadingStore;
use crate::sensors::{ChannelDriver, PollContext};

/// Control-loop tick period. Every channel is offered one poll per
/// tick; the slot schedule decides which tick actually carries a
/// transaction, so each tick's bus usage stays short and bounded.
pub const TICK_MS: u64 = 50;

/// Single cooperative polling loop. Channels are polled serially each
/// tick; the shared bus is time-multiplexed by the channels' slot
/// offsets rather than by the lock, which is uncontended here.
pub async fn run_polling_loop(
    mut channels: Vec<Box<dyn ChannelDriver + Send>>,
    buses: HashMap<String, Arc<Mutex<I2cBus>>>,
    store: ReadingStore,
) {
    info!(
        "[scheduler] polling {} channel(s) every {}ms",
        channels.len(),
        TICK_MS
    );

    let epoch = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));
    loop {
        ticker.tick().await;
        let now_ms = epoch.elapsed().as_millis() as u64;
        for channel in channels.iter_mut() {
            let Some(bus_arc) = buses.get(channel.bus()) else {
                continue;
            };
            let mut bus = bus_arc.lock().await;
            let reading = channel.poll(&mut *bus, now_ms, PollContext::MainLoop).await;
            drop(bus);
            trace!(
                channel = %reading.channel_id,
                value = reading.value,
                outcome = ?reading.outcome,
                "polled"
            );
            store.publish(reading);
        }
    }
}
