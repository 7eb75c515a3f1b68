use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::bus::i2c::I2cBus;
use crate::config::bus_config::load_bus_config;
use crate::config::channel_config::{ChannelConfig, ChannelEntry};
use crate::diagnostics::DiagnosticSink;
use crate::errors::{RegistryError, RegistryResult, SensorError, SensorResult};
use crate::profiles::{material_from_code, profile};
use crate::sensors::{create_channel_driver, ChannelDriver, Mode, TokioDelay};

/// Opens the configured buses and builds and initializes every valid
/// channel. Rejected entries and failed bring-ups are reported through
/// the diagnostic sink; only unusable bus configuration is fatal.
pub async fn init_all(
    config: &ChannelConfig,
    sink: &dyn DiagnosticSink,
) -> RegistryResult<(
    Vec<Box<dyn ChannelDriver + Send>>,
    HashMap<String, Arc<Mutex<I2cBus>>>,
)> {
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
    let bus_config_path = format!("{}/buses.toml", config_path);
    let bus_cfg = load_bus_config(&bus_config_path)?;

    let mut bus_map = HashMap::new();
    for b in &bus_cfg.buses {
        if b.r#type == "i2c" {
            let bus = I2cBus::new(&b.path).map_err(|fault| RegistryError::BusOpenError {
                bus: b.id.clone(),
                source: fault,
            })?;
            bus_map.insert(b.id.clone(), Arc::new(Mutex::new(bus)));
        }
    }

    let channels = build_channels(config, sink);
    info!("[registry] initializing {} channel(s)...", channels.len());

    let delay = TokioDelay;
    let mut ready = Vec::new();
    for mut channel in channels {
        let Some(bus_arc) = bus_map.get(channel.bus()) else {
            sink.report(&format!(
                "channel '{}' references unknown bus '{}', skipping",
                channel.id(),
                channel.bus()
            ));
            continue;
        };
        let mut bus = bus_arc.lock().await;
        if let Err(err) = channel.init(&mut *bus, &delay).await {
            // Bounded retries exhausted. The channel stays registered
            // and keeps reporting its cached value and outcome.
            sink.report(&err.to_string());
        }
        drop(bus);
        ready.push(channel);
    }

    Ok((ready, bus_map))
}

/// Builds channel drivers from configuration. Entries that cannot be
/// built (missing mode selector, bad address, colliding slot, unknown
/// driver) are rejected with a diagnostic note; the rest are built.
pub fn build_channels(
    config: &ChannelConfig,
    sink: &dyn DiagnosticSink,
) -> Vec<Box<dyn ChannelDriver + Send>> {
    let mut channels = Vec::new();
    let mut claimed_slots: HashMap<(u8, Mode), String> = HashMap::new();

    for entry in &config.channels {
        match build_channel(entry, &mut claimed_slots) {
            Ok(channel) => {
                info!(
                    "[registry] registering channel: id={} driver={} bus={}",
                    entry.id, entry.driver, entry.bus
                );
                if let Some(code) = entry.material {
                    let prof = profile(material_from_code(code));
                    info!(
                        "[registry] channel '{}' drying {} (target {:.0}C)",
                        entry.id, prof.name, prof.target_temp_c
                    );
                }
                channels.push(channel);
            }
            Err(err) => sink.report(&format!("rejected channel '{}': {}", entry.id, err)),
        }
    }

    channels
}

fn build_channel(
    entry: &ChannelEntry,
    claimed_slots: &mut HashMap<(u8, Mode), String>,
) -> SensorResult<Box<dyn ChannelDriver + Send>> {
    let mode = match entry.mode.as_deref() {
        Some("temperature") => Mode::Temperature,
        Some("humidity") => Mode::Humidity,
        Some(other) => {
            return Err(SensorError::InvalidMode {
                channel: entry.id.clone(),
                mode: other.to_string(),
            })
        }
        None => {
            return Err(SensorError::MissingMode {
                channel: entry.id.clone(),
            })
        }
    };

    let key = (entry.address, mode);
    if let Some(holder) = claimed_slots.get(&key) {
        return Err(SensorError::SlotCollision {
            channel: entry.id.clone(),
            other: holder.clone(),
        });
    }

    // An unlabelled channel borrows its material's display name.
    let label = entry.label.clone().or_else(|| {
        entry
            .material
            .map(|code| profile(material_from_code(code)).name.to_string())
    });

    let channel = create_channel_driver(
        &entry.driver,
        entry.id.clone(),
        entry.bus.clone(),
        entry.address,
        mode,
        label,
    )?;
    claimed_slots.insert(key, entry.id.clone());
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testsink::MemorySink;

    fn config(toml: &str) -> ChannelConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn missing_mode_is_rejected_with_a_note() {
        let cfg = config(
            r#"
            [[channel]]
            id = "good"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "temperature"

            [[channel]]
            id = "no_mode"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x41
            "#,
        );
        let sink = MemorySink::new();

        let channels = build_channels(&cfg, &sink);

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id(), "good");
        let notes = sink.notes();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("no_mode"));
        assert!(notes[0].contains("mode selector"));
    }

    #[test]
    fn colliding_slots_are_rejected() {
        let cfg = config(
            r#"
            [[channel]]
            id = "first"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "temperature"

            [[channel]]
            id = "second"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "temperature"
            "#,
        );
        let sink = MemorySink::new();

        let channels = build_channels(&cfg, &sink);

        assert_eq!(channels.len(), 1);
        let notes = sink.notes();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("second"));
        assert!(notes[0].contains("first"));
    }

    #[test]
    fn both_modes_can_share_one_device_address() {
        let cfg = config(
            r#"
            [[channel]]
            id = "chamber_temp"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "temperature"

            [[channel]]
            id = "chamber_hum"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x40
            mode = "humidity"
            "#,
        );
        let sink = MemorySink::new();

        let channels = build_channels(&cfg, &sink);

        assert_eq!(channels.len(), 2);
        assert!(sink.notes().is_empty());
    }

    #[test]
    fn material_supplies_the_missing_label() {
        let cfg = config(
            r#"
            [[channel]]
            id = "spool0"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x41
            mode = "humidity"
            material = 3508469

            [[channel]]
            id = "spool1"
            driver = "hdc1010"
            bus = "i2c0"
            address = 0x42
            mode = "humidity"
            label = "Left spool"
            material = 1420656
            "#,
        );
        let sink = MemorySink::new();

        let channels = build_channels(&cfg, &sink);

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].label(), Some("PLA"));
        // An explicit label wins over the material name.
        assert_eq!(channels[1].label(), Some("Left spool"));
        assert!(sink.notes().is_empty());
    }

    #[test]
    fn unknown_drivers_are_rejected() {
        let cfg = config(
            r#"
            [[channel]]
            id = "imu"
            driver = "lsm6dsl"
            bus = "i2c0"
            address = 0x40
            mode = "temperature"
            "#,
        );
        let sink = MemorySink::new();

        let channels = build_channels(&cfg, &sink);

        assert!(channels.is_empty());
        assert!(sink.notes()[0].contains("unsupported channel driver"));
    }
}
