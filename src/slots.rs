//! Reserved bus-access slots for channels sharing one I2C bus.
//!
//! Each channel gets a fixed time offset within the repeating polling
//! cycle, derived from its address index and mode. Temperature channels
//! occupy one band, humidity channels a disjoint later band, so no two
//! channels are ever due for a transaction in the same instant.

use crate::sensors::Mode;

/// Spacing between adjacent slots; also the guaranteed minimum
/// separation between any two channels' windows.
pub const SLOT_SPACING_MS: u64 = 250;

/// Offset of the humidity band relative to the temperature band.
pub const HUMIDITY_BAND_MS: u64 = 1000;

/// Ceiling on channels per mode. The two bands only have room for this
/// many slots each; adding more channels requires re-deriving the
/// banding, not extending it.
pub const MAX_CHANNELS_PER_MODE: u8 = 4;

/// Slot offset within the polling cycle for the channel at `index` in
/// `mode`, or `None` once the band is exhausted. Pure function of its
/// inputs.
pub fn slot_offset_ms(index: u8, mode: Mode) -> Option<u64> {
    if index >= MAX_CHANNELS_PER_MODE {
        return None;
    }
    let band = match mode {
        Mode::Temperature => 0,
        Mode::Humidity => HUMIDITY_BAND_MS,
    };
    Some(band + SLOT_SPACING_MS * u64::from(index))
}
