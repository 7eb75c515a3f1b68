use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::sensors::Outcome;

/// Latest cached reading for one channel.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Reading {
    /// Channel identifier from configuration
    pub channel_id: String,
    /// Optional human-readable label
    pub label: Option<String>,
    /// Last computed value: degrees C for temperature channels, percent
    /// relative humidity for humidity channels. Best-effort: may be the
    /// previous cycle's value while a fresh reading is pending.
    pub value: f32,
    /// Result of the channel's most recent bus transaction
    pub outcome: Outcome,
    /// Monotonic time the current reading cycle was requested
    pub requested_at_ms: u64,
}

impl Reading {
    /// Serialize to JSON for debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Latest reading per channel, shared between the polling loop and any
/// in-process consumers. Queries are synchronous and never touch the
/// bus, so they are safe at any call rate.
#[derive(Clone, Default)]
pub struct ReadingStore {
    inner: Arc<RwLock<HashMap<String, Reading>>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, reading: Reading) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reading.channel_id.clone(), reading);
    }

    pub fn latest(&self, channel_id: &str) -> Option<Reading> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel_id)
            .cloned()
    }
}
