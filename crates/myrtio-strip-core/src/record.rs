//! Owned form of the persisted configuration record.
//!
//! Every field is optional when reading; unknown fields are ignored so that
//! older and newer firmware can read each other's records.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::{
    config::GlobalFlags,
    group::Group,
    limits::{
        DEFAULT_BRIGHTNESS, DEFAULT_PIN, DEFAULT_PIXEL_COUNT, DEFAULT_RANDOMIZE_INTERVAL,
        DEFAULT_SPEED, DEFAULT_STATUS_LED_BRIGHTNESS, MAX_GROUPS, MAX_PIXELS, MAX_STRIPS,
    },
    strip::StripMode,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StripRecord {
    pub pin: u8,
    pub led_count: u16,
    pub brightness: u8,
    pub speed: f32,
    pub phase: f32,
    pub mode: StripMode,
    pub led_states: Vec<bool, MAX_PIXELS>,
    pub groups: Vec<Group, MAX_GROUPS>,
}

impl Default for StripRecord {
    fn default() -> Self {
        Self {
            pin: DEFAULT_PIN,
            led_count: DEFAULT_PIXEL_COUNT,
            brightness: DEFAULT_BRIGHTNESS,
            speed: DEFAULT_SPEED,
            phase: 0.0,
            mode: StripMode::Cycle,
            led_states: Vec::new(),
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigRecord {
    pub strips: Vec<StripRecord, MAX_STRIPS>,
    pub manual_mode: bool,
    pub randomize: bool,
    pub randomize_interval: u16,
    pub status_led_brightness: u8,
    pub selected_mode: StripMode,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            strips: Vec::new(),
            manual_mode: false,
            randomize: false,
            randomize_interval: DEFAULT_RANDOMIZE_INTERVAL,
            status_led_brightness: DEFAULT_STATUS_LED_BRIGHTNESS,
            selected_mode: StripMode::Cycle,
        }
    }
}

impl ConfigRecord {
    pub fn flags(&self) -> GlobalFlags {
        GlobalFlags {
            manual_mode: self.manual_mode,
            randomize: self.randomize,
            randomize_interval: self.randomize_interval,
            status_led_brightness: self.status_led_brightness,
            selected_mode: self.selected_mode,
        }
    }
}
