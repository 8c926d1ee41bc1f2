//! Capacity limits and defaults.

use core::ops::RangeInclusive;

/// Maximum number of strips attached at once.
pub const MAX_STRIPS: usize = 4;
/// Maximum pixel count of a single strip (output buffer capacity).
pub const MAX_PIXELS: usize = 300;
/// Maximum number of groups per strip.
pub const MAX_GROUPS: usize = 8;
/// Maximum number of members in one group.
pub const MAX_GROUP_SIZE: usize = 64;
/// Maximum byte length of a textual group member list.
pub const MAX_GROUP_SPEC_LEN: usize = 128;

/// Accepted animation speed, in phase units per tick.
pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=0.1;
pub const DEFAULT_SPEED: f32 = 0.002;
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// Topology used when no stored configuration can be loaded.
pub const DEFAULT_PIN: u8 = 2;
pub const DEFAULT_PIXEL_COUNT: u16 = 30;

pub const DEFAULT_RANDOMIZE_INTERVAL: u16 = 30;
pub const DEFAULT_STATUS_LED_BRIGHTNESS: u8 = 32;

/// Upper bound of a serialized configuration record body.
pub const MAX_RECORD_SIZE: usize = 20 * 1024;
/// Upper bound of a serialized state document.
pub const MAX_STATE_SIZE: usize = 24 * 1024;
