use log::{info, warn};

use crate::{
    driver::OutputFactory,
    error::StripError,
    group,
    limits::{
        DEFAULT_PIN, DEFAULT_PIXEL_COUNT, DEFAULT_RANDOMIZE_INTERVAL, DEFAULT_STATUS_LED_BRIGHTNESS,
    },
    record::{ConfigRecord, StripRecord},
    registry::StripRegistry,
    strip::{StripMode, clamp_speed, normalize_phase},
};

/// Process-wide flags stored next to the strips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalFlags {
    /// Freeze every strip's phase.
    pub manual_mode: bool,
    /// Periodically jump every running strip to a random phase.
    pub randomize: bool,
    /// Randomize period in seconds.
    pub randomize_interval: u16,
    /// Brightness of the status indicator LED.
    pub status_led_brightness: u8,
    /// Mode given to newly added strips.
    pub selected_mode: StripMode,
}

impl Default for GlobalFlags {
    fn default() -> Self {
        Self {
            manual_mode: false,
            randomize: false,
            randomize_interval: DEFAULT_RANDOMIZE_INTERVAL,
            status_led_brightness: DEFAULT_STATUS_LED_BRIGHTNESS,
            selected_mode: StripMode::Cycle,
        }
    }
}

/// The aggregate root: every strip plus the global flags.
pub struct GlobalConfig<F: OutputFactory> {
    pub registry: StripRegistry<F>,
    pub flags: GlobalFlags,
}

impl<F: OutputFactory> GlobalConfig<F> {
    pub fn new(factory: F) -> Self {
        Self {
            registry: StripRegistry::new(factory),
            flags: GlobalFlags::default(),
        }
    }

    /// Replace the whole configuration with the contents of a record.
    ///
    /// Strips that cannot be attached are skipped. When the record lists
    /// strips but none of them survives, the default strip is attached
    /// instead. An empty strip list is kept as is.
    pub fn restore(&mut self, record: &ConfigRecord) {
        self.registry.clear();
        self.flags = record.flags();
        for (position, strip) in record.strips.iter().enumerate() {
            if let Err(e) = self.restore_strip(strip) {
                warn!("config: skipping strip {}: {}", position, e);
            }
        }
        if self.registry.is_empty() && !record.strips.is_empty() {
            self.attach_default();
        }
    }

    /// Drop every strip and restore the default topology and flags.
    pub fn restore_default(&mut self) {
        self.registry.clear();
        self.flags = GlobalFlags::default();
        self.attach_default();
    }

    fn restore_strip(&mut self, record: &StripRecord) -> Result<(), StripError> {
        let id = self
            .registry
            .add_with_mode(record.pin, usize::from(record.led_count), record.mode)?;
        let strip = self.registry.get_mut(id)?;
        strip.brightness = record.brightness;
        strip.speed = clamp_speed(record.speed);
        strip.phase = normalize_phase(record.phase);

        let stored = record.led_states.iter().copied().chain(core::iter::repeat(true));
        for (bit, active) in strip.mask.iter_mut().zip(stored) {
            *bit = active;
        }

        let pixel_count = strip.pixel_count();
        for members in &record.groups {
            let _ = strip.groups.push(group::retain_members(members, pixel_count));
        }
        Ok(())
    }

    fn attach_default(&mut self) {
        let pixel_count = usize::from(DEFAULT_PIXEL_COUNT);
        let mode = self.flags.selected_mode;
        match self.registry.add_with_mode(DEFAULT_PIN, pixel_count, mode) {
            Ok(_) => info!(
                "config: attached default strip on pin {} with {} leds",
                DEFAULT_PIN, DEFAULT_PIXEL_COUNT
            ),
            Err(e) => warn!("config: failed to attach default strip: {}", e),
        }
    }
}
