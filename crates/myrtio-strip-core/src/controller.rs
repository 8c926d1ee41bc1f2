//! Validated mutation and query entry points.
//!
//! Every control surface (request/response and push channel) goes through
//! [`StripController`]. Each successful mutation is followed by one
//! synchronous save; a failed save is logged and does not fail the mutation.

use embedded_storage::nor_flash::NorFlash;
use log::{debug, error, info, warn};

use crate::{
    config::{GlobalConfig, GlobalFlags},
    document::{RecordDocument, StateDocument},
    driver::OutputFactory,
    error::{ControlError, RequestError, StorageError},
    limits::SPEED_RANGE,
    push::{PixelTarget, PushMessage, PushOutcome},
    record::ConfigRecord,
    request::{Options, Reply, Request},
    scheduler::Scheduler,
    storage::ConfigStore,
    strip::{StripId, StripMode},
};

pub struct StripController<F: OutputFactory, S: NorFlash> {
    config: GlobalConfig<F>,
    store: ConfigStore<S>,
    scheduler: Scheduler,
    storage_degraded: bool,
}

impl<F: OutputFactory, S: NorFlash> StripController<F, S> {
    /// Load the stored configuration, falling back to the default topology.
    ///
    /// Storage failures never abort boot; they only mark storage degraded.
    pub fn boot(factory: F, mut store: ConfigStore<S>, scheduler: Scheduler) -> Self {
        let mut config = GlobalConfig::new(factory);
        let mut storage_degraded = false;
        match store.load::<ConfigRecord>() {
            Ok(record) => {
                info!("persistence: loaded {} strip(s)", record.strips.len());
                config.restore(&record);
            }
            Err(StorageError::NotFound) => {
                info!("persistence: no stored config, using defaults");
                config.restore_default();
            }
            Err(e) => {
                warn!("persistence: failed to load config: {}", e);
                storage_degraded = e == StorageError::Driver;
                config.restore_default();
            }
        }

        Self {
            config,
            store,
            scheduler,
            storage_degraded,
        }
    }

    pub fn config(&self) -> &GlobalConfig<F> {
        &self.config
    }

    pub fn flags(&self) -> GlobalFlags {
        self.config.flags
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore<S> {
        &mut self.store
    }

    /// Whether the last load or save hit a flash driver error.
    pub fn storage_degraded(&self) -> bool {
        self.storage_degraded
    }

    /// State document for the query endpoint.
    pub fn state<'a>(&'a self, version: &'a str, degraded: bool) -> StateDocument<'a, F> {
        StateDocument::new(&self.config, version, degraded, self.storage_degraded)
    }

    /// Run one animation tick.
    pub fn tick(&mut self) {
        self.scheduler.tick(&mut self.config);
    }

    /// Apply a parsed request.
    pub fn execute(&mut self, request: Request) -> Result<Reply, ControlError> {
        let reply = match request {
            Request::Toggle { strip, led } => Reply::Pixel(self.toggle_pixel(strip, led)?),
            Request::SetBrightness { strip, value } => {
                Reply::Brightness(self.set_brightness(strip, value)?)
            }
            Request::SetSpeed { strip, value } => Reply::Speed(self.set_speed(strip, value)?),
            Request::SetMode { strip, mode } => Reply::Mode(self.set_mode(strip, mode)?),
            Request::DefineGroup { strip, spec } => {
                let (index, size) = self.define_group(strip, &spec)?;
                Reply::Group { index, size }
            }
            Request::AddStrip { pin, leds } => Reply::Added(self.add_strip(pin, leds)?),
            Request::RemoveStrip { strip } => Reply::Removed(self.remove_strip(strip)?),
            Request::SetManual { value } => Reply::Manual(self.set_manual(value)),
            Request::SetOptions(options) => {
                self.set_options(options);
                Reply::Saved
            }
        };
        Ok(reply)
    }

    /// Flip a pixel and return its new state.
    pub fn toggle_pixel(&mut self, strip: StripId, led: usize) -> Result<bool, ControlError> {
        let active = self.config.registry.toggle_pixel(strip, led)?;
        self.persist();
        Ok(active)
    }

    pub fn set_pixel_active(
        &mut self,
        strip: StripId,
        led: usize,
        active: bool,
    ) -> Result<(), ControlError> {
        self.config.registry.set_pixel_active(strip, led, active)?;
        self.persist();
        Ok(())
    }

    pub fn set_brightness(&mut self, strip: StripId, value: u8) -> Result<u8, ControlError> {
        self.config.registry.get_mut(strip)?.set_brightness(value);
        self.persist();
        Ok(value)
    }

    /// Set a strip's speed. Values outside the accepted range are rejected.
    pub fn set_speed(&mut self, strip: StripId, value: f32) -> Result<f32, ControlError> {
        if !SPEED_RANGE.contains(&value) {
            return Err(RequestError::Invalid("value").into());
        }
        self.config.registry.get_mut(strip)?.set_speed(value);
        self.persist();
        Ok(value)
    }

    pub fn set_mode(&mut self, strip: StripId, mode: StripMode) -> Result<StripMode, ControlError> {
        self.config.registry.get_mut(strip)?.set_mode(mode);
        self.persist();
        Ok(mode)
    }

    /// Define a group on a strip. Returns the group index and member count.
    pub fn define_group(
        &mut self,
        strip: StripId,
        spec: &str,
    ) -> Result<(usize, usize), ControlError> {
        let index = self.config.registry.define_group(strip, spec)?;
        let size = self.config.registry.get(strip)?.groups()[index].len();
        self.persist();
        Ok((index, size))
    }

    /// Attach a new strip in the currently selected mode.
    pub fn add_strip(&mut self, pin: u8, leds: usize) -> Result<StripId, ControlError> {
        let mode = self.config.flags.selected_mode;
        let id = self.config.registry.add_with_mode(pin, leds, mode)?;
        info!("registry: added strip {} on pin {} with {} leds", id, pin, leds);
        self.persist();
        Ok(id)
    }

    pub fn remove_strip(&mut self, strip: StripId) -> Result<StripId, ControlError> {
        self.config.registry.remove(strip)?;
        info!("registry: removed strip {}", strip);
        self.persist();
        Ok(strip)
    }

    pub fn set_manual(&mut self, value: bool) -> bool {
        self.config.flags.manual_mode = value;
        self.persist();
        value
    }

    /// Update the global options that are present in `options`.
    pub fn set_options(&mut self, options: Options) {
        let flags = &mut self.config.flags;
        if let Some(randomize) = options.randomize {
            flags.randomize = randomize;
        }
        if let Some(interval) = options.randomize_interval {
            flags.randomize_interval = interval;
        }
        if let Some(brightness) = options.status_led_brightness {
            flags.status_led_brightness = brightness;
        }
        if let Some(mode) = options.selected_mode {
            flags.selected_mode = mode;
        }
        self.persist();
    }

    /// Replace the whole configuration and save it.
    pub fn replace(&mut self, record: &ConfigRecord) {
        self.config.restore(record);
        info!("config: replaced, {} strip(s)", self.config.registry.len());
        self.persist();
    }

    /// Apply one push-channel payload. Malformed payloads are dropped.
    pub fn handle_push(&mut self, payload: &[u8]) -> PushOutcome {
        let Some(message) = PushMessage::parse(payload) else {
            debug!("push: dropped malformed message");
            return PushOutcome::Ignored;
        };

        let mut changed = false;
        if let Some(manual) = message.manual {
            self.config.flags.manual_mode = manual;
            changed = true;
        }
        if let Some(write) = message.pixel() {
            match write.target {
                PixelTarget::Strip(strip) => {
                    match self.config.registry.set_pixel_active(strip, write.index, write.active) {
                        Ok(()) => changed = true,
                        Err(e) => debug!("push: led {} on strip {}: {}", write.index, strip, e),
                    }
                }
                PixelTarget::Broadcast => {
                    for strip in self.config.registry.iter_mut() {
                        if strip.set_active(write.index, write.active).is_ok() {
                            changed = true;
                        }
                    }
                }
            }
        }
        if let Some(brightness) = message.brightness {
            for strip in self.config.registry.iter_mut() {
                strip.set_brightness(brightness);
            }
            changed = changed || !self.config.registry.is_empty();
        }

        if changed {
            self.persist();
            PushOutcome::Applied
        } else {
            PushOutcome::Ignored
        }
    }

    /// Save the configuration. Failures are logged and mark storage degraded.
    pub fn persist(&mut self) {
        match self.store.save(&RecordDocument::new(&self.config)) {
            Ok(_) => self.storage_degraded = false,
            Err(e) => {
                error!("persistence: failed to save config: {}", e);
                self.storage_degraded = true;
            }
        }
    }
}
