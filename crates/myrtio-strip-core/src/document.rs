//! Borrowed serialization views over a live [`GlobalConfig`].
//!
//! [`RecordDocument`] produces the persisted record, [`StateDocument`] the
//! document returned by the state query. Both serialize straight from the
//! registry without copying strips.

use serde::{
    Serialize, Serializer,
    ser::{SerializeSeq, SerializeStruct},
};

use crate::{config::GlobalConfig, driver::OutputFactory, group::Group, strip::Strip};

/// Persisted record view.
pub struct RecordDocument<'a, F: OutputFactory> {
    config: &'a GlobalConfig<F>,
}

impl<'a, F: OutputFactory> RecordDocument<'a, F> {
    pub fn new(config: &'a GlobalConfig<F>) -> Self {
        Self { config }
    }
}

impl<F: OutputFactory> Serialize for RecordDocument<'_, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags = &self.config.flags;
        let mut doc = serializer.serialize_struct("ConfigRecord", 6)?;
        doc.serialize_field("strips", &RecordStrips(self.config))?;
        doc.serialize_field("manualMode", &flags.manual_mode)?;
        doc.serialize_field("randomize", &flags.randomize)?;
        doc.serialize_field("randomizeInterval", &flags.randomize_interval)?;
        doc.serialize_field("statusLedBrightness", &flags.status_led_brightness)?;
        doc.serialize_field("selectedMode", &flags.selected_mode)?;
        doc.end()
    }
}

struct RecordStrips<'a, F: OutputFactory>(&'a GlobalConfig<F>);

impl<F: OutputFactory> Serialize for RecordStrips<'_, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.registry.iter().map(RecordStrip))
    }
}

struct RecordStrip<'a, O>(&'a Strip<O>);

impl<O> Serialize for RecordStrip<'_, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let strip = self.0;
        let mut doc = serializer.serialize_struct("StripRecord", 8)?;
        doc.serialize_field("pin", &strip.pin())?;
        doc.serialize_field("ledCount", &strip.pixel_count())?;
        doc.serialize_field("brightness", &strip.brightness())?;
        doc.serialize_field("speed", &strip.speed())?;
        doc.serialize_field("phase", &strip.phase())?;
        doc.serialize_field("mode", &strip.mode())?;
        doc.serialize_field("ledStates", strip.mask())?;
        doc.serialize_field("groups", strip.groups())?;
        doc.end()
    }
}

/// State query view.
pub struct StateDocument<'a, F: OutputFactory> {
    config: &'a GlobalConfig<F>,
    version: &'a str,
    degraded: bool,
    storage_degraded: bool,
}

impl<'a, F: OutputFactory> StateDocument<'a, F> {
    pub fn new(
        config: &'a GlobalConfig<F>,
        version: &'a str,
        degraded: bool,
        storage_degraded: bool,
    ) -> Self {
        Self {
            config,
            version,
            degraded,
            storage_degraded,
        }
    }
}

impl<F: OutputFactory> Serialize for StateDocument<'_, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags = &self.config.flags;
        let mut doc = serializer.serialize_struct("State", 9)?;
        doc.serialize_field("strips", &StateStrips(self.config))?;
        doc.serialize_field("manualMode", &flags.manual_mode)?;
        doc.serialize_field("randomize", &flags.randomize)?;
        doc.serialize_field("randomizeInterval", &flags.randomize_interval)?;
        doc.serialize_field("statusLedBrightness", &flags.status_led_brightness)?;
        doc.serialize_field("selectedMode", &flags.selected_mode)?;
        doc.serialize_field("version", self.version)?;
        doc.serialize_field("degraded", &self.degraded)?;
        doc.serialize_field("storageDegraded", &self.storage_degraded)?;
        doc.end()
    }
}

struct StateStrips<'a, F: OutputFactory>(&'a GlobalConfig<F>);

impl<F: OutputFactory> Serialize for StateStrips<'_, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.registry.len()))?;
        for (id, strip) in self.0.registry.iter().enumerate() {
            seq.serialize_element(&StateStrip { id, strip })?;
        }
        seq.end()
    }
}

struct StateStrip<'a, O> {
    id: usize,
    strip: &'a Strip<O>,
}

impl<O> Serialize for StateStrip<'_, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let strip = self.strip;
        let mut doc = serializer.serialize_struct("Strip", 9)?;
        doc.serialize_field("id", &self.id)?;
        doc.serialize_field("pin", &strip.pin())?;
        doc.serialize_field("numLeds", &strip.pixel_count())?;
        doc.serialize_field("brightness", &strip.brightness())?;
        doc.serialize_field("speed", &strip.speed())?;
        doc.serialize_field("phase", &strip.phase())?;
        doc.serialize_field("mode", &strip.mode())?;
        doc.serialize_field("ledStates", strip.mask())?;
        doc.serialize_field("groups", &StateGroups(strip.groups()))?;
        doc.end()
    }
}

struct StateGroups<'a>(&'a [Group]);

#[derive(Serialize)]
struct StateGroup<'a> {
    size: usize,
    leds: &'a [u16],
}

impl Serialize for StateGroups<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|group| StateGroup {
            size: group.len(),
            leds: group,
        }))
    }
}
