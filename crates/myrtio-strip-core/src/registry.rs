//! Strip topology and pixel state.
//!
//! Strip ids are positions in a dense table: removing a strip shifts every
//! higher id down by one.

use heapless::Vec;

use crate::{
    driver::OutputFactory,
    error::StripError,
    limits::{MAX_PIXELS, MAX_STRIPS},
    strip::{Strip, StripId, StripMode},
};

pub struct StripRegistry<F: OutputFactory> {
    factory: F,
    strips: Vec<Strip<F::Output>, MAX_STRIPS>,
}

impl<F: OutputFactory> StripRegistry<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            strips: Vec::new(),
        }
    }

    /// Attach a new strip in [`StripMode::Cycle`].
    pub fn add(&mut self, pin: u8, pixel_count: usize) -> Result<StripId, StripError> {
        self.add_with_mode(pin, pixel_count, StripMode::Cycle)
    }

    /// Attach a new strip and start it dark.
    ///
    /// The registry is left unchanged on any error.
    pub fn add_with_mode(
        &mut self,
        pin: u8,
        pixel_count: usize,
        mode: StripMode,
    ) -> Result<StripId, StripError> {
        if self.strips.is_full() {
            return Err(StripError::CapacityExceeded);
        }
        if pixel_count == 0 || pixel_count > MAX_PIXELS {
            return Err(StripError::InvalidPixelCount);
        }

        let output = self.factory.attach(pin, pixel_count)?;
        let mut strip = Strip::new(pin, pixel_count, mode, output);
        strip.blank();
        if let Err(strip) = self.strips.push(strip) {
            self.factory.release(strip.output);
            return Err(StripError::CapacityExceeded);
        }
        Ok(self.strips.len() - 1)
    }

    /// Blank and release the strip, compacting the ids above it.
    pub fn remove(&mut self, id: StripId) -> Result<(), StripError> {
        if id >= self.strips.len() {
            return Err(StripError::NotFound);
        }
        let mut strip = self.strips.remove(id);
        strip.blank();
        self.factory.release(strip.output);
        Ok(())
    }

    /// Remove every strip.
    pub fn clear(&mut self) {
        while !self.strips.is_empty() {
            let _ = self.remove(self.strips.len() - 1);
        }
    }

    pub fn get(&self, id: StripId) -> Result<&Strip<F::Output>, StripError> {
        self.strips.get(id).ok_or(StripError::NotFound)
    }

    pub fn get_mut(&mut self, id: StripId) -> Result<&mut Strip<F::Output>, StripError> {
        self.strips.get_mut(id).ok_or(StripError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strip<F::Output>> {
        self.strips.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Strip<F::Output>> {
        self.strips.iter_mut()
    }

    pub fn set_pixel_active(
        &mut self,
        id: StripId,
        index: usize,
        active: bool,
    ) -> Result<(), StripError> {
        self.get_mut(id)?.set_active(index, active)
    }

    pub fn pixel_active(&self, id: StripId, index: usize) -> Result<bool, StripError> {
        self.get(id)?.is_active(index)
    }

    /// Flip a pixel and return its new state.
    pub fn toggle_pixel(&mut self, id: StripId, index: usize) -> Result<bool, StripError> {
        self.get_mut(id)?.toggle(index)
    }

    /// Define a group on a strip and return its index in the group table.
    pub fn define_group(&mut self, id: StripId, spec: &str) -> Result<usize, StripError> {
        self.get_mut(id)?.define_group(spec)
    }

    pub fn clear_groups(&mut self, id: StripId) -> Result<(), StripError> {
        self.get_mut(id)?.clear_groups();
        Ok(())
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}
