use core::fmt;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::{
    color::{BLACK, Rgb},
    driver::LedOutput,
    error::StripError,
    group::{self, Group},
    limits::{DEFAULT_BRIGHTNESS, DEFAULT_SPEED, MAX_GROUPS, MAX_PIXELS, SPEED_RANGE},
};

/// Dense, zero-based strip position in the registry.
pub type StripId = usize;

/// Animation mode of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripMode {
    /// Autonomous hue sweep.
    #[default]
    Cycle,
    /// Phase frozen, only external pixel writes change the output.
    Manual,
}

impl StripMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cycle" => Some(StripMode::Cycle),
            "manual" => Some(StripMode::Manual),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StripMode::Cycle => "cycle",
            StripMode::Manual => "manual",
        }
    }
}

impl fmt::Display for StripMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrap a phase into `[0, 1)`. Non-finite values reset to zero.
pub fn normalize_phase(phase: f32) -> f32 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase - libm::floorf(phase);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Clamp a stored speed into the accepted range.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return DEFAULT_SPEED;
    }
    speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
}

/// One LED chain with its animation state, mask, groups and output.
pub struct Strip<O> {
    pub(crate) pin: u8,
    pub(crate) brightness: u8,
    pub(crate) speed: f32,
    pub(crate) phase: f32,
    pub(crate) mode: StripMode,
    pub(crate) mask: Vec<bool, MAX_PIXELS>,
    pub(crate) groups: Vec<Group, MAX_GROUPS>,
    pub(crate) frame: Vec<Rgb, MAX_PIXELS>,
    pub(crate) output: O,
}

impl<O: LedOutput> Strip<O> {
    /// Create a strip with every pixel active. `pixel_count` is capped at
    /// [`MAX_PIXELS`]; callers validate it beforehand.
    pub(crate) fn new(pin: u8, pixel_count: usize, mode: StripMode, output: O) -> Self {
        let pixel_count = pixel_count.min(MAX_PIXELS);
        let mut mask = Vec::new();
        let _ = mask.resize(pixel_count, true);
        let mut frame = Vec::new();
        let _ = frame.resize(pixel_count, BLACK);

        Self {
            pin,
            brightness: DEFAULT_BRIGHTNESS,
            speed: DEFAULT_SPEED,
            phase: 0.0,
            mode,
            mask,
            groups: Vec::new(),
            frame,
            output,
        }
    }

    /// Push an all-dark frame to the output.
    pub(crate) fn blank(&mut self) {
        self.frame.fill(BLACK);
        self.output.write(&self.frame);
    }

    /// Push the current frame buffer to the output.
    pub(crate) fn flush(&mut self) {
        self.output.write(&self.frame);
    }

    pub fn set_active(&mut self, index: usize, active: bool) -> Result<(), StripError> {
        let bit = self.mask.get_mut(index).ok_or(StripError::InvalidIndex)?;
        *bit = active;
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, StripError> {
        let bit = self.mask.get_mut(index).ok_or(StripError::InvalidIndex)?;
        *bit = !*bit;
        Ok(*bit)
    }

    /// Parse `spec` into a new group and append it to the group table.
    ///
    /// Returns the index of the new group.
    pub fn define_group(&mut self, spec: &str) -> Result<usize, StripError> {
        if self.groups.is_full() {
            return Err(StripError::GroupCapacityExceeded);
        }
        let members = group::parse_members(spec, self.pixel_count());
        self.groups
            .push(members)
            .map_err(|_| StripError::GroupCapacityExceeded)?;
        Ok(self.groups.len() - 1)
    }

    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn set_mode(&mut self, mode: StripMode) {
        self.mode = mode;
    }

    /// Set the phase increment, clamped into the accepted range.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = normalize_phase(phase);
    }
}

impl<O> Strip<O> {
    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn pixel_count(&self) -> usize {
        self.mask.len()
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn mode(&self) -> StripMode {
        self.mode
    }

    pub fn is_active(&self, index: usize) -> Result<bool, StripError> {
        self.mask.get(index).copied().ok_or(StripError::InvalidIndex)
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Last rendered frame.
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
