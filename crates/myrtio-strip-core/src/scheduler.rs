//! Fixed-cadence animation scheduler.
//!
//! Each tick advances every running strip's phase, renders the hue sweep
//! through the strip's mask and brightness and pushes exactly one frame per
//! strip, in ascending strip order.

use crate::{
    color::{BLACK, sweep_color},
    config::GlobalConfig,
    driver::{LedOutput, OutputFactory},
    strip::{Strip, StripMode, normalize_phase},
};

/// Small xorshift generator used to re-seed phases.
#[derive(Debug, Clone, Copy)]
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    fn next_phase(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

pub struct Scheduler {
    ticks: u32,
    ticks_per_second: u16,
    rng: XorShift32,
}

impl Scheduler {
    pub const fn new(ticks_per_second: u16, seed: u32) -> Self {
        Self {
            ticks: 0,
            ticks_per_second,
            rng: XorShift32::new(seed),
        }
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Run one animation step over every strip.
    pub fn tick<F: OutputFactory>(&mut self, config: &mut GlobalConfig<F>) {
        self.ticks = self.ticks.wrapping_add(1);
        let reseed = self.randomize_due(config);
        let global_freeze = config.flags.manual_mode;

        for strip in config.registry.iter_mut() {
            let frozen = global_freeze || strip.mode == StripMode::Manual;
            if !frozen {
                strip.phase = if reseed {
                    self.rng.next_phase()
                } else {
                    normalize_phase(strip.phase + strip.speed)
                };
            }
            render(strip);
        }
    }

    fn randomize_due<F: OutputFactory>(&self, config: &GlobalConfig<F>) -> bool {
        let flags = &config.flags;
        let period = u32::from(flags.randomize_interval) * u32::from(self.ticks_per_second);
        flags.randomize && period > 0 && self.ticks % period == 0
    }
}

/// Render a strip's current phase into its frame and push it.
pub fn render<O: LedOutput>(strip: &mut Strip<O>) {
    let color = sweep_color(strip.phase, strip.brightness);
    for (pixel, &active) in strip.frame.iter_mut().zip(strip.mask.iter()) {
        *pixel = if active { color } else { BLACK };
    }
    strip.flush();
}
