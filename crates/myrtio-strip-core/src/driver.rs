use crate::{color::Rgb, error::HardwareError};

/// A physical LED chain that accepts whole frames.
pub trait LedOutput {
    /// Push one frame to the chain. `frame.len()` equals the strip pixel count.
    fn write(&mut self, frame: &[Rgb]);
}

/// Allocates and releases LED outputs bound to pins.
pub trait OutputFactory {
    type Output: LedOutput;

    /// Bind a new output to `pin` able to hold `pixel_count` pixels.
    fn attach(&mut self, pin: u8, pixel_count: usize) -> Result<Self::Output, HardwareError>;

    /// Return the output's hardware resources to the pool.
    fn release(&mut self, output: Self::Output);
}
