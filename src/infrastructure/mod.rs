//! Infrastructure layer
//!
//! Hardware drivers and the embassy tasks that run the firmware.

pub mod drivers;
pub mod tasks;
