#![no_std]

//! Hardware-agnostic runtime of the strip controller.
//!
//! Owns the strip topology, per-pixel masks and groups, the persisted
//! configuration record, the animation scheduler and the validated
//! mutation entry points shared by every control surface.

extern crate alloc;

pub mod color;
pub mod config;
pub mod controller;
pub mod document;
pub mod driver;
pub mod error;
pub mod group;
pub mod leases;
pub mod limits;
pub mod monitor;
pub mod push;
pub mod record;
pub mod registry;
pub mod request;
pub mod scheduler;
pub mod storage;
pub mod strip;
pub mod ws;

pub use color::Rgb;
pub use config::{GlobalConfig, GlobalFlags};
pub use controller::StripController;
pub use driver::{LedOutput, OutputFactory};
pub use error::{ControlError, HardwareError, RequestError, StorageError, StripError};
pub use registry::StripRegistry;
pub use strip::{Strip, StripId, StripMode};
