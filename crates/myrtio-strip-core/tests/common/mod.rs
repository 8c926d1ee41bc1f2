#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use embedded_hal_async::delay::DelayNs;
use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};
use myrtio_strip_core::{
    HardwareError, LedOutput, OutputFactory, Rgb, StripController,
    monitor::{AccessPoint, ApError, ApStatus},
    scheduler::Scheduler,
    storage::ConfigStore,
};

pub const FLASH_SIZE: usize = 32 * 1024;
pub const PARTITION_OFFSET: u32 = 0x2000;
pub const PARTITION_SIZE: usize = 0x6000;

/// Pins in the order their outputs received frames, shared by all outputs.
pub type Journal = Rc<RefCell<Vec<u8>>>;

/// LED output that records every frame it receives.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub pin: u8,
    pub frames: Vec<Vec<Rgb>>,
    journal: Journal,
}

impl RecordingOutput {
    pub fn last_frame(&self) -> &[Rgb] {
        self.frames.last().map_or(&[], Vec::as_slice)
    }
}

impl LedOutput for RecordingOutput {
    fn write(&mut self, frame: &[Rgb]) {
        self.frames.push(frame.to_vec());
        self.journal.borrow_mut().push(self.pin);
    }
}

/// Output factory with a fixed channel budget and a list of unusable pins.
#[derive(Debug)]
pub struct FakeFactory {
    pub channels: usize,
    pub in_use: usize,
    pub bad_pins: Vec<u8>,
    pub attached: Vec<u8>,
    /// Pin and frame count of every released output.
    pub released: Vec<(u8, usize, Vec<Rgb>)>,
    pub journal: Journal,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::with_channels(8)
    }

    pub fn with_channels(channels: usize) -> Self {
        Self {
            channels,
            in_use: 0,
            bad_pins: Vec::new(),
            attached: Vec::new(),
            released: Vec::new(),
            journal: Journal::default(),
        }
    }
}

impl OutputFactory for FakeFactory {
    type Output = RecordingOutput;

    fn attach(&mut self, pin: u8, _pixel_count: usize) -> Result<RecordingOutput, HardwareError> {
        if self.bad_pins.contains(&pin) {
            return Err(HardwareError::InvalidPin);
        }
        if self.in_use >= self.channels {
            return Err(HardwareError::NoFreeChannel);
        }
        self.in_use += 1;
        self.attached.push(pin);
        Ok(RecordingOutput {
            pin,
            frames: Vec::new(),
            journal: Rc::clone(&self.journal),
        })
    }

    fn release(&mut self, output: RecordingOutput) {
        self.in_use -= 1;
        let last = output.last_frame().to_vec();
        self.released.push((output.pin, output.frames.len(), last));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamFlashError;

impl NorFlashError for RamFlashError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

/// In-memory NOR flash with 4-byte words and 4 KiB sectors.
#[derive(Debug)]
pub struct RamFlash {
    pub data: Vec<u8>,
    pub fail: bool,
    pub writes: usize,
}

impl RamFlash {
    pub fn new() -> Self {
        Self {
            data: vec![0xFF; FLASH_SIZE],
            fail: false,
            writes: 0,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl ErrorType for RamFlash {
    type Error = RamFlashError;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), RamFlashError> {
        if self.fail {
            return Err(RamFlashError);
        }
        let start = offset as usize;
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(RamFlashError);
        }
        bytes.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = 4096;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), RamFlashError> {
        if self.fail {
            return Err(RamFlashError);
        }
        let (from, to) = (from as usize, to as usize);
        assert_eq!(from % Self::ERASE_SIZE, 0, "unaligned erase start");
        assert_eq!(to % Self::ERASE_SIZE, 0, "unaligned erase end");
        self.data[from..to].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), RamFlashError> {
        if self.fail {
            return Err(RamFlashError);
        }
        let start = offset as usize;
        assert_eq!(start % Self::WRITE_SIZE, 0, "unaligned write start");
        assert_eq!(bytes.len() % Self::WRITE_SIZE, 0, "unaligned write length");
        for (cell, byte) in self.data[start..start + bytes.len()].iter_mut().zip(bytes) {
            // NOR flash can only clear bits.
            *cell &= *byte;
        }
        self.writes += 1;
        Ok(())
    }
}

/// Flash that only reads whole 16-byte blocks.
#[derive(Debug)]
pub struct BlockReadFlash(pub RamFlash);

impl ErrorType for BlockReadFlash {
    type Error = RamFlashError;
}

impl ReadNorFlash for BlockReadFlash {
    const READ_SIZE: usize = 16;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), RamFlashError> {
        assert_eq!(offset as usize % Self::READ_SIZE, 0, "unaligned read start");
        assert_eq!(bytes.len() % Self::READ_SIZE, 0, "unaligned read length");
        self.0.read(offset, bytes)
    }

    fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl NorFlash for BlockReadFlash {
    const WRITE_SIZE: usize = RamFlash::WRITE_SIZE;
    const ERASE_SIZE: usize = RamFlash::ERASE_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), RamFlashError> {
        self.0.erase(from, to)
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), RamFlashError> {
        self.0.write(offset, bytes)
    }
}

pub type TestController = StripController<FakeFactory, RamFlash>;

pub fn store(flash: RamFlash) -> ConfigStore<RamFlash> {
    ConfigStore::new(flash, PARTITION_OFFSET, PARTITION_SIZE)
}

pub fn boot(flash: RamFlash) -> TestController {
    StripController::boot(FakeFactory::new(), store(flash), Scheduler::new(50, 1))
}

/// Boot on a flash holding `json` as the stored record body.
pub fn boot_with_record(json: &str) -> TestController {
    StripController::boot(FakeFactory::new(), store(flash_with_record(json)), Scheduler::new(50, 1))
}

pub fn flash_with_record(json: &str) -> RamFlash {
    let mut flash = RamFlash::new();
    let start = PARTITION_OFFSET as usize;
    flash.data[start..start + 2].copy_from_slice(&0x5354_u16.to_le_bytes());
    flash.data[start + 2..start + 6].copy_from_slice(&(json.len() as u32).to_le_bytes());
    flash.data[start + 6..start + 6 + json.len()].copy_from_slice(json.as_bytes());
    flash
}

/// Move the stored flash contents into a fresh controller, as after a reboot.
pub fn reboot(controller: TestController) -> TestController {
    let data = controller.store().flash().data.clone();
    let flash = RamFlash {
        data,
        fail: false,
        writes: 0,
    };
    boot(flash)
}

/// Access point whose status becomes healthy after a number of restarts.
#[derive(Debug)]
pub struct ScriptedAp {
    pub status: ApStatus,
    pub healthy: ApStatus,
    pub heal_after: Option<usize>,
    pub restarts: usize,
}

impl AccessPoint for ScriptedAp {
    fn status(&self) -> ApStatus {
        self.status
    }

    async fn restart(&mut self) -> Result<(), ApError> {
        self.restarts += 1;
        match self.heal_after {
            Some(n) if self.restarts >= n => {
                self.status = self.healthy;
                Ok(())
            }
            _ => Err(ApError::Start),
        }
    }
}

/// Delay that only records how long it was asked to wait.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub calls: usize,
    pub total_ns: u64,
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
}
