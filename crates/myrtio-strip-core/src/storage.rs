//! Single-record configuration store on a NOR flash region.
//!
//! Record layout:
//!
//! ```text
//! [magic: u16 LE][length: u32 LE][JSON body: length bytes]
//! ```
//!
//! An erased or foreign magic means no record is stored. Writes erase the
//! sectors they cover and are not atomic: a torn write is detected as a parse
//! failure on the next load.

use alloc::vec;

use embedded_storage::nor_flash::NorFlash;
use log::debug;
use serde::{Serialize, de::DeserializeOwned};

use crate::{error::StorageError, limits::MAX_RECORD_SIZE};

pub const RECORD_MAGIC: u16 = 0x5354;
const MAGIC_SIZE: usize = RECORD_MAGIC.to_le_bytes().len();
const HEADER_SIZE: usize = MAGIC_SIZE + 4;

const fn align_up(value: usize, align: usize) -> usize {
    if align <= 1 {
        value
    } else {
        value.div_ceil(align) * align
    }
}

pub struct ConfigStore<S: NorFlash> {
    flash: S,
    offset: u32,
    capacity: usize,
}

impl<S: NorFlash> ConfigStore<S> {
    /// Create a store using `capacity` bytes of `flash` starting at `offset`.
    ///
    /// `offset` must be sector aligned.
    pub fn new(flash: S, offset: u32, capacity: usize) -> Self {
        Self {
            flash,
            offset,
            capacity,
        }
    }

    /// Serialize `value` and overwrite the stored record.
    ///
    /// Returns the body length.
    #[allow(clippy::cast_possible_truncation)]
    pub fn save<T: Serialize>(&mut self, value: &T) -> Result<usize, StorageError> {
        let limit = self.capacity.min(HEADER_SIZE + MAX_RECORD_SIZE);
        if limit <= HEADER_SIZE {
            return Err(StorageError::Overflow);
        }
        let mut buf = vec![0xFF_u8; limit];
        let length = serde_json_core::to_slice(value, &mut buf[HEADER_SIZE..])
            .map_err(|_| StorageError::Overflow)?;
        buf[..MAGIC_SIZE].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        buf[MAGIC_SIZE..HEADER_SIZE].copy_from_slice(&(length as u32).to_le_bytes());

        let written = align_up(HEADER_SIZE + length, S::WRITE_SIZE);
        let erased = align_up(written, S::ERASE_SIZE);
        if erased > self.capacity || written > buf.len() {
            return Err(StorageError::Overflow);
        }

        self.flash
            .erase(self.offset, self.offset + erased as u32)
            .map_err(|_| StorageError::Driver)?;
        self.flash
            .write(self.offset, &buf[..written])
            .map_err(|_| StorageError::Driver)?;
        debug!("persistence: wrote {} byte record", length);
        Ok(length)
    }

    /// Read and deserialize the stored record.
    pub fn load<T: DeserializeOwned>(&mut self) -> Result<T, StorageError> {
        let mut header = vec![0u8; align_up(HEADER_SIZE, S::READ_SIZE)];
        self.flash
            .read(self.offset, &mut header)
            .map_err(|_| StorageError::Driver)?;

        let magic = u16::from_le_bytes([header[0], header[1]]);
        if magic != RECORD_MAGIC {
            return Err(StorageError::NotFound);
        }
        let length = u32::from_le_bytes([header[2], header[3], header[4], header[5]]) as usize;
        if length == 0 || length > MAX_RECORD_SIZE || HEADER_SIZE + length > self.capacity {
            return Err(StorageError::Parse);
        }

        let mut buf = vec![0u8; align_up(HEADER_SIZE + length, S::READ_SIZE)];
        self.flash
            .read(self.offset, &mut buf)
            .map_err(|_| StorageError::Driver)?;
        let body = &buf[HEADER_SIZE..HEADER_SIZE + length];
        serde_json_core::from_slice::<T>(body)
            .map(|(value, _)| value)
            .map_err(|_| StorageError::Parse)
    }

    /// Erase the record so the next load reports [`StorageError::NotFound`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn erase(&mut self) -> Result<(), StorageError> {
        let erased = align_up(HEADER_SIZE, S::ERASE_SIZE).min(self.capacity);
        self.flash
            .erase(self.offset, self.offset + erased as u32)
            .map_err(|_| StorageError::Driver)
    }

    pub fn flash(&self) -> &S {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut S {
        &mut self.flash
    }
}
