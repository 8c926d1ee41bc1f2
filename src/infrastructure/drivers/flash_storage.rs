//! Configuration record storage on the `strips` flash partition.

use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;
use myrtio_strip_core::storage::ConfigStore;

use crate::config;

pub type EspConfigStore = ConfigStore<FlashStorage<'static>>;

/// Open the configuration store.
///
/// The store is the only flash user, so it owns the driver outright.
pub fn open_config_store(flash: FLASH<'static>) -> EspConfigStore {
    ConfigStore::new(
        FlashStorage::new(flash),
        config::STORAGE.partition_offset,
        config::STORAGE.partition_size,
    )
}
