use core::sync::atomic::{AtomicBool, Ordering};

use esp_storage::FlashStorage;
use myrtio_strip_core::StripController;

use crate::{core::sync::InitMutex, infrastructure::drivers::EspStripOutputs};

pub(crate) type AppController = StripController<EspStripOutputs, FlashStorage<'static>>;

/// The single owner of strips, flags and the flash record.
pub(crate) static STRIP_CONTROLLER: InitMutex<AppController> = InitMutex::new();

/// Set while the resilience monitor has given up on the access point.
static NETWORK_DEGRADED: AtomicBool = AtomicBool::new(false);

pub(crate) fn network_degraded() -> bool {
    NETWORK_DEGRADED.load(Ordering::Relaxed)
}

pub(crate) fn set_network_degraded(degraded: bool) {
    NETWORK_DEGRADED.store(degraded, Ordering::Relaxed);
}
