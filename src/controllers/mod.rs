pub(crate) mod dependencies;
mod http;
mod push;

use myrtio_strip_core::scheduler::Scheduler;

use dependencies::{AppController, STRIP_CONTROLLER};

use crate::{
    config,
    infrastructure::drivers::{EspConfigStore, EspStripOutputs, get_phase_seed},
};

pub use http::StripHttpController;

/// Load the stored configuration and publish the controller.
pub async fn init_controllers(outputs: EspStripOutputs, store: EspConfigStore) {
    let scheduler = Scheduler::new(config::TICKS_PER_SECOND, get_phase_seed());
    let controller = AppController::boot(outputs, store, scheduler);
    STRIP_CONTROLLER.init(controller).await;
}
