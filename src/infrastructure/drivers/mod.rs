mod flash_storage;
mod led_ws2812;
mod random;
pub(crate) mod wifi_ap;

pub use flash_storage::{EspConfigStore, open_config_store};
pub use led_ws2812::{EspStripOutput, EspStripOutputs, StatusLed, init_led_outputs};
pub(crate) use random::get_phase_seed;
pub use wifi_ap::{EspAccessPoint, init_network_stack};
