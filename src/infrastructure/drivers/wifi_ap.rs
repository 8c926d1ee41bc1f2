use embassy_net::{Ipv4Address, Ipv4Cidr, Runner, Stack, StackResources, StaticConfigV4};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use esp_hal::peripherals::WIFI;
use esp_radio::wifi::{
    AccessPointConfig,
    AuthMethod,
    Config,
    ModeConfig,
    WifiController,
    WifiDevice,
    WifiError,
};
use log::info;
use myrtio_strip_core::monitor::{AccessPoint, ApError, ApStatus};
use static_cell::make_static;

use super::random::get_seed;
use crate::{config, infrastructure::tasks::dhcp_server::station_count};

const MAX_CONNECTIONS: usize = 8;

/// Set by the monitor, consumed by the access point task.
pub(crate) static RESTART_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();
/// Outcome of the last requested restart.
pub(crate) static RESTART_RESULT: Signal<CriticalSectionRawMutex, Result<(), ApError>> =
    Signal::new();

pub(crate) fn ap_address() -> Ipv4Address {
    let [a, b, c, d] = config::ACCESS_POINT.address;
    Ipv4Address::new(a, b, c, d)
}

/// Initialize the radio and a network stack bound to the AP interface.
///
/// Uses the static address from [`config::ACCESS_POINT`].
pub fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*make_static!(esp_radio::init().expect("wifi: radio init failed"));
    let (controller, interfaces) = esp_radio::wifi::new(esp_radio_ctrl, wifi_device, Config::default())
        .expect("wifi: controller init failed");

    let static_config = StaticConfigV4 {
        address: Ipv4Cidr::new(ap_address(), config::ACCESS_POINT.prefix_len),
        gateway: None,
        dns_servers: heapless::Vec::default(),
    };
    let net_config = embassy_net::Config::ipv4_static(static_config);

    let network_resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
    let (stack, runner) =
        embassy_net::new(interfaces.ap, net_config, network_resources, get_seed());

    (stack, runner, controller)
}

/// Configure the controller in AP mode and start the radio.
///
/// An empty password opens the network.
pub(crate) async fn start_access_point(
    controller: &mut WifiController<'static>,
) -> Result<(), WifiError> {
    let ap = &config::ACCESS_POINT;
    let ap_config = if ap.password.is_empty() {
        AccessPointConfig::default()
            .with_ssid(ap.ssid.into())
            .with_auth_method(AuthMethod::None)
            .with_max_connections(u16::from(ap.max_stations))
    } else {
        AccessPointConfig::default()
            .with_ssid(ap.ssid.into())
            .with_password(ap.password.into())
            .with_auth_method(AuthMethod::Wpa2Personal)
            .with_max_connections(u16::from(ap.max_stations))
    };

    controller.set_config(&ModeConfig::AccessPoint(ap_config))?;
    controller.start_async().await?;
    info!("wifi: access point '{}' started", ap.ssid);
    Ok(())
}

/// The access point as seen by the resilience monitor.
pub struct EspAccessPoint {
    stack: Stack<'static>,
}

impl EspAccessPoint {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl AccessPoint for EspAccessPoint {
    fn status(&self) -> ApStatus {
        let address = self
            .stack
            .is_link_up()
            .then(|| self.stack.config_v4())
            .flatten()
            .map(|config| config.address.address().octets());
        ApStatus {
            address,
            stations: station_count(),
        }
    }

    async fn restart(&mut self) -> Result<(), ApError> {
        RESTART_RESULT.reset();
        RESTART_REQUEST.signal(());
        RESTART_RESULT.wait().await
    }
}
