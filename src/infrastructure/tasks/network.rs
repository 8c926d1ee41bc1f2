use embassy_net::Runner;
use esp_radio::wifi::{WifiController, WifiDevice};
use log::{info, warn};
use myrtio_strip_core::monitor::ApError;

use crate::infrastructure::{
    drivers::wifi_ap::{RESTART_REQUEST, RESTART_RESULT, start_access_point},
    tasks::dhcp_server::LEASE_RESET,
};

/// Background task owning the Wi-Fi controller
///
/// Starts the access point, then restarts it whenever the resilience monitor
/// asks for it.
#[embassy_executor::task]
pub async fn access_point_task(mut controller: WifiController<'static>) {
    if let Err(e) = start_access_point(&mut controller).await {
        warn!("wifi: failed to start access point: {:?}", e);
    }

    loop {
        RESTART_REQUEST.wait().await;
        info!("wifi: restarting access point");
        if let Err(e) = controller.stop_async().await {
            warn!("wifi: failed to stop access point: {:?}", e);
        }
        LEASE_RESET.signal(());
        let result = start_access_point(&mut controller).await.map_err(|e| {
            warn!("wifi: failed to start access point: {:?}", e);
            ApError::Start
        });
        RESTART_RESULT.signal(result);
    }
}

/// Background task for running the network stack
#[embassy_executor::task]
pub async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
