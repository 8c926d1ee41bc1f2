//! Fixed-cadence animation and monitor loop.

use embassy_time::{Delay, Duration, Ticker};
use log::info;
use myrtio_strip_core::monitor::{MonitorState, ResilienceMonitor, StatusIndicator};

use super::dhcp_server::station_count;
use crate::{
    config,
    controllers::dependencies::{STRIP_CONTROLLER, set_network_degraded},
    infrastructure::drivers::{EspAccessPoint, StatusLed},
};

/// Render every strip once per tick and run the access point check when due.
///
/// The check and its restart delays run outside the controller lock.
#[embassy_executor::task]
pub async fn tick_task(mut access_point: EspAccessPoint, mut status_led: StatusLed) {
    let mut ticker = Ticker::every(Duration::from_millis(config::SCHEDULER.tick_interval_ms));
    let mut monitor = ResilienceMonitor::new(config::MONITOR);
    let mut indicator = StatusIndicator::new();
    let mut delay = Delay;

    info!(
        "tick: running at {} ticks per second",
        config::TICKS_PER_SECOND
    );
    loop {
        let status_brightness = STRIP_CONTROLLER
            .with(|controller| {
                controller.tick();
                controller.flags().status_led_brightness
            })
            .await;

        if monitor.tick() {
            let state = monitor.check(&mut access_point, &mut delay).await;
            set_network_degraded(state == MonitorState::Degraded);
        }

        if let Some(brightness) = status_brightness {
            status_led.set(indicator.tick(station_count(), monitor.state(), brightness));
        }

        ticker.next().await;
    }
}
