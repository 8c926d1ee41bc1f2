#![allow(clippy::unreadable_literal)]

use myrtio_strip_core::monitor::MonitorConfig;

pub(crate) struct AccessPointConfig {
    pub ssid: &'static str,
    pub password: &'static str,
    pub address: [u8; 4],
    pub prefix_len: u8,
    pub max_stations: u8,
}

pub(crate) struct StorageConfig {
    /// Offset of the `strips` data partition (see partitions.csv).
    pub partition_offset: u32,
    pub partition_size: usize,
}

pub(crate) struct SchedulerConfig {
    pub tick_interval_ms: u64,
}

pub(crate) struct HttpConfig {
    pub port: u16,
    pub socket_timeout_secs: u64,
    pub push_keep_alive_secs: u64,
}

pub(crate) const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub(crate) const ACCESS_POINT: AccessPointConfig = AccessPointConfig {
    ssid: match option_env!("STRIPS_AP_SSID") {
        Some(ssid) => ssid,
        None => "MyrtIO Strips",
    },
    password: match option_env!("STRIPS_AP_PASSWORD") {
        Some(password) => password,
        None => "",
    },
    address: [192, 168, 4, 1],
    prefix_len: 24,
    max_stations: 4,
};

/// One lease per station the access point admits.
pub(crate) const MAX_LEASES: usize = ACCESS_POINT.max_stations as usize;

pub(crate) const STORAGE: StorageConfig = StorageConfig {
    partition_offset: 0x31_0000,
    partition_size: 0x6000,
};

pub(crate) const SCHEDULER: SchedulerConfig = SchedulerConfig {
    tick_interval_ms: 20,
};

pub(crate) const HTTP: HttpConfig = HttpConfig {
    port: 80,
    socket_timeout_secs: 30,
    push_keep_alive_secs: 10,
};

/// Animation ticks per second.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const TICKS_PER_SECOND: u16 = (1000 / SCHEDULER.tick_interval_ms) as u16;

/// Check the access point every five seconds, retry three times, then
/// once a minute while degraded.
pub(crate) const MONITOR: MonitorConfig = MonitorConfig {
    expected_address: ACCESS_POINT.address,
    max_stations: ACCESS_POINT.max_stations,
    interval_ticks: 5 * TICKS_PER_SECOND as u32,
    degraded_interval_ticks: 60 * TICKS_PER_SECOND as u32,
    restart_attempts: 3,
    restart_delay_ms: 2000,
};

/// GPIOs a strip may be bound to.
///
/// Strapping, flash and input-only pins are excluded, as is the status LED.
pub(crate) const LED_OUTPUT_PINS: [u8; 17] = [
    2, 4, 5, 12, 13, 14, 15, 16, 17, 18, 19, 21, 22, 23, 25, 26, 32,
];

#[macro_export]
macro_rules! status_led_gpio {
    ($p:expr) => {
        $p.GPIO27
    };
}
