//! Access point liveness monitor and status indicator.

use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

use crate::color::{BLACK, BLUE, GREEN, RED, Rgb, scale};

/// Snapshot of the access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApStatus {
    /// Bound IPv4 address, if the interface is up.
    pub address: Option<[u8; 4]>,
    /// Number of associated stations.
    pub stations: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApError {
    /// The radio rejected the configuration or failed to start.
    Start,
}

/// The access point as seen by the monitor.
#[allow(async_fn_in_trait)]
pub trait AccessPoint {
    fn status(&self) -> ApStatus;

    /// Re-run the access point startup sequence.
    async fn restart(&mut self) -> Result<(), ApError>;
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub expected_address: [u8; 4],
    pub max_stations: u8,
    /// Ticks between two checks.
    pub interval_ticks: u32,
    /// Ticks between two checks once restarts were exhausted.
    pub degraded_interval_ticks: u32,
    pub restart_attempts: u8,
    /// Delay after each restart before the status is read again.
    pub restart_delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Nominal,
    /// Restart attempts were exhausted; the process keeps running.
    Degraded,
}

pub struct ResilienceMonitor {
    config: MonitorConfig,
    ticks: u32,
    state: MonitorState,
}

impl ResilienceMonitor {
    pub const fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            ticks: 0,
            state: MonitorState::Nominal,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Count one tick. Returns `true` when a check is due.
    ///
    /// A degraded monitor waits `degraded_interval_ticks` between checks.
    pub fn tick(&mut self) -> bool {
        let interval = match self.state {
            MonitorState::Nominal => self.config.interval_ticks,
            MonitorState::Degraded => self.config.degraded_interval_ticks,
        };
        self.ticks += 1;
        if self.ticks >= interval {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    pub fn is_healthy(&self, status: &ApStatus) -> bool {
        status.address == Some(self.config.expected_address)
            && status.stations <= self.config.max_stations
    }

    /// Check the access point and restart it while unhealthy.
    pub async fn check<A: AccessPoint, D: DelayNs>(
        &mut self,
        ap: &mut A,
        delay: &mut D,
    ) -> MonitorState {
        let status = ap.status();
        if self.is_healthy(&status) {
            self.recover();
            return self.state;
        }

        warn!(
            "monitor: access point unhealthy (address {:?}, {} stations)",
            status.address, status.stations
        );
        for attempt in 1..=self.config.restart_attempts {
            match ap.restart().await {
                Ok(()) => debug!("monitor: restart attempt {} done", attempt),
                Err(e) => warn!("monitor: restart attempt {} failed: {:?}", attempt, e),
            }
            delay.delay_ms(self.config.restart_delay_ms).await;
            if self.is_healthy(&ap.status()) {
                self.recover();
                return self.state;
            }
        }

        if self.state != MonitorState::Degraded {
            warn!(
                "monitor: {} restart attempts exhausted, running degraded",
                self.config.restart_attempts
            );
        }
        self.state = MonitorState::Degraded;
        self.state
    }

    fn recover(&mut self) {
        if self.state == MonitorState::Degraded {
            info!("monitor: access point recovered");
        }
        self.state = MonitorState::Nominal;
    }
}

/// Colour of the one-pixel status LED.
///
/// Blue with no stations, green with one, blinking green with several and
/// red while degraded.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    counter: u8,
}

impl StatusIndicator {
    /// Bit of the tick counter selecting the blink phase (64 tick period).
    const BLINK_BIT: u8 = 1 << 5;

    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Advance the blink counter and compute the colour.
    pub fn tick(&mut self, stations: u8, state: MonitorState, brightness: u8) -> Rgb {
        self.counter = self.counter.wrapping_add(1);
        let color = match (state, stations) {
            (MonitorState::Degraded, _) => RED,
            (_, 0) => BLUE,
            (_, 1) => GREEN,
            _ if self.counter & Self::BLINK_BIT != 0 => GREEN,
            _ => BLACK,
        };
        scale(color, brightness)
    }
}
