mod common;

mod tests {
    use embassy_futures::block_on;
    use myrtio_strip_core::{
        Rgb,
        color::{BLACK, BLUE, GREEN, RED},
        monitor::{ApStatus, MonitorConfig, MonitorState, ResilienceMonitor, StatusIndicator},
    };

    use crate::common::{CountingDelay, ScriptedAp};

    const ADDRESS: [u8; 4] = [192, 168, 4, 1];

    const CONFIG: MonitorConfig = MonitorConfig {
        expected_address: ADDRESS,
        max_stations: 4,
        interval_ticks: 3,
        degraded_interval_ticks: 6,
        restart_attempts: 3,
        restart_delay_ms: 500,
    };

    const HEALTHY: ApStatus = ApStatus {
        address: Some(ADDRESS),
        stations: 1,
    };

    fn ap(status: ApStatus, heal_after: Option<usize>) -> ScriptedAp {
        ScriptedAp {
            status,
            healthy: HEALTHY,
            heal_after,
            restarts: 0,
        }
    }

    #[test]
    fn test_tick_schedules_checks() {
        let mut monitor = ResilienceMonitor::new(CONFIG);
        let due: Vec<bool> = (0..7).map(|_| monitor.tick()).collect();
        assert_eq!(due, [false, false, true, false, false, true, false]);
    }

    #[test]
    fn test_degraded_monitor_checks_less_often() {
        let mut monitor = ResilienceMonitor::new(CONFIG);
        let mut ap = ap(ApStatus { address: None, stations: 0 }, None);
        let mut delay = CountingDelay::default();

        let due_ticks = (0..3).filter(|_| monitor.tick()).count();
        assert_eq!(due_ticks, 1);
        assert_eq!(
            block_on(monitor.check(&mut ap, &mut delay)),
            MonitorState::Degraded
        );

        let due: Vec<bool> = (0..12).map(|_| monitor.tick()).collect();
        assert_eq!(due.iter().filter(|due| **due).count(), 2);
        assert!(due[5] && due[11]);
        assert!(!due[2]);

        ap.status = HEALTHY;
        assert_eq!(
            block_on(monitor.check(&mut ap, &mut delay)),
            MonitorState::Nominal
        );
        let due: Vec<bool> = (0..3).map(|_| monitor.tick()).collect();
        assert_eq!(due, [false, false, true]);
    }

    #[test]
    fn test_station_limit_is_healthy() {
        let mut monitor = ResilienceMonitor::new(CONFIG);
        let full = ApStatus {
            address: Some(ADDRESS),
            stations: CONFIG.max_stations,
        };
        let mut ap = ap(full, None);
        let mut delay = CountingDelay::default();

        assert_eq!(
            block_on(monitor.check(&mut ap, &mut delay)),
            MonitorState::Nominal
        );
        assert_eq!(ap.restarts, 0);
    }

    #[test]
    fn test_healthy_access_point_is_left_alone() {
        let mut monitor = ResilienceMonitor::new(CONFIG);
        let mut ap = ap(HEALTHY, None);
        let mut delay = CountingDelay::default();

        let state = block_on(monitor.check(&mut ap, &mut delay));

        assert_eq!(state, MonitorState::Nominal);
        assert_eq!(ap.restarts, 0);
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn test_address_mismatch_restarts_until_healthy() {
        let mut monitor = ResilienceMonitor::new(CONFIG);
        let lost = ApStatus {
            address: None,
            stations: 0,
        };
        let mut ap = ap(lost, Some(2));
        let mut delay = CountingDelay::default();

        let state = block_on(monitor.check(&mut ap, &mut delay));

        assert_eq!(state, MonitorState::Nominal);
        assert_eq!(ap.restarts, 2);
        assert_eq!(delay.calls, 2);
        assert_eq!(delay.total_ns, 2 * 500_000_000);
    }

    #[test]
    fn test_exhausted_retries_degrade_then_recover() {
        let mut monitor = ResilienceMonitor::new(CONFIG);
        let crowded = ApStatus {
            address: Some(ADDRESS),
            stations: 5,
        };
        let mut ap = ap(crowded, None);
        let mut delay = CountingDelay::default();

        let state = block_on(monitor.check(&mut ap, &mut delay));

        assert_eq!(state, MonitorState::Degraded);
        assert_eq!(monitor.state(), MonitorState::Degraded);
        assert_eq!(ap.restarts, 3);
        assert_eq!(delay.calls, 3);

        ap.status = HEALTHY;
        assert_eq!(
            block_on(monitor.check(&mut ap, &mut delay)),
            MonitorState::Nominal
        );
    }

    #[test]
    fn test_indicator_colours() {
        let mut indicator = StatusIndicator::new();

        assert_eq!(indicator.tick(0, MonitorState::Nominal, 255), BLUE);
        assert_eq!(indicator.tick(1, MonitorState::Nominal, 255), GREEN);
        assert_eq!(indicator.tick(0, MonitorState::Degraded, 255), RED);
        assert_eq!(
            indicator.tick(1, MonitorState::Nominal, 128),
            Rgb::new(0, 128, 0)
        );
    }

    #[test]
    fn test_indicator_blinks_with_many_stations() {
        let mut indicator = StatusIndicator::new();
        let frames: Vec<Rgb> = (0..128)
            .map(|_| indicator.tick(3, MonitorState::Nominal, 255))
            .collect();

        // Counter values 1..=31 are dark, 32..=63 lit, 64..=95 dark.
        assert_eq!(frames[0], BLACK);
        assert_eq!(frames[30], BLACK);
        assert_eq!(frames[31], GREEN);
        assert_eq!(frames[62], GREEN);
        assert_eq!(frames[63], BLACK);
        assert_eq!(frames[95], GREEN);
        assert_eq!(frames.iter().filter(|&&c| c == GREEN).count(), 64);
    }
}
