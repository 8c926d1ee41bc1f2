mod common;

mod tests {
    use myrtio_strip_core::{
        GlobalConfig, Rgb, StripMode,
        color::{BLACK, BLUE, GREEN, RED, hue_to_rgb, scale_channel, sweep_color},
        scheduler::Scheduler,
    };

    use crate::common::FakeFactory;

    fn circular_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).abs();
        d.min(1.0 - d)
    }

    fn config_with_strip(pixels: usize) -> GlobalConfig<FakeFactory> {
        let mut config = GlobalConfig::new(FakeFactory::new());
        config.registry.add(2, pixels).unwrap();
        config
    }

    #[test]
    fn test_hue_wheel() {
        assert_eq!(hue_to_rgb(0), RED);
        assert_eq!(hue_to_rgb(21_845), GREEN);
        assert_eq!(hue_to_rgb(43_690), BLUE);
        assert_eq!(hue_to_rgb(u16::MAX), RED);
        assert_eq!(hue_to_rgb(10_923), Rgb::new(255, 255, 0));
    }

    #[test]
    fn test_brightness_scaling_truncates() {
        assert_eq!(scale_channel(200, 128), 100);
        assert_eq!(scale_channel(255, 255), 255);
        assert_eq!(scale_channel(255, 0), 0);
        assert_eq!(sweep_color(0.0, 128), Rgb::new(128, 0, 0));
    }

    #[test]
    fn test_phase_wraps_around() {
        let mut config = config_with_strip(4);
        config.registry.get_mut(0).unwrap().set_speed(0.01);
        let mut scheduler = Scheduler::new(50, 1);

        for _ in 0..100 {
            scheduler.tick(&mut config);
        }
        let phase = config.registry.get(0).unwrap().phase();
        assert!(circular_distance(phase, 0.0) < 1e-3, "phase {phase}");

        for _ in 0..50 {
            scheduler.tick(&mut config);
        }
        let phase = config.registry.get(0).unwrap().phase();
        assert!(circular_distance(phase, 0.5) < 1e-3, "phase {phase}");
        assert!((0.0..1.0).contains(&phase));
    }

    #[test]
    fn test_mask_and_brightness_are_applied() {
        let mut config = config_with_strip(4);
        let strip = config.registry.get_mut(0).unwrap();
        strip.set_mode(StripMode::Manual);
        strip.set_brightness(128);
        strip.set_active(1, false).unwrap();

        Scheduler::new(50, 1).tick(&mut config);

        let red = Rgb::new(128, 0, 0);
        assert_eq!(
            config.registry.get(0).unwrap().frame(),
            &[red, BLACK, red, red]
        );
    }

    #[test]
    fn test_frozen_strip_keeps_phase_and_colour() {
        let mut config = config_with_strip(3);
        let strip = config.registry.get_mut(0).unwrap();
        strip.set_mode(StripMode::Manual);
        strip.set_phase(0.25);
        let mut scheduler = Scheduler::new(50, 1);

        scheduler.tick(&mut config);
        let first = config.registry.get(0).unwrap().frame().to_vec();
        for _ in 0..10 {
            scheduler.tick(&mut config);
        }

        let strip = config.registry.get(0).unwrap();
        assert!((strip.phase() - 0.25).abs() < f32::EPSILON);
        assert_eq!(strip.frame(), first.as_slice());
        assert_eq!(strip.output().frames.len(), 12);
    }

    #[test]
    fn test_global_manual_freezes_every_strip() {
        let mut config = config_with_strip(3);
        config.registry.add(4, 3).unwrap();
        config.flags.manual_mode = true;
        let mut scheduler = Scheduler::new(50, 1);

        for _ in 0..5 {
            scheduler.tick(&mut config);
        }
        assert!(config.registry.iter().all(|strip| strip.phase() == 0.0));

        config.flags.manual_mode = false;
        scheduler.tick(&mut config);
        assert!(config.registry.iter().all(|strip| strip.phase() > 0.0));
    }

    #[test]
    fn test_one_frame_per_strip_in_order() {
        let mut config = config_with_strip(3);
        config.registry.add(7, 5).unwrap();
        config.registry.add(9, 1).unwrap();
        let journal = config.registry.factory().journal.clone();
        journal.borrow_mut().clear();

        let mut scheduler = Scheduler::new(50, 1);
        scheduler.tick(&mut config);
        scheduler.tick(&mut config);

        assert_eq!(journal.borrow().as_slice(), &[2, 7, 9, 2, 7, 9]);
        assert_eq!(scheduler.ticks(), 2);
    }

    #[test]
    fn test_randomize_reseeds_running_strips() {
        let mut config = config_with_strip(3);
        config.registry.add(4, 3).unwrap();
        config.registry.get_mut(0).unwrap().set_speed(0.0);
        config.registry.get_mut(1).unwrap().set_mode(StripMode::Manual);
        config.flags.randomize = true;
        config.flags.randomize_interval = 1;
        let mut scheduler = Scheduler::new(2, 1);

        scheduler.tick(&mut config);
        assert_eq!(config.registry.get(0).unwrap().phase(), 0.0);

        scheduler.tick(&mut config);
        let phase = config.registry.get(0).unwrap().phase();
        assert!(phase > 0.0 && phase < 1.0);
        assert_eq!(config.registry.get(1).unwrap().phase(), 0.0);
    }
}
