mod common;

mod tests {
    use myrtio_strip_core::push::{PixelTarget, PushMessage, PushOutcome};

    use crate::common::{RamFlash, TestController, boot};

    fn two_strips() -> TestController {
        let mut controller = boot(RamFlash::new());
        controller.add_strip(4, 5).unwrap();
        controller
    }

    #[test]
    fn test_parse_messages() {
        let message = PushMessage::parse(br#"{"led":3,"state":false,"strip":1}"#).unwrap();
        let pixel = message.pixel().unwrap();
        assert_eq!(pixel.target, PixelTarget::Strip(1));
        assert_eq!(pixel.index, 3);
        assert!(!pixel.active);

        let message = PushMessage::parse(br#"{"led":3,"state":true}"#).unwrap();
        assert_eq!(message.pixel().unwrap().target, PixelTarget::Broadcast);

        assert!(PushMessage::parse(br#"{"led":3}"#).is_none());
        assert!(PushMessage::parse(br#"{"state":true}"#).is_none());
        assert!(PushMessage::parse(br#"{"strip":0,"manual":true}"#).is_none());
        assert!(PushMessage::parse(br#"{"led":-1,"state":true}"#).is_none());
        assert!(PushMessage::parse(b"{\"manual\":").is_none());
        assert!(PushMessage::parse(&[0xFF, 0xFE]).is_none());
    }

    #[test]
    fn test_manual_flag() {
        let mut controller = two_strips();

        assert_eq!(controller.handle_push(br#"{"manual":true}"#), PushOutcome::Applied);
        assert!(controller.flags().manual_mode);
        assert_eq!(controller.handle_push(br#"{"manual":false}"#), PushOutcome::Applied);
        assert!(!controller.flags().manual_mode);
    }

    #[test]
    fn test_led_without_strip_broadcasts() {
        let mut controller = two_strips();

        let outcome = controller.handle_push(br#"{"led":10,"state":false}"#);

        assert_eq!(outcome, PushOutcome::Applied);
        let registry = &controller.config().registry;
        assert_eq!(registry.pixel_active(0, 10), Ok(false));
        // Strip 1 has only 5 pixels and is left alone.
        assert!(registry.get(1).unwrap().mask().iter().all(|&active| active));

        controller.handle_push(br#"{"led":2,"state":false}"#);
        let registry = &controller.config().registry;
        assert_eq!(registry.pixel_active(0, 2), Ok(false));
        assert_eq!(registry.pixel_active(1, 2), Ok(false));
    }

    #[test]
    fn test_led_with_strip_is_addressed() {
        let mut controller = two_strips();

        controller.handle_push(br#"{"led":2,"state":false,"strip":1}"#);

        let registry = &controller.config().registry;
        assert_eq!(registry.pixel_active(0, 2), Ok(true));
        assert_eq!(registry.pixel_active(1, 2), Ok(false));
    }

    #[test]
    fn test_out_of_range_led_is_ignored() {
        let mut controller = two_strips();
        let writes = controller.store().flash().writes;

        assert_eq!(
            controller.handle_push(br#"{"led":40,"state":false}"#),
            PushOutcome::Ignored
        );
        assert_eq!(
            controller.handle_push(br#"{"led":1,"state":false,"strip":5}"#),
            PushOutcome::Ignored
        );
        assert_eq!(controller.store().flash().writes, writes);
    }

    #[test]
    fn test_brightness_applies_to_all_strips() {
        let mut controller = two_strips();

        controller.handle_push(br#"{"brightness":40}"#);

        assert!(
            controller
                .config()
                .registry
                .iter()
                .all(|strip| strip.brightness() == 40)
        );
    }

    #[test]
    fn test_malformed_message_changes_nothing() {
        let mut controller = two_strips();
        let writes = controller.store().flash().writes;

        for payload in [
            &b"garbage"[..],
            br#"{"led":1}"#,
            br#"{"brightness":300}"#,
            br#"{"manual":"yes"}"#,
        ] {
            assert_eq!(controller.handle_push(payload), PushOutcome::Ignored);
        }

        assert!(!controller.flags().manual_mode);
        assert_eq!(controller.store().flash().writes, writes);
        assert!(
            controller
                .config()
                .registry
                .iter()
                .all(|strip| strip.brightness() == 255)
        );
    }

    #[test]
    fn test_push_mutation_is_saved() {
        let mut controller = two_strips();
        let writes = controller.store().flash().writes;

        controller.handle_push(br#"{"manual":true,"brightness":9}"#);

        assert_eq!(controller.store().flash().writes, writes + 1);
    }
}
