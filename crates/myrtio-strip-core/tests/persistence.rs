mod common;

mod tests {
    use myrtio_strip_core::{
        StorageError, StripMode,
        limits::{DEFAULT_PIN, DEFAULT_PIXEL_COUNT, DEFAULT_SPEED},
        record::ConfigRecord,
        request::Options,
        storage::ConfigStore,
    };

    use crate::common::{
        BlockReadFlash, PARTITION_OFFSET, PARTITION_SIZE, RamFlash, boot, boot_with_record,
        flash_with_record, reboot, store,
    };

    #[test]
    fn test_save_then_load_reproduces_state() {
        let mut controller = boot(RamFlash::new());
        controller.add_strip(4, 12).unwrap();
        controller.set_brightness(1, 128).unwrap();
        controller.set_speed(1, 0.01).unwrap();
        controller.set_mode(1, StripMode::Manual).unwrap();
        controller.set_pixel_active(1, 3, false).unwrap();
        controller.set_pixel_active(0, 29, false).unwrap();
        controller.define_group(1, "2-4,7").unwrap();
        controller.set_manual(true);

        let restored = reboot(controller);
        let config = restored.config();

        assert_eq!(config.registry.len(), 2);
        assert!(config.flags.manual_mode);
        let strip = config.registry.get(1).unwrap();
        assert_eq!(strip.pin(), 4);
        assert_eq!(strip.pixel_count(), 12);
        assert_eq!(strip.brightness(), 128);
        assert!((strip.speed() - 0.01).abs() < 1e-6);
        assert_eq!(strip.mode(), StripMode::Manual);
        assert_eq!(strip.is_active(3), Ok(false));
        assert_eq!(strip.mask().iter().filter(|&&active| !active).count(), 1);
        assert_eq!(strip.groups().len(), 1);
        assert_eq!(strip.groups()[0].as_slice(), &[2, 3, 4, 7]);
        assert_eq!(config.registry.get(0).unwrap().is_active(29), Ok(false));
    }

    #[test]
    fn test_flags_survive_reboot() {
        let mut controller = boot(RamFlash::new());
        controller.set_options(Options {
            randomize: Some(true),
            randomize_interval: Some(90),
            status_led_brightness: Some(7),
            selected_mode: Some(StripMode::Manual),
        });

        let flags = reboot(controller).flags();
        assert!(flags.randomize);
        assert_eq!(flags.randomize_interval, 90);
        assert_eq!(flags.status_led_brightness, 7);
        assert_eq!(flags.selected_mode, StripMode::Manual);
    }

    #[test]
    fn test_erased_flash_is_not_found() {
        let mut store = store(RamFlash::new());
        assert_eq!(store.load::<ConfigRecord>(), Err(StorageError::NotFound));
    }

    #[test]
    fn test_corrupted_record_is_parse_error() {
        let mut store = store(flash_with_record(r#"{"strips":[{"pin":2,"#));
        assert_eq!(store.load::<ConfigRecord>(), Err(StorageError::Parse));
    }

    #[test]
    fn test_oversized_length_is_parse_error() {
        let mut flash = flash_with_record("{}");
        let start = PARTITION_OFFSET as usize;
        flash.data[start + 2..start + 6].copy_from_slice(&(PARTITION_SIZE as u32).to_le_bytes());
        let mut store = ConfigStore::new(flash, PARTITION_OFFSET, PARTITION_SIZE);
        assert_eq!(store.load::<ConfigRecord>(), Err(StorageError::Parse));
    }

    #[test]
    fn test_erase_removes_record() {
        let mut store = store(RamFlash::new());
        store.save(&ConfigRecord::default()).unwrap();
        assert!(store.load::<ConfigRecord>().is_ok());

        store.erase().unwrap();
        assert_eq!(store.load::<ConfigRecord>(), Err(StorageError::NotFound));
    }

    #[test]
    fn test_load_with_wide_read_blocks() {
        let flash = BlockReadFlash(RamFlash::new());
        let mut store = ConfigStore::new(flash, PARTITION_OFFSET, PARTITION_SIZE);
        let mut record = ConfigRecord::default();
        record.manual_mode = true;
        store.save(&record).unwrap();

        assert_eq!(store.load::<ConfigRecord>(), Ok(record));
        store.erase().unwrap();
        assert_eq!(store.load::<ConfigRecord>(), Err(StorageError::NotFound));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let controller = boot_with_record(r#"{"strips":[{"pin":5,"ledCount":8}]}"#);
        let config = controller.config();

        let strip = config.registry.get(0).unwrap();
        assert_eq!(strip.pin(), 5);
        assert_eq!(strip.pixel_count(), 8);
        assert_eq!(strip.brightness(), 255);
        assert!((strip.speed() - DEFAULT_SPEED).abs() < 1e-6);
        assert_eq!(strip.mode(), StripMode::Cycle);
        assert!(strip.mask().iter().all(|&active| active));
        assert!(!config.flags.manual_mode);
        assert_eq!(config.flags.randomize_interval, 30);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let controller = boot_with_record(
            r#"{"version":3,"strips":[{"pin":5,"ledCount":8,"color":"red"}],"manualMode":true}"#,
        );
        let config = controller.config();
        assert_eq!(config.registry.len(), 1);
        assert!(config.flags.manual_mode);
    }

    #[test]
    fn test_led_states_are_padded_and_truncated() {
        let controller = boot_with_record(
            r#"{"strips":[
                {"pin":1,"ledCount":4,"ledStates":[false]},
                {"pin":2,"ledCount":2,"ledStates":[true,false,false,false]}
            ]}"#,
        );
        let registry = &controller.config().registry;

        assert_eq!(registry.get(0).unwrap().mask(), &[false, true, true, true]);
        assert_eq!(registry.get(1).unwrap().mask(), &[true, false]);
    }

    #[test]
    fn test_loaded_values_are_normalized() {
        let controller = boot_with_record(
            r#"{"strips":[{"pin":1,"ledCount":10,"speed":5.0,"phase":2.25,"groups":[[1,20,3]]}]}"#,
        );
        let strip = controller.config().registry.get(0).unwrap();

        assert!((strip.speed() - 0.1).abs() < 1e-6);
        assert!((strip.phase() - 0.25).abs() < 1e-6);
        assert_eq!(strip.groups()[0].as_slice(), &[1, 3]);
    }

    #[test]
    fn test_invalid_strips_are_skipped() {
        let controller = boot_with_record(
            r#"{"strips":[{"pin":1,"ledCount":0},{"pin":2,"ledCount":301},{"pin":3,"ledCount":6}]}"#,
        );
        let registry = &controller.config().registry;
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().pin(), 3);
    }

    #[test]
    fn test_empty_strip_list_is_kept() {
        let controller = boot_with_record(r#"{"strips":[],"manualMode":true}"#);
        assert_eq!(controller.config().registry.len(), 0);
        assert!(controller.flags().manual_mode);
    }

    #[test]
    fn test_removing_every_strip_survives_reboot() {
        let mut controller = boot(RamFlash::new());
        controller.remove_strip(0).unwrap();
        assert_eq!(controller.config().registry.len(), 0);

        let mut restored = reboot(controller);
        assert_eq!(restored.config().registry.len(), 0);

        restored.tick();
        assert_eq!(restored.add_strip(4, 5), Ok(0));
    }

    #[test]
    fn test_unusable_strips_fall_back_to_default_strip() {
        let controller = boot_with_record(r#"{"strips":[{"pin":1,"ledCount":0}]}"#);
        let registry = &controller.config().registry;
        let strip = registry.get(0).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(strip.pin(), DEFAULT_PIN);
        assert_eq!(strip.pixel_count(), usize::from(DEFAULT_PIXEL_COUNT));
    }

    #[test]
    fn test_malformed_record_boots_defaults() {
        let controller = boot_with_record("not json");
        assert_eq!(controller.config().registry.len(), 1);
        assert!(!controller.storage_degraded());
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut controller = boot(RamFlash::failing());
        assert!(controller.storage_degraded());
        assert_eq!(controller.config().registry.len(), 1);

        assert_eq!(controller.toggle_pixel(0, 0), Ok(false));
        assert!(controller.storage_degraded());

        controller.store_mut().flash_mut().fail = false;
        controller.set_brightness(0, 10).unwrap();
        assert!(!controller.storage_degraded());
    }

    #[test]
    fn test_every_mutation_saves() {
        let mut controller = boot(RamFlash::new());
        let writes = controller.store().flash().writes;

        controller.toggle_pixel(0, 1).unwrap();
        controller.set_brightness(0, 3).unwrap();
        assert_eq!(controller.store().flash().writes, writes + 2);

        assert!(controller.toggle_pixel(0, 999).is_err());
        assert_eq!(controller.store().flash().writes, writes + 2);
    }
}
