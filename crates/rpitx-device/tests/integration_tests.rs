//! Integration tests for the expansion board device
//!
//! These tests drive a `Device` end to end against the simulated GPIO
//! backend:
//! - Switch initialization and NotInitialized handling
//! - Filter activation, idempotence and out-of-table paths
//! - Fail-closed LNA toggling
//! - Partial failures of a switch pair
//! - Save/load round trips through the configuration store

use rf_switch::{Level, PairError, SimulatedGpio, SwitchError, SwitchPinout};
use rpitx_device::{
    Amplifier, BoardModel, ConfigStore, Device, DeviceConfig, DeviceError, Filter, FilterSlot,
    SwitchRole,
};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub const FILTER_INPUT: [u8; 3] = SwitchPinout::FILTER_INPUT_PINS;
    pub const FILTER_OUTPUT: [u8; 3] = SwitchPinout::FILTER_OUTPUT_PINS;

    pub fn filter(model: &str, case_style: &str) -> Filter {
        Filter {
            model_number: model.to_string(),
            case_style: case_style.to_string(),
            description: format!("{} band-pass filter", model),
            filter_type: "Band Pass".to_string(),
            passband_f1: 14.0,
            passband_f2: 14.35,
            stopband_f3: 10.0,
            stopband_f4: 20.0,
        }
    }

    pub fn amplifier() -> Amplifier {
        Amplifier {
            model_number: "PSA4-5043+".to_string(),
            case_style: "DF782".to_string(),
            description: "Low Noise Amplifier".to_string(),
            f_low: 50.0,
            f_high: 4000.0,
            gain: 18.4,
        }
    }

    /// Device with filter switches ready on the board pinout
    pub fn ready_device(model: BoardModel, gpio: &SimulatedGpio) -> Device {
        let mut device = Device::new(model);
        device
            .init_filter_switches(gpio, &SwitchPinout::filter())
            .unwrap();
        device
    }

    /// LNA board with amplifier fitted and both switch pairs ready
    pub fn lna_device(gpio: &SimulatedGpio) -> Device {
        let mut device = Device::new(BoardModel::Sp3tLna);
        device.assign_amplifier(amplifier()).unwrap();
        device
            .init_filter_switches(gpio, &SwitchPinout::filter())
            .unwrap();
        device.init_lna(gpio, &SwitchPinout::lna()).unwrap();
        device
    }

    pub fn filter_writes(gpio: &SimulatedGpio) -> usize {
        FILTER_INPUT
            .iter()
            .chain(FILTER_OUTPUT.iter())
            .map(|&pin| gpio.write_count(pin))
            .sum()
    }

    /// Unique scratch directory for store tests
    pub fn scratch_store(name: &str) -> ConfigStore {
        let dir = std::env::temp_dir().join(format!(
            "rpitx-device-it-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        ConfigStore::new(dir)
    }
}

// ============================================================================
// Filter Activation Tests
// ============================================================================

mod filter_tests {
    use super::*;

    #[test]
    fn enable_filter_before_init_is_not_initialized() {
        let mut device = Device::new(BoardModel::Sp4t);

        assert_eq!(
            device.enable_filter(1),
            Err(DeviceError::NotInitialized(SwitchRole::Filter))
        );
    }

    #[test]
    fn four_filter_board_accepts_paths_one_to_four() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp4t, &gpio);

        for index in 1..=4 {
            assert_eq!(device.enable_filter(index), Ok(()));
            assert_eq!(device.active_filter(), Some(index));
        }

        let result = device.enable_filter(5);
        assert_eq!(
            result,
            Err(DeviceError::Activation(PairError::Both {
                input: SwitchError::UnknownPath(5),
                output: SwitchError::UnknownPath(5),
            }))
        );
        assert_eq!(device.active_filter(), Some(4));
    }

    #[test]
    fn input_and_output_switches_express_same_path() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp6t, &gpio);

        device.enable_filter(4).unwrap();

        let expected = vec![Some(Level::Low), Some(Level::High), Some(Level::High)];
        assert_eq!(gpio.levels(&helpers::FILTER_INPUT), expected);
        assert_eq!(gpio.levels(&helpers::FILTER_OUTPUT), expected);
    }

    #[test]
    fn reenabling_active_filter_writes_no_pins() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp3t, &gpio);

        device.enable_filter(2).unwrap();
        let after_first = helpers::filter_writes(&gpio);
        device.enable_filter(2).unwrap();

        assert_eq!(after_first, 6);
        assert_eq!(helpers::filter_writes(&gpio), after_first);
    }

    #[test]
    fn not_installed_slot_can_still_be_selected() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp3t, &gpio);
        device
            .assign_filter(1, helpers::filter("BPF-A", "HZ1198").into())
            .unwrap();

        assert!(!device.filters()[1].is_installed());
        assert_eq!(device.enable_filter(2), Ok(()));
    }

    #[test]
    fn installed_filters_skip_empty_slots() {
        let mut device = Device::new(BoardModel::Sp6t);
        device
            .assign_filter(2, helpers::filter("BPF-20M", "HZ1198").into())
            .unwrap();
        device
            .assign_filter(5, helpers::filter("BPF-2M", "FV1206").into())
            .unwrap();

        let menu: Vec<(u8, &str)> = device
            .installed_filters()
            .map(|(i, f)| (i, f.model_number.as_str()))
            .collect();

        assert_eq!(menu, vec![(2, "BPF-20M"), (5, "BPF-2M")]);
    }
}

// ============================================================================
// Failure Handling Tests
// ============================================================================

mod failure_tests {
    use super::*;

    #[test]
    fn degraded_hardware_fails_every_activation() {
        let gpio = SimulatedGpio::new();
        gpio.fail_allocation();
        let mut device = helpers::ready_device(BoardModel::Sp3t, &gpio);

        assert!(device.filter_switch().unwrap().is_degraded());
        for index in 1..=3 {
            assert_eq!(
                device.enable_filter(index),
                Err(DeviceError::Activation(PairError::Both {
                    input: SwitchError::Degraded,
                    output: SwitchError::Degraded,
                }))
            );
        }
        assert_eq!(gpio.total_writes(), 0);
    }

    #[test]
    fn one_side_failing_fails_activation_but_other_side_advances() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp4t, &gpio);
        device.enable_filter(1).unwrap();
        gpio.fail_writes_on(helpers::FILTER_INPUT[0]);

        let result = device.enable_filter(3);

        assert!(matches!(
            result,
            Err(DeviceError::Activation(PairError::Input(
                SwitchError::WriteFailure { path: 3, .. }
            )))
        ));
        let pair = device.filter_switch().unwrap();
        assert_eq!(pair.input().active_path(), Some(1));
        assert_eq!(pair.output().active_path(), Some(3));
        // Sides disagree, so no filter is reported active
        assert_eq!(device.active_filter(), None);
    }

    #[test]
    fn recovers_after_fault_clears() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp4t, &gpio);
        gpio.fail_writes_on(helpers::FILTER_OUTPUT[2]);

        assert!(device.enable_filter(2).is_err());
        gpio.clear_faults();

        assert_eq!(device.enable_filter(2), Ok(()));
        assert_eq!(device.active_filter(), Some(2));
    }
}

// ============================================================================
// LNA Tests
// ============================================================================

mod lna_tests {
    use super::*;

    #[test]
    fn toggle_before_init_is_not_initialized() {
        let mut device = Device::new(BoardModel::Sp6tLna);
        device.assign_amplifier(helpers::amplifier()).unwrap();

        assert_eq!(
            device.toggle_lna(),
            Err(DeviceError::NotInitialized(SwitchRole::Lna))
        );
    }

    #[test]
    fn toggle_alternates_state() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::lna_device(&gpio);
        assert!(!device.lna_active());

        assert_eq!(device.toggle_lna(), Ok(true));
        assert!(device.lna_active());
        assert_eq!(gpio.levels(&[23, 24]), vec![Some(Level::Low), Some(Level::High)]);

        assert_eq!(device.toggle_lna(), Ok(false));
        assert!(!device.lna_active());
        assert_eq!(gpio.levels(&[16, 26]), vec![Some(Level::Low), Some(Level::Low)]);
    }

    #[test]
    fn failed_enable_leaves_lna_off() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::lna_device(&gpio);
        gpio.fail_writes_on(24);

        assert!(device.toggle_lna().is_err());
        assert!(!device.lna_active());
    }

    #[test]
    fn failed_disable_also_leaves_lna_off() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::lna_device(&gpio);
        assert_eq!(device.toggle_lna(), Ok(true));

        gpio.fail_writes_on(16);
        assert!(device.toggle_lna().is_err());
        assert!(!device.lna_active());

        // Next toggle tries to enable again
        gpio.clear_faults();
        assert_eq!(device.toggle_lna(), Ok(true));
    }

    #[test]
    fn lna_and_filters_are_independent() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::lna_device(&gpio);

        device.enable_filter(3).unwrap();
        device.toggle_lna().unwrap();

        assert_eq!(device.active_filter(), Some(3));
        assert!(device.lna_active());
    }
}

// ============================================================================
// Persistence Tests
// ============================================================================

mod persistence_tests {
    use super::*;

    #[test]
    fn snapshot_round_trip_keeps_slots_and_drops_switches() {
        let gpio = SimulatedGpio::new();
        let mut device = helpers::ready_device(BoardModel::Sp3t, &gpio);
        device
            .assign_filter(1, helpers::filter("BPF-A", "HZ1198").into())
            .unwrap();
        device.assign_filter(2, FilterSlot::NotInstalled).unwrap();
        device
            .assign_filter(3, helpers::filter("BPF-C", "FV1206").into())
            .unwrap();
        device.enable_filter(1).unwrap();

        let json = serde_json::to_string(&device.snapshot()).unwrap();
        let config: DeviceConfig = serde_json::from_str(&json).unwrap();
        let restored = Device::from_config(config).unwrap();

        assert_eq!(restored.model(), BoardModel::Sp3t);
        assert_eq!(restored.filters(), device.filters());
        assert!(restored.filter_switch().is_none());
        assert!(restored.lna_switch().is_none());
    }

    #[test]
    fn store_round_trip_with_amplifier() {
        let store = helpers::scratch_store("amp");
        let mut device = Device::new(BoardModel::Sp4tLna);
        device.assign_amplifier(helpers::amplifier()).unwrap();
        device
            .assign_filter(4, helpers::filter("BPF-D", "HZ1198").into())
            .unwrap();

        store.save(&device.snapshot()).unwrap();
        let restored = Device::from_config(store.load(BoardModel::Sp4tLna).unwrap()).unwrap();

        assert_eq!(restored.snapshot(), device.snapshot());
        assert_eq!(store.saved_models().unwrap(), vec![BoardModel::Sp4tLna]);
        std::fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn restored_device_reinitializes_switches() {
        let store = helpers::scratch_store("reinit");
        let mut device = Device::new(BoardModel::Sp3tLna);
        device.assign_amplifier(helpers::amplifier()).unwrap();
        store.save(&device.snapshot()).unwrap();
        drop(device);

        let gpio = SimulatedGpio::new();
        let mut restored =
            Device::from_config(store.load(BoardModel::Sp3tLna).unwrap()).unwrap();
        restored
            .init_filter_switches(&gpio, &SwitchPinout::filter())
            .unwrap();
        restored.init_lna(&gpio, &SwitchPinout::lna()).unwrap();

        assert_eq!(restored.enable_filter(3), Ok(()));
        assert_eq!(restored.toggle_lna(), Ok(true));
        std::fs::remove_dir_all(store.dir()).unwrap();
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn board_model() -> impl Strategy<Value = BoardModel> {
        prop::sample::select(BoardModel::ALL.to_vec())
    }

    fn filter_slot() -> impl Strategy<Value = FilterSlot> {
        prop_oneof![
            Just(FilterSlot::NotInstalled),
            "[A-Z]{3}-[0-9]{2,4}\\+?".prop_map(|model| {
                FilterSlot::Installed(helpers::filter(&model, "HZ1198"))
            }),
        ]
    }

    proptest! {
        #[test]
        fn every_board_path_activates(model in board_model()) {
            let gpio = SimulatedGpio::new();
            let mut device = helpers::ready_device(model, &gpio);

            for index in 1..=model.filter_count() {
                prop_assert_eq!(device.enable_filter(index), Ok(()));
            }
            prop_assert!(device.enable_filter(model.filter_count() + 1).is_err());
            prop_assert_eq!(device.active_filter(), Some(model.filter_count()));
        }

        #[test]
        fn active_filter_tracks_last_request(
            requests in prop::collection::vec(1u8..=6, 1..15)
        ) {
            let gpio = SimulatedGpio::new();
            let mut device = helpers::ready_device(BoardModel::Sp6t, &gpio);

            for &index in &requests {
                device.enable_filter(index).unwrap();
            }

            prop_assert_eq!(device.active_filter(), requests.last().copied());
        }

        #[test]
        fn lna_state_matches_toggle_parity(toggles in 1usize..10) {
            let gpio = SimulatedGpio::new();
            let mut device = helpers::lna_device(&gpio);

            let mut last = false;
            for _ in 0..toggles {
                last = device.toggle_lna().unwrap();
            }

            prop_assert_eq!(last, toggles % 2 == 1);
            prop_assert_eq!(device.lna_active(), last);
        }

        #[test]
        fn snapshot_round_trip(
            model in board_model(),
            slots in prop::collection::vec(filter_slot(), 6)
        ) {
            let mut device = Device::new(model);
            for (index, slot) in (1..=model.filter_count()).zip(slots) {
                device.assign_filter(index, slot).unwrap();
            }

            let json = serde_json::to_string(&device.snapshot()).unwrap();
            let config: DeviceConfig = serde_json::from_str(&json).unwrap();
            let restored = Device::from_config(config).unwrap();

            prop_assert_eq!(restored.model(), model);
            prop_assert_eq!(restored.filters(), device.filters());
        }
    }
}
