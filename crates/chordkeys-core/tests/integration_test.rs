// Chordkeys Integration Tests
//
// These tests verify the configured pipeline without hardware:
// TOML -> Config -> LayerEngine -> Dispatcher -> device codes
//
// Run with: cargo test --test integration_test

use std::time::{Duration, Instant};

use chordkeys_core::{
    code_for_key, key_for_code, ActivationMode, Config, ConfigError, Dispatcher, EdgeCommand,
    HardwareEdge, KeyEvent, LogicalKey,
};

// =========================================================================
// Helpers
// =========================================================================

const SAMPLE_CONFIG: &str = r#"
[general]
trigger = "SPACE"
activation_window_ms = 250
combo_window_ms = 40
tick_rate_hz = 1000

[devices]
only = ["AT Translated Set 2 keyboard"]

[[layer]]
name = "nav"
secondary = ["N"]
mappings = { H = "LEFT", J = "DOWN", K = "UP", L = "RIGHT", SEMICOLON = "ENTER" }

[[layer]]
name = "symbols"
secondary = ["M"]
shift_lock = true
mappings = { "1" = "F1" }
"#;

/// Replay `(ms, code, value)` device events through a dispatcher ticking
/// every millisecond, returning the non-repeat device codes written
fn replay(config: &Config, events: &[(u64, u16, i32)], until_ms: u64) -> Vec<(u16, i32)> {
    let mut dispatcher = Dispatcher::new(config.build_engine().unwrap());
    let base = Instant::now();
    let mut written = Vec::new();

    for t in 0..=until_ms {
        let edges: Vec<HardwareEdge> = events
            .iter()
            .filter(|(at, _, _)| *at == t)
            .filter_map(|&(_, code, value)| {
                HardwareEdge::from_value(key_for_code(code)?, value)
            })
            .collect();
        for event in dispatcher.tick(&edges, base + Duration::from_millis(t)) {
            if event.command == EdgeCommand::Repeat {
                continue;
            }
            let code = code_for_key(event.key).unwrap();
            written.push((code, event.command.to_i32()));
        }
    }
    written
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn test_sample_config_parses() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();

    assert_eq!(config.trigger, LogicalKey::Space);
    assert_eq!(config.activation_window(), Duration::from_millis(250));
    assert_eq!(config.combo_window(), Duration::from_millis(40));
    assert_eq!(config.tick_rate_hz, 1000);
    assert_eq!(config.device_filter, vec!["AT Translated Set 2 keyboard"]);

    let names: Vec<_> = config.layers.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["nav", "symbols"]);

    let symbols = &config.layers[1];
    assert_eq!(symbols.get(LogicalKey::Num1), Some(LogicalKey::F1));
    assert_eq!(symbols.get(LogicalKey::Num2), Some(LogicalKey::At));
    assert_eq!(symbols.get(LogicalKey::Slash), Some(LogicalKey::Question));
}

#[test]
fn test_empty_config_uses_builtin_layers() {
    let config = Config::from_toml("").unwrap();
    let engine = config.build_engine().unwrap();
    assert_eq!(engine.layers().len(), 5);
    assert_eq!(engine.trigger(), LogicalKey::Space);
}

#[test]
fn test_invalid_configs_are_rejected() {
    let cases = [
        "[general]\nactivation_window_ms = 20",
        "[general]\nactivation_window_ms = 5000",
        "[general]\ncombo_window_ms = 300\nactivation_window_ms = 250",
        "[general]\ntick_rate_hz = 50",
        "[general]\ntrigger = \"NOT_A_KEY\"",
        "[general]\ndefault_layer = \"missing\"",
        "[general]\nunknown_option = 1",
        "[[layer]]\nname = \"a\"\nsecondary = [\"SPACE\"]",
        "[[layer]]\nname = \"a\"\nsecondary = [\"F\"]\n[[layer]]\nname = \"b\"\nsecondary = [\"F\"]",
        "[[layer]]\nname = \"a\"\n[[layer]]\nname = \"a\"",
    ];
    for case in cases {
        assert!(Config::from_toml(case).is_err(), "accepted: {}", case);
    }
}

#[test]
fn test_duplicate_secondary_names_both_layers() {
    let err = Config::from_toml(
        "[[layer]]\nname = \"a\"\nsecondary = [\"F\"]\n[[layer]]\nname = \"b\"\nsecondary = [\"F\"]",
    )
    .unwrap_err();
    match err {
        ConfigError::DuplicateSecondary { key, first, second } => {
            assert_eq!(key, LogicalKey::F);
            assert_eq!(first, "a");
            assert_eq!(second, "b");
        }
        other => panic!("unexpected error: {}", other),
    }
}

// =========================================================================
// Configured pipeline
// =========================================================================

// Kernel key codes used below
const KEY_SPACE: u16 = 57;
const KEY_N: u16 = 49;
const KEY_H: u16 = 35;
const KEY_SEMICOLON: u16 = 39;
const KEY_M: u16 = 50;
const KEY_2: u16 = 3;
const KEY_LEFTSHIFT: u16 = 42;
const KEY_LEFT: u16 = 105;
const KEY_KPENTER: u16 = 96;

#[test]
fn test_nav_layer_produces_arrow_codes() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    let written = replay(
        &config,
        &[
            (0, KEY_SPACE, 1),
            (40, KEY_SPACE, 0),
            (90, KEY_SPACE, 1),
            (90, KEY_N, 1),
            (120, KEY_H, 1),
            (150, KEY_H, 0),
            (200, KEY_SPACE, 0),
            (210, KEY_N, 0),
        ],
        500,
    );
    assert_eq!(written, vec![(KEY_LEFT, 1), (KEY_LEFT, 0)]);
}

#[test]
fn test_enter_is_written_as_keypad_enter() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    let written = replay(
        &config,
        &[
            (0, KEY_SPACE, 1),
            (40, KEY_SPACE, 0),
            (90, KEY_SPACE, 1),
            (90, KEY_N, 1),
            (120, KEY_SEMICOLON, 1),
            (150, KEY_SEMICOLON, 0),
            (200, KEY_SPACE, 0),
            (210, KEY_N, 0),
        ],
        500,
    );
    assert_eq!(written, vec![(KEY_KPENTER, 1), (KEY_KPENTER, 0)]);
}

#[test]
fn test_shift_lock_layer_writes_shift_bracket() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    let written = replay(
        &config,
        &[
            (0, KEY_SPACE, 1),
            (40, KEY_SPACE, 0),
            (90, KEY_SPACE, 1),
            (95, KEY_M, 1),
            (120, KEY_2, 1),
            (150, KEY_2, 0),
            (200, KEY_SPACE, 0),
            (210, KEY_M, 0),
        ],
        500,
    );
    assert_eq!(
        written,
        vec![(KEY_LEFTSHIFT, 1), (KEY_2, 1), (KEY_2, 0), (KEY_LEFTSHIFT, 0)]
    );
}

#[test]
fn test_chord_activation_from_config() {
    let toml = SAMPLE_CONFIG.replace(
        "trigger = \"SPACE\"",
        "trigger = \"SPACE\"\nactivation = \"chord\"",
    );
    let config = Config::from_toml(&toml).unwrap();
    assert_eq!(config.activation, ActivationMode::Chord);

    let written = replay(
        &config,
        &[
            (0, KEY_SPACE, 1),
            (10, KEY_N, 1),
            (30, KEY_H, 1),
            (50, KEY_H, 0),
            (80, KEY_SPACE, 0),
            (90, KEY_N, 0),
        ],
        300,
    );
    assert_eq!(
        written,
        vec![(KEY_SPACE, 1), (KEY_SPACE, 0), (KEY_LEFT, 1), (KEY_LEFT, 0)]
    );
}

#[test]
fn test_bare_double_tap_writes_one_space() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    let written = replay(
        &config,
        &[(0, KEY_SPACE, 1), (40, KEY_SPACE, 0), (90, KEY_SPACE, 1), (130, KEY_SPACE, 0)],
        600,
    );
    assert_eq!(written, vec![(KEY_SPACE, 1), (KEY_SPACE, 0)]);
}

#[test]
fn test_single_tap_writes_space_after_window() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    let written = replay(&config, &[(0, KEY_SPACE, 1), (30, KEY_SPACE, 0)], 400);
    assert_eq!(written, vec![(KEY_SPACE, 1), (KEY_SPACE, 0)]);
}

#[test]
fn test_kernel_autorepeat_is_ignored() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    // value 2 is the kernel's autorepeat; the dispatcher generates its own
    let written = replay(
        &config,
        &[(0, KEY_H, 1), (10, KEY_H, 2), (20, KEY_H, 2), (30, KEY_H, 0)],
        100,
    );
    assert_eq!(written, vec![(KEY_H, 1), (KEY_H, 0)]);
}

#[test]
fn test_release_all_after_interrupted_hold() {
    let config = Config::from_toml(SAMPLE_CONFIG).unwrap();
    let mut dispatcher = Dispatcher::new(config.build_engine().unwrap());
    let base = Instant::now();

    dispatcher.tick(&[HardwareEdge::new(LogicalKey::H, true)], base);
    dispatcher.tick(&[HardwareEdge::new(LogicalKey::J, true)], base + Duration::from_millis(1));

    let released = dispatcher.release_all();
    assert_eq!(released.len(), 2);
    assert!(released.contains(&KeyEvent::release(LogicalKey::H)));
    assert!(released.contains(&KeyEvent::release(LogicalKey::J)));
    assert!(dispatcher.output().registry().held().is_empty());
}
