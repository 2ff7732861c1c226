//! Unit tests for TOML configuration parsing.

use servo_motion::{parse_config, SystemConfig};

/// Test parsing a full axis tuning from TOML.
#[test]
fn test_parse_axis_tuning() {
    let toml_str = r#"
[axes.lift]
name = "Lift"
tolerance_counts = 8
slowdown_counts = 150
min_slow_power = 25
reset_speed = 100.0
min_speed = 40.0
max_speed = 350.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("lift").expect("Axis not found");

    assert_eq!(axis.name.as_str(), "Lift");
    assert_eq!(axis.tolerance.value(), 8);
    assert_eq!(axis.slowdown_threshold.value(), 150);
    assert_eq!(axis.min_slow_power.value(), 25);
    assert_eq!(axis.reset_speed.value(), 100.0);
    assert_eq!(axis.min_speed.value(), 40.0);
    assert_eq!(axis.max_speed.value(), 350.0);
}

/// Test that omitted fields fall back to the compiled-in defaults.
#[test]
fn test_axis_defaults_fill_in() {
    let toml_str = r#"
[axes.bare]
name = "Bare"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("bare").unwrap();

    assert_eq!(axis.tolerance.value(), 10);
    assert_eq!(axis.slowdown_threshold.value(), 200);
    assert_eq!(axis.min_slow_power.value(), 20);
    assert_eq!(axis.min_speed.value(), 50.0);
    assert_eq!(axis.max_speed.value(), 400.0);
}

/// Test parsing per-motor tuning inside a pair.
#[test]
fn test_parse_pair_tuning() {
    let toml_str = r#"
[pairs.drive]
name = "Drive"
tolerance_counts = 15
diff_tolerance_counts = 4
speed_balance = 25.0

[pairs.drive.motor1]
slowdown_counts = 450
min_slow_power = 26

[pairs.drive.motor2]
slowdown_counts = 550
min_slow_power = 31
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let pair = config.pair("drive").unwrap();

    assert_eq!(pair.tolerance.value(), 15);
    assert_eq!(pair.diff_tolerance.value(), 4);
    assert_eq!(pair.speed_balance.value(), 25.0);
    assert_eq!(pair.motor1.slowdown_threshold.value(), 450);
    assert_eq!(pair.motor2.slowdown_threshold.value(), 550);
    assert_eq!(pair.motor2.min_slow_power.value(), 31);
}

/// Test that power values beyond the duty-cycle ceiling are clamped.
#[test]
fn test_power_clamped_on_parse() {
    let toml_str = r#"
[axes.hot]
name = "Hot"
min_slow_power = 999
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let axis = config.axis("hot").unwrap();
    assert_eq!(axis.min_slow_power.value(), 255);
}

/// Test an empty configuration parses to empty maps.
#[test]
fn test_empty_config() {
    let config = parse_config("").expect("Empty config should parse");
    assert_eq!(config.axis_names().count(), 0);
    assert_eq!(config.pair_names().count(), 0);
    assert_eq!(config.rig_names().count(), 0);
}

/// Test malformed TOML is reported as a parse error.
#[test]
fn test_malformed_toml_rejected() {
    let result = parse_config("[axes.x\nname = ");
    assert!(result.is_err());
}
