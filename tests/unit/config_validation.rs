//! Unit tests for configuration validation.

use servo_motion::error::{ConfigError, Error};
use servo_motion::{validate_config, SystemConfig};

fn parse(toml_str: &str) -> SystemConfig {
    toml::from_str(toml_str).expect("Failed to parse TOML")
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = parse(
        r#"
[axes.x]
name = "X"
tolerance_counts = 10
slowdown_counts = 200

[pairs.y]
name = "Y"

[rigs.gantry]
x = "x"
y = "y"
"#,
    );

    assert!(validate_config(&config).is_ok());
}

/// Test validation fails when the tolerance band swallows the slowdown band.
#[test]
fn test_tolerance_band_must_be_inside_slowdown() {
    let config = parse(
        r#"
[axes.x]
name = "X"
tolerance_counts = 250
slowdown_counts = 200
"#,
    );

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidToleranceBand { .. }))
    ));
}

/// Test validation fails for inverted speed bounds.
#[test]
fn test_speed_bounds_must_be_ordered() {
    let config = parse(
        r#"
[axes.x]
name = "X"
min_speed = 500.0
max_speed = 400.0
"#,
    );

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidSpeedBounds { .. }))
    ));
}

/// Test validation fails for a non-positive divergence tolerance.
#[test]
fn test_diff_tolerance_must_be_positive() {
    let config = parse(
        r#"
[pairs.y]
name = "Y"
diff_tolerance_counts = 0
"#,
    );

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidDiffTolerance(0)))
    ));
}

/// Test validation fails for a rig referencing a missing axis.
#[test]
fn test_rig_must_reference_existing_members() {
    let config = parse(
        r#"
[pairs.y]
name = "Y"

[rigs.gantry]
x = "ghost"
y = "y"
"#,
    );

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::AxisNotFound(_)))
    ));
}

/// Test validation bounds the proportion tolerance to (0, 1).
#[test]
fn test_proportion_tolerance_bounds() {
    let config = parse(
        r#"
[axes.x]
name = "X"

[pairs.y]
name = "Y"

[rigs.gantry]
x = "x"
y = "y"
proportion_tolerance = 1.5
"#,
    );

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidProportionTolerance(_)))
    ));
}
