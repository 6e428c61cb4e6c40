//! Integration tests for the `validate` command.
use elecost::cli::handle_validate_command;
use elecost::log::is_logger_initialised;
use elecost::settings::Settings;
use std::fs;
use tempfile::tempdir;

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("ELECOST_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let tariff_path = dir.path().join("tariff.toml");
    fs::write(&tariff_path, "consumption = 3100.0\ntax_rate = 0.2\n").unwrap();

    assert!(!is_logger_initialised());

    handle_validate_command(&tariff_path, Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());

    // Second time will fail because the logging is already initialised
    assert_eq!(
        handle_validate_command(&tariff_path, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
