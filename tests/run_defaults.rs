//! Integration test for the `run` command without a tariff file.
use elecost::cli::{RunOpts, handle_run_command};
use elecost::settings::Settings;
use std::fs;
use tempfile::tempdir;

/// With no tariff file, the typical UK business rates are projected over 15 years
#[test]
fn test_handle_run_command_defaults() {
    unsafe { std::env::set_var("ELECOST_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        overwrite: false,
    };
    let settings = Settings {
        print_tables: false,
        ..Settings::default()
    };
    handle_run_command(None, &opts, Some(settings)).unwrap();

    let projection = fs::read_to_string(tempdir.path().join("projection.csv")).unwrap();
    assert_eq!(projection.lines().count(), 16);
    assert!(projection.lines().nth(1).unwrap().starts_with("1,2025,"));
    assert!(projection.lines().last().unwrap().starts_with("15,2039,"));

    let metadata: toml::Table =
        toml::from_str(&fs::read_to_string(tempdir.path().join("metadata.toml")).unwrap())
            .unwrap();
    assert!(!metadata["run"].as_table().unwrap().contains_key("tariff_path"));
    assert_eq!(metadata["tariff"]["charge_components"].as_array().unwrap().len(), 7);
}
