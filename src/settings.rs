//! Program settings, read from `settings.toml` in the user's config directory.
use crate::get_elecost_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Placed at the top of a newly created settings file
const SETTINGS_FILE_PREAMBLE: &str = "# Program settings for elecost
# Remove the leading '# ' from a setting to change it from the default
";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_elecost_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// The log level (off, error, warn, info, debug or trace)
    pub log_level: String,
    /// Whether to replace the contents of an existing results folder
    pub overwrite: bool,
    /// Whether to print the breakdown and projection tables after a run
    pub print_tables: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.into(),
            overwrite: false,
            print_tables: true,
        }
    }
}

impl Settings {
    /// Read the program settings file, using defaults for anything not given.
    ///
    /// A missing settings file is not an error: every setting takes its default value.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// The contents of a settings file in which every setting is commented out and documented
    pub fn default_file_contents() -> Result<String> {
        let defaults =
            toml::to_string(&Settings::default()).context("Could not serialise settings")?;

        let mut out = String::from(SETTINGS_FILE_PREAMBLE);
        for line in defaults.lines() {
            let Some((field, _)) = line.split_once('=') else {
                continue;
            };
            let docs = Settings::get_field_docs(field.trim())
                .with_context(|| format!("No description for setting '{}'", field.trim()))?;

            out.push('\n');
            for doc_line in docs.lines() {
                out.push_str(&format!("# # {}\n", doc_line.trim()));
            }
            out.push_str(&format!("# {line}\n"));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path_partial() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "log_level = \"warn\"\nprint_tables = false\n").unwrap();

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                log_level: "warn".into(),
                overwrite: false,
                print_tables: false,
            }
        );
    }

    #[test]
    fn test_settings_load_from_path_bad_type() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "overwrite = \"yes\"\n").unwrap();
        assert!(Settings::load_from_path(&file_path).is_err());
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents().unwrap();
        assert!(contents.starts_with(SETTINGS_FILE_PREAMBLE));
        assert!(contents.contains("# log_level = \"info\"\n"));
        assert!(contents.contains("# # Whether to print the breakdown and projection tables"));

        // Every setting is commented out, so the file should parse to the defaults
        let settings: Settings = toml::from_str(&contents).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
