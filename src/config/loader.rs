//! RON config loader
//!
//! Loads ledger options from a RON file, with fallback to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::options::{
    ConfigReport, LedgerConfig, KEY_GAP_OR_MULTIPLIER, KEY_GROWTH_MODE, KEY_RETURN_DETAILS,
    KEY_START_AT_ZERO,
};

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "guildxp.ron";

/// Get the default config file path
pub fn config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "guildxp", "Guildxp") {
        proj_dirs.config_dir().join(CONFIG_FILE)
    } else {
        PathBuf::from(CONFIG_FILE)
    }
}

/// Load options from a RON map such as
/// `{ "growth_mode": "linear", "gap_or_multiplier": 300 }`.
///
/// A missing or unreadable file yields the default config.
pub fn load_config(path: &Path) -> ConfigReport {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => match ron::from_str::<Value>(&content) {
                Ok(options) => {
                    let report = LedgerConfig::from_value(&options);
                    log::info!(
                        "Config loaded from {:?} ({} option(s) replaced by defaults)",
                        path,
                        report.rejected.len()
                    );
                    return report;
                }
                Err(e) => log::warn!("Failed to parse {:?}: {}. Using defaults.", path, e),
            },
            Err(e) => log::warn!("Failed to read {:?}: {}. Using defaults.", path, e),
        }
    }
    LedgerConfig::from_value(&Value::Null)
}

/// Render a config as the RON map understood by [`load_config`]
pub fn config_to_ron(config: &LedgerConfig) -> Result<String, String> {
    let options = json!({
        KEY_GROWTH_MODE: config.growth.mode.name(),
        KEY_GAP_OR_MULTIPLIER: config.growth.gap_or_multiplier,
        KEY_START_AT_ZERO: config.growth.start_at_zero,
        KEY_RETURN_DETAILS: config.return_details,
    });
    ron::ser::to_string_pretty(&options, ron::ser::PrettyConfig::default())
        .map_err(|e| format!("Failed to serialize config: {}", e))
}

/// Write the default config to `path` for easy editing
pub fn export_default_config(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {:?}: {}", parent, e))?;
        }
    }

    let content = config_to_ron(&LedgerConfig::default())?;
    fs::write(path, content).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;

    log::info!("Default config written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{GrowthConfig, GrowthMode};

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let report = load_config(&dir.path().join("absent.ron"));
        assert!(report.is_clean());
        assert_eq!(report.config, LedgerConfig::default());
    }

    #[test]
    fn test_load_ron_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "growth_mode": "linear", "gap_or_multiplier": 300, "return_details": true }"#,
        )
        .unwrap();

        let report = load_config(&path);
        assert!(report.is_clean());
        assert_eq!(report.config.growth, GrowthConfig::linear(300.0));
        assert!(report.config.return_details);
    }

    #[test]
    fn test_unparseable_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ growth_mode: ").unwrap();
        assert_eq!(load_config(&path).config, LedgerConfig::default());
    }

    #[test]
    fn test_export_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let result = export_default_config(&path);
        assert!(result.is_ok(), "Failed to export default config: {:?}", result.err());

        let report = load_config(&path);
        assert!(report.is_clean());
        assert_eq!(report.config.growth.mode, GrowthMode::Quadratic);
        assert_eq!(report.config, LedgerConfig::default());
    }
}
