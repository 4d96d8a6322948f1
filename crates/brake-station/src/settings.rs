//! Loading [`CalculatorConfig`] from an optional JSON file.

use std::fs;
use std::path::Path;

use brake_core::config::CalculatorConfig;
use log::info;
use thiserror_no_std::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read {path}: {details}")]
    Read { path: String, details: String },
    #[error("invalid config {path}: {details}")]
    Parse { path: String, details: String },
    #[error("config lists gauge 0, gauges must be positive")]
    ZeroGauge,
}

/// Defaults apply when `path` is `None`, and to any key the file leaves out.
pub fn load(path: Option<&Path>) -> Result<CalculatorConfig, SettingsError> {
    let Some(path) = path else {
        return Ok(CalculatorConfig::default());
    };

    let text = fs::read_to_string(path).map_err(|e| SettingsError::Read {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    let config = parse(&text).map_err(|details| SettingsError::Parse {
        path: path.display().to_string(),
        details,
    })?;

    if config.supported_gauges.contains(&0) {
        return Err(SettingsError::ZeroGauge);
    }

    info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse(text: &str) -> Result<CalculatorConfig, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_file_gives_defaults() {
        assert_eq!(load(None).unwrap(), CalculatorConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse(r#"{ "supported_gauges": [14, 16] }"#).unwrap();
        assert_eq!(config.supported_gauges, [14, 16]);
        assert_eq!(config.log_file, "bending_data.txt");
        assert_eq!(config.display_decimals, 3);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("station.json");
        fs::write(&path, r#"{ "log_file": "press_2.txt", "display_decimals": 2 }"#).unwrap();

        let config = load(Some(path.as_path())).unwrap();
        assert_eq!(config.log_file, "press_2.txt");
        assert_eq!(config.display_decimals, 2);
    }

    #[test]
    fn test_rejects_bad_json_and_zero_gauge() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ log_file = 3 }").unwrap();
        assert!(matches!(load(Some(bad.as_path())), Err(SettingsError::Parse { .. })));

        let zero = dir.path().join("zero.json");
        fs::write(&zero, r#"{ "supported_gauges": [0, 16] }"#).unwrap();
        assert!(matches!(load(Some(zero.as_path())), Err(SettingsError::ZeroGauge)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load(Some(missing.as_path())), Err(SettingsError::Read { .. })));
    }
}
