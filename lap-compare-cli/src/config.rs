//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use lap_compare_core::ComparisonConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub drivers: DriversConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory holding laps.csv, car_data/ and pos_data/
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriversConfig {
    /// Driver whose lap provides the distance grid and sector marks
    pub primary: String,
    /// Drivers compared against the primary, one independent comparison each
    #[serde(default)]
    pub rivals: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_drivers(&config.drivers.primary, &config.drivers.rivals)
        .with_context(|| format!("Invalid driver selection in {:?}", path))?;

    Ok(config)
}

/// Check that a primary driver is set and no rival repeats it
pub fn validate_drivers(primary: &str, rivals: &[String]) -> Result<()> {
    if primary.trim().is_empty() {
        bail!("primary driver is empty");
    }
    if let Some(rival) = rivals.iter().find(|r| r.as_str() == primary) {
        bail!("driver {} cannot be compared against itself", rival);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lap_compare_core::LapSelector;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [session]
            dir = "exports/spain_q"

            [drivers]
            primary = "NOR"
            rivals = ["HAM", "VER"]

            [comparison]
            lap = { number = 14 }
            compute_heading = false

            [output]
            format = "json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.session.dir, PathBuf::from("exports/spain_q"));
        assert_eq!(config.drivers.rivals.len(), 2);
        assert_eq!(config.comparison.lap, LapSelector::Number(14));
        assert!(!config.comparison.compute_heading);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_defaults() {
        let toml_content = r#"
            [session]
            dir = "exports"

            [drivers]
            primary = "LEC"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert!(config.drivers.rivals.is_empty());
        assert_eq!(config.comparison.lap, LapSelector::Fastest);
        assert!(config.comparison.compute_heading);
        assert_eq!(config.output.format, OutputFormat::Txt);
    }

    #[test]
    fn test_validate_drivers() {
        assert!(validate_drivers("NOR", &["HAM".to_string()]).is_ok());
        assert!(validate_drivers("", &[]).is_err());
        assert!(validate_drivers("NOR", &["NOR".to_string()]).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
