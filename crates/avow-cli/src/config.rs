//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying the command-line overrides on top.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use avow::{
    AvowError,
    config::{AppConfig, ExtractionConfig},
};

use crate::args::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for AvowError {
    fn from(err: ConfigError) -> Self {
        AvowError::Io(io::Error::other(err.to_string()))
    }
}

/// Load the configuration and apply the overrides given in `args`.
///
/// # Errors
///
/// Returns error if the configuration cannot be loaded or a setting is out
/// of range after the overrides are applied.
pub fn resolve_config(args: &Args) -> Result<AppConfig, AvowError> {
    let mut config = load_config(args.config.as_ref())?;

    if let Some(scale) = args.scale {
        config.extraction_mut().set_scale(scale);
    }
    if let Some(mode) = args.mode {
        config.set_mode(mode.into());
    }
    validate_extraction(config.extraction())?;

    debug!(
        scale = config.extraction().scale(),
        mode:% = config.mode();
        "Configuration resolved"
    );
    Ok(config)
}

/// Checks the extraction settings, whether they came from a file or a flag.
fn validate_extraction(extraction: &ExtractionConfig) -> Result<(), ConfigError> {
    let scale = extraction.scale();
    if !(scale.is_finite() && scale > 0.0) {
        return Err(ConfigError::Validation(format!(
            "scale must be positive, got {scale}"
        )));
    }

    let snap_distance = extraction.snap_distance();
    if !(snap_distance.is_finite() && snap_distance >= 0.0) {
        return Err(ConfigError::Validation(format!(
            "snap_distance must not be negative, got {snap_distance}"
        )));
    }

    let tolerance = extraction.tolerance();
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(ConfigError::Validation(format!(
            "tolerance must not be negative, got {tolerance}"
        )));
    }

    if extraction.max_layer_rounds() == 0 {
        return Err(ConfigError::Validation(
            "max_layer_rounds must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (avow/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, AvowError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("avow/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "avow", "avow") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, AvowError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use avow::config::EditorMode;

    use super::*;
    use crate::args::Mode;

    fn args(config: Option<String>) -> Args {
        Args {
            input: "scene.toml".to_string(),
            output: None,
            config,
            scale: None,
            mode: None,
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_config(Some("does/not/exist.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "mode = \"solver\"\n\n[extraction]\nscale = 100.0").expect("write");

        let config = load_config(Some(file.path())).expect("valid config");

        assert_eq!(config.mode(), EditorMode::Solver);
        assert_eq!(config.extraction().scale(), 100.0);
        assert_eq!(config.extraction().snap_distance(), 0.05);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "mode = ").expect("write");

        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[extraction]\nscale = 100.0").expect("write");
        let mut args = args(Some(file.path().to_string_lossy().to_string()));
        args.scale = Some(0.1);
        args.mode = Some(Mode::Solver);

        let config = resolve_config(&args).expect("valid config");

        assert_eq!(config.extraction().scale(), 0.1);
        assert_eq!(config.mode(), EditorMode::Solver);
    }

    #[test]
    fn test_non_positive_scale_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "mode = \"builder\"").expect("write");
        let mut args = args(Some(file.path().to_string_lossy().to_string()));
        args.scale = Some(0.0);

        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_out_of_range_file_settings_are_rejected() {
        for settings in [
            "scale = 0.0",
            "scale = -10.0",
            "snap_distance = -0.5",
            "tolerance = -0.1",
            "max_layer_rounds = 0",
        ] {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(file, "[extraction]\n{settings}").expect("write");
            let args = args(Some(file.path().to_string_lossy().to_string()));

            assert!(resolve_config(&args).is_err(), "{settings} was accepted");
        }
    }

    #[test]
    fn test_scale_override_fixes_file_scale() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[extraction]\nscale = 0.0").expect("write");
        let mut args = args(Some(file.path().to_string_lossy().to_string()));
        args.scale = Some(10.0);

        let config = resolve_config(&args).expect("override is valid");

        assert_eq!(config.extraction().scale(), 10.0);
    }
}
