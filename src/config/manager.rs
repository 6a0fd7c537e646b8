use super::{
    cv::CvConfig,
    holdout::HoldoutConfig,
    traits::ConfigSection,
    window::WindowConfig,
};
use crate::error::PurgecvError;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for overrides, e.g. `PURGECV__CV__N_SPLITS=8`.
pub const ENV_PREFIX: &str = "PURGECV";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub window: WindowConfig,
    pub holdout: HoldoutConfig,
    pub cv: CvConfig,
}

impl PrepConfig {
    pub fn validate(&self) -> Result<(), PurgecvError> {
        self.window.validate()?;
        self.holdout.validate()?;
        self.cv.validate()?;
        Ok(())
    }

    /// Defaults, overlaid by an optional TOML file, overlaid by `PURGECV__*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, PurgecvError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, PurgecvError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PurgecvError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PurgecvError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PurgecvError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| PurgecvError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowDirection;

    #[test]
    fn test_defaults_validate() {
        let config = PrepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cv.n_splits, 5);
        assert_eq!(config.window.direction, WindowDirection::Past);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PrepConfig::from_toml_str(
            r#"
            [cv]
            n_splits = 3
            n_overlaps = 2

            [window]
            cols = ["Open", "Close"]
            direction = "future"
            "#,
        )
        .unwrap();

        assert_eq!(config.cv.n_splits, 3);
        assert_eq!(config.cv.n_overlaps, 2);
        assert_eq!(config.cv.pct_embargo, 0.0);
        assert_eq!(config.window.cols, vec!["Open", "Close"]);
        assert_eq!(config.window.direction, WindowDirection::Future);
        assert_eq!(config.holdout.n_bars, 10);
    }

    #[test]
    fn test_invalid_sections_rejected() {
        for toml in [
            "[cv]\nn_splits = 1",
            "[cv]\nn_overlaps = -1",
            "[cv]\npct_embargo = 1.0",
            "[holdout]\nratio = 0.0",
            "[window]\ncols = []",
        ] {
            assert!(
                matches!(
                    PrepConfig::from_toml_str(toml),
                    Err(PurgecvError::Configuration(_))
                ),
                "expected configuration error for {:?}",
                toml
            );
        }
    }
}
