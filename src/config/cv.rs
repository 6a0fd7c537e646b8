use super::traits::ConfigSection;
use crate::error::PurgecvError;
use crate::splitters::PurgedKFold;
use serde::{Deserialize, Serialize};

/// Purged k-fold settings as read from configuration files.
///
/// `n_overlaps` is signed here so that a negative value in a file is
/// reported as a configuration error instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CvConfig {
    pub n_splits: usize,
    pub n_overlaps: i64,
    pub pct_embargo: f64,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            n_splits: 5,
            n_overlaps: 0,
            pct_embargo: 0.0,
        }
    }
}

impl CvConfig {
    pub fn build(&self) -> Result<PurgedKFold, PurgecvError> {
        self.validate()?;
        PurgedKFold::new(self.n_splits, self.n_overlaps as usize, self.pct_embargo)
    }
}

impl ConfigSection for CvConfig {
    fn section_name() -> &'static str {
        "cv"
    }

    fn validate(&self) -> Result<(), PurgecvError> {
        if self.n_overlaps < 0 {
            return Err(PurgecvError::Configuration(format!(
                "n_overlaps must be non-negative, got {}",
                self.n_overlaps
            )));
        }
        PurgedKFold::validate_params(self.n_splits, self.pct_embargo)
    }
}
