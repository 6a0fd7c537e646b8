use super::traits::ConfigSection;
use crate::error::PurgecvError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldoutConfig {
    pub ratio: f64,   // share of rows in the first block
    pub purging: bool,
    pub n_bars: usize, // period of one sample
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            ratio: 0.7,
            purging: true,
            n_bars: 10,
        }
    }
}

impl ConfigSection for HoldoutConfig {
    fn section_name() -> &'static str {
        "holdout"
    }

    fn validate(&self) -> Result<(), PurgecvError> {
        if !(self.ratio > 0.0 && self.ratio < 1.0) {
            return Err(PurgecvError::Configuration(format!(
                "Split ratio must be between 0 and 1 (exclusive), got {}",
                self.ratio
            )));
        }
        if self.purging && self.n_bars == 0 {
            return Err(PurgecvError::Configuration(
                "Purging requires n_bars >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
