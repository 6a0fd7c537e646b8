use super::traits::ConfigSection;
use crate::error::PurgecvError;
use serde::{Deserialize, Serialize};

/// Which side of each sample the window extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowDirection {
    Past,
    Future,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub n_bars: usize,
    pub cols: Vec<String>,
    pub datetime_col: Option<String>,
    pub direction: WindowDirection,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            n_bars: 10,
            cols: vec!["Close".to_string()],
            datetime_col: Some("Date".to_string()),
            direction: WindowDirection::Past,
        }
    }
}

impl ConfigSection for WindowConfig {
    fn section_name() -> &'static str {
        "window"
    }

    fn validate(&self) -> Result<(), PurgecvError> {
        if self.cols.is_empty() {
            return Err(PurgecvError::Configuration(
                "Window needs at least one column to expand".to_string(),
            ));
        }
        if let Some(dt) = &self.datetime_col {
            if self.cols.contains(dt) {
                return Err(PurgecvError::Configuration(format!(
                    "Datetime column '{}' cannot also be expanded",
                    dt
                )));
            }
        }
        for (i, col) in self.cols.iter().enumerate() {
            if self.cols[..i].contains(col) {
                return Err(PurgecvError::Configuration(format!(
                    "Column '{}' listed twice",
                    col
                )));
            }
        }
        Ok(())
    }
}
