use super::types::{round_purge, Dataset};
use crate::config::{ConfigSection, HoldoutConfig};
use crate::error::{PurgecvError, Result};
use crate::types::IndexedTable;

/// Splits a table into two contiguous blocks by ratio, optionally purging
/// the samples whose windows straddle the boundary.
pub struct RangeSplitter {
    config: HoldoutConfig,
}

impl RangeSplitter {
    pub fn new(config: HoldoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HoldoutConfig {
        &self.config
    }

    pub fn split(&self, table: &IndexedTable) -> Result<(IndexedTable, IndexedTable)> {
        let total_rows = table.height();
        let split_idx = (total_rows as f64 * self.config.ratio) as usize;

        let mut first = table.head(split_idx);
        let mut second = table.tail_from(split_idx);

        if self.config.purging {
            // n_bars - 1 rows straddle the boundary; the first block gives up
            // its share in proportion to the ratio.
            let straddle = self.config.n_bars - 1;
            let purge_idx = round_purge(straddle as f64 * self.config.ratio);

            if purge_idx > first.height() || straddle - purge_idx > second.height() {
                log::warn!(
                    "Purge of {} rows empties a block ({} | {} rows)",
                    straddle,
                    first.height(),
                    second.height()
                );
            }

            first = first.head(first.height().saturating_sub(purge_idx));
            second = second.tail_from(straddle - purge_idx);
        }

        log::debug!(
            "Holdout split at row {} of {}: {} | {} rows",
            split_idx,
            total_rows,
            first.height(),
            second.height()
        );

        Ok((first, second))
    }
}

/// Two-block split of `table`; see [`RangeSplitter`].
pub fn split(
    table: &IndexedTable,
    ratio: f64,
    purging: bool,
    n_bars: usize,
) -> Result<(IndexedTable, IndexedTable)> {
    RangeSplitter::new(HoldoutConfig {
        ratio,
        purging,
        n_bars,
    })?
    .split(table)
}

/// Train, validation and test blocks by two successive holdout splits.
///
/// `validation_ratio` and `test_ratio` are shares of the whole table; the
/// train block receives the remainder.
pub fn split_dataset(
    table: &IndexedTable,
    validation_ratio: f64,
    test_ratio: f64,
    purging: bool,
    n_bars: usize,
) -> Result<Dataset> {
    let train_ratio = 1.0 - validation_ratio - test_ratio;
    if validation_ratio <= 0.0 || test_ratio <= 0.0 || train_ratio <= 0.0 {
        return Err(PurgecvError::Configuration(format!(
            "Validation ({}) and test ({}) ratios must be positive and leave room for training",
            validation_ratio, test_ratio
        )));
    }

    let (development, test) = split(table, 1.0 - test_ratio, purging, n_bars)?;
    let (train, validation) = split(
        &development,
        train_ratio / (1.0 - test_ratio),
        purging,
        n_bars,
    )?;

    Ok(Dataset {
        train,
        validation,
        test,
    })
}
