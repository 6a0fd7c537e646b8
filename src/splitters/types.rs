use crate::error::Result;
use crate::types::{IndexedTable, RowLabel};
use serde::Serialize;
use std::ops::Range;

/// Positional layout of one purged fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoldBounds {
    pub fold_num: usize,
    pub train_head: Range<usize>,
    pub test: Range<usize>,
    pub train_tail: Range<usize>,
}

impl FoldBounds {
    pub fn train_positions(&self) -> impl Iterator<Item = usize> {
        self.train_head.clone().chain(self.train_tail.clone())
    }

    pub fn test_positions(&self) -> impl Iterator<Item = usize> {
        self.test.clone()
    }

    pub fn train_len(&self) -> usize {
        self.train_head.len() + self.train_tail.len()
    }

    /// Rows excluded from both train and test by purging and embargo.
    pub fn purged_len(&self, n_rows: usize) -> usize {
        n_rows
            .saturating_sub(self.train_len())
            .saturating_sub(self.test.len())
    }
}

/// One (train, test) pair of row labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub fold_num: usize,
    pub train: Vec<RowLabel>,
    pub test: Vec<RowLabel>,
}

impl Fold {
    pub(crate) fn from_bounds(bounds: &FoldBounds, labels: &[RowLabel]) -> Self {
        Self {
            fold_num: bounds.fold_num,
            train: bounds.train_positions().map(|p| labels[p]).collect(),
            test: bounds.test_positions().map(|p| labels[p]).collect(),
        }
    }

    /// The train and test rows of `table`.
    pub fn materialize(&self, table: &IndexedTable) -> Result<(IndexedTable, IndexedTable)> {
        Ok((table.take_labels(&self.train)?, table.take_labels(&self.test)?))
    }
}

/// Train, validation and test blocks of one table.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: IndexedTable,
    pub validation: IndexedTable,
    pub test: IndexedTable,
}

/// Round half to even, the convention every purge amount uses.
pub(crate) fn round_purge(value: f64) -> usize {
    value.round_ties_even() as usize
}
