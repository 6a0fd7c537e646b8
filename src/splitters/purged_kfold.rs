//! K-fold cross-validation with purging and embargo for sequential data.
//!
//! The rows are cut into `n_splits` contiguous test chunks. Around every
//! interior chunk boundary a purge budget is removed so that no training
//! sample overlaps a test sample:
//!
//! * before the test block, `n_overlaps` rows;
//! * after the test block, `n_overlaps + floor(N * pct_embargo)` rows.
//!
//! Each budget is shared between the train segment and the test block,
//! the train side taking `round((n_splits - 1) / n_splits * budget)` rows
//! (ties to even). Boundaries at the first and last row carry no budget.

use super::types::{round_purge, Fold, FoldBounds};
use crate::error::{PurgecvError, Result};
use crate::types::IndexedTable;

#[derive(Debug, Clone, PartialEq)]
pub struct PurgedKFold {
    n_splits: usize,
    n_overlaps: usize,
    pct_embargo: f64,
}

impl Default for PurgedKFold {
    fn default() -> Self {
        Self {
            n_splits: 5,
            n_overlaps: 0,
            pct_embargo: 0.0,
        }
    }
}

impl PurgedKFold {
    /// # Arguments
    /// * `n_splits` - K of the k-fold, at least 2
    /// * `n_overlaps` - Temporal overlap between adjacent samples, in rows
    /// * `pct_embargo` - Share of all rows embargoed after each test block, in `[0, 1)`
    pub fn new(n_splits: usize, n_overlaps: usize, pct_embargo: f64) -> Result<Self> {
        Self::validate_params(n_splits, pct_embargo)?;
        Ok(Self {
            n_splits,
            n_overlaps,
            pct_embargo,
        })
    }

    pub(crate) fn validate_params(n_splits: usize, pct_embargo: f64) -> Result<()> {
        if n_splits < 2 {
            return Err(PurgecvError::Configuration(format!(
                "n_splits must be at least 2, got {}",
                n_splits
            )));
        }
        if !(0.0..1.0).contains(&pct_embargo) {
            return Err(PurgecvError::Configuration(format!(
                "pct_embargo must be in [0, 1), got {}",
                pct_embargo
            )));
        }
        Ok(())
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn n_overlaps(&self) -> usize {
        self.n_overlaps
    }

    pub fn pct_embargo(&self) -> f64 {
        self.pct_embargo
    }

    /// Rows embargoed after each interior test block.
    pub fn n_embargo(&self, n_rows: usize) -> usize {
        (n_rows as f64 * self.pct_embargo) as usize
    }

    fn train_ratio(&self) -> f64 {
        (self.n_splits - 1) as f64 / self.n_splits as f64
    }

    /// Train side of a purge budget, never more than the budget itself.
    fn train_share(&self, budget: i128, train_ratio: f64) -> i128 {
        (round_purge(budget as f64 * train_ratio) as i128).min(budget)
    }

    fn check_rows(&self, n_rows: usize) -> Result<()> {
        if n_rows < self.n_splits {
            return Err(PurgecvError::Configuration(format!(
                "Cannot cut {} rows into {} folds",
                n_rows, self.n_splits
            )));
        }
        Ok(())
    }

    /// Unpurged test chunk `fold`: the first `N % k` chunks hold one extra row.
    fn chunk(&self, n_rows: usize, fold: usize) -> (usize, usize) {
        let base = n_rows / self.n_splits;
        let extra = n_rows % self.n_splits;
        let start = fold * base + fold.min(extra);
        let len = base + usize::from(fold < extra);
        (start, start + len)
    }

    /// Positional layout of fold `fold` over `n_rows` rows.
    pub fn fold_bounds(&self, n_rows: usize, fold: usize) -> Result<FoldBounds> {
        self.check_rows(n_rows)?;
        if fold >= self.n_splits {
            return Err(PurgecvError::Configuration(format!(
                "Fold {} out of range for {} splits",
                fold, self.n_splits
            )));
        }

        let (i, j) = self.chunk(n_rows, fold);
        let train_ratio = self.train_ratio();

        // widened and signed: a purge may reach past row 0 or past row N
        let n_overlaps = self.n_overlaps as i128;
        let (train_f_idx1, test_idx0) = if i != 0 && self.n_overlaps > 0 {
            let train_f_purge = self.train_share(n_overlaps, train_ratio);
            (i as i128 - train_f_purge, i as i128 + (n_overlaps - train_f_purge))
        } else {
            (i as i128, i as i128)
        };

        let purge_range = n_overlaps + self.n_embargo(n_rows) as i128;
        let (test_idx1, train_l_idx0) = if j != n_rows && purge_range > 0 {
            let train_l_purge = self.train_share(purge_range, train_ratio);
            (j as i128 - (purge_range - train_l_purge), j as i128 + train_l_purge)
        } else {
            (j as i128, j as i128)
        };

        if train_f_idx1 < 0 {
            return Err(PurgecvError::DegenerateFold {
                fold,
                reason: format!("train head would end at row {}", train_f_idx1),
            });
        }
        if test_idx1 <= test_idx0 {
            return Err(PurgecvError::DegenerateFold {
                fold,
                reason: format!(
                    "test block [{}, {}) is empty after purging",
                    test_idx0, test_idx1
                ),
            });
        }
        if train_l_idx0 > n_rows as i128 {
            return Err(PurgecvError::DegenerateFold {
                fold,
                reason: format!(
                    "train tail would start at row {} of {}",
                    train_l_idx0, n_rows
                ),
            });
        }

        // 0 <= train_f_idx1 <= i, test_idx0 < test_idx1 <= j, train_l_idx0 <= n_rows
        let bounds = FoldBounds {
            fold_num: fold,
            train_head: 0..train_f_idx1 as usize,
            test: test_idx0 as usize..test_idx1 as usize,
            train_tail: train_l_idx0 as usize..n_rows,
        };

        if bounds.train_len() == 0 {
            log::warn!("Fold {} has no training rows left after purging", fold);
        }
        log::debug!(
            "Fold {}: train {:?} + {:?}, test {:?}",
            fold,
            bounds.train_head,
            bounds.train_tail,
            bounds.test
        );

        Ok(bounds)
    }

    /// Layout of every fold over `n_rows` rows, computed lazily.
    pub fn split_positions(
        &self,
        n_rows: usize,
    ) -> Result<impl Iterator<Item = Result<FoldBounds>> + '_> {
        self.check_rows(n_rows)?;
        Ok((0..self.n_splits).map(move |fold| self.fold_bounds(n_rows, fold)))
    }

    /// Fold `fold` of `table`, as row labels.
    pub fn fold(&self, table: &IndexedTable, fold: usize) -> Result<Fold> {
        let bounds = self.fold_bounds(table.height(), fold)?;
        Ok(Fold::from_bounds(&bounds, table.labels()))
    }

    /// Lazy sequence of the `n_splits` folds of `table`.
    ///
    /// Calling this again restarts the sequence; the first error ends it.
    pub fn split<'a>(&'a self, table: &'a IndexedTable) -> Result<PurgedFolds<'a>> {
        self.check_rows(table.height())?;
        Ok(PurgedFolds {
            kfold: self,
            table,
            next_fold: 0,
        })
    }
}

pub struct PurgedFolds<'a> {
    kfold: &'a PurgedKFold,
    table: &'a IndexedTable,
    next_fold: usize,
}

impl Iterator for PurgedFolds<'_> {
    type Item = Result<Fold>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_fold >= self.kfold.n_splits {
            return None;
        }

        let result = self.kfold.fold(self.table, self.next_fold);
        self.next_fold = if result.is_ok() {
            self.next_fold + 1
        } else {
            self.kfold.n_splits
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.kfold.n_splits.saturating_sub(self.next_fold);
        (0, Some(remaining))
    }
}

impl std::iter::FusedIterator for PurgedFolds<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(kfold: &PurgedKFold, n_rows: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        kfold
            .split_positions(n_rows)
            .unwrap()
            .map(|b| {
                let b = b.unwrap();
                (b.train_positions().collect(), b.test_positions().collect())
            })
            .collect()
    }

    #[test]
    fn test_chunks_nearly_equal() {
        let kfold = PurgedKFold::new(3, 0, 0.0).unwrap();
        let chunks: Vec<_> = (0..3).map(|f| kfold.chunk(7, f)).collect();
        assert_eq!(chunks, vec![(0, 3), (3, 5), (5, 7)]);

        let kfold = PurgedKFold::new(4, 0, 0.0).unwrap();
        let chunks: Vec<_> = (0..4).map(|f| kfold.chunk(10, f)).collect();
        assert_eq!(chunks, vec![(0, 3), (3, 6), (6, 8), (8, 10)]);
    }

    #[test]
    fn test_purge_only() {
        let kfold = PurgedKFold::new(3, 1, 0.0).unwrap();
        assert_eq!(
            layout(&kfold, 6),
            vec![
                (vec![3, 4, 5], vec![0, 1]),
                (vec![0, 5], vec![2, 3]),
                (vec![0, 1, 2], vec![4, 5]),
            ]
        );
    }

    #[test]
    fn test_purge_and_embargo() {
        let kfold = PurgedKFold::new(3, 1, 0.16).unwrap();
        assert_eq!(kfold.n_embargo(7), 1);
        assert_eq!(
            layout(&kfold, 7),
            vec![
                (vec![4, 5, 6], vec![0, 1]),
                (vec![0, 1, 6], vec![3]),
                (vec![0, 1, 2, 3], vec![5, 6]),
            ]
        );
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            PurgedKFold::new(1, 0, 0.0),
            Err(PurgecvError::Configuration(_))
        ));
        assert!(PurgedKFold::new(0, 0, 0.0).is_err());
        assert!(PurgedKFold::new(2, 0, 1.0).is_err());
        assert!(PurgedKFold::new(2, 0, -0.1).is_err());
        assert!(PurgedKFold::new(2, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_more_folds_than_rows() {
        let kfold = PurgedKFold::new(5, 0, 0.0).unwrap();
        assert!(matches!(
            kfold.split_positions(4).map(|_| ()),
            Err(PurgecvError::Configuration(_))
        ));
        assert!(kfold.fold_bounds(10, 5).is_err());
    }

    #[test]
    fn test_empty_test_block_is_degenerate() {
        // chunks of 2 rows; the test side of a 4-row trailing budget is 2 rows
        let kfold = PurgedKFold::new(2, 4, 0.0).unwrap();
        match kfold.fold_bounds(4, 0) {
            Err(PurgecvError::DegenerateFold { fold, .. }) => assert_eq!(fold, 0),
            other => panic!("expected degenerate fold, got {:?}", other),
        }
    }

    #[test]
    fn test_train_tail_past_last_row_is_degenerate() {
        // fold 8 ends at row 18 and purges round(3 * 9/10) = 3 train rows after it
        let kfold = PurgedKFold::new(10, 3, 0.0).unwrap();
        match kfold.fold_bounds(20, 8) {
            Err(PurgecvError::DegenerateFold { fold: 8, reason }) => {
                assert!(reason.contains("train tail"))
            }
            other => panic!("expected degenerate fold, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_overlap_fails_without_overflow() {
        let kfold = PurgedKFold::new(2, usize::MAX, 0.5).unwrap();
        assert!(matches!(
            kfold.fold_bounds(10, 0),
            Err(PurgecvError::DegenerateFold { fold: 0, .. })
        ));

        let kfold = PurgedKFold::new(3, usize::MAX, 0.0).unwrap();
        match kfold.fold_bounds(9, 1) {
            Err(PurgecvError::DegenerateFold { fold: 1, reason }) => {
                assert!(reason.contains("train head"), "{}", reason)
            }
            other => panic!("expected degenerate fold, got {:?}", other),
        }
    }

    #[test]
    fn test_train_head_before_row_zero_is_degenerate() {
        let kfold = PurgedKFold::new(3, 9, 0.0).unwrap();
        match kfold.fold_bounds(60, 2) {
            Ok(bounds) => assert_eq!(bounds.train_head, 0..34),
            other => panic!("unexpected {:?}", other),
        }
        // fold 1 starts at row 2 but purges round(9 * 2/3) = 6 train rows
        match kfold.fold_bounds(6, 1) {
            Err(PurgecvError::DegenerateFold { fold: 1, reason }) => {
                assert!(reason.contains("train head"))
            }
            other => panic!("expected degenerate fold, got {:?}", other),
        }
    }
}
