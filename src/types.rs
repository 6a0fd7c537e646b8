use crate::error::{PurgecvError, Result};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

/// Row label of an [`IndexedTable`] (the equivalent of a data frame index).
pub type RowLabel = i64;

/// Ordered rows with named columns and a unique label per row.
///
/// Row order is chronological. Every row-preserving operation keeps the
/// frame and the labels in lockstep.
#[derive(Debug, Clone)]
pub struct IndexedTable {
    frame: DataFrame,
    labels: Vec<RowLabel>,
}

impl IndexedTable {
    /// Wrap a frame, labelling rows `0..N`.
    pub fn new(frame: DataFrame) -> Self {
        let labels = (0..frame.height() as RowLabel).collect();
        Self { frame, labels }
    }

    /// Wrap a frame with explicit row labels.
    pub fn with_index(frame: DataFrame, labels: Vec<RowLabel>) -> Result<Self> {
        if labels.len() != frame.height() {
            return Err(PurgecvError::InvalidIndex(format!(
                "{} labels for {} rows",
                labels.len(),
                frame.height()
            )));
        }

        let mut seen = HashSet::with_capacity(labels.len());
        if let Some(dup) = labels.iter().find(|label| !seen.insert(**label)) {
            return Err(PurgecvError::InvalidIndex(format!(
                "duplicate row label {}",
                dup
            )));
        }

        Ok(Self { frame, labels })
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn labels(&self) -> &[RowLabel] {
        &self.labels
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Column by name, reported as [`PurgecvError::ColumnNotFound`] when absent.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| PurgecvError::ColumnNotFound(name.to_string()))
    }

    /// Rows `[offset, offset + len)`, clamped to the table.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        let start = offset.min(self.height());
        let end = start.saturating_add(len).min(self.height());
        Self {
            frame: self.frame.slice(start as i64, end - start),
            labels: self.labels[start..end].to_vec(),
        }
    }

    /// First `len` rows.
    pub fn head(&self, len: usize) -> Self {
        self.slice(0, len)
    }

    /// Rows from `offset` to the end.
    pub fn tail_from(&self, offset: usize) -> Self {
        self.slice(offset, self.height().saturating_sub(offset))
    }

    /// Keep the rows where `mask` is true; nulls count as false.
    pub fn filter(&self, mask: &BooleanChunked) -> Result<Self> {
        let frame = self.frame.filter(mask)?;
        let labels = self
            .labels
            .iter()
            .zip(mask.into_iter())
            .filter_map(|(label, keep)| keep.unwrap_or(false).then_some(*label))
            .collect();

        Ok(Self { frame, labels })
    }

    /// Rows selected by label, in the requested order.
    pub fn take_labels(&self, labels: &[RowLabel]) -> Result<Self> {
        let positions: HashMap<RowLabel, usize> = self
            .labels
            .iter()
            .enumerate()
            .map(|(pos, label)| (*label, pos))
            .collect();

        let idx = labels
            .iter()
            .map(|label| {
                positions
                    .get(label)
                    .map(|pos| *pos as IdxSize)
                    .ok_or(PurgecvError::LabelNotFound(*label))
            })
            .collect::<Result<Vec<IdxSize>>>()?;

        let frame = self
            .frame
            .take(&IdxCa::from_vec(PlSmallStr::from_static("idx"), idx))?;

        Ok(Self {
            frame,
            labels: labels.to_vec(),
        })
    }

    /// Append `other` below this table; labels must stay unique.
    pub fn vstack(&self, other: &IndexedTable) -> Result<Self> {
        let frame = self.frame.vstack(&other.frame)?;
        let labels = self
            .labels
            .iter()
            .chain(other.labels.iter())
            .copied()
            .collect();

        Self::with_index(frame, labels)
    }

    pub(crate) fn from_parts(frame: DataFrame, labels: Vec<RowLabel>) -> Self {
        debug_assert_eq!(frame.height(), labels.len());
        Self { frame, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexedTable {
        let frame = df!("A" => [0, 1, 2, 3]).unwrap();
        IndexedTable::with_index(frame, vec![0, 10, 100, 1000]).unwrap()
    }

    #[test]
    fn test_default_labels_are_positions() {
        let table = IndexedTable::new(df!("A" => [5, 6, 7]).unwrap());
        assert_eq!(table.labels(), &[0, 1, 2]);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let frame = df!("A" => [0, 1]).unwrap();
        let err = IndexedTable::with_index(frame, vec![3, 3]).unwrap_err();
        assert!(matches!(err, PurgecvError::InvalidIndex(_)));
    }

    #[test]
    fn test_label_count_must_match_rows() {
        let frame = df!("A" => [0, 1]).unwrap();
        assert!(IndexedTable::with_index(frame, vec![0]).is_err());
    }

    #[test]
    fn test_slice_clamps_and_keeps_labels() {
        let table = sample();
        let tail = table.slice(2, 10);
        assert_eq!(tail.labels(), &[100, 1000]);
        assert_eq!(tail.height(), 2);
        assert!(table.slice(7, 1).is_empty());
    }

    #[test]
    fn test_take_labels_in_requested_order() {
        let table = sample();
        let picked = table.take_labels(&[1000, 0]).unwrap();
        let values: Vec<i32> = picked
            .column("A")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec![3, 0]);
        assert!(matches!(
            table.take_labels(&[42]),
            Err(PurgecvError::LabelNotFound(42))
        ));
    }

    #[test]
    fn test_vstack_rejoins_blocks() {
        let table = sample();
        let rejoined = table.head(1).vstack(&table.tail_from(3)).unwrap();
        assert_eq!(rejoined.labels(), &[0, 1000]);
        assert!(table.head(2).vstack(&table.slice(1, 2)).is_err());
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(
            sample().column("B"),
            Err(PurgecvError::ColumnNotFound(_))
        ));
    }
}
