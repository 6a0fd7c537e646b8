//! Leak-safe preparation of time-ordered tables for supervised learning:
//! observation windows, purged holdout splits and purged k-fold
//! cross-validation.

pub mod config;
pub mod error;
pub mod features;
pub mod splitters;
pub mod types;

pub use error::{PurgecvError, Result};
pub use features::{build_future, build_past, WindowBuilder};
pub use splitters::{split, split_dataset, Dataset, Fold, FoldBounds, PurgedKFold, RangeSplitter};
pub use types::{IndexedTable, RowLabel};
