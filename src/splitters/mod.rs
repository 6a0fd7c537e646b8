pub mod types;
pub mod range;
pub mod purged_kfold;

pub use purged_kfold::{PurgedFolds, PurgedKFold};
pub use range::{split, split_dataset, RangeSplitter};
pub use types::{Dataset, Fold, FoldBounds};
