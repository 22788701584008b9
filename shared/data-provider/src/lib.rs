mod dataset;
mod errors;
mod store;
mod subset;

pub use dataset::{load_jsonl, load_split, Example, FieldValue, Split};
pub use errors::DataError;
pub use store::{load_subset, save_subset, subset_path};
pub use subset::{BalanceStrategy, Subset, SubsetBuilder};
