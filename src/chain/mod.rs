pub mod model;
pub mod source;

pub use model::BlockHash;
pub use source::{BlockLedger, HashSource, load_csv, load_csv_file};
