//! Employee roster assembly: CSV ingestion, column inference and the merge
//! rules that reconcile imports with operator edits

pub mod inference;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod normalize;

pub use inference::ColumnSelection;
pub use ingest::CsvImport;
pub use model::{EmployeeType, MergeStats, Roster, TypeFilter};
pub use normalize::normalize_key;
