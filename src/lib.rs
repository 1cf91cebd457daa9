//! Sparkify ETL Library
//!
//! Loads song metadata and user activity logs from JSON file trees into a
//! SQLite star schema. The binary wires these modules together; they are
//! exposed here for the integration tests.

pub mod config;
pub mod dispatch;
pub mod sqlite_persistence;
pub mod transform;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use dispatch::{process_data, process_dataset, RunSummary};
pub use transform::{Dataset, FileStats, RecordError};
pub use warehouse::{SqliteWarehouse, TableCounts, WarehouseWriter};
