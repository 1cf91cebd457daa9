//! Runs a transformer over every JSON file of a dataset directory.
//!
//! Each file is loaded in its own transaction: once `process_data` returns an
//! error, the files before the failing one are committed and the failing one
//! is rolled back.

mod walker;

pub use walker::discover_json_files;

use crate::transform::{Dataset, FileStats};
use crate::warehouse::{SqliteWarehouse, WarehouseWriter};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of loading one dataset directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub totals: FileStats,
}

/// Apply `transformer` to every JSON file under `root`, committing after each file.
pub fn process_data<F>(
    warehouse: &mut SqliteWarehouse,
    root: &Path,
    transformer: F,
) -> Result<RunSummary>
where
    F: Fn(&dyn WarehouseWriter, &Path) -> Result<FileStats>,
{
    let files = discover_json_files(root)?;
    let total = files.len();
    info!("{} files found in {}", total, root.display());

    let mut summary = RunSummary {
        files_found: total,
        ..Default::default()
    };
    for (index, file) in files.iter().enumerate() {
        let session = warehouse.begin_file()?;
        let writer: &dyn WarehouseWriter = &session;
        let stats = transformer(writer, file)
            .with_context(|| format!("Failed to load {:?}", file))?;
        session
            .commit()
            .with_context(|| format!("Failed to load {:?}", file))?;
        debug!("{}: {:?}", file.display(), stats);

        summary.totals += stats;
        summary.files_processed += 1;
        info!("{}/{} files processed.", index + 1, total);
    }
    Ok(summary)
}

/// Load one dataset with its own transformer.
pub fn process_dataset(
    warehouse: &mut SqliteWarehouse,
    root: &Path,
    dataset: Dataset,
) -> Result<RunSummary> {
    info!("Loading {} from {}", dataset.name(), root.display());
    process_data(warehouse, root, dataset.transformer())
        .with_context(|| format!("Failed to load {}", dataset.name()))
}
