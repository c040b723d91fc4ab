use std::path::{Path, PathBuf};

use crate::transaction::RawRecord;

/// Possible errors while reading the sales export
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("input file not found: {}", .path.display())]
    Missing { path: PathBuf },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Reads the sales export into memory
///
/// A missing file is fatal for the run. The reader trims whitespace
/// around fields so hand-edited exports behave like generated ones.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let records = reader
        .deserialize()
        .collect::<Result<Vec<RawRecord>, _>>()?;
    Ok(records)
}
