//! Validation of file paths before they are opened for bisection.

use crate::error::{GvError, Result};
use std::fs::File;
use std::path::Path;

/// Validate that a path names a readable regular file
///
/// # Validations Performed
/// - Path exists
/// - Path is a regular file (a directory would only fail later, on the first read)
/// - File can be opened by the current process
///
/// Empty files are accepted: bisecting one simply yields no lines.
pub fn validate_file_path(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| GvError::open_error(path, e))?;

    if !metadata.is_file() {
        return Err(GvError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    File::open(path).map_err(|e| GvError::open_error(path, e))?;

    Ok(())
}
