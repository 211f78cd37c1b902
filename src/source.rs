//! # Shader Source Loading
//!
//! Reads fragment-program text from disk. Every call re-reads the file;
//! filters load their source once at startup, so there is nothing to cache.

use std::fs;
use std::path::Path;

use crate::error::FilterError;

/// Resolve `file_path` against `relative_to` and read the result as text.
///
/// `relative_to` may be a file, typically the caller's own source file, in
/// which case its containing directory is used as the base.
pub fn read_relative(
    file_path: impl AsRef<Path>,
    relative_to: impl AsRef<Path>,
) -> Result<String, FilterError> {
    let relative_to = relative_to.as_ref();
    let base = if relative_to.is_file() {
        relative_to.parent().unwrap_or_else(|| Path::new(""))
    } else {
        relative_to
    };
    let path = base.join(file_path.as_ref());
    fs::read_to_string(&path).map_err(|source| FilterError::Source { path, source })
}
