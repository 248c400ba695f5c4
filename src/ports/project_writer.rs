//! Project writer port definition.

use std::path::Path;

use crate::domain::AppError;

/// Port for writing generated files below a project root.
///
/// Paths are relative to the root and use `/` separators.
pub trait ProjectWriter {
    /// Root directory all paths are resolved against.
    fn root(&self) -> &Path;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Write `content` to `path`, creating parent directories.
    fn write_file(&self, path: &str, content: &str) -> Result<(), AppError>;
}
