//! Filesystem adapter for the project writer port.
//!
//! Every path is resolved against the project root and rejected when, after
//! logical normalization, it would land outside of it.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::AppError;
use crate::ports::ProjectWriter;

/// Project writer rooted at a project directory.
#[derive(Debug, Clone)]
pub struct FilesystemProjectWriter {
    root: PathBuf,
}

impl FilesystemProjectWriter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve_path(&self, path: &str) -> Result<PathBuf, AppError> {
        let full_path = self.root.join(path);
        if !normalize_path(&full_path).starts_with(normalize_path(&self.root)) {
            return Err(AppError::PathTraversal(path.to_string()));
        }
        Ok(full_path)
    }
}

impl ProjectWriter for FilesystemProjectWriter {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve_path(path).is_ok_and(|full_path| full_path.exists())
    }

    fn write_file(&self, path: &str, content: &str) -> Result<(), AppError> {
        let full_path = self.resolve_path(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;
        tracing::debug!(path = %full_path.display(), "wrote file");
        Ok(())
    }
}

/// Normalize path by resolving `.` and `..` components logically.
/// This does not access the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => ret.push(c),
        }
    }
    ret
}
