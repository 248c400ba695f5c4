use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::ProjectWriter;

/// In-memory project writer recording every write.
pub struct MemoryProjectWriter {
    root: PathBuf,
    files: Mutex<BTreeMap<String, String>>,
}

impl MemoryProjectWriter {
    pub fn new() -> Self {
        Self { root: PathBuf::from("/memory/project"), files: Mutex::new(BTreeMap::new()) }
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().unwrap().insert(path.to_string(), content.to_string());
        self
    }

    pub fn files(&self) -> BTreeMap<String, String> {
        self.files.lock().unwrap().clone()
    }

    pub fn read(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl ProjectWriter for MemoryProjectWriter {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &str) -> bool {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|key| key.starts_with(&prefix))
    }

    fn write_file(&self, path: &str, content: &str) -> Result<(), AppError> {
        if path.split('/').any(|part| part == "..") {
            return Err(AppError::PathTraversal(path.to_string()));
        }
        self.files.lock().unwrap().insert(path.to_string(), content.to_string());
        Ok(())
    }
}
