// src/fs/mock.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};

use super::FileSystem;

/// In-memory filesystem for tests.
///
/// `canonicalize` answers from an explicit realpath table, so tests can
/// stub symlink resolution for paths that never touch the disk. Paths
/// without an entry fail to canonicalize, which exercises the lexical
/// fallback in callers.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    realpaths: Arc<Mutex<HashMap<PathBuf, PathBuf>>>,
    files: Arc<Mutex<HashSet<PathBuf>>>,
    removed: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub `canonicalize(path)` to return `realpath`.
    pub fn map_realpath(&self, path: impl AsRef<Path>, realpath: impl AsRef<Path>) {
        let mut realpaths = self.realpaths.lock().unwrap();
        realpaths.insert(path.as_ref().to_path_buf(), realpath.as_ref().to_path_buf());
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.as_ref().to_path_buf());
    }

    /// Paths removed through the trait, in removal order.
    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }
}

impl FileSystem for MockFileSystem {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let realpaths = self.realpaths.lock().unwrap();
        realpaths
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no realpath stubbed for {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        if files.remove(path) {
            self.removed.lock().unwrap().push(path.to_path_buf());
            Ok(())
        } else {
            Err(anyhow!("file not found: {:?}", path))
        }
    }
}
