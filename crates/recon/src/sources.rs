//! Source providers: where the audit reads its text inputs from.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::ReconError;

/// Read-only access to the audited tree.
pub trait SourceLoader {
    /// Full contents of the file at `path`.
    fn read(&self, path: &str) -> Result<String, ReconError>;

    /// Names of the regular files directly inside `dir`, sorted.
    fn list(&self, dir: &str) -> Result<Vec<String>, ReconError>;
}

/// Files on disk, with relative paths resolved against a root directory.
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl SourceLoader for FsLoader {
    fn read(&self, path: &str) -> Result<String, ReconError> {
        let full = self.resolve(path);
        let bytes = std::fs::read(&full).map_err(|e| ReconError::read(full.display(), e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, ReconError> {
        let full = self.resolve(dir);
        let entries = std::fs::read_dir(&full).map_err(|e| ReconError::read(full.display(), e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReconError::read(full.display(), e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| ReconError::read(entry.path().display(), e))?
                .is_file();
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory sources (useful for testing).
#[derive(Debug, Default)]
pub struct MemoryLoader {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    pub fn add(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Register a directory that may have no files.
    pub fn dir(mut self, path: impl Into<String>) -> Self {
        self.dirs.insert(path.into().trim_end_matches('/').to_string());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn read(&self, path: &str) -> Result<String, ReconError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ReconError::read(path, "no such file"))
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, ReconError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let names: Vec<String> = self
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect();
        if names.is_empty() && !self.dirs.contains(dir.trim_end_matches('/')) {
            return Err(ReconError::read(dir, "no such directory"));
        }
        Ok(names)
    }
}

/// Keep files ending in `.{extension}` that are not explicitly excluded.
pub fn select_helper_files(names: &[String], extension: &str, exclude: &[String]) -> Vec<String> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    names
        .iter()
        .filter(|n| n.ends_with(&suffix))
        .filter(|n| !exclude.contains(*n))
        .cloned()
        .collect()
}

/// Join a directory and a file name with `/`, the way config paths are written.
pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// Last path component, for progress notices and group names.
pub fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
