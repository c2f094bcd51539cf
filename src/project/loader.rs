//! Loading unit files from disk into an [`AnalysisHost`].

use std::fs;
use std::path::{Path, PathBuf};

use super::error::LoadError;
use crate::base::FileId;
use crate::base::constants::SUPPORTED_EXTENSIONS;
use crate::ide::AnalysisHost;

/// Whether `path` carries one of the unit file extensions.
pub fn is_unit_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

/// Recursively collect every unit file under `dir`, sorted by path.
pub fn collect_unit_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut paths = Vec::new();
    collect_recursive(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_recursive(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let entries = fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| LoadError::io(dir, e))?.path();
        if path.is_dir() {
            collect_recursive(&path, paths)?;
        } else if is_unit_file(&path) {
            paths.push(path);
        }
    }
    Ok(())
}

/// Read a unit file, rejecting other extensions and non-UTF-8 content.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    if !is_unit_file(path) {
        return Err(LoadError::UnsupportedExtension(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8(path.to_path_buf()))
}

/// Loads project unit files into a host.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitLoader;

impl UnitLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every unit file under `dir` as a project file.
    ///
    /// A file that fails to load does not stop the others; the failures
    /// are reported together once the rest are in the host.
    pub fn load_directory(
        &self,
        dir: impl AsRef<Path>,
        host: &mut AnalysisHost,
    ) -> Result<Vec<FileId>, LoadError> {
        let dir = dir.as_ref();
        let paths = collect_unit_paths(dir)?;
        let mut loaded = Vec::with_capacity(paths.len());
        let mut errors = Vec::new();

        for path in paths {
            match load_file(&path) {
                Ok(text) => loaded.push(host.set_file_text(&path, &text)),
                Err(e) => {
                    tracing::warn!("[LOAD] skipping {}: {}", path.display(), e);
                    errors.push(e);
                }
            }
        }

        tracing::debug!("[LOAD] {} unit file(s) from {}", loaded.len(), dir.display());
        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(LoadError::Multiple(errors))
        }
    }

    /// Load a single project file.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        host: &mut AnalysisHost,
    ) -> Result<FileId, LoadError> {
        let path = path.as_ref();
        let text = load_file(path)?;
        Ok(host.set_file_text(path, &text))
    }
}
