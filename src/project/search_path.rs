//! Library search path: directories whose units resolve only when
//! `ResolverConfig::use_search_path` is on.

use std::path::{Path, PathBuf};

use super::error::LoadError;
use super::loader::{collect_unit_paths, load_file};
use crate::base::{FileId, UnitName};
use crate::ide::AnalysisHost;

/// Ordered list of library directories.
#[derive(Clone, Debug, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.add(dir);
        self
    }

    pub fn add(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Add every unit file on the path to `host` as a library file.
    ///
    /// Directories are read in order and the first one to provide a unit
    /// keeps it. Missing directories are skipped with a warning.
    pub fn load_into(&self, host: &mut AnalysisHost) -> Result<Vec<FileId>, LoadError> {
        let mut loaded = Vec::new();
        let mut errors = Vec::new();
        let mut seen: Vec<UnitName> = Vec::new();

        for dir in &self.dirs {
            let paths = match collect_unit_paths(dir) {
                Ok(paths) => paths,
                Err(e) => {
                    tracing::warn!("[LOAD] search path entry skipped: {}", e);
                    continue;
                }
            };
            for path in paths {
                if let Some(unit) = UnitName::from_path(&path) {
                    if seen.contains(&unit) {
                        tracing::debug!("[LOAD] {} hidden by an earlier directory", path.display());
                        continue;
                    }
                    seen.push(unit);
                }
                match load_file(&path) {
                    Ok(text) => loaded.push(host.add_library_file(&path, &text)),
                    Err(e) => {
                        tracing::warn!("[LOAD] skipping {}: {}", path.display(), e);
                        errors.push(e);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(LoadError::Multiple(errors))
        }
    }

    /// First file on the path whose stem names `unit`, case-insensitively.
    pub fn find_unit(&self, unit: &UnitName) -> Option<PathBuf> {
        self.dirs.iter().find_map(|dir| find_in_dir(dir, unit))
    }
}

fn find_in_dir(dir: &Path, unit: &UnitName) -> Option<PathBuf> {
    collect_unit_paths(dir)
        .ok()?
        .into_iter()
        .find(|path| UnitName::from_path(path).is_some_and(|name| &name == unit))
}
