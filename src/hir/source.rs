//! Source files known to the host and the units they declare.
//!
//! Several files may claim the same unit name (a project copy and a library
//! copy, or two project files). Every claim is kept; the owner of a unit is
//! picked from the surviving claims on each lookup, so removing one file
//! hands the unit back to the next claimant.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::{FileId, UnitName};

/// Where a file came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileOrigin {
    /// Part of the project being analyzed.
    Project,
    /// Found on a library search path.
    Library,
}

/// One loaded file.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: Arc<str>,
    /// The unit the file declares (header name, else file name).
    pub unit: UnitName,
    pub origin: FileOrigin,
}

/// Path-keyed file storage with a unit registry.
#[derive(Debug, Default)]
pub struct SourceFiles {
    ids: FxHashMap<PathBuf, FileId>,
    files: IndexMap<FileId, SourceFile>,
    /// Unit → files claiming it, oldest claim first.
    claims: FxHashMap<UnitName, Vec<FileId>>,
    next_id: u32,
}

impl SourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `file` at `path`, keeping the path's id if it already has one.
    ///
    /// Returns the id and the unit the file declared before, if any.
    pub fn set(&mut self, path: &Path, file: SourceFile) -> (FileId, Option<UnitName>) {
        let id = match self.ids.get(path) {
            Some(&id) => id,
            None => {
                let id = FileId::new(self.next_id);
                self.next_id += 1;
                self.ids.insert(path.to_owned(), id);
                id
            }
        };

        let previous = self.unclaim(id);
        self.claims.entry(file.unit.clone()).or_default().push(id);
        self.files.insert(id, file);
        (id, previous)
    }

    /// Forget `file`. Its id is not reused.
    pub fn remove(&mut self, file: FileId) -> Option<SourceFile> {
        self.unclaim(file);
        let removed = self.files.shift_remove(&file)?;
        self.ids.remove(&removed.path);
        Some(removed)
    }

    fn unclaim(&mut self, file: FileId) -> Option<UnitName> {
        let unit = self.files.get(&file)?.unit.clone();
        if let Some(claimants) = self.claims.get_mut(&unit) {
            claimants.retain(|&f| f != file);
            if claimants.is_empty() {
                self.claims.remove(&unit);
            }
        }
        Some(unit)
    }

    /// The file owning `unit`: the newest project claim, else (with
    /// `search_path`) the newest library claim.
    pub fn unit_owner(&self, unit: &UnitName, search_path: bool) -> Option<FileId> {
        let claimants = self.claims.get(unit)?;
        let newest = |origin: FileOrigin| {
            claimants
                .iter()
                .rev()
                .copied()
                .find(|f| self.files.get(f).is_some_and(|sf| sf.origin == origin))
        };
        newest(FileOrigin::Project).or_else(|| {
            if search_path {
                newest(FileOrigin::Library)
            } else {
                None
            }
        })
    }

    /// Whether a project file already claims `unit`.
    pub fn has_project_claim(&self, unit: &UnitName) -> bool {
        self.unit_owner(unit, false).is_some()
    }

    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.ids.get(path).copied()
    }

    pub fn get(&self, file: FileId) -> Option<&SourceFile> {
        self.files.get(&file)
    }

    pub fn text(&self, file: FileId) -> Option<Arc<str>> {
        self.get(file).map(|f| Arc::clone(&f.text))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
