//! In-memory declaration index.
//!
//! The host keeps every file's declarations here and answers the
//! [`DeclarationOracle`] contract from it. Lookups are by case-insensitive
//! name; members are grouped under their owning type's `(unit, name)` key.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::db::DeclarationOracle;
use super::decl::{DeclKind, Declaration};
use super::ids::{DeclId, DeclKey, LocalDeclId};
use crate::base::{FileId, NameKey, TextSize, UnitName};

/// Workspace-wide declaration storage.
#[derive(Clone, Debug, Default)]
pub struct DeclarationIndex {
    /// Declarations per file, in declaration order (the source of truth).
    by_file: IndexMap<FileId, Vec<Arc<Declaration>>>,
    /// Name -> declarations with that name, any kind.
    by_name: FxHashMap<NameKey, Vec<Arc<Declaration>>>,
    /// Owning type -> its members.
    by_owner: FxHashMap<DeclKey, Vec<Arc<Declaration>>>,
    by_id: FxHashMap<DeclId, Arc<Declaration>>,
    /// Pre-resolved identifier occurrences, keyed by the identifier's offset.
    attached: FxHashMap<(FileId, TextSize), DeclId>,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all declarations of `file`.
    ///
    /// Each declaration is stamped with `unit`, `file`, and a fresh
    /// [`DeclId`] in declaration order.
    pub fn set_file(&mut self, file: FileId, unit: &UnitName, decls: Vec<Declaration>) {
        self.remove_file(file);

        let decls: Vec<Arc<Declaration>> = decls
            .into_iter()
            .enumerate()
            .map(|(i, mut decl)| {
                decl.unit = unit.clone();
                decl.file = file;
                decl.id = DeclId::new(file, LocalDeclId::new(i as u32));
                Arc::new(decl)
            })
            .collect();

        for decl in &decls {
            self.by_name
                .entry(NameKey::new(&decl.name))
                .or_default()
                .push(Arc::clone(decl));
            if let Some(owner) = &decl.container {
                self.by_owner
                    .entry(DeclKey::new(unit.clone(), owner))
                    .or_default()
                    .push(Arc::clone(decl));
            }
            self.by_id.insert(decl.id, Arc::clone(decl));
        }

        tracing::trace!("[INDEX] {:?}: {} declarations", file, decls.len());
        self.by_file.insert(file, decls);
    }

    /// Remove all declarations (and attached references) of `file`.
    pub fn remove_file(&mut self, file: FileId) {
        if self.by_file.shift_remove(&file).is_none() {
            return;
        }
        self.by_name.retain(|_, decls| {
            decls.retain(|d| d.file != file);
            !decls.is_empty()
        });
        self.by_owner.retain(|_, decls| {
            decls.retain(|d| d.file != file);
            !decls.is_empty()
        });
        self.by_id.retain(|id, _| id.file != file);
        self.attached.retain(|(f, _), _| *f != file);
    }

    /// Move the declarations of `file` to `unit` after its header changed.
    ///
    /// Ids, lookup order and attached references are kept; members are
    /// regrouped under their owner's new `(unit, name)` key.
    pub fn set_unit(&mut self, file: FileId, unit: &UnitName) {
        let Some(decls) = self.by_file.get_mut(&file) else {
            return;
        };
        if decls.iter().all(|d| &d.unit == unit) {
            return;
        }

        for decl in decls.iter_mut() {
            let mut moved = Declaration::clone(decl);
            moved.unit = unit.clone();
            *decl = Arc::new(moved);
        }
        let fresh: FxHashMap<DeclId, Arc<Declaration>> =
            decls.iter().map(|d| (d.id, Arc::clone(d))).collect();

        for slot in self.by_name.values_mut().flatten() {
            if let Some(decl) = fresh.get(&slot.id) {
                *slot = Arc::clone(decl);
            }
        }
        self.by_owner.retain(|_, members| {
            members.retain(|d| d.file != file);
            !members.is_empty()
        });
        for decl in self.by_file[&file].iter() {
            if let Some(owner) = &decl.container {
                self.by_owner
                    .entry(DeclKey::new(unit.clone(), owner))
                    .or_default()
                    .push(Arc::clone(decl));
            }
        }
        self.by_id.extend(fresh);

        tracing::debug!("[INDEX] {:?}: declarations moved to unit '{}'", file, unit);
    }

    /// Record that the identifier at `offset` in `file` refers to `target`.
    pub fn attach_reference(&mut self, file: FileId, offset: TextSize, target: DeclId) {
        self.attached.insert((file, offset), target);
    }

    pub fn get(&self, id: DeclId) -> Option<&Arc<Declaration>> {
        self.by_id.get(&id)
    }

    /// All declarations named `name` (case-insensitive), any kind.
    pub fn lookup(&self, name: &str) -> &[Arc<Declaration>] {
        self.by_name
            .get(name.trim().to_ascii_lowercase().as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn declarations_in_file(&self, file: FileId) -> &[Arc<Declaration>] {
        self.by_file.get(&file).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn all_declarations(&self) -> impl Iterator<Item = &Arc<Declaration>> {
        self.by_file.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }
}

impl DeclarationOracle for DeclarationIndex {
    fn find(&self, name: &str, kind: DeclKind) -> Vec<Arc<Declaration>> {
        self.lookup(name)
            .iter()
            .filter(|d| d.kind() == kind)
            .cloned()
            .collect()
    }

    fn members(&self, owner: &Declaration) -> Vec<Arc<Declaration>> {
        self.by_owner.get(&owner.key()).cloned().unwrap_or_default()
    }

    fn file_declarations(&self, file: FileId) -> Vec<Arc<Declaration>> {
        self.declarations_in_file(file).to_vec()
    }

    fn attached_reference(&self, file: FileId, offset: TextSize) -> Option<Arc<Declaration>> {
        let id = self.attached.get(&(file, offset))?;
        self.by_id.get(id).cloned()
    }
}
