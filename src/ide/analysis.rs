//! AnalysisHost and Analysis: state ownership and query snapshots.
//!
//! The `AnalysisHost` owns all mutable state: file text, declarations,
//! unit registry, config, caches and the modification generation.
//! `Analysis` is a read-only, `Sync` view over it that answers every
//! resolution query and may be shared across threads.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//!
//! let main = host.set_file_text("src/Main.pas", text);
//! host.set_declarations(main, decls);
//!
//! let analysis = host.analysis();
//! let result = analysis.resolve("TMyType", main, offset, DeclKind::Type);
//! ```
//!
//! Every mutation advances the generation, so the next query through a
//! fresh `Analysis` recomputes whatever it touches.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{FileId, LineCol, LineIndex, TextSize, UnitName};
use crate::hir::{
    CacheService, ChainResolutionResult, DeclId, DeclKind, Declaration, DeclarationIndex,
    DeclarationOracle, Db, Diagnostic, FileOrigin, InheritanceChainResolver, InheritanceInfo,
    MemberChainResolver, ModificationTracker, ResolveContext, ResolverConfig, ScopeResolver,
    ScopeResult, SourceFile, SourceFiles, SourceProvider, TransitiveDependencyResolver,
    TransitiveDependencyResult, UnitOutline, UnitPriority, UnitResolver, UsesClause,
    UsesClauseIndex, check_file,
};

use super::goto::{GotoResult, goto_definition};

/// Owns all mutable state of the engine.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    files: SourceFiles,
    outlines: FxHashMap<FileId, Arc<UnitOutline>>,
    index: DeclarationIndex,
    tracker: ModificationTracker,
    caches: CacheService,
    config: ResolverConfig,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------------
    // Mutation (each advances the generation)
    // ------------------------------------------------------------------------

    /// Set the text of a project file and register the unit it declares.
    ///
    /// The unit name comes from the file's header, or from the file name
    /// when there is none.
    pub fn set_file_text(&mut self, path: impl AsRef<Path>, text: &str) -> FileId {
        self.set_text(path.as_ref(), text, false)
    }

    /// Add a file found on a library search path. Its unit only resolves
    /// when the config enables the search path, and never shadows a project
    /// unit of the same name.
    pub fn add_library_file(&mut self, path: impl AsRef<Path>, text: &str) -> FileId {
        self.set_text(path.as_ref(), text, true)
    }

    fn set_text(&mut self, path: &Path, text: &str, library: bool) -> FileId {
        let unit = UsesClauseIndex::parse(text)
            .unit_name
            .or_else(|| UnitName::from_path(path))
            .unwrap_or_else(|| UnitName::new(&path.to_string_lossy()));
        let origin = if library {
            FileOrigin::Library
        } else {
            FileOrigin::Project
        };
        if library && self.files.has_project_claim(&unit) {
            tracing::debug!("[LOAD] library unit '{}' shadowed by project unit", unit);
        }

        let (file, previous) = self.files.set(
            path,
            SourceFile {
                path: path.to_owned(),
                text: Arc::from(text),
                unit: unit.clone(),
                origin,
            },
        );
        if previous.is_some_and(|old| old != unit) {
            self.index.set_unit(file, &unit);
        }

        self.tracker.bump();
        file
    }

    /// Remove a file with its declarations, outline and unit registration.
    /// Another file claiming the same unit takes over.
    pub fn remove_file(&mut self, file: FileId) {
        self.files.remove(file);
        self.outlines.remove(&file);
        self.index.remove_file(file);
        self.tracker.bump();
    }

    /// Replace the declarations of `file`. They are stamped with the file's
    /// unit name.
    pub fn set_declarations(&mut self, file: FileId, decls: Vec<Declaration>) {
        let unit = self
            .unit_name(file)
            .cloned()
            .unwrap_or_else(|| UnitName::new(&file.to_string()));
        self.index.set_file(file, &unit, decls);
        self.tracker.bump();
    }

    /// Supply a parsed outline for `file`; it takes precedence over the
    /// text scan for uses extraction.
    pub fn set_outline(&mut self, file: FileId, outline: UnitOutline) {
        self.outlines.insert(file, Arc::new(outline));
        self.tracker.bump();
    }

    /// Record that the identifier at `offset` in `file` refers to `target`.
    pub fn attach_reference(&mut self, file: FileId, offset: TextSize, target: DeclId) {
        self.index.attach_reference(file, offset, target);
        self.tracker.bump();
    }

    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
        self.tracker.bump();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.tracker.generation()
    }

    pub fn caches(&self) -> &CacheService {
        &self.caches
    }

    pub fn declarations(&self) -> &DeclarationIndex {
        &self.index
    }

    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.files.lookup(path.as_ref())
    }

    pub fn file_path(&self, file: FileId) -> Option<PathBuf> {
        self.files.get(file).map(|f| f.path.clone())
    }

    /// The unit `file` was registered as.
    pub fn unit_name(&self, file: FileId) -> Option<&UnitName> {
        self.files.get(file).map(|f| &f.unit)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// A consistent read-only snapshot for queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis { host: self }
    }
}

/// One resolution request for [`Analysis::resolve_batch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveRequest {
    pub name: SmolStr,
    pub file: FileId,
    pub offset: TextSize,
    pub kind: DeclKind,
}

impl ResolveRequest {
    pub fn new(name: &str, file: FileId, offset: TextSize, kind: DeclKind) -> Self {
        Self {
            name: SmolStr::new(name),
            file,
            offset,
            kind,
        }
    }
}

/// Read-only view of an [`AnalysisHost`].
#[derive(Clone, Copy)]
pub struct Analysis<'a> {
    host: &'a AnalysisHost,
}

impl<'a> Analysis<'a> {
    /// The context every resolver call runs in.
    pub fn ctx(&self) -> ResolveContext<'_> {
        ResolveContext::new(self, &self.host.caches, &self.host.config)
    }

    /// Resolve `name` referenced at `offset` in `file`.
    pub fn resolve(&self, name: &str, file: FileId, offset: TextSize, kind: DeclKind) -> ScopeResult {
        ScopeResolver::new(self.ctx()).resolve(name, file, offset, kind)
    }

    /// Resolve many references in parallel.
    pub fn resolve_batch(&self, requests: &[ResolveRequest]) -> Vec<ScopeResult> {
        requests
            .par_iter()
            .map(|r| self.resolve(&r.name, r.file, r.offset, r.kind))
            .collect()
    }

    pub fn uses_clause(&self, file: FileId) -> Arc<UsesClause> {
        UsesClauseIndex::new(self.ctx()).uses_clause(file)
    }

    pub fn available_units(&self, file: FileId, offset: TextSize) -> Vec<UnitName> {
        UsesClauseIndex::new(self.ctx()).available_units(file, offset)
    }

    pub fn unit_priority(&self, file: FileId, unit: &str, offset: TextSize) -> UnitPriority {
        UsesClauseIndex::new(self.ctx()).unit_priority(file, &UnitName::new(unit), offset)
    }

    pub fn transitive_dependencies(&self, file: FileId) -> Arc<TransitiveDependencyResult> {
        TransitiveDependencyResolver::new(self.ctx()).dependencies(file)
    }

    pub fn inheritance_info(&self, ty: &Declaration) -> Arc<InheritanceInfo> {
        InheritanceChainResolver::new(self.ctx()).inheritance_info(ty)
    }

    pub fn is_descendant_of(&self, ty: &Declaration, ancestor: &str) -> bool {
        InheritanceChainResolver::new(self.ctx()).is_descendant_of(ty, ancestor)
    }

    /// Resolve the member chain containing the identifier at `offset`.
    pub fn resolve_chain(&self, file: FileId, offset: TextSize) -> Option<ChainResolutionResult> {
        MemberChainResolver::new(self.ctx()).resolve_at(file, offset)
    }

    /// Definition of the identifier at a 0-indexed line and column.
    pub fn goto_definition(&self, file: FileId, line: u32, col: u32) -> GotoResult {
        goto_definition(self.ctx(), file, LineCol::new(line, col))
    }

    pub fn check_file(&self, file: FileId) -> Vec<Diagnostic> {
        check_file(self.ctx(), file)
    }

    /// Every declaration of `kind` named `name`, reachable or not.
    pub fn find_declarations(&self, name: &str, kind: DeclKind) -> Vec<Arc<Declaration>> {
        self.host.index.find(name, kind)
    }

    pub fn file_text(&self, file: FileId) -> Option<Arc<str>> {
        self.host.files.text(file)
    }

    /// Byte offset of a 0-indexed line and column in `file`.
    pub fn offset_at(&self, file: FileId, line: u32, col: u32) -> Option<TextSize> {
        let text = self.file_text(file)?;
        LineIndex::new(&text).offset(LineCol::new(line, col))
    }
}

impl DeclarationOracle for Analysis<'_> {
    fn find(&self, name: &str, kind: DeclKind) -> Vec<Arc<Declaration>> {
        self.host.index.find(name, kind)
    }

    fn members(&self, owner: &Declaration) -> Vec<Arc<Declaration>> {
        self.host.index.members(owner)
    }

    fn file_declarations(&self, file: FileId) -> Vec<Arc<Declaration>> {
        self.host.index.file_declarations(file)
    }

    fn attached_reference(&self, file: FileId, offset: TextSize) -> Option<Arc<Declaration>> {
        self.host.index.attached_reference(file, offset)
    }
}

impl UnitResolver for Analysis<'_> {
    fn resolve_unit(&self, name: &UnitName, search_path: bool) -> Option<FileId> {
        self.host.files.unit_owner(name, search_path)
    }
}

impl SourceProvider for Analysis<'_> {
    fn file_text(&self, file: FileId) -> Option<Arc<str>> {
        self.host.files.text(file)
    }

    fn unit_outline(&self, file: FileId) -> Option<Arc<UnitOutline>> {
        self.host.outlines.get(&file).cloned()
    }
}

impl Db for Analysis<'_> {
    fn generation(&self) -> u64 {
        self.host.tracker.generation()
    }
}
