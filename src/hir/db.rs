//! Collaborator contracts and the resolution context.
//!
//! The engine consumes three external services:
//!
//! ```text
//! DeclarationOracle  find(name, kind) → every matching declaration, project-wide
//! UnitResolver       resolve_unit(name, search_path) → file holding that unit
//! SourceProvider     file_text(file) / unit_outline(file) → raw input for uses scanning
//! ```
//!
//! [`Db`] bundles them with the host's generation counter. Resolvers borrow
//! a [`ResolveContext`] (db + caches + config) and never own state.

use std::sync::Arc;

use super::cache::CacheService;
use super::config::ResolverConfig;
use super::decl::{DeclKind, Declaration};
use super::uses::UnitOutline;
use crate::base::{FileId, TextSize, UnitName};

// ============================================================================
// CONTRACTS
// ============================================================================

/// Source of declarations.
pub trait DeclarationOracle {
    /// Every declaration of `kind` named `name` (case-insensitive), regardless
    /// of whether it is reachable from anywhere.
    fn find(&self, name: &str, kind: DeclKind) -> Vec<Arc<Declaration>>;

    /// Members declared directly in `owner` (fields, properties, methods,
    /// nested types), in declaration order.
    fn members(&self, owner: &Declaration) -> Vec<Arc<Declaration>>;

    /// All declarations in `file`, in declaration order.
    fn file_declarations(&self, _file: FileId) -> Vec<Arc<Declaration>> {
        Vec::new()
    }

    /// A resolution already attached to the identifier starting at `offset`
    /// (e.g. by the parser for `with` blocks or by a previous pass).
    fn attached_reference(&self, _file: FileId, _offset: TextSize) -> Option<Arc<Declaration>> {
        None
    }
}

/// Maps unit names to the files that define them.
pub trait UnitResolver {
    /// `search_path` allows library directories in addition to project files.
    fn resolve_unit(&self, name: &UnitName, search_path: bool) -> Option<FileId>;
}

/// Raw input for uses-clause extraction.
pub trait SourceProvider {
    fn file_text(&self, file: FileId) -> Option<Arc<str>>;

    /// A pre-parsed outline of the unit, when a full parse is available.
    fn unit_outline(&self, _file: FileId) -> Option<Arc<UnitOutline>> {
        None
    }
}

/// Everything the resolvers read, plus the host's modification generation.
pub trait Db: DeclarationOracle + UnitResolver + SourceProvider + Sync {
    fn generation(&self) -> u64;
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Borrowed state threaded through every resolver call.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub db: &'a dyn Db,
    pub caches: &'a CacheService,
    pub config: &'a ResolverConfig,
}

impl<'a> ResolveContext<'a> {
    pub fn new(db: &'a dyn Db, caches: &'a CacheService, config: &'a ResolverConfig) -> Self {
        Self { db, caches, config }
    }

    /// The generation every cache lookup in this call is keyed on.
    pub fn generation(&self) -> u64 {
        self.db.generation()
    }

    /// Resolve a unit name to its file, memoized per generation.
    pub fn unit_file(&self, name: &UnitName) -> Option<FileId> {
        let search_path = self.config.use_search_path;
        self.caches
            .unit_files
            .get_or_compute(self.generation(), &(name.clone(), search_path), || {
                let file = self.db.resolve_unit(name, search_path).or_else(|| {
                    // `Forms` may be registered as `Vcl.Forms` and vice versa.
                    self.config.scope_names.iter().find_map(|scope| {
                        let candidate = scoped_alternative(name, scope)?;
                        self.db.resolve_unit(&candidate, search_path)
                    })
                });
                tracing::trace!("[DEPS] unit '{}' -> {:?}", name, file);
                file
            })
    }
}

/// The other spelling of `name` with respect to `scope`: strip the scope
/// prefix if present, otherwise add it.
fn scoped_alternative(name: &UnitName, scope: &str) -> Option<UnitName> {
    let text = name.as_str();
    let prefix_len = scope.len();
    if let Some(rest) = text.get(prefix_len..).and_then(|r| r.strip_prefix('.')) {
        if !rest.is_empty() && text[..prefix_len].eq_ignore_ascii_case(scope) {
            return Some(UnitName::new(rest));
        }
    }
    if text.contains('.') {
        return None;
    }
    Some(UnitName::new(&format!("{scope}.{text}")))
}
