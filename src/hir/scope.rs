//! Last-wins scope resolution.
//!
//! Resolves a bare (or unit-qualified) identifier at one offset of one file:
//!
//! ```text
//! find(name, kind)                  every declaration, project-wide
//!     │
//!     ├─ same file ──────────────►  same_file     (always wins)
//!     ├─ priority ≥ ScopeName ───►  in_scope      (highest priority wins)
//!     └─ Unavailable ────────────►  out_of_scope  (diagnosis)
//! ```
//!
//! Priority is the owning unit's index in the uses list visible at the
//! offset, so with `uses A, B;` a name declared in both binds to `B`.
//! Built-ins short-circuit everything.
//!
//! The algorithm is written once, generic over [`DeclarationKind`], and
//! instantiated for types, routines and variables.

use std::sync::Arc;

use indexmap::IndexSet;
use smol_str::SmolStr;
use thiserror::Error;

use super::builtins::BuiltinRegistry;
use super::db::{DeclarationOracle, ResolveContext, UnitResolver};
use super::decl::{DeclKind, Declaration, Scoped, split_qualified};
use super::deps::TransitiveDependencyResolver;
use super::ids::DeclKey;
use super::uses::{UnitPriority, UsesClauseIndex};
use crate::base::{FileId, TextSize, UnitName};

// ============================================================================
// DIAGNOSIS / OUTCOME
// ============================================================================

/// Why a name that exists in the project does not resolve here.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScopeDiagnosis {
    #[error("'{name}' is declared in unit '{unit}', which is not in the uses clause")]
    NotInUses { name: SmolStr, unit: UnitName },

    #[error(
        "'{name}' is declared in unit '{unit}', which is only in the implementation uses clause; \
         interface code cannot see it"
    )]
    ImplementationOnly { name: SmolStr, unit: UnitName },

    #[error("'{name}' is declared in units not in the uses clause: {}", join_units(.units))]
    AmbiguousOutOfScope { name: SmolStr, units: Vec<UnitName> },
}

impl ScopeDiagnosis {
    /// Units the name was found in.
    pub fn units(&self) -> &[UnitName] {
        match self {
            ScopeDiagnosis::NotInUses { unit, .. } | ScopeDiagnosis::ImplementationOnly { unit, .. } => {
                std::slice::from_ref(unit)
            }
            ScopeDiagnosis::AmbiguousOutOfScope { units, .. } => units,
        }
    }
}

fn join_units(units: &[UnitName]) -> String {
    units
        .iter()
        .map(UnitName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classification of a [`ScopeResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeOutcome {
    Builtin,
    Resolved,
    /// Exists in exactly one unit that is not visible here.
    NotInScope,
    /// Exists in several units, none visible here.
    AmbiguousOutOfScope,
    /// Not declared anywhere. Left to other validation.
    Inconclusive,
}

// ============================================================================
// RESULT
// ============================================================================

/// A declaration visible through the uses clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InScopeCandidate {
    pub decl: Arc<Declaration>,
    pub priority: UnitPriority,
}

/// The outcome of resolving one identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeResult {
    /// The bare name that was looked up.
    pub name: SmolStr,
    pub kind: DeclKind,
    pub builtin: bool,
    /// Declarations in the referencing file. Visible locals come first,
    /// narrowest scope first.
    pub same_file: Vec<Arc<Declaration>>,
    /// Visible imported declarations, highest priority first.
    pub in_scope: Vec<InScopeCandidate>,
    pub out_of_scope: Vec<Arc<Declaration>>,
    pub diagnosis: Option<ScopeDiagnosis>,
}

impl ScopeResult {
    fn empty(name: &str, kind: DeclKind) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            builtin: false,
            same_file: Vec::new(),
            in_scope: Vec::new(),
            out_of_scope: Vec::new(),
            diagnosis: None,
        }
    }

    /// First same-file candidate, else the highest-priority in-scope one.
    pub fn resolved(&self) -> Option<&Arc<Declaration>> {
        self.same_file
            .first()
            .or_else(|| self.in_scope.first().map(|c| &c.decl))
    }

    /// The full overload set of the winning unit: every same-file candidate,
    /// or every in-scope candidate sharing the top priority.
    pub fn candidates(&self) -> Vec<Arc<Declaration>> {
        if !self.same_file.is_empty() {
            return self.same_file.clone();
        }
        let Some(top) = self.in_scope.first() else {
            return Vec::new();
        };
        self.in_scope
            .iter()
            .take_while(|c| c.priority == top.priority)
            .map(|c| Arc::clone(&c.decl))
            .collect()
    }

    pub fn outcome(&self) -> ScopeOutcome {
        if self.builtin {
            return ScopeOutcome::Builtin;
        }
        if self.resolved().is_some() {
            return ScopeOutcome::Resolved;
        }
        match &self.diagnosis {
            Some(ScopeDiagnosis::AmbiguousOutOfScope { .. }) => ScopeOutcome::AmbiguousOutOfScope,
            Some(_) => ScopeOutcome::NotInScope,
            None => ScopeOutcome::Inconclusive,
        }
    }

    /// The user-facing diagnosis text, if any.
    pub fn diagnosis_message(&self) -> Option<String> {
        self.diagnosis.as_ref().map(ToString::to_string)
    }
}

// ============================================================================
// KIND ABSTRACTION
// ============================================================================

/// A declaration kind the scope algorithm can be instantiated for.
pub trait DeclarationKind {
    const KIND: DeclKind;

    fn is_builtin(name: &str) -> bool {
        BuiltinRegistry::is_builtin(name, Self::KIND)
    }
}

pub struct Types;
pub struct Routines;
pub struct Variables;

impl DeclarationKind for Types {
    const KIND: DeclKind = DeclKind::Type;
}

impl DeclarationKind for Routines {
    const KIND: DeclKind = DeclKind::Routine;
}

impl DeclarationKind for Variables {
    const KIND: DeclKind = DeclKind::Variable;
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Candidates split by visibility.
struct Partition<D> {
    same_file: Vec<D>,
    in_scope: Vec<(D, UnitPriority)>,
    out_of_scope: Vec<D>,
}

/// Split `candidates` as seen from `offset` in `file`.
///
/// Members never take part: they are reached through a qualifying
/// expression, not by bare name. Routine-local declarations only count in
/// their own file and only inside their scope.
fn partition<D: Scoped>(
    candidates: Vec<D>,
    file: FileId,
    offset: TextSize,
    priority: impl Fn(&UnitName) -> UnitPriority,
) -> Partition<D> {
    let mut same_file = Vec::new();
    let mut in_scope = Vec::new();
    let mut out_of_scope = Vec::new();

    for candidate in candidates {
        if candidate.is_member() {
            continue;
        }
        if let Some(scope) = candidate.local_scope() {
            if candidate.owning_file() == file && scope.contains_inclusive(offset) {
                same_file.push(candidate);
            }
            continue;
        }
        if candidate.owning_file() == file {
            same_file.push(candidate);
            continue;
        }
        let p = priority(candidate.owning_unit());
        if p.is_in_scope() {
            in_scope.push((candidate, p));
        } else {
            out_of_scope.push(candidate);
        }
    }

    // Stable sorts: declaration order breaks ties.
    same_file.sort_by_key(|c| c.local_scope().map_or(u32::MAX, |r| u32::from(r.len())));
    in_scope.sort_by(|a, b| b.1.cmp(&a.1));

    Partition {
        same_file,
        in_scope,
        out_of_scope,
    }
}

/// Diagnose out-of-scope candidates by their distinct owning units.
fn diagnose<D: Scoped>(
    name: &str,
    out_of_scope: &[D],
    implementation_only: impl Fn(&UnitName) -> bool,
) -> Option<ScopeDiagnosis> {
    let units: IndexSet<UnitName> = out_of_scope
        .iter()
        .map(|c| c.owning_unit().clone())
        .collect();
    let name = SmolStr::new(name);

    match units.len() {
        0 => None,
        1 => {
            let unit = units.into_iter().next()?;
            if implementation_only(&unit) {
                Some(ScopeDiagnosis::ImplementationOnly { name, unit })
            } else {
                Some(ScopeDiagnosis::NotInUses { name, unit })
            }
        }
        _ => Some(ScopeDiagnosis::AmbiguousOutOfScope {
            name,
            units: units.into_iter().collect(),
        }),
    }
}

/// Resolves identifiers against the uses clause of the referencing file.
#[derive(Clone, Copy)]
pub struct ScopeResolver<'a> {
    ctx: ResolveContext<'a>,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    /// Resolve `name` as referenced at `offset` in `file`.
    ///
    /// `name` may carry a unit qualifier (`Classes.TList`), which restricts
    /// candidates to that unit.
    pub fn resolve(&self, name: &str, file: FileId, offset: TextSize, kind: DeclKind) -> ScopeResult {
        self.resolve_excluding(name, file, offset, kind, None)
    }

    pub fn resolve_type(&self, name: &str, file: FileId, offset: TextSize) -> ScopeResult {
        self.resolve_kind::<Types>(name, file, offset, None)
    }

    pub fn resolve_routine(&self, name: &str, file: FileId, offset: TextSize) -> ScopeResult {
        self.resolve_kind::<Routines>(name, file, offset, None)
    }

    pub fn resolve_variable(&self, name: &str, file: FileId, offset: TextSize) -> ScopeResult {
        self.resolve_kind::<Variables>(name, file, offset, None)
    }

    /// [`resolve`](Self::resolve), ignoring the declaration `exclude`.
    /// Used for `TFoo = class(Other.TFoo)`.
    pub(crate) fn resolve_excluding(
        &self,
        name: &str,
        file: FileId,
        offset: TextSize,
        kind: DeclKind,
        exclude: Option<&DeclKey>,
    ) -> ScopeResult {
        match kind {
            DeclKind::Type => self.resolve_kind::<Types>(name, file, offset, exclude),
            DeclKind::Routine => self.resolve_kind::<Routines>(name, file, offset, exclude),
            DeclKind::Variable => self.resolve_kind::<Variables>(name, file, offset, exclude),
        }
    }

    fn resolve_kind<K: DeclarationKind>(
        &self,
        name: &str,
        file: FileId,
        offset: TextSize,
        exclude: Option<&DeclKey>,
    ) -> ScopeResult {
        let (qualifier, bare) = split_qualified(name);
        let mut result = ScopeResult::empty(bare, K::KIND);

        if qualifier.is_none() && K::is_builtin(bare) {
            tracing::trace!("[SCOPE] '{}' is a built-in {}", bare, K::KIND.as_str());
            result.builtin = true;
            return result;
        }

        let scope_names = &self.ctx.config.scope_names[..];
        let qualifier = qualifier.map(UnitName::new);
        let candidates: Vec<Arc<Declaration>> = self
            .ctx
            .db
            .find(bare, K::KIND)
            .into_iter()
            .filter(|d| {
                qualifier
                    .as_ref()
                    .is_none_or(|q| d.unit.matches_scoped(q, scope_names))
            })
            .filter(|d| exclude.is_none_or(|key| d.key() != *key))
            // A shadowed copy of a unit (library behind project) never competes.
            .filter(|d| {
                d.file == file
                    || self
                        .ctx
                        .db
                        .resolve_unit(&d.unit, true)
                        .is_none_or(|owner| owner == d.file)
            })
            .collect();
        if candidates.is_empty() {
            tracing::trace!("[SCOPE] '{}' not declared anywhere", name);
            return result;
        }

        let clause = UsesClauseIndex::new(self.ctx).uses_clause(file);
        let parts = partition(candidates, file, offset, |unit| {
            clause.unit_priority(unit, offset, scope_names)
        });

        result.same_file = parts.same_file;
        result.in_scope = parts
            .in_scope
            .into_iter()
            .map(|(decl, priority)| InScopeCandidate { decl, priority })
            .collect();

        if result.same_file.is_empty() && result.in_scope.is_empty() {
            let in_interface = clause.is_in_interface(offset);
            result.diagnosis = diagnose(bare, &parts.out_of_scope, |unit| {
                in_interface && clause.lists_in_implementation(unit, scope_names)
            });
            if let Some(diagnosis) = &result.diagnosis {
                tracing::debug!("[SCOPE] {:?}@{:?}: {}", file, offset, diagnosis);
            }
        }
        result.out_of_scope = parts.out_of_scope;

        tracing::trace!(
            "[SCOPE] '{}' {}: {} same-file, {} in scope, {} out of scope",
            name,
            K::KIND.as_str(),
            result.same_file.len(),
            result.in_scope.len(),
            result.out_of_scope.len()
        );
        result
    }

    /// Resolve a type name as seen from `offset` in `file`, falling back to
    /// the file's transitive-dependency closure when the uses clause alone
    /// does not bind it.
    ///
    /// Among closure candidates the one whose unit was discovered first wins.
    pub fn resolve_type_in_closure(
        &self,
        name: &str,
        file: FileId,
        offset: TextSize,
    ) -> Option<Arc<Declaration>> {
        self.resolve_type_in_closure_excluding(name, file, offset, None)
    }

    pub(crate) fn resolve_type_in_closure_excluding(
        &self,
        name: &str,
        file: FileId,
        offset: TextSize,
        exclude: Option<&DeclKey>,
    ) -> Option<Arc<Declaration>> {
        let result = self.resolve_kind::<Types>(name, file, offset, exclude);
        if let Some(decl) = result.resolved() {
            return Some(Arc::clone(decl));
        }
        if result.out_of_scope.is_empty() {
            return None;
        }

        let scope_names = &self.ctx.config.scope_names[..];
        let deps = TransitiveDependencyResolver::new(self.ctx).dependencies(file);
        result
            .out_of_scope
            .iter()
            .filter_map(|d| deps.position_of(&d.unit, scope_names).map(|pos| (pos, d)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, d)| Arc::clone(d))
    }
}
