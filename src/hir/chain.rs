//! Member chains: `a.b.c` resolved segment by segment.
//!
//! ```text
//! Outer . Middle . Inner . Value
//!   │       │        │       │
//!   │       │        │       └─ member of TInner (own or inherited)
//!   │       │        └─ member of TMiddle
//!   │       └─ member of TOuter
//!   └─ attached ref / local / type / Self / enclosing class / global / routine
//! ```
//!
//! After each segment the resolved declaration's declared type becomes the
//! context for the next one. Type names are always bound from the file the
//! chain appears in, never from the file the type text came from. A failed
//! segment leaves itself and everything after it unresolved.

use std::sync::Arc;

use smol_str::SmolStr;

use super::db::{DeclarationOracle, ResolveContext, SourceProvider};
use super::decl::{DeclKind, Declaration, split_qualified};
use super::inherit::InheritanceChainResolver;
use super::scope::ScopeResolver;
use crate::base::{FileId, TextRange, TextSize};
use crate::parser::{SyntaxKind, significant_tokens};

// ============================================================================
// CHAIN EXTRACTION
// ============================================================================

/// One identifier of a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainSegment {
    pub name: SmolStr,
    pub range: TextRange,
}

/// A dotted access chain found in source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberChain {
    pub segments: Vec<ChainSegment>,
    /// Index of the segment the chain was extracted around.
    pub focus: usize,
    /// The leftmost segment follows a `.` applied to something that is not
    /// an identifier (`GetList().Count`), so it has no resolvable context.
    pub detached: bool,
}

impl MemberChain {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Extract the chain containing the identifier at `offset`.
///
/// Walks back across `. identifier` pairs to the leftmost identifier, then
/// forward as long as the pattern holds. Comments and whitespace between
/// tokens are skipped. Returns `None` when `offset` is not on an identifier.
pub fn extract_chain(text: &str, offset: TextSize) -> Option<MemberChain> {
    let tokens = significant_tokens(text);
    let at = tokens
        .iter()
        .position(|t| t.range().contains_inclusive(offset) && t.kind.is_name())?;

    let is_name = |i: usize| tokens.get(i).is_some_and(|t| t.kind.is_name());
    let is_dot = |i: usize| tokens.get(i).is_some_and(|t| t.kind == SyntaxKind::DOT);

    let mut start = at;
    while start >= 2 && is_dot(start - 1) && is_name(start - 2) {
        start -= 2;
    }
    let detached = start >= 1 && is_dot(start - 1);

    let mut end = at;
    while is_dot(end + 1) && is_name(end + 2) {
        end += 2;
    }

    let segments = tokens[start..=end]
        .iter()
        .step_by(2)
        .map(|t| ChainSegment {
            name: SmolStr::new(t.name()),
            range: t.range(),
        })
        .collect();

    Some(MemberChain {
        segments,
        focus: (at - start) / 2,
        detached,
    })
}

// ============================================================================
// RESULT
// ============================================================================

/// A chain with one resolution slot per segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainResolutionResult {
    pub chain: MemberChain,
    /// Same length as `chain.segments`.
    pub resolved: Vec<Option<Arc<Declaration>>>,
}

impl ChainResolutionResult {
    fn unresolved(chain: MemberChain) -> Self {
        let resolved = vec![None; chain.len()];
        Self { chain, resolved }
    }

    pub fn fully_resolved(&self) -> bool {
        self.resolved.iter().all(Option::is_some)
    }

    /// Resolution of the last segment.
    pub fn last_resolved(&self) -> Option<&Arc<Declaration>> {
        self.resolved.last().and_then(Option::as_ref)
    }

    /// Resolution of the segment the chain was extracted around.
    pub fn focused(&self) -> Option<&Arc<Declaration>> {
        self.resolved.get(self.chain.focus).and_then(Option::as_ref)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves member chains through scope, inheritance and dependency lookups.
#[derive(Clone, Copy)]
pub struct MemberChainResolver<'a> {
    ctx: ResolveContext<'a>,
}

impl<'a> MemberChainResolver<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    /// Extract and resolve the chain around `offset` in `file`.
    pub fn resolve_at(&self, file: FileId, offset: TextSize) -> Option<ChainResolutionResult> {
        let text = self.ctx.db.file_text(file)?;
        let chain = extract_chain(&text, offset)?;
        Some(self.resolve_chain(file, chain))
    }

    /// Resolve an extracted chain appearing in `file`.
    pub fn resolve_chain(&self, file: FileId, chain: MemberChain) -> ChainResolutionResult {
        let mut result = ChainResolutionResult::unresolved(chain);
        if result.chain.detached || result.chain.is_empty() {
            return result;
        }

        let head = &result.chain.segments[0];
        let origin = head.range.start();
        let Some(first) = self.resolve_head(file, head) else {
            tracing::trace!("[CHAIN] head '{}' unresolved", head.name);
            return result;
        };
        let mut context = self.type_of(&first, file, origin);
        result.resolved[0] = Some(first);

        for i in 1..result.chain.len() {
            let Some(ty) = context.take() else {
                break;
            };
            let name = &result.chain.segments[i].name;
            let Some(member) = self.find_member(&ty, name, file) else {
                tracing::trace!("[CHAIN] '{}' is not a visible member of '{}'", name, ty.name);
                break;
            };
            context = self.type_of(&member, file, origin);
            result.resolved[i] = Some(member);
        }

        tracing::trace!(
            "[CHAIN] {:?}: {}/{} resolved",
            result.chain.names(),
            result.resolved.iter().filter(|r| r.is_some()).count(),
            result.chain.len()
        );
        result
    }

    /// Segment 0: the first lookup that succeeds wins.
    fn resolve_head(&self, file: FileId, head: &ChainSegment) -> Option<Arc<Declaration>> {
        let db = self.ctx.db;
        let scope = ScopeResolver::new(self.ctx);
        let offset = head.range.start();
        let name = head.name.as_str();

        if let Some(attached) = db.attached_reference(file, offset) {
            return Some(attached);
        }
        if let Some(local) = self.local_variable(file, name, offset) {
            return Some(local);
        }
        if let Some(ty) = scope.resolve_type_in_closure(name, file, offset) {
            return Some(ty);
        }
        if name.eq_ignore_ascii_case("Self") {
            return self.enclosing_type(file, offset);
        }
        if let Some(member) = self
            .enclosing_type(file, offset)
            .and_then(|ty| self.find_member(&ty, name, file))
        {
            return Some(member);
        }
        if let Some(global) = scope.resolve_variable(name, file, offset).resolved() {
            return Some(Arc::clone(global));
        }
        scope
            .resolve_routine(name, file, offset)
            .resolved()
            .map(Arc::clone)
    }

    /// The innermost local or parameter named `name` visible at `offset`.
    fn local_variable(&self, file: FileId, name: &str, offset: TextSize) -> Option<Arc<Declaration>> {
        self.ctx
            .db
            .find(name, DeclKind::Variable)
            .into_iter()
            .filter(|d| d.is_local() && d.file == file)
            .filter_map(|d| {
                let scope = d.scope?;
                scope.contains_inclusive(offset).then_some((scope.len(), d))
            })
            .min_by_key(|(len, _)| *len)
            .map(|(_, d)| d)
    }

    /// The class whose method body contains `offset`.
    fn enclosing_type(&self, file: FileId, offset: TextSize) -> Option<Arc<Declaration>> {
        let method = self
            .ctx
            .db
            .file_declarations(file)
            .into_iter()
            .filter(|d| d.kind() == DeclKind::Routine && d.container.is_some())
            .filter_map(|d| {
                let scope = d.scope?;
                scope.contains_inclusive(offset).then_some((scope.len(), d))
            })
            .min_by_key(|(len, _)| *len)
            .map(|(_, d)| d)?;
        let container = method.container.as_deref()?;
        ScopeResolver::new(self.ctx).resolve_type_in_closure(container, file, method.offset)
    }

    /// A member of `ty` or of one of its ancestors, visible from `origin`.
    /// Own members shadow inherited ones.
    pub fn find_member(&self, ty: &Declaration, name: &str, origin: FileId) -> Option<Arc<Declaration>> {
        self.members_with_inherited(ty)
            .into_iter()
            .find(|m| m.is_named(name) && m.visibility.is_accessible(m.file, origin))
    }

    /// Members of `ty` followed by those of each ancestor, nearest first.
    pub fn members_with_inherited(&self, ty: &Declaration) -> Vec<Arc<Declaration>> {
        let db = self.ctx.db;
        let mut members = db.members(ty);
        let info = InheritanceChainResolver::new(self.ctx).inheritance_info(ty);
        for ancestor in &info.ancestors {
            members.extend(db.members(ancestor));
        }
        members
    }

    /// The type a resolved segment hands to the next one.
    ///
    /// Types are their own context. Variables use their declared type, or
    /// for untyped inline variables the type inferred from the initializer.
    /// Routines provide none.
    fn type_of(
        &self,
        decl: &Arc<Declaration>,
        origin: FileId,
        offset: TextSize,
    ) -> Option<Arc<Declaration>> {
        match decl.kind() {
            DeclKind::Type => Some(Arc::clone(decl)),
            DeclKind::Variable => match decl.type_name() {
                Some(type_name) => ScopeResolver::new(self.ctx)
                    .resolve_type_in_closure(type_name, origin, offset),
                None => self.infer_type(decl, origin, offset),
            },
            DeclKind::Routine => None,
        }
    }

    /// Type of `var X := Call;` from the called routine: the owning type for
    /// constructors (`TFoo.Create`), otherwise the declared return type.
    fn infer_type(&self, decl: &Declaration, origin: FileId, offset: TextSize) -> Option<Arc<Declaration>> {
        let call = decl.initializer_call()?;
        let scope = ScopeResolver::new(self.ctx);
        let (owner, routine_name) = split_qualified(call);

        let routine = match owner {
            Some(owner) => {
                let owner_ty = scope.resolve_type_in_closure(owner, decl.file, decl.offset)?;
                let routine = self
                    .members_with_inherited(&owner_ty)
                    .into_iter()
                    .find(|m| m.kind() == DeclKind::Routine && m.is_named(routine_name))?;
                if routine.signature().is_some_and(|sig| sig.is_constructor) {
                    tracing::trace!("[CHAIN] '{}' inferred from constructor", decl.name);
                    return Some(owner_ty);
                }
                routine
            }
            None => {
                // Methods of the enclosing class first.
                let enclosing = self.enclosing_type(decl.file, decl.offset);
                let method = enclosing.as_ref().and_then(|ty| {
                    self.members_with_inherited(ty).into_iter().find(|m| {
                        m.kind() == DeclKind::Routine
                            && m.is_named(routine_name)
                            && m.visibility.is_accessible(m.file, decl.file)
                    })
                });
                match (method, enclosing) {
                    (Some(method), Some(ty)) if method.signature().is_some_and(|sig| sig.is_constructor) => {
                        return Some(ty);
                    }
                    (Some(method), _) => method,
                    (None, _) => Arc::clone(
                        scope
                            .resolve_routine(routine_name, decl.file, decl.offset)
                            .resolved()?,
                    ),
                }
            }
        };

        let return_type = routine.return_type()?;
        tracing::trace!("[CHAIN] '{}' inferred as '{}'", decl.name, return_type);
        scope.resolve_type_in_closure(return_type, origin, offset)
    }
}
