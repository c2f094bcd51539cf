//! Inheritance chains.
//!
//! Follows `superclass` links from a type to its farthest resolvable
//! ancestor. Each superclass name is resolved from the file and offset of
//! the type that names it, so `TFoo = class(TBar)` binds `TBar` the same way
//! any other type reference at that position would.
//!
//! The walk stops at:
//! - a type with no superclass,
//! - a superclass name that resolves nowhere (the name is recorded, nothing
//!   beyond it can be known),
//! - a revisited `(unit, name)` key (`has_cycle`),
//! - the configured depth bound (`truncated`).

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::db::ResolveContext;
use super::decl::{DeclKind, Declaration, split_qualified};
use super::scope::ScopeResolver;

/// A type's ancestors, nearest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InheritanceInfo {
    /// The direct superclass as written.
    pub super_class_name: Option<SmolStr>,
    /// Ancestor names, nearest to farthest. An unresolved ancestor is
    /// recorded as written and ends the list.
    pub ancestor_names: Vec<SmolStr>,
    /// Resolved ancestor declarations, nearest to farthest.
    pub ancestors: Vec<Arc<Declaration>>,
    pub has_cycle: bool,
    pub truncated: bool,
    /// The last ancestor name could not be resolved.
    pub unresolved: bool,
}

impl InheritanceInfo {
    /// Case-insensitive membership in [`ancestor_names`](Self::ancestor_names).
    /// Unit qualifiers on either side are ignored.
    pub fn is_descendant_of(&self, ancestor: &str) -> bool {
        let (_, wanted) = split_qualified(ancestor);
        self.ancestor_names
            .iter()
            .any(|name| split_qualified(name).1.eq_ignore_ascii_case(wanted))
    }
}

/// Memoized ancestor walks.
#[derive(Clone, Copy)]
pub struct InheritanceChainResolver<'a> {
    ctx: ResolveContext<'a>,
}

impl<'a> InheritanceChainResolver<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    /// Ancestors of `ty`. Non-type declarations have none.
    pub fn inheritance_info(&self, ty: &Declaration) -> Arc<InheritanceInfo> {
        if ty.kind() != DeclKind::Type {
            return Arc::new(InheritanceInfo::default());
        }
        self.ctx
            .caches
            .inheritance
            .get_or_compute(self.ctx.generation(), &ty.key(), || {
                Arc::new(self.compute(ty))
            })
    }

    /// Whether `ty` inherits, directly or not, from a type named `ancestor`.
    pub fn is_descendant_of(&self, ty: &Declaration, ancestor: &str) -> bool {
        self.inheritance_info(ty).is_descendant_of(ancestor)
    }

    fn compute(&self, ty: &Declaration) -> InheritanceInfo {
        let mut info = InheritanceInfo {
            super_class_name: ty.superclass().map(SmolStr::new),
            ..InheritanceInfo::default()
        };
        let scope = ScopeResolver::new(self.ctx);
        let mut visited = FxHashSet::default();
        visited.insert(ty.key());

        let mut current = Arc::new(ty.clone());
        while let Some(super_name) = current.superclass().map(SmolStr::new) {
            if info.ancestors.len() >= self.ctx.config.max_inheritance_depth {
                tracing::debug!(
                    "[INHERIT] '{}' exceeds {} ancestors",
                    ty.name,
                    self.ctx.config.max_inheritance_depth
                );
                info.truncated = true;
                break;
            }

            let current_key = current.key();
            let Some(parent) = scope.resolve_type_in_closure_excluding(
                &super_name,
                current.file,
                current.offset,
                Some(&current_key),
            ) else {
                tracing::trace!("[INHERIT] '{}' does not resolve", super_name);
                info.ancestor_names.push(super_name);
                info.unresolved = true;
                break;
            };

            if !visited.insert(parent.key()) {
                tracing::debug!("[INHERIT] cycle at '{}' from '{}'", parent.key(), ty.key());
                info.has_cycle = true;
                break;
            }
            info.ancestor_names.push(parent.name.clone());
            info.ancestors.push(Arc::clone(&parent));
            current = parent;
        }

        info
    }
}
