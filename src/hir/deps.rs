//! Transitive unit dependencies.
//!
//! Depth-first walk over uses clauses, starting from a file's own direct
//! uses. A unit expands again only when a shorter path reaches it, so
//! diamonds cost one expansion, cycles end at the first revisit, and the
//! result does not depend on uses-clause order. Units reached at the depth
//! bound are recorded as available but not expanded. `Vcl.Forms` and
//! `Forms` count as one unit when `Vcl` is a scope name.
//!
//! ```text
//! Main ─► A ─► C
//!   │          ▲
//!   └───► B ───┘        transitive_units = [A, C, B]   (C expanded once)
//! ```

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;

use super::db::ResolveContext;
use super::uses::UsesClauseIndex;
use crate::base::{FileId, UnitName};

/// Every unit reachable from one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitiveDependencyResult {
    /// The walking unit's own name, when its header declares one.
    pub origin: Option<UnitName>,
    /// The file's own uses, interface then implementation.
    pub direct_units: Vec<UnitName>,
    /// Every reachable unit, in discovery order. Includes the direct units.
    pub transitive_units: IndexSet<UnitName>,
    /// Expanded unit → its uses. Diagnostics only.
    pub unit_graph: IndexMap<UnitName, Vec<UnitName>>,
    /// Some unit sat at the depth bound and was not expanded.
    pub truncated: bool,
    /// The walk revisited a unit still being expanded.
    pub has_cycle: bool,
}

impl TransitiveDependencyResult {
    /// Whether `name` is reachable (case-insensitive). The origin itself
    /// always counts.
    pub fn is_unit_available(&self, name: &str) -> bool {
        let name = UnitName::new(name);
        self.origin.as_ref() == Some(&name) || self.transitive_units.contains(&name)
    }

    /// Like [`is_unit_available`](Self::is_unit_available), but `Vcl.Forms`
    /// and `Forms` are the same unit when `Vcl` is a scope name.
    pub fn is_unit_available_scoped<S: AsRef<str>>(&self, name: &str, scope_names: &[S]) -> bool {
        let name = UnitName::new(name);
        self.origin
            .iter()
            .chain(self.transitive_units.iter())
            .any(|unit| unit.matches_scoped(&name, scope_names))
    }

    /// Position of `name` in discovery order.
    pub fn position_of<S: AsRef<str>>(&self, name: &UnitName, scope_names: &[S]) -> Option<usize> {
        self.transitive_units
            .iter()
            .position(|unit| unit.matches_scoped(name, scope_names))
    }
}

/// Memoized transitive walks.
#[derive(Clone, Copy)]
pub struct TransitiveDependencyResolver<'a> {
    ctx: ResolveContext<'a>,
}

struct Walk {
    origin: Option<UnitName>,
    /// Shortest depth each unit was reached at.
    depths: IndexMap<UnitName, usize>,
    on_stack: FxHashSet<UnitName>,
    /// Units sitting at the depth bound, not expanded by any shorter path.
    unexpanded: FxHashSet<UnitName>,
    result: TransitiveDependencyResult,
}

impl Walk {
    /// The spelling this walk already knows `unit` by, if any.
    fn canonical<S: AsRef<str>>(&self, unit: &UnitName, scope_names: &[S]) -> UnitName {
        if self.depths.contains_key(unit) {
            return unit.clone();
        }
        self.depths
            .keys()
            .find(|seen| seen.matches_scoped(unit, scope_names))
            .cloned()
            .unwrap_or_else(|| unit.clone())
    }
}

impl<'a> TransitiveDependencyResolver<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    /// All units reachable from `file`, bounded by the configured max depth.
    pub fn dependencies(&self, file: FileId) -> Arc<TransitiveDependencyResult> {
        self.dependencies_with_depth(file, self.ctx.config.max_depth)
    }

    /// All units reachable from `file`, expanding at most `max_depth` levels.
    pub fn dependencies_with_depth(
        &self,
        file: FileId,
        max_depth: usize,
    ) -> Arc<TransitiveDependencyResult> {
        self.ctx
            .caches
            .dependencies
            .get_or_compute(self.ctx.generation(), &(file, max_depth), || {
                Arc::new(self.compute(file, max_depth))
            })
    }

    fn compute(&self, file: FileId, max_depth: usize) -> TransitiveDependencyResult {
        let clause = UsesClauseIndex::new(self.ctx).uses_clause(file);
        let origin = clause.unit_name.clone();
        let direct: Vec<UnitName> = clause.all_uses().cloned().collect();

        let mut walk = Walk {
            origin: origin.clone(),
            depths: origin.iter().map(|o| (o.clone(), 0)).collect(),
            on_stack: origin.iter().cloned().collect(),
            unexpanded: FxHashSet::default(),
            result: TransitiveDependencyResult {
                origin: origin.clone(),
                direct_units: direct.clone(),
                ..TransitiveDependencyResult::default()
            },
        };
        if let Some(origin) = &origin {
            walk.result.unit_graph.insert(origin.clone(), direct.clone());
        }

        for unit in &direct {
            self.visit(unit, 1, max_depth, &mut walk);
        }
        if !walk.unexpanded.is_empty() {
            tracing::debug!(
                "[DEPS] depth bound {} reached at {} unit(s)",
                max_depth,
                walk.unexpanded.len()
            );
            walk.result.truncated = true;
        }

        tracing::trace!(
            "[DEPS] {:?} ({:?}): {} direct, {} transitive",
            file,
            walk.origin,
            walk.result.direct_units.len(),
            walk.result.transitive_units.len()
        );
        walk.result
    }

    fn visit(&self, unit: &UnitName, depth: usize, max_depth: usize, walk: &mut Walk) {
        let unit = walk.canonical(unit, &self.ctx.config.scope_names[..]);
        if walk.on_stack.contains(&unit) {
            if !walk.result.has_cycle {
                tracing::debug!("[DEPS] cycle through '{}'", unit);
                walk.result.has_cycle = true;
            }
            return;
        }
        match walk.depths.get(&unit) {
            Some(&seen) if seen <= depth => return,
            Some(_) => tracing::trace!("[DEPS] '{}' reached again at depth {}", unit, depth),
            None => {
                walk.result.transitive_units.insert(unit.clone());
            }
        }
        walk.depths.insert(unit.clone(), depth);

        if depth >= max_depth {
            walk.unexpanded.insert(unit);
            return;
        }
        walk.unexpanded.remove(&unit);

        let Some(file) = self.ctx.unit_file(&unit) else {
            tracing::trace!("[DEPS] '{}' has no file", unit);
            return;
        };
        let clause = UsesClauseIndex::new(self.ctx).uses_clause(file);
        let children: Vec<UnitName> = clause.all_uses().cloned().collect();
        walk.result.unit_graph.insert(unit.clone(), children.clone());

        walk.on_stack.insert(unit.clone());
        for child in &children {
            self.visit(child, depth + 1, max_depth, walk);
        }
        walk.on_stack.remove(&unit);
    }
}
