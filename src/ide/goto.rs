//! Go-to-definition implementation.

use std::sync::Arc;

use crate::base::{FileId, LineCol, LineIndex};
use crate::hir::{
    DeclKind, Declaration, MemberChainResolver, ResolveContext, ScopeResolver, SourceProvider,
};

/// Result of a go-to-definition request.
#[derive(Clone, Debug, Default)]
pub struct GotoResult {
    pub targets: Vec<GotoTarget>,
}

impl GotoResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(target: GotoTarget) -> Self {
        Self {
            targets: vec![target],
        }
    }

    pub fn multiple(targets: Vec<GotoTarget>) -> Self {
        Self { targets }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A target location for go-to-definition.
#[derive(Clone, Debug)]
pub struct GotoTarget {
    pub file: FileId,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed).
    pub start_col: u32,
    /// End line (0-indexed).
    pub end_line: u32,
    /// End column (0-indexed).
    pub end_col: u32,
    pub kind: DeclKind,
    pub name: Arc<str>,
    /// The declaration itself.
    pub decl: Arc<Declaration>,
}

impl GotoTarget {
    fn new(ctx: ResolveContext<'_>, decl: &Arc<Declaration>) -> Self {
        let start = ctx
            .db
            .file_text(decl.file)
            .map_or_else(LineCol::default, |text| LineIndex::new(&text).line_col(decl.offset));
        Self {
            file: decl.file,
            start_line: start.line,
            start_col: start.col,
            end_line: start.line,
            end_col: start.col + decl.name.len() as u32,
            kind: decl.kind(),
            name: Arc::from(decl.name.as_str()),
            decl: Arc::clone(decl),
        }
    }
}

/// Find the definition of the identifier at `position` in `file`.
///
/// The identifier is resolved as part of its member chain. An overloaded
/// routine at the head of a chain yields every overload of the winning unit.
pub fn goto_definition(ctx: ResolveContext<'_>, file: FileId, position: LineCol) -> GotoResult {
    let Some(text) = ctx.db.file_text(file) else {
        return GotoResult::empty();
    };
    let Some(offset) = LineIndex::new(&text).offset(position) else {
        return GotoResult::empty();
    };
    let Some(result) = MemberChainResolver::new(ctx).resolve_at(file, offset) else {
        return GotoResult::empty();
    };
    let Some(decl) = result.focused() else {
        return GotoResult::empty();
    };

    if result.chain.focus == 0 && decl.kind() == DeclKind::Routine {
        let segment = &result.chain.segments[0];
        let overloads = ScopeResolver::new(ctx)
            .resolve_routine(&segment.name, file, segment.range.start())
            .candidates();
        if overloads.len() > 1 {
            return GotoResult::multiple(overloads.iter().map(|d| GotoTarget::new(ctx, d)).collect());
        }
    }

    GotoResult::single(GotoTarget::new(ctx, decl))
}
