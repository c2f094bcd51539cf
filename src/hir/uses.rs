//! Uses clauses: per-unit import lists with section boundaries.
//!
//! A unit's uses clause is the ordered list of units it imports, split by
//! section. Order matters: when two imported units declare the same name,
//! the one listed last wins. Interface code sees only the interface list;
//! implementation code sees both lists concatenated.
//!
//! ```text
//! unit Main;
//! interface
//! uses A, B;          ← interface_uses   = [A, B]
//! implementation      ← implementation_start
//! uses C;             ← implementation_uses = [C]
//!
//! available_units(offset in interface)      = [A, B]
//! available_units(offset in implementation) = [A, B, C]
//! ```
//!
//! Two extractors produce the same [`UsesClause`] shape: [`TextScan`] runs a
//! token-level scan over raw text, [`UnitOutline`] converts an outline
//! produced by a full parser. [`UsesClauseIndex`] picks the outline when the
//! source provider has one.

use std::sync::Arc;

use super::db::{ResolveContext, SourceProvider};
use crate::base::{FileId, TextSize, UnitName};
use crate::parser::{SyntaxKind, Token, significant_tokens};

// ============================================================================
// DATA
// ============================================================================

/// What the source file declares itself to be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitKind {
    #[default]
    Unit,
    Program,
    Library,
    Package,
}

impl UnitKind {
    fn from_header(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::UNIT_KW => Some(UnitKind::Unit),
            SyntaxKind::PROGRAM_KW => Some(UnitKind::Program),
            SyntaxKind::LIBRARY_KW => Some(UnitKind::Library),
            SyntaxKind::PACKAGE_KW => Some(UnitKind::Package),
            _ => None,
        }
    }
}

/// Priority of a unit as seen from one offset of a referencing file.
///
/// Ordered so that a larger value wins: a later entry in the uses list beats
/// an earlier one, any listed unit beats a bare scope name, and everything
/// beats an unavailable unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitPriority {
    Unavailable,
    /// The unit name is itself a scope name (`System`): always in scope,
    /// lowest priority.
    ScopeName,
    /// Index in the effective available-units list.
    Listed(usize),
}

impl UnitPriority {
    /// Integer form: `-2` unavailable, `-1` scope name, otherwise the index.
    pub fn value(self) -> i64 {
        match self {
            UnitPriority::Unavailable => -2,
            UnitPriority::ScopeName => -1,
            UnitPriority::Listed(index) => index as i64,
        }
    }

    pub fn is_in_scope(self) -> bool {
        self != UnitPriority::Unavailable
    }
}

/// The imports and section layout of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsesClause {
    /// Name from the `unit`/`program`/`library`/`package` header.
    pub unit_name: Option<UnitName>,
    pub unit_kind: UnitKind,
    /// Interface uses, or the header uses of programs and libraries, or the
    /// `requires` list of packages.
    pub interface_uses: Vec<UnitName>,
    pub implementation_uses: Vec<UnitName>,
    /// Units a package `contains`. Not imports.
    pub contains: Vec<UnitName>,
    /// Offset of the `interface` keyword.
    pub interface_start: Option<TextSize>,
    /// Offset of the `implementation` keyword.
    pub implementation_start: Option<TextSize>,
}

impl UsesClause {
    /// Whether `offset` lies before the implementation boundary.
    ///
    /// Without a boundary (programs, truncated units) nothing is interface.
    pub fn is_in_interface(&self, offset: TextSize) -> bool {
        self.implementation_start
            .is_some_and(|boundary| offset < boundary)
    }

    /// Units visible at `offset`, in uses order.
    pub fn available_units(&self, offset: TextSize) -> Vec<&UnitName> {
        if self.is_in_interface(offset) {
            self.interface_uses.iter().collect()
        } else {
            self.all_uses().collect()
        }
    }

    /// Interface uses followed by implementation uses.
    pub fn all_uses(&self) -> impl Iterator<Item = &UnitName> {
        self.interface_uses
            .iter()
            .chain(self.implementation_uses.iter())
    }

    /// Priority of `name` at `offset`: the highest index of a match among the
    /// available units, with two-way scope-name aliasing.
    pub fn unit_priority<S: AsRef<str>>(
        &self,
        name: &UnitName,
        offset: TextSize,
        scope_names: &[S],
    ) -> UnitPriority {
        let available = self.available_units(offset);
        if let Some(index) = available
            .iter()
            .rposition(|unit| unit.matches_scoped(name, scope_names))
        {
            return UnitPriority::Listed(index);
        }
        if name.is_scope_name(scope_names) {
            return UnitPriority::ScopeName;
        }
        UnitPriority::Unavailable
    }

    /// Whether `name` appears in the implementation uses.
    pub fn lists_in_implementation<S: AsRef<str>>(&self, name: &UnitName, scope_names: &[S]) -> bool {
        self.implementation_uses
            .iter()
            .any(|unit| unit.matches_scoped(name, scope_names))
    }
}

// ============================================================================
// EXTRACTORS
// ============================================================================

/// Something that can produce a [`UsesClause`].
///
/// Implementations must agree on shape: header-level uses and package
/// `requires` go to `interface_uses`, section offsets point at the section
/// keyword, and list order is preserved.
pub trait UsesExtractor {
    fn extract(&self) -> UsesClause;
}

/// Token-level scan of raw unit text.
///
/// Needs no grammar: it tracks section keywords and reads `uses ... ;`
/// lists. Comments, directives and `in '<path>'` suffixes are skipped.
/// Malformed input yields whatever was read before the break.
#[derive(Clone, Copy, Debug)]
pub struct TextScan<'a> {
    text: &'a str,
}

impl<'a> TextScan<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Interface,
    Implementation,
}

impl UsesExtractor for TextScan<'_> {
    fn extract(&self) -> UsesClause {
        let tokens = significant_tokens(self.text);
        let mut clause = UsesClause::default();
        let mut section = Section::Header;
        // The first `uses` of each section is the import list.
        let mut taken = [false; 3];
        let mut i = 0;

        if let Some(kind) = tokens.first().and_then(|t| UnitKind::from_header(t.kind)) {
            clause.unit_kind = kind;
            let (name, next) = read_dotted_name(&tokens, 1);
            clause.unit_name = name.map(|n| UnitName::new(&n));
            i = next;
        }

        while let Some(tok) = tokens.get(i) {
            match tok.kind {
                SyntaxKind::INTERFACE_KW
                    if section == Section::Header
                        && (i == 0 || tokens[i - 1].kind != SyntaxKind::EQ) =>
                {
                    clause.interface_start = Some(tok.offset);
                    section = Section::Interface;
                }
                SyntaxKind::IMPLEMENTATION_KW if section != Section::Implementation => {
                    clause.implementation_start = Some(tok.offset);
                    section = Section::Implementation;
                }
                SyntaxKind::USES_KW if !taken[section as usize] => {
                    taken[section as usize] = true;
                    let (names, next) = read_unit_list(&tokens, i + 1);
                    match section {
                        Section::Header | Section::Interface => clause.interface_uses.extend(names),
                        Section::Implementation => clause.implementation_uses.extend(names),
                    }
                    i = next;
                    continue;
                }
                SyntaxKind::REQUIRES_KW
                    if clause.unit_kind == UnitKind::Package && section == Section::Header =>
                {
                    let (names, next) = read_unit_list(&tokens, i + 1);
                    clause.interface_uses.extend(names);
                    i = next;
                    continue;
                }
                SyntaxKind::CONTAINS_KW if clause.unit_kind == UnitKind::Package => {
                    let (names, next) = read_unit_list(&tokens, i + 1);
                    clause.contains.extend(names);
                    i = next;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        tracing::trace!(
            "[USES] scanned {:?}: {} interface, {} implementation",
            clause.unit_name,
            clause.interface_uses.len(),
            clause.implementation_uses.len()
        );
        clause
    }
}

/// Read `Name(.Name)*` starting at `start`.
fn read_dotted_name(tokens: &[Token<'_>], start: usize) -> (Option<String>, usize) {
    let Some(first) = tokens.get(start).filter(|t| t.kind.is_name()) else {
        return (None, start);
    };
    let mut name = String::from(first.name());
    let mut i = start + 1;
    while let (Some(dot), Some(part)) = (tokens.get(i), tokens.get(i + 1)) {
        if dot.kind != SyntaxKind::DOT || !part.kind.is_name() {
            break;
        }
        name.push('.');
        name.push_str(part.name());
        i += 2;
    }
    (Some(name), i)
}

/// Read `Unit [in 'path'] {, Unit [in 'path']} ;` starting at `start`.
///
/// Stops without consuming at the first token that does not fit, so the
/// caller still sees section keywords that follow an unterminated list.
fn read_unit_list(tokens: &[Token<'_>], start: usize) -> (Vec<UnitName>, usize) {
    let mut names = Vec::new();
    let mut i = start;

    loop {
        let (Some(name), next) = read_dotted_name(tokens, i) else {
            break;
        };
        i = next;

        if tokens.get(i).is_some_and(|t| t.kind == SyntaxKind::IN_KW) {
            i += 1;
            if tokens.get(i).is_some_and(|t| t.kind == SyntaxKind::STRING) {
                i += 1;
            }
        }
        names.push(UnitName::new(&name));

        match tokens.get(i).map(|t| t.kind) {
            Some(SyntaxKind::COMMA) => i += 1,
            Some(SyntaxKind::SEMICOLON) => {
                i += 1;
                break;
            }
            _ => break,
        }
    }

    (names, i)
}

/// Which part of a unit an outline section describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Program/library `uses`, package `requires`.
    Header,
    Interface,
    Implementation,
    /// Package `contains`.
    Contains,
}

/// One section of a [`UnitOutline`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineSection {
    pub kind: SectionKind,
    /// Offset of the section keyword.
    pub start: TextSize,
    /// The section's import list, in source order.
    pub uses: Vec<UnitName>,
}

/// A unit's layout as produced by a full parser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitOutline {
    pub unit_name: Option<UnitName>,
    pub kind: UnitKind,
    pub sections: Vec<OutlineSection>,
}

impl UsesExtractor for UnitOutline {
    fn extract(&self) -> UsesClause {
        let mut clause = UsesClause {
            unit_name: self.unit_name.clone(),
            unit_kind: self.kind,
            ..UsesClause::default()
        };
        for section in &self.sections {
            let uses = section.uses.iter().cloned();
            match section.kind {
                SectionKind::Header => clause.interface_uses.extend(uses),
                SectionKind::Interface => {
                    clause.interface_start.get_or_insert(section.start);
                    clause.interface_uses.extend(uses);
                }
                SectionKind::Implementation => {
                    clause.implementation_start.get_or_insert(section.start);
                    clause.implementation_uses.extend(uses);
                }
                SectionKind::Contains => clause.contains.extend(uses),
            }
        }
        clause
    }
}

// ============================================================================
// INDEX
// ============================================================================

/// Cached per-file uses clauses.
#[derive(Clone, Copy)]
pub struct UsesClauseIndex<'a> {
    ctx: ResolveContext<'a>,
}

impl<'a> UsesClauseIndex<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        Self { ctx }
    }

    /// Parse raw unit text. Never fails.
    pub fn parse(text: &str) -> UsesClause {
        TextScan::new(text).extract()
    }

    /// The uses clause of `file`, computed once per generation.
    ///
    /// Files with neither an outline nor text yield an empty clause.
    pub fn uses_clause(&self, file: FileId) -> Arc<UsesClause> {
        self.ctx
            .caches
            .uses
            .get_or_compute(self.ctx.generation(), &file, || {
                Arc::new(self.extract(file))
            })
    }

    fn extract(&self, file: FileId) -> UsesClause {
        if let Some(outline) = self.ctx.db.unit_outline(file) {
            return outline.extract();
        }
        match self.ctx.db.file_text(file) {
            Some(text) => TextScan::new(&text).extract(),
            None => {
                tracing::trace!("[USES] no source for {:?}", file);
                UsesClause::default()
            }
        }
    }

    /// Units visible at `offset` in `file`, in uses order.
    pub fn available_units(&self, file: FileId, offset: TextSize) -> Vec<UnitName> {
        self.uses_clause(file)
            .available_units(offset)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Priority of unit `name` at `offset` in `file`.
    pub fn unit_priority(&self, file: FileId, name: &UnitName, offset: TextSize) -> UnitPriority {
        self.uses_clause(file)
            .unit_priority(name, offset, &self.ctx.config.scope_names[..])
    }
}
