//! Diagnostics: scope and inheritance problems in a file.
//!
//! Every type name a file writes down (variable types, routine parameter
//! and return types, superclasses) is run through the scope resolver. A
//! name that exists in the project but is not visible where it is written
//! becomes an error; an ancestor cycle becomes a warning. Names declared
//! nowhere are left to other validation.

use std::sync::Arc;

use super::db::{DeclarationOracle, ResolveContext, SourceProvider};
use super::decl::{DeclKind, Declaration};
use super::inherit::InheritanceChainResolver;
use super::scope::{ScopeDiagnosis, ScopeResolver};
use crate::base::{FileId, LineCol, LineIndex, TextSize};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed).
    pub start_col: u32,
    /// End line (0-indexed).
    pub end_line: u32,
    /// End column (0-indexed).
    pub end_col: u32,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug)]
pub struct RelatedInfo {
    pub file: FileId,
    pub line: u32,
    pub col: u32,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(file: FileId, line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, file, line, col, message.into())
    }

    /// Create a new warning diagnostic.
    pub fn warning(file: FileId, line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, file, line, col, message.into())
    }

    fn new(severity: Severity, file: FileId, line: u32, col: u32, message: Arc<str>) -> Self {
        Self {
            file,
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
            severity,
            code: None,
            message,
            related: Vec::new(),
        }
    }

    /// Set the end of the range.
    pub fn with_span(mut self, end_line: u32, end_col: u32) -> Self {
        self.end_line = end_line;
        self.end_col = end_col;
        self
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes.
///
/// - **E0001-E0099**: scope errors
/// - **W0001-W0099**: warnings
pub mod codes {
    /// Declared in a unit missing from the uses clause.
    pub const NOT_IN_USES: &str = "E0001";
    /// Declared in several units, none of them in the uses clause.
    pub const AMBIGUOUS_OUT_OF_SCOPE: &str = "E0002";
    /// Declared in a unit listed only in the implementation uses, referenced
    /// from the interface.
    pub const IMPLEMENTATION_ONLY: &str = "E0003";

    /// The ancestor chain of a type loops.
    pub const INHERITANCE_CYCLE: &str = "W0001";
}

impl ScopeDiagnosis {
    /// The code reported for this diagnosis.
    pub fn code(&self) -> &'static str {
        match self {
            ScopeDiagnosis::NotInUses { .. } => codes::NOT_IN_USES,
            ScopeDiagnosis::AmbiguousOutOfScope { .. } => codes::AMBIGUOUS_OUT_OF_SCOPE,
            ScopeDiagnosis::ImplementationOnly { .. } => codes::IMPLEMENTATION_ONLY,
        }
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during a check.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file == file).collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

// ============================================================================
// SEMANTIC CHECKER
// ============================================================================

/// Checks the type references of one file.
pub struct SemanticChecker<'a> {
    ctx: ResolveContext<'a>,
    file: FileId,
    lines: Option<LineIndex>,
    collector: DiagnosticCollector,
}

impl<'a> SemanticChecker<'a> {
    pub fn new(ctx: ResolveContext<'a>, file: FileId) -> Self {
        let lines = ctx.db.file_text(file).map(|text| LineIndex::new(&text));
        Self {
            ctx,
            file,
            lines,
            collector: DiagnosticCollector::new(),
        }
    }

    /// Check every declaration of the file.
    pub fn check(&mut self) {
        for decl in self.ctx.db.file_declarations(self.file) {
            self.check_declaration(&decl);
        }
    }

    fn check_declaration(&mut self, decl: &Declaration) {
        match decl.kind() {
            DeclKind::Variable => {
                if let Some(type_name) = decl.type_name() {
                    self.check_type_reference(decl, type_name);
                }
            }
            DeclKind::Routine => {
                let Some(sig) = decl.signature() else {
                    return;
                };
                for param in &sig.params {
                    if let Some(type_name) = &param.type_name {
                        self.check_type_reference(decl, type_name);
                    }
                }
                if let Some(return_type) = &sig.return_type {
                    self.check_type_reference(decl, return_type);
                }
            }
            DeclKind::Type => {
                if let Some(superclass) = decl.superclass() {
                    self.check_type_reference(decl, superclass);
                    self.check_inheritance(decl);
                }
            }
        }
    }

    /// Report `type_name`, written at `decl`, if it exists but is not visible.
    fn check_type_reference(&mut self, decl: &Declaration, type_name: &str) {
        let result = ScopeResolver::new(self.ctx).resolve(type_name, self.file, decl.offset, DeclKind::Type);
        let Some(diagnosis) = &result.diagnosis else {
            return;
        };

        let pos = self.position(decl.offset);
        let end_col = pos.col + decl.name.len() as u32;
        let mut diagnostic = Diagnostic::error(self.file, pos.line, pos.col, diagnosis.to_string())
            .with_span(pos.line, end_col)
            .with_code(diagnosis.code());

        for candidate in &result.out_of_scope {
            let at = self.ctx.db.file_text(candidate.file).map_or_else(LineCol::default, |text| {
                LineIndex::new(&text).line_col(candidate.offset)
            });
            diagnostic = diagnostic.with_related(RelatedInfo {
                file: candidate.file,
                line: at.line,
                col: at.col,
                message: Arc::from(format!("declared in unit '{}'", candidate.unit)),
            });
        }
        self.collector.add(diagnostic);
    }

    fn check_inheritance(&mut self, decl: &Declaration) {
        let info = InheritanceChainResolver::new(self.ctx).inheritance_info(decl);
        if !info.has_cycle {
            return;
        }
        let pos = self.position(decl.offset);
        self.collector.add(
            Diagnostic::warning(
                self.file,
                pos.line,
                pos.col,
                format!(
                    "inheritance cycle: the ancestor chain of '{}' loops after {}",
                    decl.name,
                    info.ancestor_names.join(" -> ")
                ),
            )
            .with_span(pos.line, pos.col + decl.name.len() as u32)
            .with_code(codes::INHERITANCE_CYCLE),
        );
    }

    fn position(&self, offset: TextSize) -> LineCol {
        self.lines
            .as_ref()
            .map_or_else(LineCol::default, |lines| lines.line_col(offset))
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.collector.diagnostics
    }
}

/// Check one file.
pub fn check_file(ctx: ResolveContext<'_>, file: FileId) -> Vec<Diagnostic> {
    let mut checker = SemanticChecker::new(ctx, file);
    checker.check();
    checker.finish()
}
