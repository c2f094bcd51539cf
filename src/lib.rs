//! # unitscope
//!
//! Name resolution for Pascal/Delphi units: uses clauses, last-wins
//! scoping, transitive unit dependencies, inheritance chains and member
//! chains.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Loading unit files and library search paths
//!   ↓
//! ide       → AnalysisHost/Analysis, go-to-definition
//!   ↓
//! hir       → Declarations, scope resolution, dependency and chain walks
//!   ↓
//! parser    → Logos lexer for uses clauses and member chains
//!   ↓
//! base      → Primitives (FileId, UnitName, TextRange, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → hir → ide → project)
// ============================================================================

/// Foundation types: FileId, UnitName, TextRange
pub mod base;

/// Token-level scanning of unit source text
pub mod parser;

/// Declarations and every resolution query
pub mod hir;

/// Host state and editor-facing queries
pub mod ide;

/// Loading units from disk
pub mod project;

// Re-export foundation types
pub use base::{FileId, LineCol, LineIndex, NameKey, TextRange, TextSize, UnitName};
