//! High-level IR (HIR): declarations, uses clauses and the resolvers.
//!
//! Everything here is read-only over a [`Db`]: the host supplies
//! declarations, unit lookup and source text, and the resolvers derive
//! answers, memoized in a [`CacheService`] keyed on the host generation.
//!
//! ## Resolution Layers
//!
//! ```text
//! file_text(file) / unit_outline(file)   ← INPUT
//!     │
//!     ▼
//! UsesClauseIndex                         per-file import lists, section bounds
//!     │
//!     ├──────────────► ScopeResolver      last-wins, same-file first, diagnosis
//!     ▼                     │
//! TransitiveDependencyResolver            reachable unit closure
//!     │                     │
//!     ▼                     ▼
//! InheritanceChainResolver                ancestors, cycle detection
//!     │
//!     ▼
//! MemberChainResolver                     a.b.c with type propagation
//!     │
//!     ▼
//! check_file                              E0001-E0003, W0001
//! ```

mod builtins;
mod cache;
mod chain;
mod config;
mod db;
mod decl;
mod deps;
mod diagnostics;
mod ids;
mod index;
mod inherit;
mod scope;
mod source;
mod uses;

pub use builtins::BuiltinRegistry;
pub use cache::{CacheService, CacheStats, GenerationCache, ModificationTracker};
pub use chain::{
    ChainResolutionResult, ChainSegment, MemberChain, MemberChainResolver, extract_chain,
};
pub use config::ResolverConfig;
pub use db::{Db, DeclarationOracle, ResolveContext, SourceProvider, UnitResolver};
pub use decl::{
    DeclDetail, DeclKind, Declaration, Param, RoutineSignature, Scoped, VariableRole, Visibility,
    split_qualified,
};
pub use deps::{TransitiveDependencyResolver, TransitiveDependencyResult};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, RelatedInfo, SemanticChecker, Severity, check_file, codes,
};
pub use ids::{DeclId, DeclKey, LocalDeclId};
pub use index::DeclarationIndex;
pub use inherit::{InheritanceChainResolver, InheritanceInfo};
pub use scope::{
    DeclarationKind, InScopeCandidate, Routines, ScopeDiagnosis, ScopeOutcome, ScopeResolver,
    ScopeResult, Types, Variables,
};
pub use source::{FileOrigin, SourceFile, SourceFiles};
pub use uses::{
    OutlineSection, SectionKind, TextScan, UnitKind, UnitOutline, UnitPriority, UsesClause,
    UsesClauseIndex, UsesExtractor,
};
