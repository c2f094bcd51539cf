//! IDE features: high-level entry points for editor tooling.
//!
//! This module provides the interface between the resolvers (HIR) and
//! whatever hosts the engine (an LSP server, a linter, a test).
//!
//! ## Design Principles
//!
//! 1. **Host owns state**: `AnalysisHost` is the only mutable object
//! 2. **Snapshots query**: `Analysis` is read-only and `Sync`
//! 3. **No LSP types**: plain data, converted at the protocol boundary
//!
//! ## Usage
//!
//! ```ignore
//! use unitscope::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! let main = host.set_file_text("Main.pas", "program Main; uses UnitA; begin end.");
//!
//! let analysis = host.analysis();
//! let deps = analysis.transitive_dependencies(main);
//! ```

mod analysis;
mod goto;

pub use analysis::{Analysis, AnalysisHost, ResolveRequest};
pub use goto::{GotoResult, GotoTarget, goto_definition};
