//! IDE layer tests
//!
//! - End-to-end resolution through `AnalysisHost`
//! - Cache invalidation and parallel queries
//! - Go-to-definition
//! - File diagnostics

pub mod tests_diagnostics;
pub mod tests_goto;
