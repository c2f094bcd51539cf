//! Logos-based lexer for Pascal/Delphi unit text
//!
//! The resolution engine never builds a syntax tree. The grammar lives
//! outside this crate; what is needed here is a lossless token stream so
//! that the uses-clause scanner and the member-chain extractor can walk
//! source text with correct offsets.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! hir::uses   → UsesClause (sections, ordered imports)
//! hir::chain  → MemberChain (dotted identifier runs)
//! ```

mod lexer;
mod syntax_kind;

pub use lexer::{Lexer, Token, significant_tokens, tokenize};
pub use syntax_kind::SyntaxKind;
