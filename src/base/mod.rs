//! Foundation types for the resolution engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned file identifiers
//! - [`UnitName`] - Case-insensitive, normalized unit names
//! - [`NameKey`] - Case-insensitive identifier keys
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - Domain constants (file extensions, default scope names)
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod file_id;
mod span;
mod unit_name;

pub use file_id::FileId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};
pub use unit_name::{NameKey, UnitName, normalize_unit_name};

pub use text_size;
