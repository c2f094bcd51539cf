//! Canonical, case-insensitive unit names.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use smol_str::SmolStr;

use super::constants::STRIPPABLE_EXTENSIONS;

/// The name of a compilation unit (`SysUtils`, `Vcl.Forms`, ...).
///
/// Equality and hashing ignore ASCII case, matching the host language.
/// The original spelling is kept for display.
#[derive(Clone)]
pub struct UnitName {
    text: SmolStr,
    key: SmolStr,
}

impl UnitName {
    /// Create a unit name, normalizing the input first.
    pub fn new(name: &str) -> Self {
        let text = SmolStr::new(normalize_unit_name(name));
        let key = SmolStr::new(text.to_ascii_lowercase());
        Self { text, key }
    }

    /// Derive a unit name from a file path (`src/Vcl.Forms.pas` → `Vcl.Forms`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let name = Self::new(file_name);
        (!name.is_empty()).then_some(name)
    }

    /// The name as written (after normalization).
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lowercased lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive comparison against a raw string.
    pub fn eq_str(&self, other: &str) -> bool {
        self.key.eq_ignore_ascii_case(other.trim())
    }

    /// The last dotted segment (`Vcl.Forms` → `Forms`).
    pub fn short_name(&self) -> &str {
        self.text.rsplit('.').next().unwrap_or(&self.text)
    }

    /// Whether this name refers to the same unit as `other`, allowing either
    /// side to carry one of `scope_names` as a droppable prefix.
    ///
    /// `Vcl.Forms` matches `Forms` when `Vcl` is a scope name, and vice versa.
    pub fn matches_scoped<S: AsRef<str>>(&self, other: &UnitName, scope_names: &[S]) -> bool {
        if self == other {
            return true;
        }
        strip_scope(self.key(), other.key(), scope_names)
            || strip_scope(other.key(), self.key(), scope_names)
    }

    /// Whether this name is itself one of `scope_names`.
    pub fn is_scope_name<S: AsRef<str>>(&self, scope_names: &[S]) -> bool {
        scope_names
            .iter()
            .any(|scope| scope.as_ref().eq_ignore_ascii_case(&self.key))
    }
}

/// `qualified` is `<scope>.<short>` for some scope in `scope_names`.
fn strip_scope<S: AsRef<str>>(qualified: &str, short: &str, scope_names: &[S]) -> bool {
    if qualified.len() <= short.len() + 1 || !qualified.ends_with(short) {
        return false;
    }
    let prefix_len = qualified.len() - short.len() - 1;
    if qualified.as_bytes()[prefix_len] != b'.' {
        return false;
    }
    let prefix = &qualified[..prefix_len];
    scope_names
        .iter()
        .any(|scope| scope.as_ref().eq_ignore_ascii_case(prefix))
}

/// Normalize a unit name: trim whitespace and strip source/compiled-unit
/// extensions.
///
/// Idempotent: stripping repeats until no known extension remains.
pub fn normalize_unit_name(name: &str) -> &str {
    let mut current = name.trim();
    loop {
        let Some((stem, ext)) = current.rsplit_once('.') else {
            return current;
        };
        let strippable = STRIPPABLE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext));
        if !strippable || stem.is_empty() {
            return current;
        }
        current = stem.trim_end();
    }
}

impl PartialEq for UnitName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for UnitName {}

impl Hash for UnitName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for UnitName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnitName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Debug for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitName({})", self.text)
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for UnitName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// A case-insensitive identifier key (declaration names, type names).
///
/// Used where the canonical identity of something is its spelling modulo
/// case, e.g. the `(unit, name)` keys of ancestor walks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey(SmolStr);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(SmolStr::new(name.trim().to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NameKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
