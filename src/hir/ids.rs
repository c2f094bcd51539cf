//! Identifiers for declarations.

use std::fmt;

use crate::base::{FileId, NameKey, UnitName};

/// A unique identifier for a declaration within one generation of the host.
///
/// Combines the file holding the declaration with a file-local index.
/// `DeclId`s are reassigned whenever a file's declarations are replaced, so
/// they must not be used as identity across generations; use [`DeclKey`]
/// for that.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId {
    /// The file containing this declaration
    pub file: FileId,
    /// The local ID within the file
    pub local: LocalDeclId,
}

impl DeclId {
    #[inline]
    pub const fn new(file: FileId, local: LocalDeclId) -> Self {
        Self { file, local }
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({:?}:{})", self.file, self.local.0)
    }
}

/// A file-local declaration identifier, assigned in declaration order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LocalDeclId(pub u32);

impl LocalDeclId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalDeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalDeclId({})", self.0)
    }
}

/// Canonical identity of a declaration: its owning unit plus its name,
/// both compared case-insensitively.
///
/// This is what graph walks key their visited sets on. The same logical
/// type reloaded as a fresh `Declaration` (new `DeclId`, new allocation)
/// still produces the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclKey {
    pub unit: UnitName,
    pub name: NameKey,
}

impl DeclKey {
    pub fn new(unit: UnitName, name: &str) -> Self {
        Self {
            unit,
            name: NameKey::new(name),
        }
    }
}

impl fmt::Display for DeclKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.name)
    }
}
