//! Declarations supplied by the external declaration oracle.
//!
//! A [`Declaration`] is a type, routine, or variable as the host's parser
//! sees it. The engine never mutates declarations; it only reads the fields
//! below and hands shared `Arc<Declaration>`s back to callers.

use std::sync::Arc;

use smol_str::SmolStr;

use super::ids::{DeclId, DeclKey, LocalDeclId};
use crate::base::{FileId, TextRange, TextSize, UnitName};

// ============================================================================
// KIND / VISIBILITY / ROLE
// ============================================================================

/// The three declaration kinds the resolver distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Type,
    Routine,
    Variable,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Type => "type",
            DeclKind::Routine => "routine",
            DeclKind::Variable => "variable",
        }
    }
}

/// Member visibility as written in a class or record declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Published,
    Protected,
    StrictProtected,
    Private,
    StrictPrivate,
}

impl Visibility {
    /// Visible from any file that can see the owning type.
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Published)
    }

    /// Whether a member with this visibility, declared in `declaring_file`,
    /// can be accessed from `from_file`.
    ///
    /// Protected members are treated like private ones: visible only inside
    /// the declaring file. Descendant classes in other files do not see them.
    pub fn is_accessible(self, declaring_file: FileId, from_file: FileId) -> bool {
        self.is_public() || declaring_file == from_file
    }
}

/// What a variable-kind declaration is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariableRole {
    #[default]
    Global,
    Field,
    Property,
    Parameter,
    Local,
    Constant,
}

impl VariableRole {
    /// Declared inside a routine body or signature.
    pub fn is_local(self) -> bool {
        matches!(self, VariableRole::Local | VariableRole::Parameter)
    }

    /// Declared inside a class or record.
    pub fn is_member(self) -> bool {
        matches!(self, VariableRole::Field | VariableRole::Property)
    }
}

// ============================================================================
// KIND-SPECIFIC DETAIL
// ============================================================================

/// A routine parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: SmolStr,
    pub type_name: Option<SmolStr>,
}

/// Parameter/return shape of a routine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutineSignature {
    pub params: Vec<Param>,
    /// `None` for procedures.
    pub return_type: Option<SmolStr>,
    /// Constructors evaluate to an instance of their owning type.
    pub is_constructor: bool,
}

/// Kind-specific fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclDetail {
    Type {
        /// Name of the direct ancestor, as written (`TBase`, `Classes.TList`).
        superclass: Option<SmolStr>,
    },
    Routine(RoutineSignature),
    Variable {
        /// Declared type name; `None` for inline `var X := ...` locals.
        type_name: Option<SmolStr>,
        role: VariableRole,
        /// Name of the routine called in the initializer, if any
        /// (`var L := BuildList;` → `BuildList`, `TFoo.Create` for constructors).
        initializer_call: Option<SmolStr>,
    },
}

// ============================================================================
// DECLARATION
// ============================================================================

/// A type, routine, or variable declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclId,
    pub name: SmolStr,
    /// The unit that owns this declaration.
    pub unit: UnitName,
    /// The file holding this declaration.
    pub file: FileId,
    /// Offset of the declaration's name in `file`.
    pub offset: TextSize,
    pub visibility: Visibility,
    /// Name of the owning class/record for members.
    pub container: Option<SmolStr>,
    /// Range in which a local or parameter is visible (the routine body).
    /// For routines with a body, the range of that body.
    pub scope: Option<TextRange>,
    pub detail: DeclDetail,
}

impl Declaration {
    fn new(name: &str, offset: TextSize, detail: DeclDetail) -> Self {
        Self {
            id: DeclId::new(FileId::new(0), LocalDeclId::new(0)),
            name: SmolStr::new(name),
            unit: UnitName::new(""),
            file: FileId::new(0),
            offset,
            visibility: Visibility::Public,
            container: None,
            scope: None,
            detail,
        }
    }

    /// A type declaration (`TFoo = class ... end`).
    pub fn type_decl(name: &str, offset: u32) -> Self {
        Self::new(name, TextSize::new(offset), DeclDetail::Type { superclass: None })
    }

    /// A procedure or function.
    pub fn routine(name: &str, offset: u32) -> Self {
        Self::new(
            name,
            TextSize::new(offset),
            DeclDetail::Routine(RoutineSignature::default()),
        )
    }

    /// A variable, constant, field, property, parameter or local.
    pub fn variable(name: &str, offset: u32, role: VariableRole) -> Self {
        Self::new(
            name,
            TextSize::new(offset),
            DeclDetail::Variable {
                type_name: None,
                role,
                initializer_call: None,
            },
        )
    }

    /// Place the declaration in a unit and file. Index insertion does this
    /// for declarations handed to the host.
    pub fn with_location(mut self, unit: UnitName, file: FileId) -> Self {
        self.unit = unit;
        self.file = file;
        self.id = DeclId::new(file, self.id.local);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Make this a member of the class/record named `container`.
    pub fn in_container(mut self, container: &str) -> Self {
        self.container = Some(SmolStr::new(container));
        self
    }

    pub fn with_scope(mut self, scope: TextRange) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_superclass(mut self, superclass: &str) -> Self {
        if let DeclDetail::Type { superclass: ref mut s } = self.detail {
            *s = Some(SmolStr::new(superclass));
        }
        self
    }

    pub fn with_type(mut self, type_name: &str) -> Self {
        if let DeclDetail::Variable {
            type_name: ref mut t,
            ..
        } = self.detail
        {
            *t = Some(SmolStr::new(type_name));
        }
        self
    }

    pub fn with_initializer_call(mut self, routine: &str) -> Self {
        if let DeclDetail::Variable {
            initializer_call: ref mut call,
            ..
        } = self.detail
        {
            *call = Some(SmolStr::new(routine));
        }
        self
    }

    pub fn with_return_type(mut self, type_name: &str) -> Self {
        if let DeclDetail::Routine(ref mut sig) = self.detail {
            sig.return_type = Some(SmolStr::new(type_name));
        }
        self
    }

    pub fn with_param(mut self, name: &str, type_name: Option<&str>) -> Self {
        if let DeclDetail::Routine(ref mut sig) = self.detail {
            sig.params.push(Param {
                name: SmolStr::new(name),
                type_name: type_name.map(SmolStr::new),
            });
        }
        self
    }

    pub fn as_constructor(mut self) -> Self {
        if let DeclDetail::Routine(ref mut sig) = self.detail {
            sig.is_constructor = true;
        }
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn kind(&self) -> DeclKind {
        match self.detail {
            DeclDetail::Type { .. } => DeclKind::Type,
            DeclDetail::Routine(_) => DeclKind::Routine,
            DeclDetail::Variable { .. } => DeclKind::Variable,
        }
    }

    /// Canonical `(unit, name)` identity.
    pub fn key(&self) -> DeclKey {
        DeclKey::new(self.unit.clone(), &self.name)
    }

    pub fn superclass(&self) -> Option<&str> {
        match &self.detail {
            DeclDetail::Type { superclass } => superclass.as_deref(),
            _ => None,
        }
    }

    /// Declared type of a variable-kind declaration.
    pub fn type_name(&self) -> Option<&str> {
        match &self.detail {
            DeclDetail::Variable { type_name, .. } => type_name.as_deref(),
            _ => None,
        }
    }

    pub fn initializer_call(&self) -> Option<&str> {
        match &self.detail {
            DeclDetail::Variable {
                initializer_call, ..
            } => initializer_call.as_deref(),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<VariableRole> {
        match &self.detail {
            DeclDetail::Variable { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<&RoutineSignature> {
        match &self.detail {
            DeclDetail::Routine(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<&str> {
        self.signature().and_then(|sig| sig.return_type.as_deref())
    }

    /// Declared inside a class or record.
    pub fn is_member(&self) -> bool {
        self.container.is_some() || self.role().is_some_and(VariableRole::is_member)
    }

    /// Declared inside a routine (local variable or parameter).
    pub fn is_local(&self) -> bool {
        self.role().is_some_and(VariableRole::is_local)
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

// ============================================================================
// SCOPED ABSTRACTION
// ============================================================================

/// What the scope algorithm needs to know about a candidate declaration.
///
/// The last-wins resolution, partitioning and diagnosis are written once
/// against this trait instead of once per declaration kind.
pub trait Scoped {
    fn name(&self) -> &str;
    fn owning_unit(&self) -> &UnitName;
    fn owning_file(&self) -> FileId;
    fn visibility(&self) -> Visibility;
    /// Range a routine-local declaration is confined to.
    fn local_scope(&self) -> Option<TextRange>;
    /// Members are only reachable through a qualifying expression.
    fn is_member(&self) -> bool;
}

impl Scoped for Declaration {
    fn name(&self) -> &str {
        &self.name
    }

    fn owning_unit(&self) -> &UnitName {
        &self.unit
    }

    fn owning_file(&self) -> FileId {
        self.file
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn local_scope(&self) -> Option<TextRange> {
        if self.is_local() { self.scope } else { None }
    }

    fn is_member(&self) -> bool {
        Declaration::is_member(self)
    }
}

impl<T: Scoped + ?Sized> Scoped for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn owning_unit(&self) -> &UnitName {
        (**self).owning_unit()
    }

    fn owning_file(&self) -> FileId {
        (**self).owning_file()
    }

    fn visibility(&self) -> Visibility {
        (**self).visibility()
    }

    fn local_scope(&self) -> Option<TextRange> {
        (**self).local_scope()
    }

    fn is_member(&self) -> bool {
        (**self).is_member()
    }
}

/// Split `Unit.Name` into its unit qualifier and the bare name.
///
/// Generic arguments are dropped (`TList<TFoo>` → `TList`) so that the
/// bare name can be looked up directly.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    let name = name.trim();
    let name = match name.find('<') {
        Some(idx) => name[..idx].trim_end(),
        None => name,
    };
    match name.rsplit_once('.') {
        Some((qualifier, bare)) if !qualifier.is_empty() && !bare.is_empty() => {
            (Some(qualifier), bare)
        }
        _ => (None, name),
    }
}
