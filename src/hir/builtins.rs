//! Built-in identifiers of the always-open `System` namespace.
//!
//! These names resolve without any uses entry and are never diagnosed.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

use super::decl::DeclKind;

const FUNCTIONS: &[&str] = &[
    "Abs", "Addr", "Append", "Assert", "Assigned", "Assign", "BlockRead", "BlockWrite", "Break",
    "Chr", "Close", "CloseFile", "Concat", "Continue", "Copy", "Dec", "Default", "Delete",
    "Dispose", "Eof", "Eoln", "Exclude", "Exit", "Exp", "FillChar", "Finalize", "FreeMem",
    "GetMem", "Halt", "Hi", "High", "Inc", "Include", "Initialize", "Insert", "Int", "Length",
    "Ln", "Lo", "Low", "Move", "New", "Odd", "Ord", "Pi", "Pos", "Pred", "Ptr", "Random",
    "Randomize", "Read", "ReadLn", "ReallocMem", "Reset", "Rewrite", "Round", "RunError",
    "SetLength", "SetString", "SizeOf", "Slice", "Sqr", "Sqrt", "Str", "Succ", "Swap", "Trunc",
    "TypeInfo", "TypeOf", "UpCase", "Val", "Write", "WriteLn",
];

const TYPES: &[&str] = &[
    "AnsiChar", "AnsiString", "Boolean", "Byte", "ByteBool", "Cardinal", "Char", "Comp",
    "Currency", "Double", "Extended", "File", "Int64", "Integer", "LongBool", "LongInt",
    "LongWord", "NativeInt", "NativeUInt", "OleVariant", "PAnsiChar", "PChar", "Pointer",
    "PWideChar", "Real", "Real48", "ShortInt", "ShortString", "Single", "SmallInt", "String",
    "Text", "TextFile", "UInt64", "UnicodeString", "Variant", "WideChar", "WideString", "Word",
    "WordBool",
];

const CONSTANTS: &[&str] = &["False", "True", "nil", "MaxInt", "MaxLongInt"];

static FUNCTION_SET: LazyLock<FxHashSet<String>> = LazyLock::new(|| lowercase_set(FUNCTIONS));
static TYPE_SET: LazyLock<FxHashSet<String>> = LazyLock::new(|| lowercase_set(TYPES));
static CONSTANT_SET: LazyLock<FxHashSet<String>> = LazyLock::new(|| lowercase_set(CONSTANTS));

fn lowercase_set(names: &[&str]) -> FxHashSet<String> {
    names.iter().map(|n| n.to_ascii_lowercase()).collect()
}

/// Static lookup of built-in names.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinRegistry;

impl BuiltinRegistry {
    pub fn is_function(name: &str) -> bool {
        FUNCTION_SET.contains(&name.to_ascii_lowercase())
    }

    pub fn is_type(name: &str) -> bool {
        TYPE_SET.contains(&name.to_ascii_lowercase())
    }

    pub fn is_constant(name: &str) -> bool {
        CONSTANT_SET.contains(&name.to_ascii_lowercase())
    }

    /// Whether `name` is a built-in of the given kind.
    ///
    /// Built-in constants count as variables.
    pub fn is_builtin(name: &str, kind: DeclKind) -> bool {
        match kind {
            DeclKind::Type => Self::is_type(name),
            DeclKind::Routine => Self::is_function(name),
            DeclKind::Variable => Self::is_constant(name),
        }
    }
}
