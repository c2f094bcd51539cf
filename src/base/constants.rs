//! Domain constants: unit file extensions and default unit scope names.

/// Extension of a regular unit (`unit Foo;`).
pub const UNIT_EXT: &str = "pas";
/// Extension of a program file (`program Foo;`).
pub const PROGRAM_EXT: &str = "dpr";
/// Extension of a package file (`package Foo;`).
pub const PACKAGE_EXT: &str = "dpk";
/// Lazarus program file.
pub const LAZARUS_PROGRAM_EXT: &str = "lpr";
/// Free Pascal unit file.
pub const FPC_UNIT_EXT: &str = "pp";
/// Include file; never a unit on its own.
pub const INCLUDE_EXT: &str = "inc";

/// Extensions that hold a compilation unit.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    UNIT_EXT,
    PROGRAM_EXT,
    PACKAGE_EXT,
    LAZARUS_PROGRAM_EXT,
    FPC_UNIT_EXT,
];

/// Extensions stripped when normalizing a unit name.
///
/// Includes the compiled-unit extensions so that names taken from build
/// output (`Foo.dcu`) normalize the same way as names taken from source.
pub const STRIPPABLE_EXTENSIONS: &[&str] = &[
    UNIT_EXT,
    PROGRAM_EXT,
    PACKAGE_EXT,
    LAZARUS_PROGRAM_EXT,
    FPC_UNIT_EXT,
    INCLUDE_EXT,
    "dcu",
    "ppu",
];

/// Unit scope names a Delphi project resolves by default.
pub const DEFAULT_SCOPE_NAMES: &[&str] = &[
    "System",
    "Winapi",
    "Vcl",
    "Vcl.Imaging",
    "Vcl.Samples",
    "Data",
    "Datasnap",
    "Xml",
    "Web",
    "Soap",
    "FMX",
    "Bde",
];

/// Default bound for the transitive unit walk.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default bound for ancestor walks, on top of the visited set.
pub const DEFAULT_MAX_INHERITANCE_DEPTH: usize = 64;
