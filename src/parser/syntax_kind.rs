//! Token kinds for Pascal/Delphi source text.
//!
//! Only tokens exist here; there is no tree. Section and import keywords get
//! their own kinds because the uses-clause scanner keys off them, everything
//! else that looks like a word is an `IDENT`.

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,       // // ...
    BLOCK_COMMENT,      // { ... } or (* ... *)
    DIRECTIVE,          // {$IFDEF X} or (*$R+*)

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // identifier, including &-escaped
    INTEGER,            // 42, $FF
    REAL,               // 3.14, 1e10
    STRING,             // 'it''s'
    CHAR_CODE,          // #13, #$0A

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    SEMICOLON,          // ;
    COLON,              // :
    COLON_EQ,           // :=
    COMMA,              // ,
    DOT,                // .
    DOT_DOT,            // ..
    EQ,                 // =
    NEQ,                // <>
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    CARET,              // ^
    AT,                 // @

    // =========================================================================
    // KEYWORDS (only the ones the scanners care about)
    // =========================================================================
    UNIT_KW,
    PROGRAM_KW,
    LIBRARY_KW,
    PACKAGE_KW,
    INTERFACE_KW,
    IMPLEMENTATION_KW,
    USES_KW,
    REQUIRES_KW,
    CONTAINS_KW,
    IN_KW,
    INITIALIZATION_KW,
    FINALIZATION_KW,
    BEGIN_KW,
    END_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment or directive)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::DIRECTIVE
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::UNIT_KW as u16) && (self as u16) <= (Self::END_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::AT as u16)
    }

    /// Keywords that are only reserved in a particular position and are
    /// ordinary identifiers everywhere else (`List.Contains`, `Self.Package`).
    pub fn is_contextual_keyword(self) -> bool {
        matches!(self, Self::PACKAGE_KW | Self::REQUIRES_KW | Self::CONTAINS_KW)
    }

    /// Whether a token of this kind can name a declaration.
    pub fn is_name(self) -> bool {
        self == Self::IDENT || self.is_contextual_keyword()
    }

    /// Classify an identifier's text as one of the tracked keywords.
    ///
    /// Keywords are case-insensitive; `&`-escaped identifiers never are
    /// keywords.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        const KEYWORDS: &[(&str, SyntaxKind)] = &[
            ("unit", SyntaxKind::UNIT_KW),
            ("program", SyntaxKind::PROGRAM_KW),
            ("library", SyntaxKind::LIBRARY_KW),
            ("package", SyntaxKind::PACKAGE_KW),
            ("interface", SyntaxKind::INTERFACE_KW),
            ("implementation", SyntaxKind::IMPLEMENTATION_KW),
            ("uses", SyntaxKind::USES_KW),
            ("requires", SyntaxKind::REQUIRES_KW),
            ("contains", SyntaxKind::CONTAINS_KW),
            ("in", SyntaxKind::IN_KW),
            ("initialization", SyntaxKind::INITIALIZATION_KW),
            ("finalization", SyntaxKind::FINALIZATION_KW),
            ("begin", SyntaxKind::BEGIN_KW),
            ("end", SyntaxKind::END_KW),
        ];
        KEYWORDS
            .iter()
            .find(|(kw, _)| kw.eq_ignore_ascii_case(text))
            .map(|&(_, kind)| kind)
    }
}
