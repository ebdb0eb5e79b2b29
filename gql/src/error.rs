//! Errors reported while reading an SDL document.

use thiserror::Error;

/// Any failure between the first rune of a document and the assembled
/// type system. Lexical and syntactic variants carry the 1-based source
/// position at which the offending input starts.
#[derive(Debug, Error, PartialEq)]
pub enum SdlError {
    #[error("unexpected character {found:?} at {line}:{column}")]
    UnexpectedCharacter { found: char, line: u32, column: u32 },

    #[error("malformed number at {line}:{column}")]
    MalformedNumber { line: u32, column: u32 },

    #[error("unterminated or malformed string at {line}:{column}")]
    MalformedString { line: u32, column: u32 },

    #[error("malformed unicode escape at {line}:{column}")]
    MalformedUnicodeEscape { line: u32, column: u32 },

    #[error("unexpected token {found:?} at {line}:{column}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        line: u32,
        column: u32,
    },

    #[error("unexpected end of document")]
    UnexpectedEof,

    #[error("unknown directive location {name:?} at {line}:{column}")]
    UnknownDirectiveLocation { name: String, line: u32, column: u32 },

    #[error("duplicate {kind} definition {name:?}")]
    DuplicateDefinition { kind: &'static str, name: String },

    #[error("cannot extend unknown {kind} {name:?}")]
    ExtendTargetNotFound { kind: &'static str, name: String },
}
