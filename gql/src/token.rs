//! Lexical tokens.

use std::fmt;

/// Classification of a lexical unit.
///
/// The first five kinds carry no grammatical meaning and are filtered out
/// by [`Lexer::next`](crate::lexer::Lexer::next).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    UnicodeBom,
    WhiteSpace,
    LineTerminator,
    Comment,
    Comma,
    Punctuator,
    Name,
    IntValue,
    FloatValue,
    StringValue,
}

impl TokenKind {
    /// Whether tokens of this kind are insignificant to the grammar.
    pub fn is_ignored(self) -> bool {
        matches!(
            self,
            TokenKind::UnicodeBom
                | TokenKind::WhiteSpace
                | TokenKind::LineTerminator
                | TokenKind::Comment
                | TokenKind::Comma
        )
    }
}

/// A lexical unit together with the source position of its first rune.
///
/// `text` is the raw source text of the token. String tokens keep their
/// delimiters and escape sequences as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.text)
    }
}
