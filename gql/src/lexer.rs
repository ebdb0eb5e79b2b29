//! Lexer for SDL documents.
//!
//! [`Lexer::next_token`] classifies the next lexical unit by trying the
//! character classes in a fixed order: byte order mark, whitespace, line
//! terminator, comma, punctuator, comment, name, number, block string,
//! quoted string. [`Lexer::next`] wraps it and drops the kinds that carry
//! no grammatical meaning, which is what the parser consumes.

use tracing::trace;

use crate::charset::{
    Matcher, BLOCK_STR_CHAR, BLOCK_STR_QUOTE, COMMA, COMMENT_HEAD, COMMENT_TAIL, DIGIT,
    EXPONENT_HEAD, EXPONENT_SIGN, FRACTION_HEAD, HEX_DIGIT, LINE_TERMINATOR, NAME_HEAD, NAME_TAIL,
    NEGATIVE_SIGN, PUNCTUATOR, STR_CHAR, STR_QUOTE, STR_UNICODE_ESCAPE_HEAD, UNICODE_BOM,
    WHITE_SPACE,
};
use crate::error::SdlError;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

pub struct Lexer {
    scanner: Scanner,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            scanner: Scanner::new(source),
        }
    }

    /// Produces the next grammar-significant token, or `None` at the end of
    /// the document.
    pub fn next(&mut self) -> Result<Option<Token>, SdlError> {
        while let Some(token) = self.next_token()? {
            trace!("{} [{}:{}]", token, token.line, token.column);
            if !token.kind.is_ignored() {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    /// Produces every token, including the ignored kinds.
    pub fn next_token(&mut self) -> Result<Option<Token>, SdlError> {
        if !self.scanner.has_next() {
            return Ok(None);
        }
        if self.scanner.starts_with(&UNICODE_BOM) {
            return Ok(Some(self.take_simple(TokenKind::UnicodeBom, &UNICODE_BOM)));
        }
        if self.scanner.starts_with(&WHITE_SPACE) {
            return Ok(Some(self.take_simple(TokenKind::WhiteSpace, &WHITE_SPACE)));
        }
        if self.scanner.starts_with(&LINE_TERMINATOR) {
            return Ok(Some(
                self.take_simple(TokenKind::LineTerminator, &LINE_TERMINATOR),
            ));
        }
        if self.scanner.starts_with(&COMMA) {
            return Ok(Some(self.take_simple(TokenKind::Comma, &COMMA)));
        }
        if self.scanner.starts_with(&PUNCTUATOR) {
            return Ok(Some(self.take_simple(TokenKind::Punctuator, &PUNCTUATOR)));
        }
        if self.scanner.starts_with(&COMMENT_HEAD) {
            let (mut text, line, col) = self.scanner.take(&COMMENT_HEAD);
            let (tail, _, _) = self.scanner.take_while_match(&COMMENT_TAIL);
            text.push_str(&tail);
            return Ok(Some(Token::new(TokenKind::Comment, text, line, col)));
        }
        if self.scanner.starts_with(&NAME_HEAD) {
            let (mut text, line, col) = self.scanner.take_while_match(&NAME_HEAD);
            let (tail, _, _) = self.scanner.take_while_match(&NAME_TAIL);
            text.push_str(&tail);
            return Ok(Some(Token::new(TokenKind::Name, text, line, col)));
        }
        if self.scanner.starts_with(&NEGATIVE_SIGN) || self.scanner.starts_with(&DIGIT) {
            return self.take_number().map(Some);
        }
        if self.scanner.starts_with(&BLOCK_STR_QUOTE) {
            return self.take_block_string().map(Some);
        }
        if self.scanner.starts_with(&STR_QUOTE) {
            return self.take_string().map(Some);
        }
        let (line, column) = self.scanner.line_col();
        match self.scanner.peek() {
            Some(found) => Err(SdlError::UnexpectedCharacter {
                found,
                line,
                column,
            }),
            None => Ok(None),
        }
    }

    /// Drains the document into a token vector, ignored kinds filtered out.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SdlError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn take_simple(&mut self, kind: TokenKind, matcher: &Matcher) -> Token {
        let (text, line, col) = self.scanner.take(matcher);
        Token::new(kind, text, line, col)
    }

    // IntValue and FloatValue. The fractional part and the exponent each
    // promote the token to FloatValue.
    fn take_number(&mut self) -> Result<Token, SdlError> {
        let s = &mut self.scanner;
        let (mut text, line, column) = s.take(&NEGATIVE_SIGN);

        let (int_part, _, _) = s.take_while_match(&DIGIT);
        if int_part.is_empty() {
            return Err(SdlError::MalformedNumber { line, column });
        }
        if int_part.starts_with('0') && int_part.chars().count() > 1 {
            return Err(SdlError::MalformedNumber { line, column });
        }
        text.push_str(&int_part);

        let mut kind = TokenKind::IntValue;
        let (fraction_head, _, _) = s.take(&FRACTION_HEAD);
        if !fraction_head.is_empty() {
            kind = TokenKind::FloatValue;
            text.push_str(&fraction_head);
            let (digits, _, _) = s.take_while_match(&DIGIT);
            if digits.is_empty() {
                return Err(SdlError::MalformedNumber { line, column });
            }
            text.push_str(&digits);
        }
        let (exponent_head, _, _) = s.take(&EXPONENT_HEAD);
        if !exponent_head.is_empty() {
            kind = TokenKind::FloatValue;
            text.push_str(&exponent_head);
            let (sign, _, _) = s.take(&EXPONENT_SIGN);
            text.push_str(&sign);
            let (digits, _, _) = s.take_while_match(&DIGIT);
            if digits.is_empty() {
                return Err(SdlError::MalformedNumber { line, column });
            }
            text.push_str(&digits);
        }
        Ok(Token::new(kind, text, line, column))
    }

    fn take_string(&mut self) -> Result<Token, SdlError> {
        let s = &mut self.scanner;
        let (mut text, line, column) = s.take(&STR_QUOTE);
        loop {
            let (run, _, _) = s.take_while_match(&STR_CHAR);
            text.push_str(&run);
            if s.starts_with(&STR_UNICODE_ESCAPE_HEAD) {
                let (head, escape_line, escape_column) = s.take(&STR_UNICODE_ESCAPE_HEAD);
                text.push_str(&head);
                for _ in 0..4 {
                    if !s.starts_with(&HEX_DIGIT) {
                        return Err(SdlError::MalformedUnicodeEscape {
                            line: escape_line,
                            column: escape_column,
                        });
                    }
                    let (digit, _, _) = s.take(&HEX_DIGIT);
                    text.push_str(&digit);
                }
                continue;
            }
            if s.starts_with(&STR_QUOTE) {
                let (quote, _, _) = s.take(&STR_QUOTE);
                text.push_str(&quote);
                return Ok(Token::new(TokenKind::StringValue, text, line, column));
            }
            return Err(SdlError::MalformedString { line, column });
        }
    }

    fn take_block_string(&mut self) -> Result<Token, SdlError> {
        let s = &mut self.scanner;
        let (mut text, line, column) = s.take(&BLOCK_STR_QUOTE);
        let (body, _, _) = s.take_while_match(&BLOCK_STR_CHAR);
        text.push_str(&body);
        if !s.starts_with(&BLOCK_STR_QUOTE) {
            return Err(SdlError::MalformedString { line, column });
        }
        let (quote, _, _) = s.take(&BLOCK_STR_QUOTE);
        text.push_str(&quote);
        Ok(Token::new(TokenKind::StringValue, text, line, column))
    }
}
