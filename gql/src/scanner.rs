//! Rune-level cursor over an SDL source text.
//!
//! The scanner owns the decoded rune sequence and tracks the 1-based line
//! and column of the cursor. Every read reports the position where the read
//! started, which the lexer stores on the token it produces.

use crate::charset::Matcher;

const LINE_INIT: u32 = 1;
const COL_INIT: u32 = 1;

pub struct Scanner {
    runes: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Scanner {
            runes: source.chars().collect(),
            pos: 0,
            line: LINE_INIT,
            col: COL_INIT,
        }
    }

    fn rest(&self) -> &[char] {
        &self.runes[self.pos..]
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.runes.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().first().copied()
    }

    pub fn line_col(&self) -> (u32, u32) {
        (self.line, self.col)
    }

    pub fn starts_with(&self, matcher: &Matcher) -> bool {
        matcher.head_matches(self.rest())
    }

    /// Consumes a single match of `matcher`, which may be empty.
    pub fn take(&mut self, matcher: &Matcher) -> (String, u32, u32) {
        let count = matcher.match_count(self.rest());
        self.pop_n(count)
    }

    /// Consumes matches of `matcher` until it stops matching.
    pub fn take_while_match(&mut self, matcher: &Matcher) -> (String, u32, u32) {
        let (line, col) = self.line_col();
        let mut text = String::new();
        loop {
            let count = matcher.match_count(self.rest());
            if count == 0 {
                break;
            }
            let (chunk, _, _) = self.pop_n(count);
            text.push_str(&chunk);
        }
        (text, line, col)
    }

    /// Consumes one rune, or `None` at the end of input.
    pub fn pop(&mut self) -> Option<(char, u32, u32)> {
        let (line, col) = self.line_col();
        let rune = *self.runes.get(self.pos)?;
        self.pos += 1;
        self.update_line_col(rune);
        Some((rune, line, col))
    }

    /// Consumes up to `n` runes. Stops quietly at the end of input.
    pub fn pop_n(&mut self, n: usize) -> (String, u32, u32) {
        let (line, col) = self.line_col();
        let mut text = String::with_capacity(n);
        for _ in 0..n {
            match self.pop() {
                Some((rune, _, _)) => text.push(rune),
                None => break,
            }
        }
        (text, line, col)
    }

    // A CRLF pair advances the line once, when the LF is popped. A lone CR
    // advances it immediately.
    fn update_line_col(&mut self, popped: char) {
        match popped {
            '\n' => {
                self.line += 1;
                self.col = COL_INIT;
            }
            '\r' if self.peek() != Some('\n') => {
                self.line += 1;
                self.col = COL_INIT;
            }
            _ => self.col += 1,
        }
    }
}
