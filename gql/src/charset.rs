//! Composable character-class matchers for the lexical grammar.
//!
//! A [`Matcher`] describes a set of rune sequences. The scanner asks two
//! questions of a matcher: does it match at the head of the remaining input,
//! and if so, how many runes does the match cover. All of the lexical classes
//! of the SDL grammar (whitespace, punctuators, name parts, string escapes,
//! block string bodies, ...) are built from the four combinators below and
//! collected into `lazy_static` tables at the bottom of this module.

use lazy_static::lazy_static;

#[derive(Clone, Debug)]
pub enum Matcher {
    /// An exact rune sequence.
    Str(&'static str),
    /// A single rune in an inclusive range.
    Range(char, char),
    /// The first member whose head matches decides the match.
    Union(Vec<Matcher>),
    /// A single rune at which the inner matcher does not match.
    ///
    /// `match_count` extends the match rune by rune until the inner matcher
    /// matches or the input ends, so `Not` is the building block for "run
    /// until terminator" classes such as comment and block string bodies.
    Not(Box<Matcher>),
}

impl Matcher {
    /// Whether this matcher matches at the head of `runes`.
    ///
    /// Empty input never matches, not even for `Not`.
    pub fn head_matches(&self, runes: &[char]) -> bool {
        match self {
            Matcher::Str(s) => {
                let mut expected = s.chars();
                let mut actual = runes.iter();
                loop {
                    match (expected.next(), actual.next()) {
                        (None, _) => return true,
                        (Some(_), None) => return false,
                        (Some(e), Some(&a)) if e != a => return false,
                        _ => {}
                    }
                }
            }
            Matcher::Range(from, to) => runes.first().is_some_and(|&r| *from <= r && r <= *to),
            Matcher::Union(members) => members.iter().any(|m| m.head_matches(runes)),
            Matcher::Not(inner) => !runes.is_empty() && !inner.head_matches(runes),
        }
    }

    /// Number of runes covered by a match at the head of `runes`, or zero
    /// when the head does not match.
    pub fn match_count(&self, runes: &[char]) -> usize {
        match self {
            Matcher::Str(s) => {
                if self.head_matches(runes) {
                    s.chars().count()
                } else {
                    0
                }
            }
            Matcher::Range(_, _) => usize::from(self.head_matches(runes)),
            Matcher::Union(members) => members
                .iter()
                .find(|m| m.head_matches(runes))
                .map_or(0, |m| m.match_count(runes)),
            Matcher::Not(inner) => {
                let mut count = 0;
                while count < runes.len() && !inner.head_matches(&runes[count..]) {
                    count += 1;
                }
                count
            }
        }
    }
}

fn not(inner: Matcher) -> Matcher {
    Matcher::Not(Box::new(inner))
}

fn union(members: Vec<Matcher>) -> Matcher {
    Matcher::Union(members)
}

fn str_union(literals: &[&'static str]) -> Matcher {
    Matcher::Union(literals.iter().map(|s| Matcher::Str(s)).collect())
}

lazy_static! {
    pub(crate) static ref UNICODE_BOM: Matcher = Matcher::Str("\u{feff}");
    pub(crate) static ref WHITE_SPACE: Matcher = str_union(&["\u{0009}", "\u{0020}"]);
    // "\r\n" before "\r" so that a CRLF pair is one terminator.
    pub(crate) static ref LINE_TERMINATOR: Matcher = str_union(&["\n", "\r\n", "\r"]);
    pub(crate) static ref COMMA: Matcher = Matcher::Str(",");
    pub(crate) static ref PUNCTUATOR: Matcher =
        str_union(&["!", "$", "(", ")", "...", ":", "=", "@", "[", "]", "{", "}", "|"]);
    pub(crate) static ref COMMENT_HEAD: Matcher = Matcher::Str("#");
    pub(crate) static ref COMMENT_TAIL: Matcher = not(LINE_TERMINATOR.clone());
    pub(crate) static ref DIGIT: Matcher = Matcher::Range('0', '9');
    pub(crate) static ref NAME_HEAD: Matcher = union(vec![
        Matcher::Str("_"),
        Matcher::Range('A', 'Z'),
        Matcher::Range('a', 'z'),
    ]);
    pub(crate) static ref NAME_TAIL: Matcher = union(vec![NAME_HEAD.clone(), DIGIT.clone()]);
    pub(crate) static ref NEGATIVE_SIGN: Matcher = Matcher::Str("-");
    pub(crate) static ref FRACTION_HEAD: Matcher = Matcher::Str(".");
    pub(crate) static ref EXPONENT_HEAD: Matcher = str_union(&["e", "E"]);
    pub(crate) static ref EXPONENT_SIGN: Matcher = str_union(&["+", "-"]);
    pub(crate) static ref STR_QUOTE: Matcher = Matcher::Str("\"");
    pub(crate) static ref STR_ESCAPE: Matcher =
        str_union(&["\\\"", "\\\\", "\\/", "\\b", "\\f", "\\n", "\\r", "\\t"]);
    pub(crate) static ref STR_UNICODE_ESCAPE_HEAD: Matcher = Matcher::Str("\\u");
    pub(crate) static ref HEX_DIGIT: Matcher = union(vec![
        Matcher::Range('0', '9'),
        Matcher::Range('A', 'F'),
        Matcher::Range('a', 'f'),
    ]);
    // A string character is either a recognized escape or any rune that is
    // not a quote, a bare backslash or a line terminator.
    pub(crate) static ref STR_CHAR: Matcher = union(vec![
        STR_ESCAPE.clone(),
        not(union(vec![
            Matcher::Str("\""),
            Matcher::Str("\\"),
            LINE_TERMINATOR.clone(),
        ])),
    ]);
    pub(crate) static ref BLOCK_STR_QUOTE: Matcher = Matcher::Str("\"\"\"");
    // The run member stops at escaped quotes as well, so that the escape
    // member gets to consume them wherever they appear in the body.
    pub(crate) static ref BLOCK_STR_CHAR: Matcher = union(vec![
        Matcher::Str("\\\"\"\""),
        not(union(vec![Matcher::Str("\\\"\"\""), Matcher::Str("\"\"\"")])),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runes(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn str_matches_exact_prefix() {
        let m = Matcher::Str("...");
        assert!(m.head_matches(&runes("...rest")));
        assert_eq!(m.match_count(&runes("...rest")), 3);
        assert!(!m.head_matches(&runes("..")));
        assert_eq!(m.match_count(&runes("..")), 0);
    }

    #[test]
    fn range_is_inclusive() {
        let m = Matcher::Range('0', '9');
        assert!(m.head_matches(&runes("0")));
        assert!(m.head_matches(&runes("9")));
        assert!(!m.head_matches(&runes("a")));
        assert_eq!(m.match_count(&runes("42")), 1);
    }

    #[test]
    fn union_takes_first_matching_member() {
        // "\r\n" is listed before "\r" and must win on a CRLF pair.
        assert_eq!(LINE_TERMINATOR.match_count(&runes("\r\nx")), 2);
        assert_eq!(LINE_TERMINATOR.match_count(&runes("\rx")), 1);
        assert_eq!(LINE_TERMINATOR.match_count(&runes("\nx")), 1);
    }

    #[test]
    fn not_runs_until_terminator() {
        let m = &*COMMENT_TAIL;
        assert_eq!(m.match_count(&runes("a comment\nnext")), 9);
    }

    #[test]
    fn not_stops_at_end_of_input() {
        // No terminator in sight, the run must still stop at the end.
        let m = &*COMMENT_TAIL;
        assert_eq!(m.match_count(&runes("trailing comment")), 16);
        assert!(!m.head_matches(&runes("")));
    }

    #[test]
    fn hex_digit_covers_both_cases() {
        for c in ["0", "9", "a", "f", "A", "F"] {
            assert!(HEX_DIGIT.head_matches(&runes(c)), "{c} should match");
        }
        for c in ["g", "G", " ", "-"] {
            assert!(!HEX_DIGIT.head_matches(&runes(c)), "{c} should not match");
        }
    }

    #[test]
    fn block_string_body_honors_escaped_quote() {
        assert_eq!(BLOCK_STR_CHAR.match_count(&runes("\\\"\"\" more")), 4);
        assert_eq!(BLOCK_STR_CHAR.match_count(&runes("\"\"\"")), 0);
        // The plain run stops right before an escaped quote.
        assert_eq!(BLOCK_STR_CHAR.match_count(&runes("ab\\\"\"\"x")), 2);
        assert_eq!(BLOCK_STR_CHAR.match_count(&runes("ab\"\"\"")), 2);
    }

    #[test]
    fn string_char_recognizes_escapes() {
        assert_eq!(STR_CHAR.match_count(&runes("\\n")), 2);
        assert_eq!(STR_CHAR.match_count(&runes("\\\"")), 2);
        assert_eq!(STR_CHAR.match_count(&runes("a")), 1);
        assert_eq!(STR_CHAR.match_count(&runes("\"")), 0);
        assert_eq!(STR_CHAR.match_count(&runes("\\x")), 0);
    }
}
