//! Borrowed text span
//!
//! A non-owning view into assembly source with the handful of operations the
//! assembler front end needs: trimming, chopping at a delimiter, comparison and
//! a lenient integer parse.

use crate::value::Word;

/// A borrowed slice of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSpan<'a> {
    text: &'a str,
}

impl<'a> TextSpan<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    pub fn trim_left(self) -> Self {
        Self::new(self.text.trim_start_matches(is_space))
    }

    pub fn trim_right(self) -> Self {
        Self::new(self.text.trim_end_matches(is_space))
    }

    pub fn trim(self) -> Self {
        self.trim_left().trim_right()
    }

    /// Split off everything before the first `delim`
    ///
    /// Returns the prefix and advances `self` past the delimiter. If the
    /// delimiter does not occur, the whole span is returned and `self`
    /// becomes empty.
    pub fn chop_by_delim(&mut self, delim: char) -> Self {
        match self.text.find(delim) {
            Some(index) => {
                let head = &self.text[..index];
                self.text = &self.text[index + delim.len_utf8()..];
                Self::new(head)
            }
            None => {
                let head = self.text;
                self.text = &self.text[self.text.len()..];
                Self::new(head)
            }
        }
    }

    /// Parse a leading run of ASCII decimal digits
    ///
    /// Parsing stops silently at the first non-digit, so `"12abc"` is 12 and
    /// `"-5"` or `""` is 0. Overflow wraps.
    pub fn to_int(&self) -> Word {
        self.text
            .bytes()
            .take_while(u8::is_ascii_digit)
            .fold(0, |acc: Word, digit| {
                acc.wrapping_mul(10).wrapping_add(Word::from(digit - b'0'))
            })
    }
}

impl<'a> From<&'a str> for TextSpan<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

impl PartialEq<str> for TextSpan<'_> {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for TextSpan<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl std::fmt::Display for TextSpan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text)
    }
}

/// C-locale whitespace: space, \t, \n, \v, \f, \r
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}
