//! A cursor over WKT text with single-token lookahead.

use crate::error::{Result, WkError};

const WHITESPACE: &[u8] = b" \r\n\t";
const SEPARATORS: &[u8] = b" \r\n\t,();=";
const NUMERIC_START: &[u8] = b"+-.0123456789";
/// Characters that may start `nan`, `inf` or `-inf`.
const NON_FINITE_START: &[u8] = b"-nNiI";

/// Tokens are bounded by ASCII separators, so every offset the cursor stops at is a char
/// boundary of the source.
pub(crate) struct Tokenizer<'a> {
    src: &'a str,
    offset: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, offset: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.offset;
        while self
            .bytes()
            .get(self.offset)
            .is_some_and(|c| WHITESPACE.contains(c))
        {
            self.offset += 1;
        }
        self.offset - start
    }

    /// The next non-whitespace character, without consuming it.
    pub fn peek_char(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.bytes().get(self.offset).copied()
    }

    pub fn is(&mut self, c: u8) -> bool {
        self.peek_char() == Some(c)
    }

    pub fn is_one_of(&mut self, chars: &[u8]) -> bool {
        self.peek_char().is_some_and(|c| chars.contains(&c))
    }

    pub fn is_letter(&mut self) -> bool {
        self.peek_char().is_some_and(|c| c.is_ascii_alphabetic())
    }

    /// Whether the next token is a number, including `nan`, `inf` and `-inf`.
    pub fn is_number(&mut self) -> bool {
        if self.is_one_of(NON_FINITE_START) {
            self.peek_until_sep().parse::<f64>().is_ok()
        } else {
            self.is_one_of(NUMERIC_START)
        }
    }

    /// The next token, without consuming it. A separator is a token of its own.
    pub fn peek_until_sep(&mut self) -> &'a str {
        self.skip_whitespace();
        let len = match self.word_len() {
            0 if self.offset < self.src.len() => 1,
            len => len,
        };
        self.slice(self.offset, self.offset + len)
    }

    fn read_until_sep(&mut self) -> &'a str {
        let text = self.peek_until_sep();
        self.offset += text.len();
        text
    }

    fn word_len(&self) -> usize {
        self.bytes()[self.offset.min(self.src.len())..]
            .iter()
            .take_while(|c| !SEPARATORS.contains(c))
            .count()
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.src.get(start..end).unwrap_or("")
    }

    pub fn assert_word(&mut self) -> Result<&'a str> {
        let text = self.peek_until_sep();
        if !self.is_letter() {
            return Err(self.error("a word", quote(text)));
        }
        self.offset += text.len();
        Ok(text)
    }

    pub fn assert_integer(&mut self) -> Result<u32> {
        let text = self.peek_until_sep();
        match text.parse::<u32>() {
            Ok(value) => {
                self.offset += text.len();
                Ok(value)
            }
            Err(_) => Err(self.error("an integer", quote(text))),
        }
    }

    /// Any decimal or scientific literal with an optional sign, plus `nan`, `inf` and `-inf` in
    /// any case.
    pub fn assert_number(&mut self) -> Result<f64> {
        let text = self.peek_until_sep();
        match text.parse::<f64>() {
            Ok(value) => {
                self.offset += text.len();
                Ok(value)
            }
            Err(_) => Err(self.error("a number", quote(text))),
        }
    }

    /// Requires at least one whitespace character.
    pub fn assert_whitespace(&mut self) -> Result<()> {
        if self.skip_whitespace() == 0 {
            let found = quote(self.peek_until_sep());
            Err(self.error("whitespace", found))
        } else {
            Ok(())
        }
    }

    pub fn assert_char(&mut self, c: u8) -> Result<()> {
        if self.is(c) {
            self.offset += 1;
            Ok(())
        } else {
            let found = quote(self.peek_until_sep());
            Err(self.error(&quote_chars(&[c]), found))
        }
    }

    /// Consumes and returns whichever of `chars` comes next.
    pub fn assert_one_of(&mut self, chars: &[u8]) -> Result<u8> {
        match self.peek_char() {
            Some(c) if chars.contains(&c) => {
                self.offset += 1;
                Ok(c)
            }
            _ => {
                let found = quote(self.peek_until_sep());
                Err(self.error(&quote_chars(chars), found))
            }
        }
    }

    /// Whether the next token is the `EMPTY` keyword.
    pub fn is_empty_keyword(&mut self) -> bool {
        self.peek_until_sep() == "EMPTY"
    }

    /// Consumes `EMPTY` (returning true) or an opening parenthesis (returning false).
    pub fn assert_empty_or_open(&mut self) -> Result<bool> {
        if self.is_letter() {
            let word = self.assert_word()?;
            if word != "EMPTY" {
                return Err(self.error_before("'(' or 'EMPTY'", word));
            }
            Ok(true)
        } else if self.is(b'(') {
            self.offset += 1;
            Ok(false)
        } else {
            let found = quote(self.peek_until_sep());
            Err(self.error("'(' or 'EMPTY'", found))
        }
    }

    /// Skips past the next token.
    pub fn skip_token(&mut self) {
        self.read_until_sep();
    }

    /// An error at the current offset.
    pub fn error(&self, expected: &str, found: String) -> WkError {
        WkError::WktParse {
            expected: expected.to_string(),
            found,
            position: self.offset,
        }
    }

    /// An error pointing at `found`, which was the token just consumed.
    pub fn error_before(&self, expected: &str, found: &str) -> WkError {
        WkError::WktParse {
            expected: expected.to_string(),
            found: quote(found),
            position: self.offset.saturating_sub(found.len()),
        }
    }
}

fn quote(text: &str) -> String {
    if text.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{text}'")
    }
}

/// `'a'`, `'a' or 'b'`, `'a', 'b' or 'c'`.
fn quote_chars(chars: &[u8]) -> String {
    let quoted: Vec<String> = chars
        .iter()
        .map(|c| format!("'{}'", char::from(*c)))
        .collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn peeks_tokens_and_separators() {
        let mut s = Tokenizer::new("  POINT(1.5 -2)");
        assert_eq!(s.peek_until_sep(), "POINT");
        assert_eq!(s.offset, 2);
        assert_eq!(s.assert_word().unwrap(), "POINT");
        assert_eq!(s.peek_until_sep(), "(");
        s.assert_char(b'(').unwrap();
        assert!(s.is_number());
        assert_eq!(s.assert_number().unwrap(), 1.5);
        s.assert_whitespace().unwrap();
        assert_eq!(s.assert_number().unwrap(), -2.);
        assert_eq!(s.assert_one_of(b",)").unwrap(), b')');
        assert_eq!(s.peek_char(), None);
    }

    #[test]
    fn non_finite_numbers() {
        let mut s = Tokenizer::new("nan inf -inf NaN Inf");
        assert!(s.is_number());
        assert!(s.assert_number().unwrap().is_nan());
        assert_eq!(s.assert_number().unwrap(), f64::INFINITY);
        assert_eq!(s.assert_number().unwrap(), f64::NEG_INFINITY);
        assert!(s.assert_number().unwrap().is_nan());
        assert!(s.is_number());
        assert_eq!(s.assert_number().unwrap(), f64::INFINITY);
    }

    #[test]
    fn signed_and_leading_dot_numbers() {
        let mut s = Tokenizer::new(".5 -.25 +1 1. 2E-1");
        assert!(s.is_number());
        assert_eq!(s.assert_number().unwrap(), 0.5);
        assert!(s.is_number());
        assert_eq!(s.assert_number().unwrap(), -0.25);
        assert!(s.is_number());
        assert_eq!(s.assert_number().unwrap(), 1.);
        assert_eq!(s.assert_number().unwrap(), 1.);
        assert_eq!(s.assert_number().unwrap(), 0.2);
    }

    #[test]
    fn words_are_not_numbers() {
        let mut s = Tokenizer::new("EMPTY nothing");
        assert!(!s.is_number());
        assert!(s.is_empty_keyword());
        assert!(s.assert_empty_or_open().unwrap());
        assert!(!s.is_number());
    }

    #[test]
    fn error_messages() {
        let mut s = Tokenizer::new("POINT (1 TWO)");
        s.assert_word().unwrap();
        s.assert_char(b'(').unwrap();
        s.assert_number().unwrap();
        s.assert_whitespace().unwrap();
        let err = s.assert_number().unwrap_err();
        assert_eq!(err.to_string(), "Expected a number but found 'TWO' (:9)");

        let mut s = Tokenizer::new("(1 2");
        s.assert_char(b'(').unwrap();
        s.assert_number().unwrap();
        s.assert_whitespace().unwrap();
        s.assert_number().unwrap();
        let err = s.assert_one_of(b",)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected ',' or ')' but found end of input (:4)"
        );

        let mut s = Tokenizer::new("1,2");
        s.assert_number().unwrap();
        let err = s.assert_whitespace().unwrap_err();
        assert_eq!(err.to_string(), "Expected whitespace but found ',' (:1)");
    }

    #[test]
    fn error_before_points_at_consumed_word() {
        let mut s = Tokenizer::new("POINT FULL");
        s.assert_word().unwrap();
        let err = s.assert_empty_or_open().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected '(' or 'EMPTY' but found 'FULL' (:6)"
        );
    }

    #[test]
    fn integers() {
        let mut s = Tokenizer::new("4326;");
        assert_eq!(s.assert_integer().unwrap(), 4326);
        s.assert_char(b';').unwrap();
        let mut s = Tokenizer::new("-1");
        assert!(s.assert_integer().is_err());
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_chars(b"("), "'('");
        assert_eq!(quote_chars(b",)"), "',' or ')'");
        assert_eq!(quote_chars(b"ZM;"), "'Z', 'M' or ';'");
        assert_eq!(quote(""), "end of input");
    }
}
