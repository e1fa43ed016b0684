use std::io::BufRead;

use kaleidoscope_util::source::{source_from_text, Location, Source};

use super::keywords::KEYWORDS;
use super::result::{ScanErr, ScanErrKind, ScanResult, ScanTokensResult};
use super::token::{Token, TokenWithLocation};

/// Scan the specified text and return all of its tokens, including
/// the final EndOfInput token, or the first error encountered.
pub fn scan_text(text: &str) -> ScanTokensResult {
    let mut source = source_from_text(text);
    let scanner = Scanner::new(&mut source);
    scanner.collect()
}

/// Converts the chars from a source into tokens, one token at a time.
/// The only state carried between calls is the source's single char of
/// lookahead.
pub struct Scanner<'a, T: BufRead> {
    /// This is the source code that's being scanned. T can be anything
    /// that implements the BufRead trait (e.g., a Cursor wrapping some
    /// text or a BufReader wrapping an open file).
    source: &'a mut Source<T>,
    /// Set once EndOfInput has been returned via the iterator.
    done: bool,
}

impl<'a, T: BufRead> Scanner<'a, T> {
    pub fn new(source: &'a mut Source<T>) -> Self {
        Scanner { source, done: false }
    }

    pub fn source(&self) -> &Source<T> {
        self.source
    }

    /// Get the next token. Once the end of the source is reached, this
    /// will keep returning EndOfInput.
    pub fn next_token(&mut self) -> ScanResult {
        let result = self.scan_token();
        match &result {
            Ok(token) => log::trace!("TOKEN: {token}"),
            Err(err) => log::trace!("SCAN ERROR: {err}"),
        }
        result
    }

    fn scan_token(&mut self) -> ScanResult {
        loop {
            self.consume_whitespace();

            let c = match self.source.next() {
                Some(c) => c,
                None => return self.end_of_input(),
            };

            let start = self.source.location();

            let token = if c == '#' {
                self.consume_comment();
                continue;
            } else if c.is_ascii_alphabetic() {
                self.read_ident(c)
            } else if c.is_ascii_digit() || c == '.' {
                self.read_number(c, start)?
            } else {
                Token::Punct(c)
            };

            let end = self.source.location();
            return Ok(TokenWithLocation::new(token, start, end));
        }
    }

    fn end_of_input(&mut self) -> ScanResult {
        let location = self.source.next_location();
        if let Some(err) = self.source.take_error() {
            return Err(ScanErr::new(
                ScanErrKind::CouldNotReadSource(err.to_string()),
                location,
            ));
        }
        Ok(TokenWithLocation::new(Token::EndOfInput, location, location))
    }

    fn consume_whitespace(&mut self) {
        while self.source.next_if(|c| is_space(*c)).is_some() {}
    }

    /// Skip to the end of the line. The newline itself is left for the
    /// whitespace handling to deal with.
    fn consume_comment(&mut self) {
        while self.source.next_if(|c| !matches!(c, '\n' | '\r')).is_some() {}
    }

    /// Read an identifier starting with `first` and classify it as a
    /// keyword or a plain identifier.
    fn read_ident(&mut self, first: char) -> Token {
        let mut name = String::from(first);
        while let Some(c) = self.source.next_if(|c| c.is_ascii_alphanumeric()) {
            name.push(c);
        }
        match KEYWORDS.get(name.as_str()) {
            Some(token) => token.clone(),
            None => Token::Ident(name),
        }
    }

    /// Read a number starting with `first`, which is either a digit or
    /// a decimal point. A second decimal point is an error and is left
    /// in the source.
    fn read_number(&mut self, first: char, start: Location) -> Result<Token, ScanErr> {
        let mut string = String::from(first);
        let mut seen_point = first == '.';

        loop {
            match self.source.peek().copied() {
                Some(c) if c.is_ascii_digit() => string.push(c),
                Some('.') if !seen_point => {
                    seen_point = true;
                    string.push('.');
                }
                Some('.') => {
                    return Err(ScanErr::new(
                        ScanErrKind::MalformedNumber(string),
                        start,
                    ));
                }
                _ => break,
            }
            self.source.next();
        }

        // A lone point has no digits and doesn't parse. Digit runs too
        // long for f64 come out infinite and are rejected as well.
        match string.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::Number(value)),
            _ => Err(ScanErr::new(ScanErrKind::MalformedNumber(string), start)),
        }
    }
}

/// ASCII whitespace, including vertical tab. Other Unicode spaces are
/// passed through as Punct.
fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

impl<'a, T: BufRead> Iterator for Scanner<'a, T> {
    type Item = ScanResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if let Ok(TokenWithLocation { token: Token::EndOfInput, .. }) = &result {
            self.done = true;
        }
        Some(result)
    }
}
