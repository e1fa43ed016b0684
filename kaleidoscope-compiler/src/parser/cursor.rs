use std::io::BufRead;

use kaleidoscope_util::source::{Location, Source};

use crate::scanner::{ScanErr, Scanner, TokenWithLocation};

/// Holds the current token, which is the parser's only lookahead. The
/// parser never talks to the scanner directly.
pub struct TokenCursor<'a, T: BufRead> {
    scanner: Scanner<'a, T>,
    current: TokenWithLocation,
    /// End of the most recently consumed token.
    previous_end: Location,
}

impl<'a, T: BufRead> TokenCursor<'a, T> {
    /// Create a cursor and read the first token.
    pub fn new(mut scanner: Scanner<'a, T>) -> Result<Self, ScanErr> {
        let current = scanner.next_token()?;
        let previous_end = current.start;
        Ok(Self { scanner, current, previous_end })
    }

    pub fn current(&self) -> &TokenWithLocation {
        &self.current
    }

    pub fn previous_end(&self) -> Location {
        self.previous_end
    }

    /// Replace the current token with the next one from the scanner.
    /// On error, the current token is left as is.
    pub fn advance(&mut self) -> Result<&TokenWithLocation, ScanErr> {
        let next = self.scanner.next_token()?;
        self.previous_end = self.current.end;
        self.current = next;
        Ok(&self.current)
    }

    pub fn source(&self) -> &Source<T> {
        self.scanner.source()
    }
}
