use std::fmt;

use kaleidoscope_util::source::Location;

use super::TokenWithLocation;

pub type ScanResult = Result<TokenWithLocation, ScanErr>;
pub type ScanTokensResult = Result<Vec<TokenWithLocation>, ScanErr>;

/// A lexical error. This plays the role of an error token: the scanner
/// hands it back in place of a token and keeps going if asked for more.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanErr {
    pub kind: ScanErrKind,
    pub location: Location,
}

impl ScanErr {
    pub fn new(kind: ScanErrKind, location: Location) -> Self {
        Self { kind, location }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanErrKind {
    /// More than one decimal point or no digits at all. Holds the text
    /// read before the problem was detected.
    MalformedNumber(String),
    CouldNotReadSource(String),
}

impl fmt::Display for ScanErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

impl fmt::Display for ScanErrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ScanErrKind::*;
        match self {
            MalformedNumber(text) => write!(f, "Malformed number: {text}"),
            CouldNotReadSource(msg) => write!(f, "Could not read source: {msg}"),
        }
    }
}
