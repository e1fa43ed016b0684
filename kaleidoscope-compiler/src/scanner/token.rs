use std::fmt;

use kaleidoscope_util::source::Location;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    // Commands
    Def,    // def
    Extern, // extern

    // Primary
    Ident(String), // name, x1
    Number(f64),   // 1, 1.0, .5, 5.

    // Any other char, passed through as is. Operators, parens, and
    // commas all show up as Punct.
    Punct(char),

    EndOfInput,
}

impl Token {
    /// Return the char if this is a Punct token.
    pub fn as_punct(&self) -> Option<char> {
        if let Self::Punct(c) = self {
            Some(*c)
        } else {
            None
        }
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.as_punct() == Some(c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Def => write!(f, "def"),
            Self::Extern => write!(f, "extern"),
            Self::Ident(name) => write!(f, "{name}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Punct(c) => write!(f, "{c}"),
            Self::EndOfInput => write!(f, "EOI"),
        }
    }
}

// A token with its start and end locations in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenWithLocation {
    pub token: Token,
    pub start: Location,
    pub end: Location,
}

impl TokenWithLocation {
    pub fn new(token: Token, start: Location, end: Location) -> Self {
        Self { token, start, end }
    }
}

impl fmt::Display for TokenWithLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.token, self.start, self.end)
    }
}
