use std::fmt;

use indexmap::IndexMap;

use crate::scanner::Token;

/// Precedence of anything that isn't a binary operator. It's lower than
/// any valid precedence, so it always ends the precedence climbing loop.
pub const NOT_A_BINARY_OPERATOR: i32 = -1;

/// Chars that have a fixed meaning in the grammar and therefore can't
/// be used as binary operators.
const RESERVED: [char; 5] = ['(', ')', ',', ';', '#'];

/// Maps binary operator chars to their precedence. Higher binds
/// tighter. The table is set up before parsing starts and is read-only
/// while parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct PrecedenceTable {
    entries: IndexMap<char, i32>,
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        let entries = [('<', 10), ('+', 20), ('-', 20), ('*', 40), ('/', 40)]
            .into_iter()
            .collect();
        Self { entries }
    }
}

impl PrecedenceTable {
    /// Create an empty table. With no operators, every expression is a
    /// single primary.
    pub fn empty() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Add or replace an operator. Returns the previous precedence if
    /// the operator was already present.
    pub fn insert(
        &mut self,
        op: char,
        precedence: i32,
    ) -> Result<Option<i32>, PrecedenceErr> {
        if !op.is_ascii_punctuation() || op == '.' {
            return Err(PrecedenceErr::new(PrecedenceErrKind::NotPunctuation(op)));
        }
        if RESERVED.contains(&op) {
            return Err(PrecedenceErr::new(PrecedenceErrKind::Reserved(op)));
        }
        // The upper bound leaves room for the +1 used when climbing.
        if precedence < 1 || precedence == i32::MAX {
            return Err(PrecedenceErr::new(PrecedenceErrKind::OutOfRange(precedence)));
        }
        Ok(self.entries.insert(op, precedence))
    }

    pub fn precedence_of(&self, op: char) -> i32 {
        self.entries.get(&op).copied().unwrap_or(NOT_A_BINARY_OPERATOR)
    }

    /// Get the binary precedence of a token. Only Punct tokens can be
    /// binary operators.
    pub fn token_precedence(&self, token: &Token) -> i32 {
        match token {
            Token::Punct(c) => self.precedence_of(*c),
            _ => NOT_A_BINARY_OPERATOR,
        }
    }

    /// Iterate over operators in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (char, i32)> + '_ {
        self.entries.iter().map(|(op, prec)| (*op, *prec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse an operator spec of the form `OP=PREC`, e.g. `%=40`.
pub fn parse_binop_spec(spec: &str) -> Result<(char, i32), PrecedenceErr> {
    let bad_spec = || PrecedenceErr::new(PrecedenceErrKind::BadSpec(spec.to_owned()));
    let (op, precedence) = spec.rsplit_once('=').ok_or_else(bad_spec)?;
    let mut chars = op.trim().chars();
    let op = match (chars.next(), chars.next()) {
        (Some(op), None) => op,
        _ => return Err(bad_spec()),
    };
    let precedence = precedence.trim().parse::<i32>().map_err(|_| bad_spec())?;
    Ok((op, precedence))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecedenceErr {
    pub kind: PrecedenceErrKind,
}

impl PrecedenceErr {
    pub fn new(kind: PrecedenceErrKind) -> Self {
        Self { kind }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrecedenceErrKind {
    NotPunctuation(char),
    Reserved(char),
    OutOfRange(i32),
    BadSpec(String),
}

impl fmt::Display for PrecedenceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PrecedenceErrKind::*;
        match &self.kind {
            NotPunctuation(op) => {
                write!(f, "Binary operator must be an ASCII punctuation char: {op:?}")
            }
            Reserved(op) => write!(f, "Char is reserved and can't be an operator: {op:?}"),
            OutOfRange(prec) => {
                write!(f, "Precedence must be at least 1 and less than {}: {prec}", i32::MAX)
            }
            BadSpec(spec) => write!(f, "Expected OP=PREC (e.g. %=40): {spec:?}"),
        }
    }
}
