use std::fmt;

use kaleidoscope_util::source::Location;

use crate::ast;
use crate::scanner::{ScanErr, Token, TokenWithLocation};

pub type ParseResult = Result<ast::Module, ParseErr>;
pub type ExprResult = Result<ast::Expr, ParseErr>;

#[derive(Clone, Debug, PartialEq)]
pub struct ParseErr {
    pub kind: ParseErrKind,
}

impl ParseErr {
    pub fn new(kind: ParseErrKind) -> Self {
        Self { kind }
    }

    /// Start and end of the source span the error refers to.
    pub fn span(&self) -> (Location, Location) {
        use ParseErrKind::*;
        match &self.kind {
            ParseErrKind::ScanErr(err) => (err.location, err.location),
            ExpectedExpr(token)
            | ExpectedClosingParen(token)
            | ExpectedCommaOrClosingParen(token)
            | ExpectedFuncName(token)
            | ExpectedOpenParenInPrototype(token)
            | ExpectedClosingParenInPrototype(token)
            | NestingTooDeep(token) => (token.start, token.end),
        }
    }

    /// True if parsing failed because the input ran out, meaning more
    /// input might fix it.
    pub fn is_at_end_of_input(&self) -> bool {
        use ParseErrKind::*;
        match &self.kind {
            ParseErrKind::ScanErr(_) | NestingTooDeep(_) => false,
            ExpectedExpr(token)
            | ExpectedClosingParen(token)
            | ExpectedCommaOrClosingParen(token)
            | ExpectedFuncName(token)
            | ExpectedOpenParenInPrototype(token)
            | ExpectedClosingParenInPrototype(token) => token.token == Token::EndOfInput,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrKind {
    ScanErr(ScanErr),
    /// Unknown token when expecting an expression.
    ExpectedExpr(TokenWithLocation),
    ExpectedClosingParen(TokenWithLocation),
    ExpectedCommaOrClosingParen(TokenWithLocation),
    ExpectedFuncName(TokenWithLocation),
    ExpectedOpenParenInPrototype(TokenWithLocation),
    ExpectedClosingParenInPrototype(TokenWithLocation),
    NestingTooDeep(TokenWithLocation),
}

impl fmt::Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for ParseErrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseErrKind::*;
        match self {
            Self::ScanErr(err) => write!(f, "{err}"),
            ExpectedExpr(t) => write!(
                f,
                "unknown token when expecting an expression at {}: {}",
                t.start, t.token
            ),
            ExpectedClosingParen(t) => {
                write!(f, "expected ')' at {}, found {}", t.start, t.token)
            }
            ExpectedCommaOrClosingParen(t) => write!(
                f,
                "expected ')' or ',' in argument list at {}, found {}",
                t.start, t.token
            ),
            ExpectedFuncName(t) => {
                write!(f, "expected function name in prototype at {}", t.start)
            }
            ExpectedOpenParenInPrototype(t) => {
                write!(f, "expected '(' in prototype at {}", t.start)
            }
            ExpectedClosingParenInPrototype(t) => {
                write!(f, "expected ')' in prototype at {}", t.start)
            }
            NestingTooDeep(t) => write!(f, "expression nested too deeply at {}", t.start),
        }
    }
}
