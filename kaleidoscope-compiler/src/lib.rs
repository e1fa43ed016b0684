//! # Kaleidoscope front end
//!
//! Scans source text into tokens and parses those tokens into an AST
//! using precedence climbing for binary operators.
pub use parser::{
    parse_expr_text, parse_text, ParseErr, ParseErrKind, Parser, PrecedenceTable,
    TokenCursor,
};
pub use scanner::{scan_text, ScanErr, ScanErrKind, Scanner, Token, TokenWithLocation};

pub mod ast;
pub mod parser;
pub mod scanner;

#[cfg(test)]
mod tests;
