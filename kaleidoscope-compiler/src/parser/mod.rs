pub use cursor::TokenCursor;
pub use parser::{parse_expr_text, parse_text, Parser, DEFAULT_MAX_DEPTH};
pub use precedence::{
    parse_binop_spec, PrecedenceErr, PrecedenceErrKind, PrecedenceTable,
    NOT_A_BINARY_OPERATOR,
};
pub use result::{ExprResult, ParseErr, ParseErrKind, ParseResult};

mod cursor;
#[allow(clippy::module_inception)]
mod parser;
mod precedence;
mod result;
