use std::io::BufRead;

use kaleidoscope_util::source::{source_from_text, Source};

use crate::ast;
use crate::scanner::{ScanErr, Scanner, Token, TokenWithLocation};

use super::cursor::TokenCursor;
use super::precedence::PrecedenceTable;
use super::result::{ExprResult, ParseErr, ParseErrKind, ParseResult};

/// Maximum nesting of parenthesized expressions, call arguments, and
/// operator chains before parsing gives up. Each level costs a few
/// stack frames while parsing and one level of recursion whenever the
/// resulting tree is walked.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Scan and parse all the items in the specified text using the
/// default precedence table.
pub fn parse_text(text: &str) -> ParseResult {
    let mut source = source_from_text(text);
    let mut parser = Parser::new(Scanner::new(&mut source), PrecedenceTable::default())?;
    parser.parse_module()
}

/// Scan and parse a single expression from the start of the specified
/// text using the default precedence table. Anything after the
/// expression is ignored.
pub fn parse_expr_text(text: &str) -> ExprResult {
    let mut source = source_from_text(text);
    let mut parser = Parser::new(Scanner::new(&mut source), PrecedenceTable::default())?;
    parser.parse_expression()
}

pub struct Parser<'a, T: BufRead> {
    cursor: TokenCursor<'a, T>,
    precedence_table: PrecedenceTable,
    max_depth: usize,
    depth: usize,
}

impl<'a, T: BufRead> Parser<'a, T> {
    /// Create a parser and read the first token.
    pub fn new(
        scanner: Scanner<'a, T>,
        precedence_table: PrecedenceTable,
    ) -> Result<Self, ParseErr> {
        let cursor = TokenCursor::new(scanner).map_err(scan_err)?;
        Ok(Self { cursor, precedence_table, max_depth: DEFAULT_MAX_DEPTH, depth: 0 })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn current(&self) -> &TokenWithLocation {
        self.cursor.current()
    }

    pub fn source(&self) -> &Source<T> {
        self.cursor.source()
    }

    pub fn precedence_table(&self) -> &PrecedenceTable {
        &self.precedence_table
    }

    fn advance(&mut self) -> Result<(), ParseErr> {
        self.cursor.advance().map_err(scan_err)?;
        Ok(())
    }

    /// Drop the current token. This is the only recovery the parser
    /// offers; after an error, callers can skip a token and try again.
    pub fn skip_token(&mut self) -> Result<(), ParseErr> {
        self.advance()
    }

    fn err(&self, kind: ParseErrKind) -> ParseErr {
        ParseErr::new(kind)
    }

    /// Precedence of the current token as a binary operator.
    fn current_precedence(&self) -> i32 {
        self.precedence_table.token_precedence(&self.cursor.current().token)
    }

    /// Run `func` one nesting level deeper, failing if that's too deep.
    fn nested<R>(
        &mut self,
        func: impl FnOnce(&mut Self) -> Result<R, ParseErr>,
    ) -> Result<R, ParseErr> {
        if self.depth >= self.max_depth {
            let token = self.cursor.current().clone();
            return Err(self.err(ParseErrKind::NestingTooDeep(token)));
        }
        self.depth += 1;
        let result = func(self);
        self.depth -= 1;
        result
    }

    // Top level -------------------------------------------------------

    /// Parse all remaining items, stopping at the first error.
    pub fn parse_module(&mut self) -> ParseResult {
        let mut items = vec![];
        while let Some(item) = self.next_item()? {
            items.push(item);
        }
        Ok(ast::Module::new(items))
    }

    /// Parse the next item, skipping any stray semicolons. Returns
    /// `None` at the end of input.
    ///
    /// toplevel ::= definition | external | expression | ';'
    pub fn next_item(&mut self) -> Result<Option<ast::Item>, ParseErr> {
        self.depth = 0;
        loop {
            let item = match self.cursor.current().token {
                Token::EndOfInput => return Ok(None),
                Token::Punct(';') => {
                    self.advance()?;
                    continue;
                }
                Token::Def => self.parse_definition()?,
                Token::Extern => self.parse_extern()?,
                _ => self.parse_top_level_expr()?,
            };
            log::debug!("PARSED {}: {item}", item.describe());
            return Ok(Some(item));
        }
    }

    /// definition ::= 'def' prototype expression
    pub fn parse_definition(&mut self) -> Result<ast::Item, ParseErr> {
        let start = self.cursor.current().start;
        self.advance()?; // consume def
        let proto = self.parse_prototype()?;
        let body = self.parse_expression()?;
        let end = self.cursor.previous_end();
        Ok(ast::Item::new_def(ast::Func::new(proto, body), start, end))
    }

    /// external ::= 'extern' prototype
    pub fn parse_extern(&mut self) -> Result<ast::Item, ParseErr> {
        let start = self.cursor.current().start;
        self.advance()?; // consume extern
        let proto = self.parse_prototype()?;
        let end = self.cursor.previous_end();
        Ok(ast::Item::new_extern(proto, start, end))
    }

    /// toplevelexpr ::= expression
    pub fn parse_top_level_expr(&mut self) -> Result<ast::Item, ParseErr> {
        let start = self.cursor.current().start;
        let expr = self.parse_expression()?;
        let end = self.cursor.previous_end();
        Ok(ast::Item::new_expr(expr, start, end))
    }

    /// prototype ::= IDENTIFIER '(' IDENTIFIER* ')'
    ///
    /// Parameter names are separated by whitespace, not commas.
    pub fn parse_prototype(&mut self) -> Result<ast::Prototype, ParseErr> {
        let name = match &self.cursor.current().token {
            Token::Ident(name) => name.clone(),
            _ => {
                let token = self.cursor.current().clone();
                return Err(self.err(ParseErrKind::ExpectedFuncName(token)));
            }
        };
        self.advance()?;

        if !self.cursor.current().token.is_punct('(') {
            let token = self.cursor.current().clone();
            return Err(self.err(ParseErrKind::ExpectedOpenParenInPrototype(token)));
        }

        let mut params = vec![];
        loop {
            self.advance()?;
            match &self.cursor.current().token {
                Token::Ident(param) => params.push(param.clone()),
                _ => break,
            }
        }

        if !self.cursor.current().token.is_punct(')') {
            let token = self.cursor.current().clone();
            return Err(self.err(ParseErrKind::ExpectedClosingParenInPrototype(token)));
        }
        self.advance()?; // consume )

        Ok(ast::Prototype::new(name, params))
    }

    // Expressions -----------------------------------------------------

    /// expression ::= primary binopRHS*
    ///
    /// Parse one primary, then climb from a zero floor so every binary
    /// operator present gets a chance to attach.
    pub fn parse_expression(&mut self) -> ExprResult {
        self.nested(|parser| {
            let lhs = parser.parse_primary()?;
            parser.parse_bin_op_rhs(0, lhs)
        })
    }

    /// primary ::= NUMBER | IDENTIFIER ('(' arglist? ')')? | '(' expression ')'
    ///
    /// When the current token can't start an expression, nothing is
    /// consumed.
    fn parse_primary(&mut self) -> ExprResult {
        match &self.cursor.current().token {
            Token::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(ast::Expr::new_number(value))
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.advance()?;
                self.parse_ident_expr(name)
            }
            Token::Punct('(') => self.parse_paren_expr(),
            _ => {
                let token = self.cursor.current().clone();
                Err(self.err(ParseErrKind::ExpectedExpr(token)))
            }
        }
    }

    /// Called with the identifier already consumed. Without a following
    /// '(', it's a plain variable reference.
    ///
    /// arglist ::= expression (',' expression)*
    fn parse_ident_expr(&mut self, name: String) -> ExprResult {
        if !self.cursor.current().token.is_punct('(') {
            return Ok(ast::Expr::new_variable(name));
        }
        self.advance()?; // consume (

        let mut args = vec![];
        if !self.cursor.current().token.is_punct(')') {
            loop {
                args.push(self.parse_expression()?);
                let token = &self.cursor.current().token;
                if token.is_punct(')') {
                    break;
                }
                if !token.is_punct(',') {
                    let token = self.cursor.current().clone();
                    return Err(self.err(ParseErrKind::ExpectedCommaOrClosingParen(token)));
                }
                self.advance()?; // consume ,
            }
        }
        self.advance()?; // consume )

        Ok(ast::Expr::new_call(name, args))
    }

    /// Parens only guide grouping; the inner expression is returned as
    /// is.
    fn parse_paren_expr(&mut self) -> ExprResult {
        self.advance()?; // consume (
        let expr = self.parse_expression()?;
        if !self.cursor.current().token.is_punct(')') {
            let token = self.cursor.current().clone();
            return Err(self.err(ParseErrKind::ExpectedClosingParen(token)));
        }
        self.advance()?; // consume )
        Ok(expr)
    }

    /// binopRHS ::= (BINOP primary)*
    ///
    /// Keep folding `lhs op rhs` into `lhs` while the current operator
    /// binds at least as tightly as `min_precedence`. When the operator
    /// after `rhs` binds tighter than the one before it, `rhs` absorbs
    /// the tighter operators first. The recursive floor is one above the
    /// current operator's precedence, so equal precedence operators are
    /// left to this loop and group to the left.
    ///
    /// Each fold makes `lhs` one level deeper, so folds count against
    /// the nesting limit too. That keeps every tree the parser returns
    /// shallow enough to be dropped, compared, and printed recursively.
    fn parse_bin_op_rhs(&mut self, min_precedence: i32, mut lhs: ast::Expr) -> ExprResult {
        let mut folds = 0;
        loop {
            let precedence = self.current_precedence();
            if precedence < min_precedence {
                return Ok(lhs);
            }

            let op = match self.cursor.current().token.as_punct() {
                Some(op) => op,
                None => return Ok(lhs),
            };

            folds += 1;
            if self.depth + folds > self.max_depth {
                let token = self.cursor.current().clone();
                return Err(self.err(ParseErrKind::NestingTooDeep(token)));
            }

            self.advance()?; // consume op

            let mut rhs = self.parse_primary()?;

            let next_precedence = self.current_precedence();
            if precedence < next_precedence {
                rhs = self.nested(|parser| parser.parse_bin_op_rhs(precedence + 1, rhs))?;
            }

            lhs = ast::Expr::new_binary_op(op, lhs, rhs);
        }
    }
}

/// Wrap a scan error so it can be propagated as a parse error.
fn scan_err(err: ScanErr) -> ParseErr {
    ParseErr::new(ParseErrKind::ScanErr(err))
}
