use kaleidoscope_util::source::{source_from_text, Location};

use crate::ast::*;
use crate::parser::*;
use crate::scanner::{ScanErr, ScanErrKind, Scanner, Token, TokenWithLocation};

fn var(name: &str) -> Expr {
    Expr::new_variable(name)
}

fn num(value: f64) -> Expr {
    Expr::new_number(value)
}

fn bin(op: char, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new_binary_op(op, lhs, rhs)
}

/// Parse an expression and assume success.
fn parse_expr_optimistic(text: &str) -> Expr {
    match parse_expr_text(text) {
        Ok(expr) => expr,
        Err(err) => panic!("Parse failed unexpectedly: {err:?}"),
    }
}

fn parse_expr_with_table(text: &str, table: PrecedenceTable) -> ExprResult {
    let mut source = source_from_text(text);
    let mut parser = Parser::new(Scanner::new(&mut source), table)?;
    parser.parse_expression()
}

// Primaries -----------------------------------------------------------

#[test]
fn parse_number() {
    assert_eq!(parse_expr_optimistic("42"), num(42.0));
}

#[test]
fn parse_variable() {
    assert_eq!(parse_expr_optimistic("x"), var("x"));
}

#[test]
fn parse_parens_are_transparent() {
    assert_eq!(parse_expr_optimistic("((x))"), var("x"));
}

#[test]
fn parse_call_with_no_args() {
    assert_eq!(parse_expr_optimistic("f()"), Expr::new_call("f", vec![]));
}

#[test]
fn parse_call_preserves_arg_order() {
    assert_eq!(
        parse_expr_optimistic("f(a, b+c)"),
        Expr::new_call("f", vec![var("a"), bin('+', var("b"), var("c"))])
    );
}

#[test]
fn parse_nested_calls() {
    assert_eq!(
        parse_expr_optimistic("f(g(1), h())"),
        Expr::new_call(
            "f",
            vec![Expr::new_call("g", vec![num(1.0)]), Expr::new_call("h", vec![])]
        )
    );
}

// Precedence climbing -------------------------------------------------

#[test]
fn parse_mul_binds_tighter_than_add() {
    //      +
    //     / \
    //    a   *
    //       / \
    //      b   c
    assert_eq!(
        parse_expr_optimistic("a+b*c"),
        bin('+', var("a"), bin('*', var("b"), var("c")))
    );
}

#[test]
fn parse_sub_is_left_associative() {
    //        -
    //       / \
    //      -   c
    //     / \
    //    a   b
    assert_eq!(
        parse_expr_optimistic("a-b-c"),
        bin('-', bin('-', var("a"), var("b")), var("c"))
    );
}

#[test]
fn parse_two_products_summed() {
    assert_eq!(
        parse_expr_optimistic("a*b+c*d"),
        bin('+', bin('*', var("a"), var("b")), bin('*', var("c"), var("d")))
    );
}

#[test]
fn parse_parens_override_precedence() {
    assert_eq!(
        parse_expr_optimistic("(a+b)*c"),
        bin('*', bin('+', var("a"), var("b")), var("c"))
    );
}

#[test]
fn parse_rising_then_falling_precedence() {
    // a < b + c * d - e  =>  a < ((b + (c * d)) - e)
    assert_eq!(
        parse_expr_optimistic("a < b + c * d - e"),
        bin(
            '<',
            var("a"),
            bin('-', bin('+', var("b"), bin('*', var("c"), var("d"))), var("e"))
        )
    );
}

#[test]
fn parse_mixed_chain() {
    // a+b+(c+d)*e*f+g  =>  ((a+b) + (((c+d)*e)*f)) + g
    assert_eq!(
        parse_expr_optimistic("a+b+(c+d)*e*f+g"),
        bin(
            '+',
            bin(
                '+',
                bin('+', var("a"), var("b")),
                bin('*', bin('*', bin('+', var("c"), var("d")), var("e")), var("f"))
            ),
            var("g")
        )
    );
}

#[test]
fn parse_stops_at_unknown_operator() {
    let mut source = source_from_text("a + b % c");
    let mut parser =
        Parser::new(Scanner::new(&mut source), PrecedenceTable::default()).unwrap();
    let expr = parser.parse_expression().unwrap();
    assert_eq!(expr, bin('+', var("a"), var("b")));
    assert_eq!(parser.current().token, Token::Punct('%'));
}

#[test]
fn parse_with_custom_operator() {
    let mut table = PrecedenceTable::default();
    table.insert('%', 40).unwrap();
    let expr = parse_expr_with_table("a + b % c", table).unwrap();
    assert_eq!(expr, bin('+', var("a"), bin('%', var("b"), var("c"))));
}

#[test]
fn parse_with_empty_table() {
    let expr = parse_expr_with_table("a + b", PrecedenceTable::empty()).unwrap();
    assert_eq!(expr, var("a"));
}

// Errors --------------------------------------------------------------

#[test]
fn parse_missing_closing_paren() {
    let result = parse_expr_text("(a+b");
    let err = result.unwrap_err();
    assert!(matches!(
        &err.kind,
        ParseErrKind::ExpectedClosingParen(t) if t.token == Token::EndOfInput
    ));
    assert!(err.to_string().contains("expected ')'"));
}

#[test]
fn parse_missing_comma_in_args() {
    let err = parse_expr_text("f(a b)").unwrap_err();
    assert!(matches!(
        &err.kind,
        ParseErrKind::ExpectedCommaOrClosingParen(t) if t.token == Token::Ident("b".to_owned())
    ));
}

#[test]
fn parse_unclosed_call() {
    let err = parse_expr_text("f(a,").unwrap_err();
    assert!(matches!(err.kind, ParseErrKind::ExpectedExpr(_)));
}

#[test]
fn parse_unknown_token_consumes_nothing() {
    let mut source = source_from_text(")");
    let mut parser =
        Parser::new(Scanner::new(&mut source), PrecedenceTable::default()).unwrap();
    let err = parser.parse_expression().unwrap_err();
    assert!(matches!(err.kind, ParseErrKind::ExpectedExpr(_)));
    assert_eq!(parser.current().token, Token::Punct(')'));
}

#[test]
fn parse_missing_rhs() {
    let err = parse_expr_text("a +").unwrap_err();
    assert!(matches!(
        &err.kind,
        ParseErrKind::ExpectedExpr(t) if t.token == Token::EndOfInput
    ));
}

#[test]
fn parse_scan_error_aborts_parse() {
    let err = parse_expr_text("a + 1.2.3").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrKind::ScanErr(ScanErr::new(
            ScanErrKind::MalformedNumber("1.2".to_owned()),
            Location::new(1, 5)
        ))
    );
}

#[test]
fn parse_too_deep() {
    let mut source = source_from_text("((((((((((x))))))))))");
    let mut parser = Parser::new(Scanner::new(&mut source), PrecedenceTable::default())
        .unwrap()
        .with_max_depth(5);
    let err = parser.parse_expression().unwrap_err();
    assert!(matches!(err.kind, ParseErrKind::NestingTooDeep(_)));
}

#[test]
fn parse_within_max_depth() {
    let mut source = source_from_text("((((x))))");
    let mut parser = Parser::new(Scanner::new(&mut source), PrecedenceTable::default())
        .unwrap()
        .with_max_depth(5);
    assert_eq!(parser.parse_expression().unwrap(), var("x"));
}

#[test]
fn parse_operator_chain_too_deep() {
    let mut source = source_from_text("a-b-c-d-e-f");
    let mut parser = Parser::new(Scanner::new(&mut source), PrecedenceTable::default())
        .unwrap()
        .with_max_depth(5);
    let err = parser.parse_expression().unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrKind::NestingTooDeep(TokenWithLocation { token: Token::Punct('-'), .. })
    ));
}

#[test]
fn parse_very_long_operator_chain() {
    // A flat chain builds a left-deep tree, so it's limited like any
    // other nesting. The error comes back without blowing the stack.
    let text = format!("a{}", "-a".repeat(200_000));
    let err = parse_expr_text(text.as_str()).unwrap_err();
    assert!(matches!(err.kind, ParseErrKind::NestingTooDeep(_)));
}

#[test]
fn parse_operator_chain_at_max_depth() {
    let text = format!("a{}", "-a".repeat(DEFAULT_MAX_DEPTH - 1));
    let expr = parse_expr_text(text.as_str()).unwrap();
    assert_eq!(expr.node_count(), 2 * DEFAULT_MAX_DEPTH - 1);
    let rendered = expr.to_string();
    assert!(rendered.starts_with(&"(".repeat(DEFAULT_MAX_DEPTH - 1)));
    assert!(rendered.ends_with("a - a) - a)"));
}

// Top level -----------------------------------------------------------

#[test]
fn parse_empty() {
    let module = parse_text("").unwrap();
    assert_eq!(module.items.len(), 0);
}

#[test]
fn parse_only_semicolons() {
    let module = parse_text(";;\n;").unwrap();
    assert_eq!(module.items.len(), 0);
}

#[test]
fn parse_definition() {
    let module = parse_text("def add(x y) x + y").unwrap();
    assert_eq!(module.items.len(), 1);
    let item = &module.items[0];
    assert_eq!(
        item.kind,
        ItemKind::Def(Func::new(
            Prototype::new("add".to_owned(), vec!["x".to_owned(), "y".to_owned()]),
            bin('+', var("x"), var("y"))
        ))
    );
    assert_eq!(item.start, Location::new(1, 1));
    assert_eq!(item.end, Location::new(1, 18));
}

#[test]
fn parse_extern() {
    let module = parse_text("extern sin(a);").unwrap();
    assert_eq!(
        module.items[0].kind,
        ItemKind::Extern(Prototype::new("sin".to_owned(), vec!["a".to_owned()]))
    );
}

#[test]
fn parse_top_level_expr() {
    let module = parse_text("1 + 2; x").unwrap();
    assert_eq!(module.items.len(), 2);
    match &module.items[0].kind {
        ItemKind::Expr(func) => {
            assert!(func.proto.is_anonymous());
            assert!(func.proto.params.is_empty());
            assert_eq!(func.body, bin('+', num(1.0), num(2.0)));
        }
        kind => panic!("Expected top level expression; got {kind:?}"),
    }
    assert_eq!(module.items[1].describe(), "a top-level expression");
}

#[test]
fn parse_module_of_items() {
    let text = "\
# Compute the x'th fibonacci number.
extern putchard(c);
def fib(x)
  fib(x-1)+fib(x-2)

fib(40)
";
    let module = parse_text(text).unwrap();
    let descriptions: Vec<&str> = module.items.iter().map(|i| i.describe()).collect();
    assert_eq!(
        descriptions,
        vec!["an extern", "a function definition", "a top-level expression"]
    );
}

#[test]
fn parse_prototype_without_name() {
    let err = parse_text("def (x) x").unwrap_err();
    assert!(matches!(err.kind, ParseErrKind::ExpectedFuncName(_)));
}

#[test]
fn parse_prototype_without_open_paren() {
    let err = parse_text("extern sin x").unwrap_err();
    assert!(matches!(err.kind, ParseErrKind::ExpectedOpenParenInPrototype(_)));
}

#[test]
fn parse_prototype_with_commas() {
    let err = parse_text("def f(a, b) a").unwrap_err();
    assert!(matches!(
        &err.kind,
        ParseErrKind::ExpectedClosingParenInPrototype(t) if t.token == Token::Punct(',')
    ));
}

#[test]
fn skip_token_recovers() {
    let mut source = source_from_text(") 1");
    let mut parser =
        Parser::new(Scanner::new(&mut source), PrecedenceTable::default()).unwrap();
    assert!(parser.next_item().is_err());
    parser.skip_token().unwrap();
    let item = parser.next_item().unwrap().unwrap();
    assert_eq!(item.kind, ItemKind::Expr(Func::new(Prototype::anonymous(), num(1.0))));
    assert!(parser.next_item().unwrap().is_none());
}

#[test]
fn first_token_scan_error() {
    let mut source = source_from_text("..");
    let result = Parser::new(Scanner::new(&mut source), PrecedenceTable::default());
    assert!(matches!(
        result.map(|_| ()).unwrap_err().kind,
        ParseErrKind::ScanErr(_)
    ));
}
