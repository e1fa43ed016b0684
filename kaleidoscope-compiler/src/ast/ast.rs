use std::fmt;

use kaleidoscope_util::source::Location;

/// Name given to the function wrapped around a top level expression.
pub const ANON_FUNC_NAME: &str = "__anon_expr";

/// Module - the items parsed from a source, in order.
#[derive(Debug, PartialEq)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items.iter() {
            writeln!(f, "{item};")?;
        }
        Ok(())
    }
}

/// Item - a top level unit: a definition, an extern declaration, or a
/// bare expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub start: Location,
    pub end: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    Def(Func),
    Extern(Prototype),
    /// A top level expression wrapped in an anonymous function.
    Expr(Func),
}

impl Item {
    pub fn new(kind: ItemKind, start: Location, end: Location) -> Self {
        Self { kind, start, end }
    }

    pub fn new_def(func: Func, start: Location, end: Location) -> Self {
        Self::new(ItemKind::Def(func), start, end)
    }

    pub fn new_extern(proto: Prototype, start: Location, end: Location) -> Self {
        Self::new(ItemKind::Extern(proto), start, end)
    }

    pub fn new_expr(expr: Expr, start: Location, end: Location) -> Self {
        let func = Func::new(Prototype::anonymous(), expr);
        Self::new(ItemKind::Expr(func), start, end)
    }

    /// A short description of the item, for reporting.
    pub fn describe(&self) -> &'static str {
        match self.kind {
            ItemKind::Def(_) => "a function definition",
            ItemKind::Extern(_) => "an extern",
            ItemKind::Expr(_) => "a top-level expression",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ItemKind::Def(func) => write!(f, "{func}"),
            ItemKind::Extern(proto) => write!(f, "extern {proto}"),
            ItemKind::Expr(func) => write!(f, "{}", func.body),
        }
    }
}

/// Prototype - a function's name and parameter names.
#[derive(Clone, Debug, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
}

impl Prototype {
    pub fn new(name: String, params: Vec<String>) -> Self {
        Self { name, params }
    }

    pub fn anonymous() -> Self {
        Self::new(ANON_FUNC_NAME.to_owned(), vec![])
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANON_FUNC_NAME
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(" "))
    }
}

/// Func - a prototype plus a body expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Func {
    pub proto: Prototype,
    pub body: Expr,
}

impl Func {
    pub fn new(proto: Prototype, body: Expr) -> Self {
        Self { proto, body }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {} {}", self.proto, self.body)
    }
}

/// Expression - each node owns its children outright.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    BinaryOp(char, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

impl Expr {
    pub fn new_number(value: f64) -> Self {
        Self::Number(value)
    }

    pub fn new_variable<S: Into<String>>(name: S) -> Self {
        Self::Variable(name.into())
    }

    pub fn new_binary_op(op: char, lhs: Expr, rhs: Expr) -> Self {
        Self::BinaryOp(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn new_call<S: Into<String>>(callee: S, args: Vec<Expr>) -> Self {
        Self::Call(callee.into(), args)
    }

    /// Number of nodes in the tree rooted at this expression.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Number(_) | Self::Variable(_) => 1,
            Self::BinaryOp(_, lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
            Self::Call(_, args) => 1 + args.iter().map(Expr::node_count).sum::<usize>(),
        }
    }
}

/// Renders the expression as source text. Binary operations are fully
/// parenthesized so the output parses back into the same tree no matter
/// which precedence table is in use.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::BinaryOp(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Self::Call(callee, args) => {
                let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{callee}({})", args.join(", "))
            }
        }
    }
}
