pub use ast::*;

#[allow(clippy::module_inception)]
mod ast;
