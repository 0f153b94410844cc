//! Root of the abstract syntax tree.
//!
//! A program is an ordered list of declarations. A declaration names a
//! variable, an array, a prototype or a function, and after resolution
//! owns the `Symbol` that the rest of the tree refers to.

use crate::resolver::symbol::SymbolRef;

use super::{expressions::Expr, statements::Stmt, types::Type};

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Program { decls }
    }
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub name: String,
    pub ty: Type,
    /// Scalar initializer.
    pub value: Option<Expr>,
    /// Array initializer; empty when none was written.
    pub elements: Vec<Expr>,
    /// Function body; `None` for everything that is not a defined function.
    pub body: Option<Vec<Stmt>>,
    pub symbol: Option<SymbolRef>,
}

impl Decl {
    pub fn new(name: &str, ty: Type) -> Self {
        Decl {
            name: name.to_string(),
            ty,
            value: None,
            elements: vec![],
            body: None,
            symbol: None,
        }
    }

    pub fn with_value(mut self, value: Expr) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_elements(mut self, elements: Vec<Expr>) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = Some(body);
        self
    }
}
