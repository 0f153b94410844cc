use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{ast::Decl, ast::Program, expressions::Expr, statements::Stmt, types::Type},
    errors::diagnostics::{Diagnostics, ResolveError, TypeError},
};

use super::{
    scope::{BindOutcome, ScopeStack},
    symbol::{Symbol, SymbolKind, SymbolRef},
};

/// Walks a program, binding declarations and linking uses to them.
pub struct Resolver {
    scopes: ScopeStack,
    diagnostics: Diagnostics,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}

impl Resolver {
    /// Creates a resolver with the global scope already entered.
    pub fn new() -> Self {
        let mut scopes = ScopeStack::new();
        scopes.enter();

        Resolver {
            scopes,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn resolve_program(&mut self, program: &mut Program) {
        for decl in &mut program.decls {
            self.resolve_decl(decl);
        }
    }

    pub fn resolve_decl(&mut self, decl: &mut Decl) {
        let kind = if self.scopes.level() > 1 {
            SymbolKind::Local
        } else {
            SymbolKind::Global
        };

        // The initializer sees the enclosing binding of the name, not this one
        if let Some(value) = &mut decl.value {
            self.resolve_expr(value);
        }
        for element in &mut decl.elements {
            self.resolve_expr(element);
        }

        let symbol = Symbol::create(kind, decl.ty.clone(), &decl.name);
        decl.symbol = Some(self.bind(&decl.name, symbol));

        if decl.ty.is_function_like() {
            self.scopes.enter();
            self.resolve_params(&mut decl.ty);

            if let Some(body) = &mut decl.body {
                for stmt in body {
                    self.resolve_stmt(stmt);
                }
            }

            self.scopes.exit();
        }
    }

    fn bind(&mut self, name: &str, symbol: SymbolRef) -> SymbolRef {
        let bound = match self.scopes.bind(name, Rc::clone(&symbol), &mut self.diagnostics) {
            BindOutcome::Bound(bound) | BindOutcome::Merged(bound) => bound,
            BindOutcome::Redeclared => symbol,
        };

        debug!("{} resolves to {}", name, bound.borrow());
        bound
    }

    fn resolve_params(&mut self, ty: &mut Type) {
        let Some(function) = ty.as_function_mut() else {
            return;
        };

        for param in &mut function.params {
            if param.ty.is_auto() {
                self.diagnostics.type_error(TypeError::AutoParameter {
                    name: param.name.clone(),
                });
            }

            let symbol = Symbol::create(SymbolKind::Param, param.ty.clone(), &param.name);
            param.symbol = Some(self.bind(&param.name, symbol));
        }
    }

    pub fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.resolve_decl(decl),
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::IfElse {
                condition,
                body,
                else_body,
            } => {
                self.scopes.enter();
                self.resolve_expr(condition);
                self.resolve_stmt(body);
                self.scopes.exit();

                if let Some(else_body) = else_body {
                    self.scopes.enter();
                    self.resolve_stmt(else_body);
                    self.scopes.exit();
                }
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                self.scopes.enter();
                for expr in [init, condition, next].into_iter().flatten() {
                    self.resolve_expr(expr);
                }
                self.resolve_stmt(body);
                self.scopes.exit();
            }
            Stmt::Print(args) => {
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Block(stmts) => {
                self.scopes.enter();
                for stmt in stmts {
                    self.resolve_stmt(stmt);
                }
                self.scopes.exit();
            }
        }
    }

    pub fn resolve_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Name { name, symbol } => *symbol = self.lookup(name),
            Expr::Call { name, args, symbol } => {
                *symbol = self.lookup(name);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Assign { target, value } => {
                self.resolve_expr(target);
                self.resolve_expr(value);
            }
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Index { array, index } => {
                self.resolve_expr(array);
                self.resolve_expr(index);
            }
            Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => {
                self.resolve_expr(operand)
            }
            Expr::Group(inner) => self.resolve_expr(inner),
            Expr::IntegerLiteral(_)
            | Expr::BooleanLiteral(_)
            | Expr::CharLiteral(_)
            | Expr::StringLiteral(_) => {}
        }
    }

    fn lookup(&mut self, name: &str) -> Option<SymbolRef> {
        let symbol = self.scopes.lookup(name);

        match &symbol {
            Some(symbol) => debug!("{} resolves to {}", name, symbol.borrow()),
            None => self.diagnostics.resolve_error(ResolveError::NotDefined {
                name: name.to_string(),
            }),
        }

        symbol
    }
}

/// Resolves every name in `program` against a fresh scope stack.
pub fn resolve(program: &mut Program) -> Diagnostics {
    let mut resolver = Resolver::new();
    resolver.resolve_program(program);
    resolver.into_diagnostics()
}
