//! Unit tests for name resolution.
//!
//! This module contains tests for binding declarations, linking uses to
//! them, scope nesting and the errors resolution reports.

use std::rc::Rc;

use super::{
    resolver::resolve,
    scope::{BindOutcome, ScopeStack},
    symbol::{Symbol, SymbolKind, SymbolRef},
};
use crate::{
    ast::{ast::Program, expressions::Expr, statements::Stmt, types::Type},
    errors::diagnostics::{Diagnostics, TypeError},
    parse_source,
};

fn resolve_text(source: &str) -> (Program, Diagnostics) {
    let mut program = parse_source(source, "test.bminor").unwrap();
    let diagnostics = resolve(&mut program);
    (program, diagnostics)
}

fn body(program: &Program, decl: usize) -> &[Stmt] {
    program.decls[decl].body.as_ref().unwrap()
}

fn decl_symbol(stmt: &Stmt) -> SymbolRef {
    match stmt {
        Stmt::Decl(decl) => decl.symbol.clone().unwrap(),
        other => panic!("expected a declaration, got {}", other),
    }
}

fn expr_symbol(expr: &Expr) -> SymbolRef {
    expr.symbol().cloned().unwrap()
}

#[test]
fn test_resolve_global_use() {
    let (program, diagnostics) = resolve_text("x: integer = 1;\nf: function integer () = { return x; }");

    assert_eq!(diagnostics.resolve_error_count(), 0);

    let Stmt::Return(Some(value)) = &body(&program, 1)[0] else {
        panic!("expected a return statement");
    };
    let used = expr_symbol(value);
    assert_eq!(used.borrow().kind, SymbolKind::Global);
    assert!(Rc::ptr_eq(&used, program.decls[0].symbol.as_ref().unwrap()));
}

#[test]
fn test_resolve_param_and_local_numbering() {
    let (program, diagnostics) = resolve_text(
        "f: function void (a: integer, b: integer) = {\n\
         c: integer = a;\n\
         { d: integer = b; }\n\
         e: integer;\n\
         }",
    );

    assert_eq!(diagnostics.resolve_error_count(), 0);

    let function = program.decls[0].ty.as_function().unwrap();
    let a = function.params[0].symbol.clone().unwrap();
    let b = function.params[1].symbol.clone().unwrap();
    assert_eq!(a.borrow().kind, SymbolKind::Param);
    assert_eq!(a.borrow().which, 1);
    assert_eq!(b.borrow().which, 2);

    let stmts = body(&program, 0);
    let c = decl_symbol(&stmts[0]);
    assert_eq!(c.borrow().kind, SymbolKind::Local);
    assert_eq!(c.borrow().which, 3);

    // The nested block continues from the enclosing scope's counter
    let Stmt::Block(inner) = &stmts[1] else {
        panic!("expected a block");
    };
    assert_eq!(decl_symbol(&inner[0]).borrow().which, 4);

    // Leaving the block does not advance the enclosing counter
    assert_eq!(decl_symbol(&stmts[2]).borrow().which, 4);
}

#[test]
fn test_resolve_each_function_starts_numbering_afresh() {
    let (program, _) = resolve_text(
        "f: function void (a: integer) = { x: integer; }\n\
         g: function void () = { y: integer; }",
    );

    assert_eq!(decl_symbol(&body(&program, 0)[0]).borrow().which, 2);
    assert_eq!(decl_symbol(&body(&program, 1)[0]).borrow().which, 1);
}

#[test]
fn test_resolve_shadowing() {
    let (program, diagnostics) = resolve_text(
        "x: integer = 1;\n\
         f: function void (x: boolean) = {\n\
         print x;\n\
         { x: char = 'c'; print x; }\n\
         }",
    );

    assert_eq!(diagnostics.resolve_error_count(), 0);

    let stmts = body(&program, 1);
    let Stmt::Print(args) = &stmts[0] else {
        panic!("expected a print statement");
    };
    let param = expr_symbol(&args[0]);
    assert_eq!(param.borrow().kind, SymbolKind::Param);
    assert!(param.borrow().ty.is_boolean());

    let Stmt::Block(inner) = &stmts[1] else {
        panic!("expected a block");
    };
    let Stmt::Print(args) = &inner[1] else {
        panic!("expected a print statement");
    };
    let local = expr_symbol(&args[0]);
    assert_eq!(local.borrow().kind, SymbolKind::Local);
    assert!(matches!(local.borrow().ty, Type::Character));
}

#[test]
fn test_resolve_initializer_sees_enclosing_binding() {
    let (program, diagnostics) =
        resolve_text("x: integer = 1;\nf: function void () = { x: integer = x; }");

    assert_eq!(diagnostics.resolve_error_count(), 0);

    let Stmt::Decl(decl) = &body(&program, 1)[0] else {
        panic!("expected a declaration");
    };
    let used = expr_symbol(decl.value.as_ref().unwrap());
    assert_eq!(used.borrow().kind, SymbolKind::Global);
}

#[test]
fn test_resolve_redeclaration() {
    let (program, diagnostics) = resolve_text("x: integer;\nx: boolean;\ny: integer = x;");

    assert_eq!(diagnostics.resolve_error_count(), 1);
    assert_eq!(
        diagnostics.resolve_errors()[0].to_string(),
        "redeclaring symbol x within same scope"
    );

    // The first binding is the one later uses see
    let used = expr_symbol(program.decls[2].value.as_ref().unwrap());
    assert!(used.borrow().ty.is_integer());
}

#[test]
fn test_resolve_redeclared_parameter() {
    let (_, diagnostics) = resolve_text("f: function void (a: integer, a: integer) = { }");

    assert_eq!(diagnostics.resolve_error_count(), 1);
}

#[test]
fn test_resolve_undefined_names() {
    let (program, diagnostics) = resolve_text("f: function void () = { y = 1; print z, g(); }");

    assert_eq!(diagnostics.resolve_error_count(), 3);
    let messages: Vec<String> = diagnostics
        .resolve_errors()
        .iter()
        .map(|error| error.to_string())
        .collect();
    assert_eq!(messages, ["y is not defined", "z is not defined", "g is not defined"]);

    let Stmt::Expr(Expr::Assign { target, .. }) = &body(&program, 0)[0] else {
        panic!("expected an assignment");
    };
    assert!(target.symbol().is_none());
}

#[test]
fn test_resolve_scoped_names_do_not_leak() {
    let (_, diagnostics) = resolve_text(
        "f: function void () = {\n\
         if (true) { a: integer; } else { a: boolean; }\n\
         for (;;) { b: integer; }\n\
         print a, b;\n\
         }",
    );

    assert_eq!(diagnostics.resolve_error_count(), 2);
}

#[test]
fn test_resolve_recursive_call() {
    let (program, diagnostics) =
        resolve_text("f: function integer (n: integer) = { return f(n - 1); }");

    assert_eq!(diagnostics.resolve_error_count(), 0);

    let Stmt::Return(Some(call)) = &body(&program, 0)[0] else {
        panic!("expected a return statement");
    };
    assert!(Rc::ptr_eq(&expr_symbol(call), program.decls[0].symbol.as_ref().unwrap()));
}

#[test]
fn test_resolve_prototype_merge() {
    let (program, diagnostics) = resolve_text(
        "f: function integer (a: integer);\n\
         f: function integer (b: integer) = { return b; }",
    );

    assert_eq!(diagnostics.resolve_error_count(), 0);
    assert_eq!(diagnostics.type_error_count(), 0);

    let prototype = program.decls[0].symbol.clone().unwrap();
    let definition = program.decls[1].symbol.clone().unwrap();
    assert!(Rc::ptr_eq(&prototype, &definition));
    assert!(matches!(definition.borrow().ty, Type::Function(_)));
}

#[test]
fn test_resolve_prototype_mismatch() {
    let (_, diagnostics) = resolve_text(
        "f: function integer (a: integer);\n\
         f: function boolean (a: char) = { return true; }",
    );

    // Mismatches are type errors; the two are still merged
    assert_eq!(diagnostics.resolve_error_count(), 0);
    assert_eq!(diagnostics.type_error_count(), 2);
    assert!(matches!(
        diagnostics.type_errors()[0],
        TypeError::PrototypeReturnMismatch { .. }
    ));
    assert!(matches!(
        diagnostics.type_errors()[1],
        TypeError::PrototypeParameterMismatch { .. }
    ));
}

#[test]
fn test_resolve_duplicate_definition() {
    let (_, diagnostics) = resolve_text(
        "f: function void () = { }\n\
         f: function void () = { }",
    );

    assert_eq!(diagnostics.resolve_error_count(), 1);
}

#[test]
fn test_resolve_auto_parameter() {
    let (_, diagnostics) = resolve_text("f: function void (a: auto) = { }");

    assert_eq!(diagnostics.resolve_error_count(), 0);
    assert_eq!(diagnostics.type_error_count(), 1);
    assert_eq!(
        diagnostics.type_errors()[0].to_string(),
        "function parameter a cannot be of type auto"
    );
}

#[test]
fn test_scope_stack() {
    let mut scopes = ScopeStack::new();
    let mut diagnostics = Diagnostics::new();
    scopes.enter();
    assert_eq!(scopes.level(), 1);

    let x = Symbol::create(SymbolKind::Global, Type::Integer, "x");
    assert!(matches!(
        scopes.bind("x", Rc::clone(&x), &mut diagnostics),
        BindOutcome::Bound(_)
    ));

    scopes.enter();
    assert_eq!(scopes.level(), 2);
    assert!(scopes.lookup("x").is_some());
    assert!(scopes.lookup_current("x").is_none());

    let inner = Symbol::create(SymbolKind::Local, Type::Boolean, "x");
    scopes.bind("x", Rc::clone(&inner), &mut diagnostics);
    assert!(Rc::ptr_eq(&scopes.lookup("x").unwrap(), &inner));
    assert_eq!(inner.borrow().which, 1);

    scopes.exit();
    assert!(Rc::ptr_eq(&scopes.lookup("x").unwrap(), &x));

    let again = Symbol::create(SymbolKind::Global, Type::Boolean, "x");
    assert!(matches!(
        scopes.bind("x", again, &mut diagnostics),
        BindOutcome::Redeclared
    ));
    assert_eq!(diagnostics.resolve_error_count(), 1);
}

#[test]
fn test_symbol_display() {
    let mut local = Symbol::new(SymbolKind::Local, Type::Integer, "x");
    local.which = 3;
    assert_eq!(local.to_string(), "local 3");

    let mut param = Symbol::new(SymbolKind::Param, Type::Integer, "p");
    param.which = 1;
    assert_eq!(param.to_string(), "param 1");

    let global = Symbol::new(SymbolKind::Global, Type::function(Type::Void, vec![]), "main");
    assert_eq!(global.to_string(), "global main (FUNCTION)");

    let global = Symbol::new(SymbolKind::Global, Type::String, "s");
    assert_eq!(global.to_string(), "global s");
}
