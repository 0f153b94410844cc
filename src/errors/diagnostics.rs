//! Accumulated diagnostics for the resolution and type checking passes.
//!
//! Neither pass stops at its first problem. Each error is recorded here and
//! the pipeline decides, once a pass has walked the whole program, whether
//! to continue.

use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

use crate::ast::types::Type;

#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("{name} is not defined")]
    NotDefined { name: String },
    #[error("redeclaring symbol {name} within same scope")]
    Redeclared { name: String },
}

#[derive(Error, Debug, Clone)]
pub enum TypeError {
    #[error("cannot perform a binary operation between {left} and {right} in `{expr}`")]
    ArithmeticOperands { expr: String, left: Type, right: Type },
    #[error("`{operator}` requires integer operands, found {found} in `{expr}`")]
    RelationalOperand {
        operator: &'static str,
        expr: String,
        found: Type,
    },
    #[error("`{operator}` requires boolean operands, found {found} in `{expr}`")]
    LogicalOperand {
        operator: &'static str,
        expr: String,
        found: Type,
    },
    #[error("cannot compare equality for {left} and {right} in `{expr}`")]
    EqualityMismatch { expr: String, left: Type, right: Type },
    #[error("cannot compare values of type {found} for equality in `{expr}`")]
    EqualityOperand { expr: String, found: Type },
    #[error("cannot negate {found} in `{expr}`")]
    NegateOperand { expr: String, found: Type },
    #[error("cannot apply `!` to {found} in `{expr}`")]
    NotOperand { expr: String, found: Type },
    #[error("cannot apply `{operator}` to {found} in `{expr}`")]
    PostfixOperand {
        operator: &'static str,
        expr: String,
        found: Type,
    },
    #[error("`{expr}` is not assignable")]
    NotAssignable { expr: String },
    #[error("cannot index {found} in `{expr}`")]
    IndexNonArray { expr: String, found: Type },
    #[error("array index must be integer, found {found} in `{expr}`")]
    IndexNotInteger { expr: String, found: Type },
    #[error("cannot assign {found} to {expected} in `{expr}`")]
    AssignMismatch {
        expr: String,
        expected: Type,
        found: Type,
    },
    #[error("cannot call non-function {name}")]
    CallNonFunction { name: String },
    #[error("parameters not matching in function call of {name}")]
    ArgumentMismatch { name: String },
    #[error("{name} has no resolved symbol")]
    Unresolved { name: String },
    #[error("void function {function} must have void return statement")]
    ReturnInVoidFunction { function: String },
    #[error("type mismatch between function {function} and return value: expected {expected}, found {found}")]
    ReturnMismatch {
        function: String,
        expected: Type,
        found: Type,
    },
    #[error("function {function} must return a value of type {expected}")]
    MissingReturnValue { function: String, expected: Type },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("{name} has type auto but no initializer")]
    AutoWithoutInitializer { name: String },
    #[error("declaration of {name} and initialization do not match types: expected {expected}, found {found}")]
    DeclarationMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("array {name} element `{expr}` is {found} instead of {expected}")]
    ArrayElementMismatch {
        name: String,
        expr: String,
        expected: Type,
        found: Type,
    },
    #[error("array {name} declaration has {found} element(s) instead of {expected}")]
    ArrayElementCount {
        name: String,
        found: usize,
        expected: usize,
    },
    #[error("cannot declare variable {name} with type void")]
    VoidDeclaration { name: String },
    #[error("function parameter {name} cannot be of type auto")]
    AutoParameter { name: String },
    #[error("prototype function ({prototype}) and function declaration ({definition}) of {name} have different return types")]
    PrototypeReturnMismatch {
        name: String,
        prototype: Type,
        definition: Type,
    },
    #[error("{name} prototype parameter list does not match function parameter list")]
    PrototypeParameterMismatch { name: String },
    #[error("{statement} condition must be boolean, found {found}")]
    ConditionNotBoolean { statement: &'static str, found: Type },
    #[error("cannot print {found} in `{expr}`")]
    PrintOperand { expr: String, found: Type },
}

/// Informational messages about `auto` types being resolved.
#[derive(Debug, Clone)]
pub enum Notice {
    VariableType { name: String, ty: Type },
    ReturnType { function: String, ty: Type },
    AssignedType { target: String, ty: Type },
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::VariableType { name, ty } => write!(f, "type of {} is {}", name, ty),
            Notice::ReturnType { function, ty } => {
                write!(f, "return type of function {} is {}", function, ty)
            }
            Notice::AssignedType { target, ty } => write!(f, "type of {} is now {}", target, ty),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    resolve_errors: Vec<ResolveError>,
    type_errors: Vec<TypeError>,
    notices: Vec<Notice>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn resolve_error(&mut self, error: ResolveError) {
        debug!("resolve error: {}", error);
        self.resolve_errors.push(error);
    }

    pub fn type_error(&mut self, error: TypeError) {
        debug!("type error: {}", error);
        self.type_errors.push(error);
    }

    pub fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn resolve_error_count(&self) -> usize {
        self.resolve_errors.len()
    }

    pub fn type_error_count(&self) -> usize {
        self.type_errors.len()
    }

    pub fn resolve_errors(&self) -> &[ResolveError] {
        &self.resolve_errors
    }

    pub fn type_errors(&self) -> &[TypeError] {
        &self.type_errors
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}
