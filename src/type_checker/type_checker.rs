use crate::{
    ast::{
        ast::{Decl, Program},
        expressions::{BinaryOp, Expr, OperatorClass, UnaryOp},
        statements::Stmt,
        types::{Param, Type},
    },
    errors::diagnostics::{Diagnostics, Notice, TypeError},
    resolver::symbol::SymbolRef,
};

/// The function whose body is being checked.
struct FunctionContext {
    name: String,
    return_type: Type,
    symbol: Option<SymbolRef>,
}

pub struct TypeChecker {
    diagnostics: Diagnostics,
    function: Option<FunctionContext>,
}

impl TypeChecker {
    /// Creates a checker that adds to `diagnostics`, which may already hold
    /// type errors found during resolution.
    pub fn new(diagnostics: Diagnostics) -> Self {
        TypeChecker {
            diagnostics,
            function: None,
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn check_program(&mut self, program: &mut Program) {
        for decl in &mut program.decls {
            self.check_decl(decl);
        }
    }

    pub fn check_decl(&mut self, decl: &mut Decl) {
        if decl.ty.is_function_like() {
            self.check_function(decl);
            return;
        }

        let value_type = decl.value.as_ref().map(|value| self.typecheck(value));

        if decl.ty.is_auto() {
            match value_type {
                Some(ty) => {
                    self.diagnostics.notice(Notice::VariableType {
                        name: decl.name.clone(),
                        ty: ty.clone(),
                    });
                    if let Some(symbol) = &decl.symbol {
                        symbol.borrow_mut().ty = ty.clone();
                    }
                    decl.ty = ty;
                }
                None => self.diagnostics.type_error(TypeError::AutoWithoutInitializer {
                    name: decl.name.clone(),
                }),
            }
        } else if let Some(ty) = value_type {
            if !decl.ty.compare(&ty) {
                self.diagnostics.type_error(TypeError::DeclarationMismatch {
                    name: decl.name.clone(),
                    expected: decl.ty.clone(),
                    found: ty,
                });
            }
        }

        if let Type::Void = decl.ty {
            self.diagnostics.type_error(TypeError::VoidDeclaration {
                name: decl.name.clone(),
            });
        }

        self.check_array_elements(decl);
    }

    fn check_array_elements(&mut self, decl: &Decl) {
        let Type::Array(array) = &decl.ty else {
            return;
        };

        for element in &decl.elements {
            let found = self.typecheck(element);
            if !array.subtype.compare(&found) {
                self.diagnostics.type_error(TypeError::ArrayElementMismatch {
                    name: decl.name.clone(),
                    expr: element.to_string(),
                    expected: (*array.subtype).clone(),
                    found,
                });
            }
        }

        if !decl.elements.is_empty() && decl.elements.len() != array.size {
            self.diagnostics.type_error(TypeError::ArrayElementCount {
                name: decl.name.clone(),
                found: decl.elements.len(),
                expected: array.size,
            });
        }
    }

    fn check_function(&mut self, decl: &mut Decl) {
        let Some(function) = decl.ty.as_function() else {
            return;
        };

        let context = FunctionContext {
            name: decl.name.clone(),
            return_type: (*function.subtype).clone(),
            symbol: decl.symbol.clone(),
        };
        let declared_auto = context.return_type.is_auto();
        let enclosing = self.function.replace(context);

        if let Some(body) = &mut decl.body {
            for stmt in body {
                self.check_stmt(stmt);
            }
        }

        let Some(mut context) = std::mem::replace(&mut self.function, enclosing) else {
            return;
        };

        if context.return_type.is_auto() && decl.body.is_some() {
            // No return statement to infer from
            self.infer_return_type(&mut context, Type::Void);
        }

        if declared_auto {
            decl.ty.set_return_type(context.return_type);
        }
    }

    fn infer_return_type(&mut self, context: &mut FunctionContext, ty: Type) {
        self.diagnostics.notice(Notice::ReturnType {
            function: context.name.clone(),
            ty: ty.clone(),
        });

        if let Some(symbol) = &context.symbol {
            symbol.borrow_mut().ty.set_return_type(ty.clone());
        }
        context.return_type = ty;
    }

    pub fn check_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.check_decl(decl),
            Stmt::Expr(expr) => {
                self.typecheck(expr);
            }
            Stmt::IfElse {
                condition,
                body,
                else_body,
            } => {
                self.check_condition("if", condition);
                self.check_stmt(body);
                if let Some(else_body) = else_body {
                    self.check_stmt(else_body);
                }
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                if let Some(init) = init {
                    self.typecheck(init);
                }
                if let Some(condition) = condition {
                    self.check_condition("for", condition);
                }
                if let Some(next) = next {
                    self.typecheck(next);
                }
                self.check_stmt(body);
            }
            Stmt::Print(args) => {
                for arg in args.iter() {
                    let found = self.typecheck(arg);
                    if matches!(
                        found,
                        Type::Void | Type::Array(_) | Type::Function(_) | Type::Prototype(_)
                    ) {
                        self.diagnostics.type_error(TypeError::PrintOperand {
                            expr: arg.to_string(),
                            found,
                        });
                    }
                }
            }
            Stmt::Return(value) => self.check_return(value.as_ref()),
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.check_stmt(stmt);
                }
            }
        }
    }

    fn check_condition(&mut self, statement: &'static str, condition: &Expr) {
        let found = self.typecheck(condition);
        if !found.is_boolean() {
            self.diagnostics
                .type_error(TypeError::ConditionNotBoolean { statement, found });
        }
    }

    fn check_return(&mut self, value: Option<&Expr>) {
        let found = value.map(|value| self.typecheck(value));

        let Some(mut context) = self.function.take() else {
            self.diagnostics.type_error(TypeError::ReturnOutsideFunction);
            return;
        };

        if context.return_type.is_auto() {
            // The first return decides the type of an `auto` function
            self.infer_return_type(&mut context, found.unwrap_or(Type::Void));
            self.function = Some(context);
            return;
        }

        match (&context.return_type, found) {
            (Type::Void, Some(_)) => self.diagnostics.type_error(TypeError::ReturnInVoidFunction {
                function: context.name.clone(),
            }),
            (Type::Void, None) => {}
            (expected, None) => self.diagnostics.type_error(TypeError::MissingReturnValue {
                function: context.name.clone(),
                expected: expected.clone(),
            }),
            (expected, Some(found)) => {
                if !expected.compare(&found) {
                    self.diagnostics.type_error(TypeError::ReturnMismatch {
                        function: context.name.clone(),
                        expected: expected.clone(),
                        found,
                    });
                }
            }
        }

        self.function = Some(context);
    }

    /// Computes the type of `expr`, reporting every rule it breaks.
    ///
    /// Operands are checked before their operator, and a rule violation
    /// still yields the operator's usual result type so checking can carry
    /// on above it.
    pub fn typecheck(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::IntegerLiteral(_) => Type::Integer,
            Expr::BooleanLiteral(_) => Type::Boolean,
            Expr::CharLiteral(_) => Type::Character,
            Expr::StringLiteral(_) => Type::String,
            Expr::Name { name, symbol } => match symbol {
                Some(symbol) => symbol.borrow().ty.clone(),
                None => {
                    self.diagnostics
                        .type_error(TypeError::Unresolved { name: name.clone() });
                    Type::Void
                }
            },
            Expr::Group(inner) => self.typecheck(inner),
            Expr::Binary { op, left, right } => self.typecheck_binary(expr, *op, left, right),
            Expr::Unary { op, operand } => {
                let found = self.typecheck(operand);
                match op {
                    UnaryOp::Negate => {
                        if !found.is_integer() {
                            self.diagnostics.type_error(TypeError::NegateOperand {
                                expr: expr.to_string(),
                                found,
                            });
                        }
                        Type::Integer
                    }
                    UnaryOp::Not => {
                        if !found.is_boolean() {
                            self.diagnostics.type_error(TypeError::NotOperand {
                                expr: expr.to_string(),
                                found,
                            });
                        }
                        Type::Boolean
                    }
                }
            }
            Expr::Postfix { op, operand } => {
                let found = self.typecheck(operand);
                if !found.is_integer() {
                    self.diagnostics.type_error(TypeError::PostfixOperand {
                        operator: op.symbol(),
                        expr: expr.to_string(),
                        found,
                    });
                } else if !operand.is_addressable() {
                    self.diagnostics.type_error(TypeError::NotAssignable {
                        expr: operand.to_string(),
                    });
                }
                Type::Integer
            }
            Expr::Index { array, index } => {
                let base = self.typecheck(array);
                let index_type = self.typecheck(index);

                if !index_type.is_integer() {
                    self.diagnostics.type_error(TypeError::IndexNotInteger {
                        expr: expr.to_string(),
                        found: index_type,
                    });
                }

                match base {
                    Type::Array(array) => *array.subtype,
                    other => {
                        self.diagnostics.type_error(TypeError::IndexNonArray {
                            expr: expr.to_string(),
                            found: other.clone(),
                        });
                        other
                    }
                }
            }
            Expr::Assign { target, value } => self.typecheck_assign(expr, target, value),
            Expr::Call { name, args, symbol } => {
                let found: Vec<Type> = args.iter().map(|arg| self.typecheck(arg)).collect();

                let Some(symbol) = symbol else {
                    self.diagnostics
                        .type_error(TypeError::Unresolved { name: name.clone() });
                    return Type::Void;
                };

                let callee = symbol.borrow().ty.clone();
                match callee {
                    Type::Function(function) | Type::Prototype(function) => {
                        if !arguments_match(&function.params, &found) {
                            self.diagnostics
                                .type_error(TypeError::ArgumentMismatch { name: name.clone() });
                        }
                        *function.subtype
                    }
                    other => {
                        self.diagnostics
                            .type_error(TypeError::CallNonFunction { name: name.clone() });
                        other
                    }
                }
            }
        }
    }

    fn typecheck_binary(&mut self, expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr) -> Type {
        let left = self.typecheck(left);
        let right = self.typecheck(right);

        match op.class() {
            OperatorClass::Arithmetic => {
                if !left.is_integer() || !right.is_integer() {
                    self.diagnostics.type_error(TypeError::ArithmeticOperands {
                        expr: expr.to_string(),
                        left,
                        right,
                    });
                }
                Type::Integer
            }
            OperatorClass::Relational => {
                for found in [left, right] {
                    if !found.is_integer() {
                        self.diagnostics.type_error(TypeError::RelationalOperand {
                            operator: op.symbol(),
                            expr: expr.to_string(),
                            found,
                        });
                    }
                }
                Type::Boolean
            }
            OperatorClass::Equality => {
                if !left.compare(&right) {
                    self.diagnostics.type_error(TypeError::EqualityMismatch {
                        expr: expr.to_string(),
                        left,
                        right,
                    });
                } else if matches!(
                    left,
                    Type::Void | Type::Array(_) | Type::Function(_) | Type::Prototype(_)
                ) {
                    self.diagnostics.type_error(TypeError::EqualityOperand {
                        expr: expr.to_string(),
                        found: left,
                    });
                }
                Type::Boolean
            }
            OperatorClass::Logical => {
                for found in [left, right] {
                    if !found.is_boolean() {
                        self.diagnostics.type_error(TypeError::LogicalOperand {
                            operator: op.symbol(),
                            expr: expr.to_string(),
                            found,
                        });
                    }
                }
                Type::Boolean
            }
        }
    }

    fn typecheck_assign(&mut self, expr: &Expr, target: &Expr, value: &Expr) -> Type {
        let left = self.typecheck(target);
        let right = self.typecheck(value);

        if !target.is_addressable() {
            self.diagnostics.type_error(TypeError::NotAssignable {
                expr: target.to_string(),
            });
        }

        if left.is_auto() {
            self.diagnostics.notice(Notice::AssignedType {
                target: target.to_string(),
                ty: right.clone(),
            });
            if let Expr::Name {
                symbol: Some(symbol),
                ..
            } = target
            {
                symbol.borrow_mut().ty = right.clone();
            }
            return right;
        }

        if !left.compare(&right) {
            self.diagnostics.type_error(TypeError::AssignMismatch {
                expr: expr.to_string(),
                expected: left.clone(),
                found: right,
            });
        }

        left
    }
}

fn arguments_match(params: &[Param], args: &[Type]) -> bool {
    params.len() == args.len() && params.iter().zip(args).all(|(param, arg)| param.ty.compare(arg))
}

/// Type checks `program`, adding to the diagnostics left by resolution.
pub fn type_check(program: &mut Program, diagnostics: Diagnostics) -> Diagnostics {
    let mut checker = TypeChecker::new(diagnostics);
    checker.check_program(program);
    checker.into_diagnostics()
}

/// The type of an already checked expression, without reporting anything.
pub fn type_of(expr: &Expr) -> Type {
    TypeChecker::new(Diagnostics::new()).typecheck(expr)
}
