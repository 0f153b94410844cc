use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::CodegenError,
    type_checker::type_checker::type_of,
    EMIT,
};

use super::{
    compiler::{gen_decl, Compiler},
    expr::{gen_call, gen_expression},
    labels::LabelAllocator,
    runtime::RuntimeFunction,
};

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), CodegenError> {
    match statement {
        Stmt::Decl(decl) => gen_decl(compiler, decl),
        Stmt::Expr(expr) => gen_discarded(compiler, expr),
        Stmt::IfElse {
            condition,
            body,
            else_body,
        } => {
            let else_label = compiler.labels.create();
            let done_label = compiler.labels.create();

            gen_branch_if_false(compiler, condition, else_label)?;
            gen_statement(compiler, body)?;
            EMIT!(compiler, "\tb\t{}", LabelAllocator::name(done_label));

            EMIT!(compiler, "{}:", LabelAllocator::name(else_label));
            if let Some(else_body) = else_body {
                gen_statement(compiler, else_body)?;
            }
            EMIT!(compiler, "{}:", LabelAllocator::name(done_label));
            Ok(())
        }
        Stmt::For {
            init,
            condition,
            next,
            body,
        } => {
            let top_label = compiler.labels.create();
            let done_label = compiler.labels.create();

            if let Some(init) = init {
                gen_discarded(compiler, init)?;
            }

            EMIT!(compiler, "{}:", LabelAllocator::name(top_label));
            if let Some(condition) = condition {
                gen_branch_if_false(compiler, condition, done_label)?;
            }

            gen_statement(compiler, body)?;

            if let Some(next) = next {
                gen_discarded(compiler, next)?;
            }
            EMIT!(compiler, "\tb\t{}", LabelAllocator::name(top_label));
            EMIT!(compiler, "{}:", LabelAllocator::name(done_label));
            Ok(())
        }
        Stmt::Print(args) => {
            for arg in args {
                let ty = type_of(arg);
                let function = RuntimeFunction::print_for(&ty)
                    .ok_or_else(|| CodegenError::UnsupportedPrint { ty: ty.to_string() })?;

                let register = gen_expression(compiler, arg)?;
                let result = gen_call(compiler, function.name(), vec![register])?;
                compiler.registers.free(result);
            }
            Ok(())
        }
        Stmt::Return(value) => {
            let epilogue = compiler
                .labels
                .function_label()
                .ok_or(CodegenError::ReturnOutsideFunction)?;

            if let Some(value) = value {
                let register = gen_expression(compiler, value)?;
                if register != 0 {
                    EMIT!(compiler, "\tmov\tx0, {}", compiler.reg(register)?);
                }
                compiler.registers.free(register);
            }

            EMIT!(compiler, "\tb\t{}", LabelAllocator::name(epilogue));
            Ok(())
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                gen_statement(compiler, stmt)?;
            }
            Ok(())
        }
    }
}

/// Evaluates an expression for its side effects only.
fn gen_discarded(compiler: &mut Compiler, expr: &Expr) -> Result<(), CodegenError> {
    let register = gen_expression(compiler, expr)?;
    compiler.registers.free(register);
    Ok(())
}

fn gen_branch_if_false(
    compiler: &mut Compiler,
    condition: &Expr,
    label: usize,
) -> Result<(), CodegenError> {
    let register = gen_expression(compiler, condition)?;
    EMIT!(compiler, "\tcmp\t{}, #0", compiler.reg(register)?);
    compiler.registers.free(register);
    EMIT!(compiler, "\tbeq\t{}", LabelAllocator::name(label));
    Ok(())
}
