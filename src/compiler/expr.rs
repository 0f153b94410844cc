use crate::{
    ast::{
        expressions::{BinaryOp, Expr, PostfixOp, UnaryOp},
        types::Type,
    },
    errors::errors::CodegenError,
    resolver::symbol::{SymbolKind, SymbolRef},
    type_checker::type_checker::type_of,
    EMIT,
};

use super::{
    compiler::{emit_string_literal, Compiler},
    frame::{symbol_address, Address, MAX_ARGUMENTS},
    runtime::RuntimeFunction,
};

/// First of the registers used to stage call arguments. x9 and up are
/// outside the scratch pool.
const STAGING_REGISTER: usize = 9;

/// Lowers an expression and returns the scratch register holding its value.
///
/// Every register the expression allocates internally is freed again
/// before returning, except the result register, which the caller owns.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<usize, CodegenError> {
    match expression {
        Expr::IntegerLiteral(value) => gen_immediate(compiler, *value),
        Expr::BooleanLiteral(value) => gen_immediate(compiler, *value as i64),
        Expr::CharLiteral(value) => gen_immediate(compiler, *value as i64),
        Expr::StringLiteral(text) => {
            let label = emit_string_literal(compiler, text);
            EMIT!(compiler, "\t.text");

            let register = compiler.registers.alloc()?;
            let target = compiler.reg(register)?;
            emit_global_address(compiler, target, &label);
            Ok(register)
        }
        Expr::Name { name, symbol } => {
            let symbol = resolved(name, symbol)?;
            let (address, is_array) = {
                let symbol = symbol.borrow();
                (
                    symbol_address(&symbol)?,
                    matches!(symbol.ty, Type::Array(_)),
                )
            };

            let register = compiler.registers.alloc()?;
            let target = compiler.reg(register)?;
            match address {
                Address::Frame(_) => EMIT!(compiler, "\tldr\t{}, {}", target, address),
                Address::Global(global) => {
                    emit_global_address(compiler, target, &global);
                    // A global array evaluates to its address
                    if !is_array {
                        EMIT!(compiler, "\tldr\t{}, [{}]", target, target);
                    }
                }
            }
            Ok(register)
        }
        Expr::Group(inner) => gen_expression(compiler, inner),
        Expr::Binary { op, left, right } => gen_binary(compiler, *op, left, right),
        Expr::Unary { op, operand } => {
            let register = gen_expression(compiler, operand)?;
            let name = compiler.reg(register)?;
            match op {
                UnaryOp::Negate => EMIT!(compiler, "\tneg\t{}, {}", name, name),
                UnaryOp::Not => {
                    EMIT!(compiler, "\tcmp\t{}, #0", name);
                    EMIT!(compiler, "\tcset\t{}, eq", name);
                }
            }
            Ok(register)
        }
        Expr::Postfix { op, operand } => gen_postfix(compiler, *op, operand),
        Expr::Index { array, index } => {
            let (base, offset) = gen_element_address(compiler, array, index)?;
            let base_name = compiler.reg(base)?;
            EMIT!(
                compiler,
                "\tldr\t{}, [{}, {}, lsl #3]",
                base_name,
                base_name,
                compiler.reg(offset)?
            );
            compiler.registers.free(offset);
            Ok(base)
        }
        Expr::Assign { target, value } => {
            let register = gen_expression(compiler, value)?;
            gen_store(compiler, target, register)?;
            Ok(register)
        }
        Expr::Call { name, args, .. } => {
            if args.len() > MAX_ARGUMENTS {
                return Err(CodegenError::TooManyArguments {
                    function: name.clone(),
                    count: args.len(),
                    max: MAX_ARGUMENTS,
                });
            }

            let mut registers = Vec::with_capacity(args.len());
            for arg in args {
                registers.push(gen_expression(compiler, arg)?);
            }

            gen_call(compiler, name, registers)
        }
    }
}

fn resolved(name: &str, symbol: &Option<SymbolRef>) -> Result<SymbolRef, CodegenError> {
    symbol.clone().ok_or_else(|| CodegenError::UnresolvedSymbol {
        name: name.to_string(),
    })
}

fn gen_immediate(compiler: &mut Compiler, value: i64) -> Result<usize, CodegenError> {
    let register = compiler.registers.alloc()?;
    let name = compiler.reg(register)?;

    if (-65535..=65535).contains(&value) {
        EMIT!(compiler, "\tmov\t{}, #{}", name, value);
    } else {
        EMIT!(compiler, "\tldr\t{}, ={}", name, value);
    }

    Ok(register)
}

fn emit_global_address(compiler: &mut Compiler, register: &str, symbol: &str) {
    EMIT!(compiler, "\tadrp\t{}, {}", register, symbol);
    EMIT!(compiler, "\tadd\t{}, {}, :lo12:{}", register, register, symbol);
}

fn gen_binary(
    compiler: &mut Compiler,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<usize, CodegenError> {
    let left = gen_expression(compiler, left)?;
    let right = gen_expression(compiler, right)?;

    let l = compiler.reg(left)?;
    let r = compiler.reg(right)?;

    match op {
        BinaryOp::Pow => {
            return gen_call(compiler, RuntimeFunction::IntegerPower.name(), vec![left, right]);
        }
        BinaryOp::Add => EMIT!(compiler, "\tadd\t{}, {}, {}", l, l, r),
        BinaryOp::Sub => EMIT!(compiler, "\tsub\t{}, {}, {}", l, l, r),
        BinaryOp::Mul => EMIT!(compiler, "\tmul\t{}, {}, {}", l, l, r),
        BinaryOp::Div => EMIT!(compiler, "\tsdiv\t{}, {}, {}", l, l, r),
        BinaryOp::Mod => {
            let quotient = compiler.registers.alloc()?;
            let q = compiler.reg(quotient)?;
            EMIT!(compiler, "\tsdiv\t{}, {}, {}", q, l, r);
            EMIT!(compiler, "\tmul\t{}, {}, {}", q, q, r);
            EMIT!(compiler, "\tsub\t{}, {}, {}", l, l, q);
            compiler.registers.free(quotient);
        }
        BinaryOp::Less
        | BinaryOp::LessEquals
        | BinaryOp::Greater
        | BinaryOp::GreaterEquals
        | BinaryOp::Equals
        | BinaryOp::NotEquals => {
            let condition = match op {
                BinaryOp::Less => "lt",
                BinaryOp::LessEquals => "le",
                BinaryOp::Greater => "gt",
                BinaryOp::GreaterEquals => "ge",
                BinaryOp::Equals => "eq",
                _ => "ne",
            };
            EMIT!(compiler, "\tcmp\t{}, {}", l, r);
            EMIT!(compiler, "\tcset\t{}, {}", l, condition);
        }
        BinaryOp::And => EMIT!(compiler, "\tand\t{}, {}, {}", l, l, r),
        BinaryOp::Or => EMIT!(compiler, "\torr\t{}, {}, {}", l, l, r),
    }

    compiler.registers.free(right);
    Ok(left)
}

/// Emits a call to `target` with the values in `arguments` and returns the
/// register holding the result.
///
/// The argument registers are released. Registers still live across the
/// call are saved on the stack around it, since the callee may clobber
/// any of x0..x5.
pub fn gen_call(
    compiler: &mut Compiler,
    target: &str,
    arguments: Vec<usize>,
) -> Result<usize, CodegenError> {
    for register in &arguments {
        compiler.registers.free(*register);
    }

    let live = compiler.registers.live();
    for register in &live {
        EMIT!(compiler, "\tstr\t{}, [sp, #-16]!", compiler.reg(*register)?);
    }

    move_arguments(compiler, &arguments)?;
    EMIT!(compiler, "\tbl\t{}", target);

    let returned = if live.is_empty() {
        "x0"
    } else {
        EMIT!(compiler, "\tmov\tx{}, x0", STAGING_REGISTER);
        for register in live.iter().rev() {
            EMIT!(compiler, "\tldr\t{}, [sp], #16", compiler.reg(*register)?);
        }
        "x9"
    };

    let result = compiler.registers.alloc()?;
    let name = compiler.reg(result)?;
    if name != returned {
        EMIT!(compiler, "\tmov\t{}, {}", name, returned);
    }

    Ok(result)
}

/// Places argument `n` in `xn`.
fn move_arguments(compiler: &mut Compiler, arguments: &[usize]) -> Result<(), CodegenError> {
    // Moving directly is safe unless some argument sits in a register that
    // another argument is about to overwrite
    let clobbers = arguments
        .iter()
        .enumerate()
        .any(|(position, register)| *register != position && *register < arguments.len());

    if !clobbers {
        for (position, register) in arguments.iter().enumerate() {
            if *register != position {
                EMIT!(compiler, "\tmov\tx{}, {}", position, compiler.reg(*register)?);
            }
        }
        return Ok(());
    }

    for (position, register) in arguments.iter().enumerate() {
        EMIT!(
            compiler,
            "\tmov\tx{}, {}",
            STAGING_REGISTER + position,
            compiler.reg(*register)?
        );
    }
    for position in 0..arguments.len() {
        EMIT!(compiler, "\tmov\tx{}, x{}", position, STAGING_REGISTER + position);
    }

    Ok(())
}

/// Stores the value in `value` to the location named by `target`.
/// Lowers `x++`/`x--`. The result is the value before the update. An
/// element operand has its address computed once, so side effects in the
/// index run a single time.
fn gen_postfix(compiler: &mut Compiler, op: PostfixOp, operand: &Expr) -> Result<usize, CodegenError> {
    let instruction = match op {
        PostfixOp::Increment => "add",
        PostfixOp::Decrement => "sub",
    };

    match operand {
        Expr::Group(inner) => gen_postfix(compiler, op, inner),
        Expr::Index { array, index } => {
            let (base, offset) = gen_element_address(compiler, array, index)?;
            let element = format!("[{}, {}, lsl #3]", compiler.reg(base)?, compiler.reg(offset)?);

            let value = compiler.registers.alloc()?;
            let updated = compiler.registers.alloc()?;
            EMIT!(compiler, "\tldr\t{}, {}", compiler.reg(value)?, element);
            EMIT!(
                compiler,
                "\t{}\t{}, {}, #1",
                instruction,
                compiler.reg(updated)?,
                compiler.reg(value)?
            );
            EMIT!(compiler, "\tstr\t{}, {}", compiler.reg(updated)?, element);

            compiler.registers.free(updated);
            compiler.registers.free(offset);
            compiler.registers.free(base);
            Ok(value)
        }
        _ => {
            let value = gen_expression(compiler, operand)?;
            let updated = compiler.registers.alloc()?;
            EMIT!(
                compiler,
                "\t{}\t{}, {}, #1",
                instruction,
                compiler.reg(updated)?,
                compiler.reg(value)?
            );
            gen_store(compiler, operand, updated)?;
            compiler.registers.free(updated);
            Ok(value)
        }
    }
}

fn gen_store(compiler: &mut Compiler, target: &Expr, value: usize) -> Result<(), CodegenError> {
    let source = compiler.reg(value)?;

    match target {
        Expr::Group(inner) => gen_store(compiler, inner, value),
        Expr::Name { name, symbol } => {
            let symbol = resolved(name, symbol)?;
            let address = symbol_address(&symbol.borrow())?;

            match address {
                Address::Frame(_) => EMIT!(compiler, "\tstr\t{}, {}", source, address),
                Address::Global(global) => {
                    let temporary = compiler.registers.alloc()?;
                    let t = compiler.reg(temporary)?;
                    emit_global_address(compiler, t, &global);
                    EMIT!(compiler, "\tstr\t{}, [{}]", source, t);
                    compiler.registers.free(temporary);
                }
            }
            Ok(())
        }
        Expr::Index { array, index } => {
            let (base, offset) = gen_element_address(compiler, array, index)?;
            EMIT!(
                compiler,
                "\tstr\t{}, [{}, {}, lsl #3]",
                source,
                compiler.reg(base)?,
                compiler.reg(offset)?
            );
            compiler.registers.free(offset);
            compiler.registers.free(base);
            Ok(())
        }
        other => Err(CodegenError::NotAddressable {
            expr: other.to_string(),
        }),
    }
}

/// Computes the base address of an integer array and the element index,
/// returned as `(base, index)` registers.
fn gen_element_address(
    compiler: &mut Compiler,
    array: &Expr,
    index: &Expr,
) -> Result<(usize, usize), CodegenError> {
    let (name, symbol) = match array {
        Expr::Group(inner) => return gen_element_address(compiler, inner, index),
        Expr::Name { name, symbol } => (name, resolved(name, symbol)?),
        other => {
            return Err(CodegenError::UnsupportedArray {
                name: other.to_string(),
                ty: type_of(other).to_string(),
            })
        }
    };

    let (address, ty, kind) = {
        let symbol = symbol.borrow();
        (symbol_address(&symbol)?, symbol.ty.clone(), symbol.kind)
    };

    let unsupported = || CodegenError::UnsupportedArray {
        name: name.clone(),
        ty: ty.to_string(),
    };

    match &ty {
        Type::Array(array) if matches!(*array.subtype, Type::Integer) => {}
        _ => return Err(unsupported()),
    }

    let base = compiler.registers.alloc()?;
    let base_name = compiler.reg(base)?;
    match address {
        Address::Global(global) => emit_global_address(compiler, base_name, &global),
        // An array parameter holds the address of the caller's array
        Address::Frame(_) if kind == SymbolKind::Param => {
            EMIT!(compiler, "\tldr\t{}, {}", base_name, address)
        }
        Address::Frame(_) => {
            compiler.registers.free(base);
            return Err(unsupported());
        }
    }

    let offset = gen_expression(compiler, index)?;
    Ok((base, offset))
}
