//! Main compiler module.
//!
//! This module contains the Compiler structure and the lowering of
//! declarations: static data for globals, prologue and epilogue for
//! functions, and frame slots for locals.

use tracing::trace;

use crate::{
    ast::{
        ast::{Decl, Program},
        expressions::Expr,
        statements::Stmt,
        types::{ArrayType, Type},
    },
    errors::errors::CodegenError,
    resolver::symbol::SymbolKind,
    EMIT,
};

use super::{
    expr::gen_expression,
    frame::{symbol_address, FRAME_SIZE, MAX_ARGUMENTS},
    labels::LabelAllocator,
    registers::ScratchPool,
    stmt::gen_statement,
};

/// State of one code generation run.
///
/// Holds the assembly text produced so far along with the scratch
/// registers and labels handed out while producing it.
#[derive(Debug, Default)]
pub struct Compiler {
    output: String,
    /// Scratch registers holding intermediate values
    pub registers: ScratchPool,
    /// Label counter and the current function's epilogue
    pub labels: LabelAllocator,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    /// Appends a line of assembly. Prefer the `EMIT!` macro.
    pub fn emit_line(&mut self, line: String) {
        self.output.push_str(&line);
        self.output.push('\n');
    }

    /// Assembly name of a scratch register.
    pub fn reg(&self, register: usize) -> Result<&'static str, CodegenError> {
        self.registers.name(register)
    }

    #[cfg(test)]
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Compiles a resolved, type checked program to aarch64 assembly.
///
/// # Arguments
///
/// * `program` - The program to compile
///
/// # Returns
///
/// The assembly text, or the first construct that could not be lowered.
pub fn compile(program: &Program) -> Result<String, CodegenError> {
    let mut compiler = Compiler::new();

    for decl in &program.decls {
        gen_decl(&mut compiler, decl)?;
    }

    Ok(compiler.finish())
}

/// Lowers a declaration, as static data or a function when its symbol is
/// global and as a frame slot otherwise.
pub fn gen_decl(compiler: &mut Compiler, decl: &Decl) -> Result<(), CodegenError> {
    let kind = decl
        .symbol
        .as_ref()
        .map(|symbol| symbol.borrow().kind)
        .ok_or_else(|| CodegenError::UnresolvedSymbol {
            name: decl.name.clone(),
        })?;

    trace!("generating declaration of {}", decl.name);

    match kind {
        SymbolKind::Global => gen_global(compiler, decl),
        SymbolKind::Local | SymbolKind::Param => gen_local(compiler, decl),
    }
}

fn gen_global(compiler: &mut Compiler, decl: &Decl) -> Result<(), CodegenError> {
    match &decl.ty {
        Type::Integer | Type::Boolean | Type::Character => {
            match &decl.value {
                Some(value) => {
                    let constant = constant(decl, value)?;
                    emit_data_header(compiler, &decl.name, "\t.data", 8);
                    EMIT!(compiler, "\t.xword\t{}", constant);
                }
                None => EMIT!(compiler, "\t.comm\t{},8,8", decl.name),
            }
            Ok(())
        }
        Type::String => {
            match &decl.value {
                Some(Expr::StringLiteral(text)) => {
                    let label = emit_string_literal(compiler, text);
                    emit_data_header(compiler, &decl.name, "\t.section\t.data.rel.local", 8);
                    EMIT!(compiler, "\t.xword\t{}", label);
                }
                Some(_) => {
                    return Err(CodegenError::NonConstantInitializer {
                        name: decl.name.clone(),
                    })
                }
                None => EMIT!(compiler, "\t.comm\t{},8,8", decl.name),
            }
            Ok(())
        }
        Type::Array(array) => gen_global_array(compiler, decl, array),
        Type::Function(_) => match &decl.body {
            Some(body) => gen_function(compiler, decl, body),
            None => Ok(()),
        },
        Type::Prototype(_) => Ok(()),
        Type::Void | Type::Auto => Err(CodegenError::UnsupportedGlobal {
            name: decl.name.clone(),
            ty: decl.ty.to_string(),
        }),
    }
}

fn constant(decl: &Decl, value: &Expr) -> Result<i64, CodegenError> {
    value
        .constant_value()
        .ok_or_else(|| CodegenError::NonConstantInitializer {
            name: decl.name.clone(),
        })
}

fn emit_data_header(compiler: &mut Compiler, name: &str, section: &str, size: usize) {
    EMIT!(compiler, "\t.global\t{}", name);
    EMIT!(compiler, "{}", section);
    EMIT!(compiler, "\t.align\t3");
    EMIT!(compiler, "\t.type\t{}, %object", name);
    EMIT!(compiler, "\t.size\t{}, {}", name, size);
    EMIT!(compiler, "{}:", name);
}

/// Places `text` in read-only data under a fresh label and returns the
/// label. Leaves the assembler in the `.rodata` section.
pub fn emit_string_literal(compiler: &mut Compiler, text: &str) -> String {
    let label = LabelAllocator::name(compiler.labels.create());

    EMIT!(compiler, "\t.section\t.rodata");
    EMIT!(compiler, "\t.align\t3");
    EMIT!(compiler, "{}:", label);
    EMIT!(compiler, "\t.string\t\"{}\"", escape_assembly_string(text));

    label
}

fn escape_assembly_string(text: &str) -> String {
    text.bytes()
        .map(|byte| match byte {
            b'\n' => String::from("\\n"),
            b'\t' => String::from("\\t"),
            b'"' => String::from("\\\""),
            b'\\' => String::from("\\\\"),
            b' ' => String::from(" "),
            other if other.is_ascii_graphic() => (other as char).to_string(),
            other => format!("\\{:03o}", other),
        })
        .collect()
}

fn gen_global_array(
    compiler: &mut Compiler,
    decl: &Decl,
    array: &ArrayType,
) -> Result<(), CodegenError> {
    if !matches!(*array.subtype, Type::Integer) {
        return Err(CodegenError::UnsupportedArray {
            name: decl.name.clone(),
            ty: decl.ty.to_string(),
        });
    }

    if decl.value.is_some() {
        return Err(CodegenError::NonConstantInitializer {
            name: decl.name.clone(),
        });
    }

    let size = array.size;
    if decl.elements.is_empty() {
        EMIT!(compiler, "\t.comm\t{},{},8", decl.name, size * 8);
        return Ok(());
    }

    let values = decl
        .elements
        .iter()
        .map(|element| constant(decl, element))
        .collect::<Result<Vec<_>, _>>()?;

    emit_data_header(compiler, &decl.name, "\t.data", size * 8);
    for value in &values {
        EMIT!(compiler, "\t.xword\t{}", value);
    }
    if values.len() < size {
        EMIT!(compiler, "\t.zero\t{}", (size - values.len()) * 8);
    }

    Ok(())
}

fn gen_function(compiler: &mut Compiler, decl: &Decl, body: &[Stmt]) -> Result<(), CodegenError> {
    let Some(function) = decl.ty.as_function() else {
        return Ok(());
    };

    if function.params.len() > MAX_ARGUMENTS {
        return Err(CodegenError::TooManyParameters {
            function: decl.name.clone(),
            count: function.params.len(),
            max: MAX_ARGUMENTS,
        });
    }

    EMIT!(compiler, "\t.text");
    EMIT!(compiler, "\t.align\t2");
    EMIT!(compiler, "\t.global\t{}", decl.name);
    EMIT!(compiler, "\t.type\t{}, %function", decl.name);
    EMIT!(compiler, "{}:", decl.name);
    EMIT!(compiler, "\tstp\tx29, x30, [sp, #-{}]!", FRAME_SIZE);
    EMIT!(compiler, "\tmov\tx29, sp");

    // Incoming arguments arrive in x0..x5, in parameter order
    for (position, param) in function.params.iter().enumerate() {
        let symbol = param
            .symbol
            .as_ref()
            .ok_or_else(|| CodegenError::UnresolvedSymbol {
                name: param.name.clone(),
            })?;
        let address = symbol_address(&symbol.borrow())?;
        EMIT!(compiler, "\tstr\tx{}, {}", position, address);
    }

    let epilogue = compiler.labels.create_for_function();

    for stmt in body {
        gen_statement(compiler, stmt)?;
    }

    EMIT!(compiler, "{}:", LabelAllocator::name(epilogue));
    EMIT!(compiler, "\tldp\tx29, x30, [sp], #{}", FRAME_SIZE);
    EMIT!(compiler, "\tret");
    EMIT!(compiler, "\t.size\t{}, .-{}", decl.name, decl.name);

    compiler.labels.end_function();
    Ok(())
}

fn gen_local(compiler: &mut Compiler, decl: &Decl) -> Result<(), CodegenError> {
    if !matches!(
        decl.ty,
        Type::Integer | Type::Boolean | Type::Character | Type::String
    ) {
        return Err(CodegenError::UnsupportedLocal {
            name: decl.name.clone(),
            ty: decl.ty.to_string(),
        });
    }

    let address = match &decl.symbol {
        Some(symbol) => symbol_address(&symbol.borrow())?,
        None => {
            return Err(CodegenError::UnresolvedSymbol {
                name: decl.name.clone(),
            })
        }
    };

    match &decl.value {
        Some(value) => {
            let register = gen_expression(compiler, value)?;
            EMIT!(compiler, "\tstr\t{}, {}", compiler.reg(register)?, address);
            compiler.registers.free(register);
        }
        None => EMIT!(compiler, "\tstr\txzr, {}", address),
    }

    Ok(())
}
