//! Unit tests for the code generator.
//!
//! This module contains tests for the register and label allocators, frame
//! addressing, and the assembly produced for declarations, statements and
//! expressions, along with the errors that stop generation.

use super::{
    compiler::{emit_string_literal, gen_decl, Compiler},
    expr::gen_expression,
    frame::{symbol_address, Address},
    labels::LabelAllocator,
    registers::ScratchPool,
    runtime::RuntimeFunction,
    stmt::gen_statement,
};
use crate::{
    ast::{
        ast::Decl,
        expressions::{BinaryOp, Expr},
        statements::Stmt,
        types::Type,
    },
    compile_source,
    errors::errors::{CodegenError, CompileError},
    resolver::symbol::{Symbol, SymbolKind},
};

fn compile_text(source: &str) -> String {
    match compile_source(source, "test.bminor") {
        Ok((assembly, _)) => assembly,
        Err(error) => panic!("{} failed to compile: {}", source, error),
    }
}

fn codegen_error(source: &str) -> CodegenError {
    match compile_source(source, "test.bminor") {
        Err(CompileError::Codegen(error)) => error,
        Err(error) => panic!("expected a codegen error, got {}", error),
        Ok(_) => panic!("expected {} to fail code generation", source),
    }
}

/// Asserts that `lines` appear in `assembly` consecutively and in order.
fn assert_sequence(assembly: &str, lines: &[&str]) {
    let expected = lines.join("\n");
    assert!(
        assembly.contains(&expected),
        "expected\n{}\nin\n{}",
        expected,
        assembly
    );
}

#[test]
fn test_scratch_pool_exhaustion() {
    let mut pool = ScratchPool::new();

    for expected in 0..6 {
        assert_eq!(pool.alloc(), Ok(expected));
    }
    assert_eq!(pool.alloc(), Err(CodegenError::RegistersExhausted));
    assert_eq!(pool.in_use_count(), 6);

    pool.free(2);
    assert_eq!(pool.alloc(), Ok(2));
}

#[test]
fn test_scratch_pool_reuse() {
    let mut pool = ScratchPool::new();

    for _ in 0..100 {
        let a = pool.alloc().unwrap();
        let b = pool.alloc().unwrap();
        assert_eq!((a, b), (0, 1));
        pool.free(b);
        pool.free(a);
    }

    pool.alloc().unwrap();
    pool.alloc().unwrap();
    pool.free(0);
    assert_eq!(pool.live(), vec![1]);

    // Freeing something that does not exist is harmless
    pool.free(10);
    assert_eq!(pool.in_use_count(), 1);
}

#[test]
fn test_scratch_register_names() {
    let pool = ScratchPool::new();

    assert_eq!(pool.name(0), Ok("x0"));
    assert_eq!(pool.name(5), Ok("x5"));
    assert_eq!(pool.name(6), Err(CodegenError::InvalidRegister(6)));
}

#[test]
fn test_labels() {
    let mut labels = LabelAllocator::new();

    assert_eq!(labels.create(), 0);
    assert_eq!(labels.create(), 1);
    assert_eq!(LabelAllocator::name(1), ".L1");

    assert_eq!(labels.function_label(), None);
    let epilogue = labels.create_for_function();
    assert_eq!(epilogue, 2);
    assert_eq!(labels.function_label(), Some(2));

    labels.end_function();
    assert_eq!(labels.function_label(), None);
    assert_eq!(labels.create(), 3);
}

#[test]
fn test_frame_addresses() {
    let mut symbol = Symbol::new(SymbolKind::Local, Type::Integer, "x");

    symbol.which = 1;
    assert_eq!(symbol_address(&symbol), Ok(Address::Frame(120)));
    assert_eq!(symbol_address(&symbol).unwrap().to_string(), "[x29, #120]");

    symbol.which = 14;
    assert_eq!(symbol_address(&symbol), Ok(Address::Frame(16)));

    symbol.which = 15;
    assert_eq!(
        symbol_address(&symbol),
        Err(CodegenError::StackFrameExhausted {
            name: String::from("x"),
            which: 15
        })
    );

    symbol.which = 0;
    assert!(matches!(
        symbol_address(&symbol),
        Err(CodegenError::UnresolvedSymbol { .. })
    ));

    let global = Symbol::new(SymbolKind::Global, Type::Integer, "count");
    assert_eq!(symbol_address(&global), Ok(Address::Global(String::from("count"))));
}

#[test]
fn test_print_routines() {
    assert_eq!(
        RuntimeFunction::print_for(&Type::Integer).map(|f| f.name()),
        Some("print_integer")
    );
    assert_eq!(
        RuntimeFunction::print_for(&Type::Character).map(|f| f.name()),
        Some("print_character")
    );
    assert_eq!(RuntimeFunction::print_for(&Type::array(Type::Integer, 2)), None);
    assert_eq!(RuntimeFunction::IntegerPower.name(), "integer_power");
}

#[test]
fn test_global_scalars() {
    let assembly = compile_text("x: integer = 5;\ny: integer = -3;\nb: boolean = true;\nc: char = 'A';\nz: integer;");

    assert_sequence(
        &assembly,
        &[
            "\t.global\tx",
            "\t.data",
            "\t.align\t3",
            "\t.type\tx, %object",
            "\t.size\tx, 8",
            "x:",
            "\t.xword\t5",
        ],
    );
    assert_sequence(&assembly, &["y:", "\t.xword\t-3"]);
    assert_sequence(&assembly, &["b:", "\t.xword\t1"]);
    assert_sequence(&assembly, &["c:", "\t.xword\t65"]);
    assert_sequence(&assembly, &["\t.comm\tz,8,8"]);
}

#[test]
fn test_global_string() {
    let assembly = compile_text("s: string = \"hi\\n\";");

    assert_eq!(
        assembly,
        "\t.section\t.rodata\n\
         \t.align\t3\n\
         .L0:\n\
         \t.string\t\"hi\\n\"\n\
         \t.global\ts\n\
         \t.section\t.data.rel.local\n\
         \t.align\t3\n\
         \t.type\ts, %object\n\
         \t.size\ts, 8\n\
         s:\n\
         \t.xword\t.L0\n"
    );
}

#[test]
fn test_global_arrays() {
    let assembly = compile_text(
        "a: array [2] integer = {1, -2};\nb: array [3] integer;\nc: array [1] integer = {7};",
    );

    assert_sequence(
        &assembly,
        &["\t.size\ta, 16", "a:", "\t.xword\t1", "\t.xword\t-2"],
    );
    assert_sequence(&assembly, &["\t.comm\tb,24,8"]);
    assert_sequence(&assembly, &["\t.size\tc, 8", "c:", "\t.xword\t7"]);
}

#[test]
fn test_global_array_padding() {
    let mut compiler = Compiler::new();
    let mut decl = Decl::new("a", Type::array(Type::Integer, 4))
        .with_elements(vec![Expr::integer(1), Expr::integer(2)]);
    decl.symbol = Some(Symbol::create(SymbolKind::Global, decl.ty.clone(), "a"));

    gen_decl(&mut compiler, &decl).unwrap();

    assert_sequence(
        compiler.output(),
        &["\t.size\ta, 32", "a:", "\t.xword\t1", "\t.xword\t2", "\t.zero\t16"],
    );
}

#[test]
fn test_non_constant_global_initializer() {
    assert_eq!(
        codegen_error("x: integer = 1 + 2;"),
        CodegenError::NonConstantInitializer {
            name: String::from("x")
        }
    );
    assert!(matches!(
        codegen_error("y: integer = 1;\nx: integer = y;"),
        CodegenError::NonConstantInitializer { .. }
    ));
}

#[test]
fn test_global_array_initialized_from_name() {
    assert_eq!(
        codegen_error("b: array [2] integer = {7, 8};\na: array [2] integer = b;"),
        CodegenError::NonConstantInitializer {
            name: String::from("a")
        }
    );
}

#[test]
fn test_postfix_element_address_computed_once() {
    let assembly = compile_text(
        "a: array [3] integer;\ni: integer;\nf: function void () = { a[i++]++; }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tadrp\tx0, a",
            "\tadd\tx0, x0, :lo12:a",
            "\tadrp\tx1, i",
            "\tadd\tx1, x1, :lo12:i",
            "\tldr\tx1, [x1]",
            "\tadd\tx2, x1, #1",
            "\tadrp\tx3, i",
            "\tadd\tx3, x3, :lo12:i",
            "\tstr\tx2, [x3]",
            "\tldr\tx2, [x0, x1, lsl #3]",
            "\tadd\tx3, x2, #1",
            "\tstr\tx3, [x0, x1, lsl #3]",
        ],
    );
    // `i` is read and bumped a single time
    assert_eq!(assembly.matches("\tadrp\tx1, i\n").count(), 1);
    assert_eq!(assembly.matches("\tadd\tx2, x1, #1\n").count(), 1);
}

#[test]
fn test_prototype_emits_nothing() {
    assert_eq!(compile_text("f: function integer (a: integer);"), "");
}

#[test]
fn test_function() {
    let assembly = compile_text("f: function integer (a: integer, b: integer) = { return a + b; }");

    assert_eq!(
        assembly,
        "\t.text\n\
         \t.align\t2\n\
         \t.global\tf\n\
         \t.type\tf, %function\n\
         f:\n\
         \tstp\tx29, x30, [sp, #-128]!\n\
         \tmov\tx29, sp\n\
         \tstr\tx0, [x29, #120]\n\
         \tstr\tx1, [x29, #112]\n\
         \tldr\tx0, [x29, #120]\n\
         \tldr\tx1, [x29, #112]\n\
         \tadd\tx0, x0, x1\n\
         \tb\t.L0\n\
         .L0:\n\
         \tldp\tx29, x30, [sp], #128\n\
         \tret\n\
         \t.size\tf, .-f\n"
    );
}

#[test]
fn test_locals() {
    let assembly = compile_text(
        "main: function integer () = { x: integer = 3; y: integer; return x; }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tmov\tx0, #3",
            "\tstr\tx0, [x29, #120]",
            "\tstr\txzr, [x29, #112]",
            "\tldr\tx0, [x29, #120]",
            "\tb\t.L0",
        ],
    );
}

#[test]
fn test_global_array_index() {
    let assembly = compile_text(
        "a: array [2] integer;\nf: function integer () = { return a[1] * 2; }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tadrp\tx0, a",
            "\tadd\tx0, x0, :lo12:a",
            "\tmov\tx1, #1",
            "\tldr\tx0, [x0, x1, lsl #3]",
            "\tmov\tx1, #2",
            "\tmul\tx0, x0, x1",
            "\tb\t.L0",
        ],
    );
}

#[test]
fn test_if_else() {
    let assembly = compile_text("f: function void (b: boolean) = { if (b) print 1; else print 2; }");

    assert_sequence(
        &assembly,
        &[
            "\tldr\tx0, [x29, #120]",
            "\tcmp\tx0, #0",
            "\tbeq\t.L1",
            "\tmov\tx0, #1",
            "\tbl\tprint_integer",
            "\tb\t.L2",
            ".L1:",
            "\tmov\tx0, #2",
            "\tbl\tprint_integer",
            ".L2:",
            ".L0:",
        ],
    );
}

#[test]
fn test_for_loop() {
    let assembly = compile_text(
        "f: function void () = { i: integer; for (i = 0; i < 3; i++) print i; }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tmov\tx0, #0",
            "\tstr\tx0, [x29, #120]",
            ".L1:",
            "\tldr\tx0, [x29, #120]",
            "\tmov\tx1, #3",
            "\tcmp\tx0, x1",
            "\tcset\tx0, lt",
            "\tcmp\tx0, #0",
            "\tbeq\t.L2",
            "\tldr\tx0, [x29, #120]",
            "\tbl\tprint_integer",
            "\tldr\tx0, [x29, #120]",
            "\tadd\tx1, x0, #1",
            "\tstr\tx1, [x29, #120]",
            "\tb\t.L1",
            ".L2:",
        ],
    );
}

#[test]
fn test_infinite_loop_has_no_condition() {
    let assembly = compile_text("f: function void () = { for (;;) { } }");

    assert_sequence(&assembly, &[".L1:", "\tb\t.L1", ".L2:"]);
    assert!(!assembly.contains("beq"));
}

#[test]
fn test_print_each_type() {
    let assembly = compile_text("f: function void () = { print 1, true, 'c', \"s\"; }");

    assert_sequence(&assembly, &["\tmov\tx0, #1", "\tbl\tprint_integer"]);
    assert_sequence(&assembly, &["\tmov\tx0, #1", "\tbl\tprint_boolean"]);
    assert_sequence(&assembly, &["\tmov\tx0, #99", "\tbl\tprint_character"]);
    assert_sequence(
        &assembly,
        &[
            "\t.section\t.rodata",
            "\t.align\t3",
            ".L1:",
            "\t.string\t\"s\"",
            "\t.text",
            "\tadrp\tx0, .L1",
            "\tadd\tx0, x0, :lo12:.L1",
            "\tbl\tprint_string",
        ],
    );
}

#[test]
fn test_exponent_calls_runtime() {
    let assembly = compile_text("x: integer;\nf: function integer () = { return x ^ 2; }");

    assert_sequence(
        &assembly,
        &[
            "\tadrp\tx0, x",
            "\tadd\tx0, x0, :lo12:x",
            "\tldr\tx0, [x0]",
            "\tmov\tx1, #2",
            "\tbl\tinteger_power",
        ],
    );
}

#[test]
fn test_call_saves_live_registers() {
    let assembly = compile_text(
        "g: function integer (a: integer) = { return a; }\n\
         f: function integer () = { return 1 + g(2); }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tmov\tx0, #1",
            "\tmov\tx1, #2",
            "\tstr\tx0, [sp, #-16]!",
            "\tmov\tx0, x1",
            "\tbl\tg",
            "\tmov\tx9, x0",
            "\tldr\tx0, [sp], #16",
            "\tmov\tx1, x9",
            "\tadd\tx0, x0, x1",
        ],
    );
}

#[test]
fn test_call_stages_overlapping_arguments() {
    let assembly = compile_text(
        "h: function integer (a: integer, b: integer);\n\
         f: function integer () = { return 1 + h(2, 3); }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tstr\tx0, [sp, #-16]!",
            "\tmov\tx9, x1",
            "\tmov\tx10, x2",
            "\tmov\tx0, x9",
            "\tmov\tx1, x10",
            "\tbl\th",
        ],
    );
}

#[test]
fn test_global_assignment_and_array_store() {
    let assembly = compile_text(
        "n: integer;\na: array [3] integer;\nf: function void () = { n = 4; a[1] = 5; }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tmov\tx0, #4",
            "\tadrp\tx1, n",
            "\tadd\tx1, x1, :lo12:n",
            "\tstr\tx0, [x1]",
        ],
    );
    assert_sequence(
        &assembly,
        &[
            "\tmov\tx0, #5",
            "\tadrp\tx1, a",
            "\tadd\tx1, x1, :lo12:a",
            "\tmov\tx2, #1",
            "\tstr\tx0, [x1, x2, lsl #3]",
        ],
    );
}

#[test]
fn test_array_parameter_index() {
    let assembly = compile_text("first: function integer (a: array [] integer) = { return a[0]; }");

    assert_sequence(
        &assembly,
        &[
            "\tstr\tx0, [x29, #120]",
            "\tldr\tx0, [x29, #120]",
            "\tmov\tx1, #0",
            "\tldr\tx0, [x0, x1, lsl #3]",
        ],
    );
}

#[test]
fn test_operators() {
    let assembly = compile_text(
        "f: function void (a: integer, b: integer, p: boolean) = {\n\
         print a % b, -a, !p, a >= b, p && true, 100000;\n\
         }",
    );

    assert_sequence(
        &assembly,
        &[
            "\tsdiv\tx2, x0, x1",
            "\tmul\tx2, x2, x1",
            "\tsub\tx0, x0, x2",
        ],
    );
    assert_sequence(&assembly, &["\tneg\tx0, x0"]);
    assert_sequence(&assembly, &["\tcmp\tx0, #0", "\tcset\tx0, eq"]);
    assert_sequence(&assembly, &["\tcmp\tx0, x1", "\tcset\tx0, ge"]);
    assert_sequence(&assembly, &["\tand\tx0, x0, x1"]);
    assert_sequence(&assembly, &["\tldr\tx0, =100000"]);
}

#[test]
fn test_expression_leaves_only_result_register() {
    let mut compiler = Compiler::new();

    let expr = Expr::binary(
        BinaryOp::Mod,
        Expr::binary(BinaryOp::Mul, Expr::integer(6), Expr::integer(7)),
        Expr::integer(5),
    );
    let register = gen_expression(&mut compiler, &expr).unwrap();

    assert_eq!(register, 0);
    assert_eq!(compiler.registers.in_use_count(), 1);
}

#[test]
fn test_registers_exhausted() {
    assert_eq!(
        codegen_error("f: function integer () = { return 1 + (2 + (3 + (4 + (5 + (6 + 7))))); }"),
        CodegenError::RegistersExhausted
    );

    // Six live values still fit
    compile_text("f: function integer () = { return 1 + (2 + (3 + (4 + (5 + 6)))); }");
}

#[test]
fn test_too_many_arguments() {
    assert_eq!(
        codegen_error(
            "g: function integer (a: integer, b: integer, c: integer, d: integer, e: integer, f: integer, h: integer);\n\
             main: function integer () = { return g(1, 2, 3, 4, 5, 6, 7); }"
        ),
        CodegenError::TooManyArguments {
            function: String::from("g"),
            count: 7,
            max: 6
        }
    );
}

#[test]
fn test_too_many_parameters() {
    assert!(matches!(
        codegen_error(
            "g: function void (a: integer, b: integer, c: integer, d: integer, e: integer, f: integer, h: integer) = { }"
        ),
        CodegenError::TooManyParameters { count: 7, .. }
    ));
}

#[test]
fn test_unsupported_local() {
    assert_eq!(
        codegen_error("f: function void () = { a: array [2] integer; }"),
        CodegenError::UnsupportedLocal {
            name: String::from("a"),
            ty: String::from("array [2] integer")
        }
    );
}

#[test]
fn test_unsupported_global_array() {
    assert!(matches!(
        codegen_error("a: array [2] boolean;"),
        CodegenError::UnsupportedArray { .. }
    ));
}

#[test]
fn test_stack_frame_exhausted() {
    let locals: String = (1..=15).map(|i| format!("v{}: integer; ", i)).collect();
    let source = format!("f: function void () = {{ {}}}", locals);

    assert_eq!(
        codegen_error(&source),
        CodegenError::StackFrameExhausted {
            name: String::from("v15"),
            which: 15
        }
    );
}

#[test]
fn test_return_outside_function() {
    let mut compiler = Compiler::new();

    assert_eq!(
        gen_statement(&mut compiler, &Stmt::Return(None)),
        Err(CodegenError::ReturnOutsideFunction)
    );
}

#[test]
fn test_string_literal_escapes() {
    let mut compiler = Compiler::new();

    let label = emit_string_literal(&mut compiler, "a\"b\\\t\u{1}");

    assert_eq!(label, ".L0");
    assert!(compiler.output().contains("\t.string\t\"a\\\"b\\\\\\t\\001\"\n"));
}
