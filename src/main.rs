use std::{env, fs, process::ExitCode};

use anyhow::{Context, Result};
use bminor::{
    config::{Mode, Options, USAGE},
    display_error,
    errors::errors::CompileError,
    generate,
    lexer::tokens::TokenKind,
    parse_source, resolve_program, scan, typecheck_program,
};

fn main() -> ExitCode {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("error: {}", error);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(options.log_level())
        .init();

    match run(&options) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Options) -> Result<ExitCode> {
    let source = fs::read_to_string(&options.input)
        .with_context(|| format!("failed to read {}", options.input.display()))?;
    let file = options.file_name();

    let output = match execute(options, &source, &file) {
        Ok(output) => output,
        Err(error) => {
            report(&error, &source, &file);
            return Ok(ExitCode::FAILURE);
        }
    };

    if options.mode != Mode::Codegen {
        print!("{}", output);
        return Ok(ExitCode::SUCCESS);
    }

    let path = options.output.as_ref().context("no output file given")?;
    fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))?;
    println!("codegen successful");

    Ok(ExitCode::SUCCESS)
}

/// Runs the stages `options.mode` asks for and returns what to print, or
/// the assembly text in codegen mode.
fn execute(options: &Options, source: &str, file: &str) -> Result<String, CompileError> {
    if options.mode == Mode::Scan {
        let mut output: String = scan(source, file)?
            .iter()
            .filter(|token| token.kind != TokenKind::EOF)
            .map(|token| format!("{}\n", token))
            .collect();
        output.push_str("Scan successful.\n");
        return Ok(output);
    }

    let mut program = parse_source(source, file)?;

    match options.mode {
        Mode::Parse => return Ok(String::from("parse successful\n")),
        Mode::Print => return Ok(program.to_string()),
        _ => {}
    }

    let diagnostics = resolve_program(&mut program)?;

    if options.mode == Mode::Resolve {
        return Ok(String::from("resolve successful\n"));
    }

    let diagnostics = typecheck_program(&mut program, diagnostics)?;

    if options.mode == Mode::Typecheck {
        let mut output: String = diagnostics
            .notices()
            .iter()
            .map(|notice| format!("{}\n", notice))
            .collect();
        output.push_str("typecheck successful.\n");
        return Ok(output);
    }

    generate(&program)
}

fn report(error: &CompileError, source: &str, file: &str) {
    match error {
        CompileError::Scan(inner) | CompileError::Parse(inner) => display_error(inner, source, file),
        CompileError::Resolve(diagnostics) => {
            for resolve_error in diagnostics.resolve_errors() {
                eprintln!("resolve error: {}", resolve_error);
            }
            eprintln!("{}", error);
        }
        CompileError::Type(diagnostics) => {
            for notice in diagnostics.notices() {
                println!("{}", notice);
            }
            for type_error in diagnostics.type_errors() {
                eprintln!("type error: {}", type_error);
            }
            eprintln!("{}", error);
        }
        CompileError::Codegen(_) => eprintln!("{}", error),
    }
}
