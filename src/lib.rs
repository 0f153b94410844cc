#![allow(clippy::module_inception)]

use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::ast::Program,
    compiler::compiler::compile,
    errors::{
        diagnostics::Diagnostics,
        errors::{CompileError, Error, ErrorTip},
    },
    lexer::{lexer::tokenize, tokens::Token},
    parser::parser::parse,
    resolver::resolver::resolve,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Tokenizes `source`, tagging every position with `file`.
pub fn scan(source: &str, file: &str) -> Result<Vec<Token>, CompileError> {
    tokenize(source.to_string(), Some(file.to_string())).map_err(CompileError::Scan)
}

/// Scans and parses `source` into a program.
pub fn parse_source(source: &str, file: &str) -> Result<Program, CompileError> {
    let tokens = scan(source, file)?;
    debug!("scanned {} tokens", tokens.len());
    parse(tokens, Rc::new(file.to_string())).map_err(CompileError::Parse)
}

/// Runs name resolution, halting the pipeline if any name failed to resolve.
///
/// The returned diagnostics still carry type errors found while binding
/// (prototype mismatches, `auto` parameters); they are reported by the
/// type checking stage.
pub fn resolve_program(program: &mut Program) -> Result<Diagnostics, CompileError> {
    let diagnostics = resolve(program);

    if diagnostics.resolve_error_count() > 0 {
        return Err(CompileError::Resolve(diagnostics));
    }

    Ok(diagnostics)
}

/// Type checks a resolved program, halting the pipeline on any type error.
pub fn typecheck_program(
    program: &mut Program,
    diagnostics: Diagnostics,
) -> Result<Diagnostics, CompileError> {
    let diagnostics = type_check(program, diagnostics);

    if diagnostics.type_error_count() > 0 {
        return Err(CompileError::Type(diagnostics));
    }

    Ok(diagnostics)
}

/// Emits assembly for a resolved, type checked program.
pub fn generate(program: &Program) -> Result<String, CompileError> {
    Ok(compile(program)?)
}

/// Runs every stage over `source`, returning the assembly text and the
/// notices gathered along the way.
pub fn compile_source(source: &str, file: &str) -> Result<(String, Diagnostics), CompileError> {
    let mut program = parse_source(source, file)?;
    let diagnostics = resolve_program(&mut program)?;
    let diagnostics = typecheck_program(&mut program, diagnostics)?;
    let assembly = generate(&program)?;

    Ok((assembly, diagnostics))
}

pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    if source.is_empty() {
        return None;
    }

    // EOF errors point one past the end, report them on the last line
    let pos = (position as usize).min(source.len() - 1);

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    const SOURCE: &str = "Hello, world!\nx: integer;\n\nTesting { }\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 35).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_past_end_of_source() {
        let (line_number, _, _) = super::get_line_at_position(SOURCE, 400).unwrap();
        assert_eq!(line_number, 4);
        assert!(super::get_line_at_position("", 0).is_none());
    }

    #[test]
    fn test_compile_source_runs_every_stage() {
        let (assembly, diagnostics) =
            super::compile_source("x: auto = 4;\nmain: function integer () = { return x; }", "t.bminor").unwrap();

        assert_eq!(diagnostics.notices().len(), 1);
        assert!(assembly.contains("main:"));
    }
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: message
        -> final.bminor
           |
        20 | x: integer = #;
           | -------------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}
