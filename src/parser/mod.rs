//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Declarations of variables, arrays, prototypes and functions
//! - Statements (control flow, print, return, blocks)
//! - Expression parsing (binary ops, calls, indexing, literals)
//! - Type parsing for declarations and parameters
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
