//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of reserved words, identifiers, literals, and operators
//! - Escape decoding for string and character literals
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
