//! Code generation module for aarch64 assembly.
//!
//! This module lowers a resolved, type checked program to GNU assembler
//! text for aarch64. It handles:
//!
//! - Static storage for global scalars, strings and integer arrays
//! - Function prologues, epilogues and fixed-size stack frames
//! - Expression lowering into a small pool of scratch registers
//! - Control flow lowering with generated labels
//! - Calls into the runtime for printing and exponentiation
//!
//! Any construct the backend cannot lower stops generation with a
//! `CodegenError`.

pub mod compiler;
pub mod expr;
pub mod frame;
pub mod labels;
pub mod registers;
pub mod runtime;
pub mod stmt;

#[cfg(test)]
mod tests;
