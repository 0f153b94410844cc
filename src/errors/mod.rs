//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Front-end errors with source position information
//! - Resolution and type errors, accumulated in `Diagnostics`
//! - Fatal code generation errors
//! - Helpful error messages and suggestions

pub mod diagnostics;
pub mod errors;
