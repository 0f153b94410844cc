//! Type checking module for semantic analysis.
//!
//! This module walks a resolved program and validates every expression,
//! statement and declaration against the type rules of the language:
//!
//! - Operand rules for every operator
//! - Call arity and argument types
//! - Declaration initializers, array element lists and counts
//! - Return statements against their function's return type
//! - Replacement of `auto` types with the types they were inferred as
//!
//! Errors are accumulated so one run reports every problem.

pub mod type_checker;
