//! Name resolution.
//!
//! This module binds every declared name to a `Symbol` and links every use
//! of a name back to it. It contains:
//!
//! - `Symbol`, the resolved identity of a declared name
//! - `ScopeStack`, the nested name tables consulted while walking the tree
//! - `Resolver`, the pass that walks a `Program`
//!
//! Undefined and redeclared names are accumulated, so one run reports
//! every resolution problem in the program.

pub mod resolver;
pub mod scope;
pub mod symbol;

#[cfg(test)]
mod tests;
