/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root and declarations
/// - expressions: Expression nodes and their operators
/// - statements: Statement nodes
/// - types: The type model shared by every pass
/// - display: Canonical source rendering of the tree
pub mod ast;
pub mod display;
pub mod expressions;
pub mod statements;
pub mod types;
