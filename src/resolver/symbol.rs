use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::ast::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Global,
    Local,
    Param,
}

/// The resolved identity of a declared name.
///
/// For locals and parameters `which` is the ordinal that picks the frame
/// slot. Globals are addressed by name and leave it unused.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub ty: Type,
    pub name: String,
    pub which: usize,
}

/// Shared handle to a symbol. The declaration or parameter that created the
/// symbol owns one handle; name and call expressions hold the others.
pub type SymbolRef = Rc<RefCell<Symbol>>;

impl Symbol {
    pub fn new(kind: SymbolKind, ty: Type, name: &str) -> Self {
        Symbol {
            kind,
            ty,
            name: name.to_string(),
            which: 0,
        }
    }

    pub fn create(kind: SymbolKind, ty: Type, name: &str) -> SymbolRef {
        Rc::new(RefCell::new(Symbol::new(kind, ty, name)))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SymbolKind::Global => {
                write!(f, "global {}", self.name)?;
                match self.ty {
                    Type::Function(_) => write!(f, " (FUNCTION)"),
                    Type::Prototype(_) => write!(f, " (PROTOTYPE)"),
                    _ => Ok(()),
                }
            }
            SymbolKind::Local => write!(f, "local {}", self.which),
            SymbolKind::Param => write!(f, "param {}", self.which),
        }
    }
}
