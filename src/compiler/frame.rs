//! Stack frame layout and symbol addressing.
//!
//! Every function reserves a frame of `FRAME_SIZE` bytes. The saved frame
//! pointer and link register sit at its bottom, and locals and parameters
//! fill 8-byte slots downward from its top by ordinal:
//!
//! ```text
//! x29 + 120   slot 1
//! x29 + 112   slot 2
//! ...
//! x29 + 16    slot 14
//! x29 + 8     saved x30
//! x29 + 0     saved x29
//! ```

use std::fmt::Display;

use crate::{
    errors::errors::CodegenError,
    resolver::symbol::{Symbol, SymbolKind},
};

pub const FRAME_SIZE: i64 = 128;
pub const SLOT_SIZE: i64 = 8;
/// Bytes at the bottom of the frame holding the saved x29 and x30.
pub const FRAME_RECORD_SIZE: i64 = 16;
pub const MAX_ARGUMENTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// A global, addressed through its symbol name.
    Global(String),
    /// A byte offset from the frame pointer.
    Frame(i64),
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::Global(name) => write!(f, "{}", name),
            Address::Frame(offset) => write!(f, "[x29, #{}]", offset),
        }
    }
}

pub fn symbol_address(symbol: &Symbol) -> Result<Address, CodegenError> {
    match symbol.kind {
        SymbolKind::Global => Ok(Address::Global(symbol.name.clone())),
        SymbolKind::Local | SymbolKind::Param => {
            if symbol.which == 0 {
                return Err(CodegenError::UnresolvedSymbol {
                    name: symbol.name.clone(),
                });
            }

            let offset = FRAME_SIZE - symbol.which as i64 * SLOT_SIZE;
            if offset < FRAME_RECORD_SIZE {
                return Err(CodegenError::StackFrameExhausted {
                    name: symbol.name.clone(),
                    which: symbol.which,
                });
            }

            Ok(Address::Frame(offset))
        }
    }
}
