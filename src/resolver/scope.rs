use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::types::{params_compare, Type},
    errors::diagnostics::{Diagnostics, ResolveError, TypeError},
};

use super::symbol::{SymbolKind, SymbolRef};

#[derive(Debug)]
struct Scope {
    table: HashMap<String, SymbolRef>,
    kind: SymbolKind,
    counter: usize,
}

/// What `ScopeStack::bind` did with a symbol.
#[derive(Debug)]
pub enum BindOutcome {
    /// The symbol was added to the innermost scope.
    Bound(SymbolRef),
    /// A definition completed an earlier prototype; the prototype's symbol
    /// now stands for both.
    Merged(SymbolRef),
    /// The name was already taken in the innermost scope. The earlier
    /// binding is kept.
    Redeclared,
}

/// A stack of name tables, innermost last.
///
/// The first scope entered is the global scope; every scope entered above
/// it is local.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack::default()
    }

    pub fn enter(&mut self) {
        let (kind, counter) = match self.scopes.last() {
            None => (SymbolKind::Global, 0),
            // Nested blocks continue numbering from their enclosing scope so
            // that every live local in a function gets its own frame slot.
            Some(parent) if parent.kind == SymbolKind::Local => (SymbolKind::Local, parent.counter),
            Some(_) => (SymbolKind::Local, 0),
        };

        self.scopes.push(Scope {
            table: HashMap::new(),
            kind,
            counter,
        });
    }

    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    /// Current depth, 1 being the global scope.
    pub fn level(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `name` in the innermost scope, numbering the symbol with that
    /// scope's next ordinal.
    ///
    /// A function definition may complete a prototype of the same name.
    /// Disagreements in return type or parameters are reported as type
    /// errors and the two are still merged.
    pub fn bind(
        &mut self,
        name: &str,
        symbol: SymbolRef,
        diagnostics: &mut Diagnostics,
    ) -> BindOutcome {
        if self.scopes.is_empty() {
            self.enter();
        }

        let existing = self.lookup_current(name);

        let Some(scope) = self.scopes.last_mut() else {
            return BindOutcome::Redeclared;
        };

        scope.counter += 1;
        symbol.borrow_mut().which = scope.counter;

        let Some(existing) = existing else {
            scope.table.insert(name.to_string(), Rc::clone(&symbol));
            return BindOutcome::Bound(symbol);
        };

        let merge = {
            let existing = existing.borrow();
            let symbol = symbol.borrow();

            match (&existing.ty, &symbol.ty) {
                (Type::Prototype(prototype), Type::Function(definition)) => {
                    if !prototype.subtype.compare(&definition.subtype) {
                        diagnostics.type_error(TypeError::PrototypeReturnMismatch {
                            name: name.to_string(),
                            prototype: (*prototype.subtype).clone(),
                            definition: (*definition.subtype).clone(),
                        });
                    }
                    if !params_compare(&prototype.params, &definition.params) {
                        diagnostics.type_error(TypeError::PrototypeParameterMismatch {
                            name: name.to_string(),
                        });
                    }
                    true
                }
                _ => false,
            }
        };

        if merge {
            debug!("{} merges with its prototype", name);
            existing.borrow_mut().ty.promote_prototype();
            BindOutcome::Merged(existing)
        } else {
            diagnostics.resolve_error(ResolveError::Redeclared {
                name: name.to_string(),
            });
            BindOutcome::Redeclared
        }
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolRef> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.table.get(name))
            .map(Rc::clone)
    }

    pub fn lookup_current(&self, name: &str) -> Option<SymbolRef> {
        self.scopes
            .last()
            .and_then(|scope| scope.table.get(name))
            .map(Rc::clone)
    }
}
