//! Symbol tables.
//!
//! A stack of scopes holds symbol records. Redefinition within the same
//! scope is a duplicate; shadowing across scopes is permitted.

use aster_common::Span;
use aster_core::Type;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
    Lambda,
    MatchArm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Param,
    Func,
    Type,
    Enum,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    pub def_span: Span,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    symbols: FxHashMap<String, Symbol>,
}

/// The scope stack. Always holds at least the module scope.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Module,
                symbols: FxHashMap::default(),
            }],
        }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            symbols: FxHashMap::default(),
        });
    }

    pub fn pop(&mut self) {
        debug_assert!(self.scopes.len() > 1, "module scope must remain");
        self.scopes.pop();
    }

    /// Define a symbol in the innermost scope. Returns the span of the
    /// existing definition when the name is already taken in this scope.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), Span> {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        if let Some(existing) = scope.symbols.get(&symbol.name) {
            return Err(existing.def_span);
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look a name up from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.scopes.last().expect("scope stack is never empty").kind
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aster_common::{Pos, Span};

    fn sym(name: &str) -> Symbol {
        Symbol {
            name: name.into(),
            ty: Type::int(),
            kind: SymbolKind::Var,
            def_span: Span::point(Pos::new(1, 1)),
        }
    }

    #[test]
    fn define_and_lookup() {
        let mut table = SymbolTable::new();
        table.define(sym("x")).unwrap();
        assert!(table.lookup("x").is_some());
        assert!(table.lookup("y").is_none());
    }

    #[test]
    fn same_scope_redefinition_is_a_duplicate() {
        let mut table = SymbolTable::new();
        table.define(sym("x")).unwrap();
        assert!(table.define(sym("x")).is_err());
    }

    #[test]
    fn shadowing_across_scopes_is_permitted() {
        let mut table = SymbolTable::new();
        table.define(sym("x")).unwrap();
        table.push(ScopeKind::Block);
        assert!(table.define(sym("x")).is_ok());
        table.pop();
        assert!(table.lookup("x").is_some());
    }
}
