use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::{
    ast::{ast::Arity, declarations::ValueType},
    errors::errors::{Diagnostics, ErrorImpl},
    Span,
};

use super::{
    lookups::{Denotations, Grammar, GrammarSymbol},
    parser::ParseToken,
};

/// Handle of a scope inside a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

/// A name bound in a scope, either declared or reserved for keyword use.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Grammar id of the defining token, `"(name)"` for ordinary identifiers.
    pub id: &'static str,
    pub name: String,
    pub span: Span,
    pub arity: Arity,
    pub reserved: bool,
    pub denotations: Denotations,
    pub value_type: Option<ValueType>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub definitions: HashMap<String, Definition>,
    pub parent: Option<ScopeId>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    /// Whether `name` is declared here as something other than a keyword.
    pub fn declares(&self, name: &str) -> bool {
        self.get(name).map_or(false, |definition| !definition.reserved)
    }
}

/// Outcome of [`ScopeTree::find`].
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Defined(&'a Definition),
    Grammar(&'a GrammarSymbol),
    /// Nothing matched; carries the generic undefined-name prototype.
    Undefined(&'a GrammarSymbol),
}

impl Lookup<'_> {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Lookup::Undefined(_))
    }
}

/// Arena of every scope opened during one parse. Scope 0 is the root.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    pushes: usize,
    pops: usize,
}

impl Default for ScopeTree {
    fn default() -> Self {
        ScopeTree::new()
    }
}

impl ScopeTree {
    pub fn new() -> ScopeTree {
        ScopeTree {
            scopes: vec![Scope::default()],
            pushes: 0,
            pops: 0,
        }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[ScopeId::ROOT.0]
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }

    pub fn pops(&self) -> usize {
        self.pops
    }

    /// Opens a child of `parent` and returns its handle.
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            definitions: HashMap::new(),
            parent: Some(parent),
        });
        self.pushes += 1;

        debug!("Pushed scope {} under {}", id.0, parent.0);
        id
    }

    /// Closes `scope` and returns its parent.
    pub fn pop(&mut self, scope: ScopeId) -> ScopeId {
        debug_assert!(scope != ScopeId::ROOT, "the root scope is never popped");
        self.pops += 1;

        let parent = self
            .get(scope)
            .and_then(|scope| scope.parent)
            .unwrap_or(ScopeId::ROOT);

        debug!("Popped scope {} back to {}", scope.0, parent.0);
        parent
    }

    /// Binds `definition` in `scope`. A clash is reported at the earlier
    /// binding, then the new one replaces it.
    pub fn define(&mut self, scope: ScopeId, definition: Definition, diagnostics: &mut Diagnostics) {
        let Some(target) = self.scopes.get_mut(scope.0) else {
            return;
        };

        if let Some(previous) = target.definitions.get(&definition.name) {
            if previous.reserved {
                diagnostics.error(ErrorImpl::AlreadyReserved, previous.span);
            } else {
                diagnostics.warning(ErrorImpl::AlreadyDefined, previous.span);
            }
        }

        target.definitions.insert(definition.name.clone(), definition);
    }

    /// Marks a keyword-like name as taken in `scope`. The first reservation
    /// sticks; later ones are ignored.
    pub fn reserve(&mut self, scope: ScopeId, token: &ParseToken, diagnostics: &mut Diagnostics) {
        if !token.is_name() || token.reserved {
            return;
        }

        let Some(target) = self.scopes.get_mut(scope.0) else {
            return;
        };

        if let Some(previous) = target.definitions.get(&token.value) {
            if previous.reserved {
                return;
            }
            if previous.arity == Arity::Name {
                diagnostics.warning(ErrorImpl::AlreadyDefined, token.span);
            }
        }

        target.definitions.insert(
            token.value.clone(),
            Definition {
                id: token.id,
                name: token.value.clone(),
                span: token.span,
                arity: Arity::Name,
                reserved: true,
                denotations: token.denotations,
                value_type: None,
                scope,
            },
        );
    }

    /// Resolves `name` from `scope` outwards, then against the grammar.
    pub fn find<'a>(&'a self, scope: ScopeId, name: &str, grammar: &'a Grammar) -> Lookup<'a> {
        let mut current = self.get(scope);

        while let Some(candidate) = current {
            if let Some(definition) = candidate.get(name) {
                return Lookup::Defined(definition);
            }
            current = candidate.parent.and_then(|parent| self.get(parent));
        }

        match grammar.get(name) {
            Some(symbol) => Lookup::Grammar(symbol),
            None => Lookup::Undefined(grammar.undefined()),
        }
    }
}
