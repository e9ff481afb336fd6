//! Built-in adapters keyed by predicate symbol.

use ahash::AHashMap;
use oodrew_posl::{DefiniteClause, SymbolId, SymbolTable};

use crate::builtin::{BuBuiltin, BuiltinError};
use crate::builtins;

/// The set of built-ins a bottom-up engine consults while evaluating clauses.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    adapters: AHashMap<SymbolId, BuBuiltin>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every standard built-in.
    pub fn with_standard_builtins(symbols: &SymbolTable) -> Self {
        let mut registry = Self::new();
        for adapter in builtins::standard(symbols) {
            // Standard adapters are always configured.
            if let Err(err) = registry.register(adapter) {
                tracing::warn!(%err, "skipping standard built-in");
            }
        }
        registry
    }

    /// Add an adapter, returning the one it replaces (if any).
    pub fn register(&mut self, adapter: BuBuiltin) -> Result<Option<BuBuiltin>, BuiltinError> {
        let symbol = adapter
            .symbol()
            .map_err(|_| BuiltinError::UnconfiguredRegistration)?;
        let replaced = self.adapters.insert(symbol, adapter);
        if replaced.is_some() {
            tracing::warn!(%symbol, "replaced built-in registration");
        } else {
            tracing::debug!(%symbol, "registered built-in");
        }
        Ok(replaced)
    }

    pub fn get(&self, symbol: SymbolId) -> Option<&BuBuiltin> {
        self.adapters.get(&symbol)
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.adapters.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Registered symbols in ascending order.
    pub fn symbols(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self.adapters.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Route `clause.atoms[term]` to its built-in.
    ///
    /// `Ok(None)` means the atom's predicate is not a registered built-in and
    /// should be solved some other way.
    pub fn call(
        &self,
        symbols: &SymbolTable,
        clause: &DefiniteClause,
        term: usize,
    ) -> Result<Option<Vec<DefiniteClause>>, BuiltinError> {
        let atom = clause
            .atoms
            .get(term)
            .ok_or(BuiltinError::AtomIndexOutOfRange {
                index: term,
                atoms: clause.atoms.len(),
            })?;
        let Some(adapter) = atom
            .symbol_name()
            .and_then(|name| symbols.id_of(name))
            .and_then(|id| self.adapters.get(&id))
        else {
            return Ok(None);
        };

        let facts = adapter.build_result(clause, term)?;
        tracing::trace!(
            predicate = atom.symbol_name().unwrap_or_default(),
            derived = facts.len(),
            "built-in call"
        );
        Ok(Some(facts))
    }

    /// Facts derived by every built-in call in the body of `clause`.
    pub fn derive_facts(
        &self,
        symbols: &SymbolTable,
        clause: &DefiniteClause,
    ) -> Result<Vec<DefiniteClause>, BuiltinError> {
        let mut derived = Vec::new();
        for term in 1..clause.atoms.len() {
            if let Some(facts) = self.call(symbols, clause, term)? {
                derived.extend(facts);
            }
        }
        Ok(derived)
    }
}
