//! Symbol table: predicate and function names to stable integer codes.
//!
//! The table is an explicit context object. Engines construct one, pass it to
//! whatever needs codes, and call [`SymbolTable::reset`] between independent
//! runs. Interning takes `&self` so a single table can be shared across
//! threads.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Integer code of an interned symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct SymbolTable {
    name_to_id: DashMap<String, SymbolId>,
    id_to_name: DashMap<SymbolId, String>,
    next_id: AtomicU32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            name_to_id: DashMap::new(),
            id_to_name: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Intern a name, returning its code. Existing names keep their code.
    pub fn intern(&self, name: &str) -> SymbolId {
        if let Some(id) = self.name_to_id.get(name) {
            return *id;
        }
        // The entry API keeps two racing interns of the same name from
        // handing out different codes.
        *self
            .name_to_id
            .entry(name.to_string())
            .or_insert_with(|| {
                let id = SymbolId(self.next_id.fetch_add(1, Ordering::SeqCst));
                self.id_to_name.insert(id, name.to_string());
                id
            })
    }

    /// Look up a code without interning.
    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.name_to_id.get(name).map(|id| *id)
    }

    pub fn name_of(&self, id: SymbolId) -> Option<String> {
        self.id_to_name.get(&id).map(|s| s.clone())
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// Forget every symbol and restart numbering at zero.
    pub fn reset(&self) {
        self.name_to_id.clear();
        self.id_to_name.clear();
        self.next_id.store(0, Ordering::SeqCst);
        tracing::debug!("symbol table reset");
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
