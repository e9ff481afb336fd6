//! The generic built-in capability and its bottom-up adapter.

use std::fmt;
use std::sync::Arc;

use oodrew_posl::{DefiniteClause, SymbolId, Term};
use thiserror::Error;

/// A predicate implemented in Rust rather than by clauses.
///
/// Implementations must be deterministic: the same call term always yields
/// the same answer. They may be called from several evaluation threads at
/// once.
pub trait Builtin: Send + Sync {
    /// Code of the predicate symbol this built-in answers for.
    fn symbol(&self) -> SymbolId;

    /// Compute the fact this call should unify with, or `None` if the call
    /// fails.
    ///
    /// `call` is the full atom at the call site, oid slot included.
    fn build_result(&self, call: &Term) -> Option<DefiniteClause>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuiltinError {
    #[error("built-in adapter has no built-in configured")]
    Unconfigured,
    #[error("atom index {index} out of range for clause with {atoms} atoms")]
    AtomIndexOutOfRange { index: usize, atoms: usize },
    #[error("cannot register an unconfigured built-in adapter")]
    UnconfiguredRegistration,
}

/// Wraps a [`Builtin`] for use by the bottom-up engine.
///
/// The adapter only forwards calls; unifying the returned fact against the
/// call is the engine's job. Cloning shares the wrapped built-in.
#[derive(Clone, Default)]
pub struct BuBuiltin {
    builtin: Option<Arc<dyn Builtin>>,
}

impl BuBuiltin {
    pub fn new(builtin: Arc<dyn Builtin>) -> Self {
        Self {
            builtin: Some(builtin),
        }
    }

    pub fn from_builtin(builtin: impl Builtin + 'static) -> Self {
        Self::new(Arc::new(builtin))
    }

    pub fn is_configured(&self) -> bool {
        self.builtin.is_some()
    }

    fn capability(&self) -> Result<&dyn Builtin, BuiltinError> {
        self.builtin.as_deref().ok_or(BuiltinError::Unconfigured)
    }

    /// Symbol code of the wrapped built-in.
    pub fn symbol(&self) -> Result<SymbolId, BuiltinError> {
        Ok(self.capability()?.symbol())
    }

    /// Ask the wrapped built-in about the call at `clause.atoms[term]`.
    ///
    /// Returns an empty vector when the call fails and a single fact when it
    /// succeeds.
    pub fn build_result(
        &self,
        clause: &DefiniteClause,
        term: usize,
    ) -> Result<Vec<DefiniteClause>, BuiltinError> {
        let builtin = self.capability()?;
        let call = clause
            .atoms
            .get(term)
            .ok_or(BuiltinError::AtomIndexOutOfRange {
                index: term,
                atoms: clause.atoms.len(),
            })?;
        Ok(builtin.build_result(call).into_iter().collect())
    }
}

impl fmt::Debug for BuBuiltin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.builtin {
            Some(b) => f
                .debug_struct("BuBuiltin")
                .field("symbol", &b.symbol())
                .finish(),
            None => f.write_str("BuBuiltin(unconfigured)"),
        }
    }
}
