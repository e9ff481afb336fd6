use oodrew_posl::PoslParseError;
use thiserror::Error;

use crate::predicate::TypePredicate;

/// Why a line of text is not a usable type query.
///
/// Every variant is a client error: report it to whoever sent the query and
/// move on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeQueryError {
    #[error(transparent)]
    Parse(#[from] PoslParseError),

    #[error("rules cannot be used for type queries (query has {atoms} atoms)")]
    MalformedQuery { atoms: usize },

    #[error(
        "unsupported predicate `{symbol}`: only lub, glb, subsumes, and subsumesPlus are valid"
    )]
    UnsupportedPredicate { symbol: String },

    #[error("{predicate} must have {expected} arguments, found {found}")]
    ArityMismatch {
        predicate: TypePredicate,
        expected: &'static str,
        found: usize,
    },

    #[error("anonymous operands are not allowed in {predicate}")]
    AnonymousOperandNotAllowed { predicate: TypePredicate },

    #[error("cannot have duplicate variable names in subsumes or subsumesPlus: `?{name}`")]
    DuplicateVariableName { name: String },

    #[error("a {found} query cannot be decomposed as {expected}")]
    PredicateMismatch {
        expected: &'static str,
        found: TypePredicate,
    },
}

pub type Result<T> = std::result::Result<T, TypeQueryError>;
