//! Type-lattice query front-end.
//!
//! Turns one line of POSL such as `lub(?X, car, boat).` into a structured
//! request for a classification-lattice solver:
//!
//! 1. [`parse_type_query`] runs the POSL term parser, insists on exactly one
//!    atom, and matches its predicate (case-insensitively) against `lub`,
//!    `glb`, `subsumes`, and `subsumesPlus`.
//! 2. [`ParsedQuery::decompose_subsumes`] / [`ParsedQuery::decompose_lub_glb`]
//!    split the operands into a [`SubsumesQuery`] or [`LubGlbQuery`].
//!
//! Everything here is pure and synchronous; queries can be handled on any
//! number of threads at once. Solving the query is somebody else's job.

pub mod error;
pub mod predicate;
pub mod query;

pub use error::{Result, TypeQueryError};
pub use predicate::TypePredicate;
pub use query::{
    parse_and_decompose, parse_type_query, ClassRef, LubGlbQuery, ParsedQuery, SubsumesQuery,
    TypeQuery,
};
