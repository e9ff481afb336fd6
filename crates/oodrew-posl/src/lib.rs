//! POSL (positional-slotted) syntax for OO jDREW-style rule bases.
//!
//! This crate owns the shared vocabulary of the engine crates:
//!
//! - [`Term`] and [`DefiniteClause`], the syntax-tree values every component
//!   reads,
//! - [`SymbolTable`], the explicit name → code context used to route built-in
//!   calls, and
//! - a `nom` parser for queries, clauses, and whole programs.
//!
//! Atoms always carry an object identifier (oid) slot as their first
//! sub-term. It is anonymous unless written explicitly as `oid^`.

pub mod clause;
pub mod parser;
pub mod symbol;
pub mod term;

pub use clause::DefiniteClause;
pub use parser::{parse_clause, parse_program, parse_query_string, PoslParseError};
pub use symbol::{SymbolId, SymbolTable};
pub use term::{Operand, Term, VAR_MARKER};
