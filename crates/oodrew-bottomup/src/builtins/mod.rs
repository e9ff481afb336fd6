//! Standard generic built-ins.
//!
//! Calling convention: the result operand comes first, e.g.
//! `add(?Z, 1, 2)` derives `add(3:Integer, 1, 2)`. Tests such as
//! `greaterThan(5, 3)` derive the call itself when they hold.
//!
//! A built-in derives nothing when an input is unbound or has the wrong kind,
//! the arity is off, or a bound result operand disagrees with the computed
//! value.

mod compare;
mod math;
mod string;

pub use compare::Comparison;
pub use math::Arithmetic;
pub use string::{StringConcatenate, StringLength};

use oodrew_posl::{DefiniteClause, SymbolTable, Term};

use crate::builtin::BuBuiltin;

pub const TYPE_INTEGER: &str = "Integer";
pub const TYPE_REAL: &str = "Real";

/// Adapters for every standard built-in, with symbols interned in `symbols`.
pub fn standard(symbols: &SymbolTable) -> Vec<BuBuiltin> {
    vec![
        BuBuiltin::from_builtin(Arithmetic::add(symbols)),
        BuBuiltin::from_builtin(Arithmetic::subtract(symbols)),
        BuBuiltin::from_builtin(Arithmetic::multiply(symbols)),
        BuBuiltin::from_builtin(Comparison::greater_than(symbols)),
        BuBuiltin::from_builtin(Comparison::less_than(symbols)),
        BuBuiltin::from_builtin(StringConcatenate::new(symbols)),
        BuBuiltin::from_builtin(StringLength::new(symbols)),
    ]
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    /// Read a numeric constant. Untyped constants are numbers if they parse;
    /// typed ones must be `Integer` or `Real`.
    pub(crate) fn of(term: &Term) -> Option<Self> {
        let Term::Const { name, ty } = term else {
            return None;
        };
        let number = match ty.as_deref() {
            None => name
                .parse::<i64>()
                .map(Number::Int)
                .ok()
                .or_else(|| name.parse::<f64>().ok().map(Number::Real)),
            Some(TYPE_INTEGER) => name.parse::<i64>().ok().map(Number::Int),
            Some(TYPE_REAL) => name.parse::<f64>().ok().map(Number::Real),
            Some(_) => None,
        };
        number.filter(|n| match n {
            Number::Real(r) => r.is_finite(),
            Number::Int(_) => true,
        })
    }

    /// Integers compare exactly; a real on either side compares as `f64`.
    pub(crate) fn same_value(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Real(r) => r,
        }
    }

    pub(crate) fn to_term(self) -> Term {
        match self {
            Number::Int(i) => Term::typed_constant(i.to_string(), TYPE_INTEGER),
            Number::Real(r) => Term::typed_constant(r.to_string(), TYPE_REAL),
        }
    }
}

/// Does a (possibly unbound) result operand accept `computed`?
///
/// Numbers compare by value. Any other bound result must be a constant with
/// the same text whose type, if written, is the computed type.
pub(crate) fn result_accepts(result: &Term, computed: &Term) -> bool {
    match result {
        Term::Var { .. } | Term::Anon => true,
        Term::Const { name, ty } => {
            if let (Some(a), Some(b)) = (Number::of(result), Number::of(computed)) {
                return a.same_value(b);
            }
            match computed {
                Term::Const {
                    name: value,
                    ty: value_ty,
                } => name == value && (ty.is_none() || ty == value_ty),
                _ => false,
            }
        }
        Term::Expr { .. } | Term::Atom { .. } => false,
    }
}

/// Text of a bound constant.
pub(crate) fn string_of(term: &Term) -> Option<&str> {
    match term {
        Term::Const { name, .. } => Some(name.as_str()),
        _ => None,
    }
}

/// A ground fact `predicate(operands...)` with an anonymous oid slot.
pub(crate) fn derived_fact(predicate: &str, operands: Vec<Term>) -> DefiniteClause {
    DefiniteClause::fact(Term::atom(predicate, operands), Vec::new())
}
