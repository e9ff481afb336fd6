use oodrew_posl::{DefiniteClause, SymbolId, SymbolTable, Term};

use super::{derived_fact, Number};
use crate::builtin::Builtin;

/// `test(X, Y)`: succeeds with the call itself when the comparison holds.
#[derive(Debug, Clone)]
pub struct Comparison {
    name: &'static str,
    symbol: SymbolId,
    holds: fn(f64, f64) -> bool,
}

impl Comparison {
    pub fn greater_than(symbols: &SymbolTable) -> Self {
        Self {
            name: "greaterThan",
            symbol: symbols.intern("greaterThan"),
            holds: |a, b| a > b,
        }
    }

    pub fn less_than(symbols: &SymbolTable) -> Self {
        Self {
            name: "lessThan",
            symbol: symbols.intern("lessThan"),
            holds: |a, b| a < b,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Builtin for Comparison {
    fn symbol(&self) -> SymbolId {
        self.symbol
    }

    fn build_result(&self, call: &Term) -> Option<DefiniteClause> {
        let [x, y] = call.operands() else {
            return None;
        };
        let (a, b) = (Number::of(x)?, Number::of(y)?);
        (self.holds)(a.as_f64(), b.as_f64())
            .then(|| derived_fact(self.name, vec![x.clone(), y.clone()]))
    }
}
