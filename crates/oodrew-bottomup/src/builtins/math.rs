use oodrew_posl::{DefiniteClause, SymbolId, SymbolTable, Term};

use super::{derived_fact, result_accepts, Number};
use crate::builtin::Builtin;

type BinaryOp = fn(Number, Number) -> Option<Number>;

/// `op(?Result, X, Y)` for a binary arithmetic operation.
///
/// Integer operands stay integers (overflow derives nothing); any real operand
/// makes the result real.
#[derive(Debug, Clone)]
pub struct Arithmetic {
    name: &'static str,
    symbol: SymbolId,
    op: BinaryOp,
}

impl Arithmetic {
    fn new(symbols: &SymbolTable, name: &'static str, op: BinaryOp) -> Self {
        Self {
            name,
            symbol: symbols.intern(name),
            op,
        }
    }

    pub fn add(symbols: &SymbolTable) -> Self {
        Self::new(symbols, "add", |a, b| match (a, b) {
            (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int),
            _ => Some(Number::Real(a.as_f64() + b.as_f64())),
        })
    }

    pub fn subtract(symbols: &SymbolTable) -> Self {
        Self::new(symbols, "subtract", |a, b| match (a, b) {
            (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map(Number::Int),
            _ => Some(Number::Real(a.as_f64() - b.as_f64())),
        })
    }

    pub fn multiply(symbols: &SymbolTable) -> Self {
        Self::new(symbols, "multiply", |a, b| match (a, b) {
            (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map(Number::Int),
            _ => Some(Number::Real(a.as_f64() * b.as_f64())),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Builtin for Arithmetic {
    fn symbol(&self) -> SymbolId {
        self.symbol
    }

    fn build_result(&self, call: &Term) -> Option<DefiniteClause> {
        let [result, x, y] = call.operands() else {
            return None;
        };
        let value = (self.op)(Number::of(x)?, Number::of(y)?)?;
        if let Number::Real(r) = value {
            if !r.is_finite() {
                return None;
            }
        }
        let computed = value.to_term();
        if !result_accepts(result, &computed) {
            return None;
        }
        Some(derived_fact(self.name, vec![computed, x.clone(), y.clone()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oodrew_posl::parse_query_string;

    fn run(b: &Arithmetic, text: &str) -> Option<String> {
        let dc = parse_query_string(text).unwrap();
        b.build_result(&dc.atoms[0]).map(|fact| fact.to_string())
    }

    #[test]
    fn integer_arithmetic() {
        let symbols = SymbolTable::new();
        assert_eq!(
            run(&Arithmetic::add(&symbols), "add(?Z, 1, 2)").as_deref(),
            Some("add(3:Integer, 1, 2).")
        );
        assert_eq!(
            run(&Arithmetic::subtract(&symbols), "subtract(?Z, 1, 2)").as_deref(),
            Some("subtract(-1:Integer, 1, 2).")
        );
        assert_eq!(
            run(&Arithmetic::multiply(&symbols), "multiply(?Z, 4, 5:Integer)").as_deref(),
            Some("multiply(20:Integer, 4, 5:Integer).")
        );
    }

    #[test]
    fn real_operand_makes_real_result() {
        let symbols = SymbolTable::new();
        assert_eq!(
            run(&Arithmetic::add(&symbols), "add(?Z, 1.5, 2)").as_deref(),
            Some("add(3.5:Real, 1.5, 2).")
        );
    }

    #[test]
    fn fails_without_numbers_or_on_overflow() {
        let symbols = SymbolTable::new();
        let add = Arithmetic::add(&symbols);
        assert_eq!(run(&add, "add(?Z, ?X, 2)"), None);
        assert_eq!(run(&add, "add(?Z, car, 2)"), None);
        assert_eq!(run(&add, "add(?Z, 1)"), None);
        assert_eq!(run(&add, "add(?Z, 9223372036854775807, 1)"), None);
    }

    #[test]
    fn bound_result_must_agree() {
        let symbols = SymbolTable::new();
        let add = Arithmetic::add(&symbols);
        assert!(run(&add, "add(3, 1, 2)").is_some());
        assert_eq!(run(&add, "add(4, 1, 2)"), None);
    }
}
