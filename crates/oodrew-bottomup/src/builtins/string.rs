use oodrew_posl::{DefiniteClause, SymbolId, SymbolTable, Term};

use super::{derived_fact, result_accepts, string_of, TYPE_INTEGER};
use crate::builtin::Builtin;

const TYPE_STRING: &str = "String";

/// `stringConcatenate(?Result, S1, S2, ...)`.
#[derive(Debug, Clone)]
pub struct StringConcatenate {
    symbol: SymbolId,
}

impl StringConcatenate {
    pub const NAME: &'static str = "stringConcatenate";

    pub fn new(symbols: &SymbolTable) -> Self {
        Self {
            symbol: symbols.intern(Self::NAME),
        }
    }
}

impl Builtin for StringConcatenate {
    fn symbol(&self) -> SymbolId {
        self.symbol
    }

    fn build_result(&self, call: &Term) -> Option<DefiniteClause> {
        let (result, parts) = call.operands().split_first()?;
        if parts.is_empty() {
            return None;
        }
        let joined = parts
            .iter()
            .map(string_of)
            .collect::<Option<Vec<&str>>>()?
            .concat();
        let computed = Term::typed_constant(joined, TYPE_STRING);
        if !result_accepts(result, &computed) {
            return None;
        }
        let mut operands = Vec::with_capacity(parts.len() + 1);
        operands.push(computed);
        operands.extend(parts.iter().cloned());
        Some(derived_fact(Self::NAME, operands))
    }
}

/// `stringLength(?Length, S)`, counting characters.
#[derive(Debug, Clone)]
pub struct StringLength {
    symbol: SymbolId,
}

impl StringLength {
    pub const NAME: &'static str = "stringLength";

    pub fn new(symbols: &SymbolTable) -> Self {
        Self {
            symbol: symbols.intern(Self::NAME),
        }
    }
}

impl Builtin for StringLength {
    fn symbol(&self) -> SymbolId {
        self.symbol
    }

    fn build_result(&self, call: &Term) -> Option<DefiniteClause> {
        let [result, s] = call.operands() else {
            return None;
        };
        let len = string_of(s)?.chars().count();
        let computed = Term::typed_constant(len.to_string(), TYPE_INTEGER);
        if !result_accepts(result, &computed) {
            return None;
        }
        Some(derived_fact(Self::NAME, vec![computed, s.clone()]))
    }
}
