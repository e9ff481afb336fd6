//! Parsing and decomposition of type queries.
//!
//! A query atom's sub-terms start with the oid slot, so the operands the user
//! wrote live at sub-term index 1 and onward:
//!
//! ```text
//! subsumes(a, b)     -> [oid, a, b]          super = 1, sub = 2
//! lub(?X, a, b)      -> [oid, ?X, a, b]      result = 1, classes = 2..
//! glb(a, b)          -> [oid, a, b]          classes = 1..
//! ```

use std::str::FromStr;

use oodrew_posl::{parse_query_string, DefiniteClause, Operand, Term};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeQueryError};
use crate::predicate::TypePredicate;

/// Sub-term index of the first operand (index 0 is the oid slot).
const FIRST_OPERAND: usize = 1;

/// A validated type query, not yet decomposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub predicate: TypePredicate,
    /// All sub-terms of the query atom, oid slot included.
    pub operands: Vec<Term>,
    pub variable_names: Vec<String>,
}

/// A class operand: either a free variable to bind or a literal class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ClassRef {
    Variable(String),
    Class(String),
}

impl ClassRef {
    pub fn name(&self) -> &str {
        match self {
            ClassRef::Variable(name) | ClassRef::Class(name) => name,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, ClassRef::Variable(_))
    }
}

/// Structured form of `subsumes(Super, Sub)` and `subsumesPlus(Super, Sub)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsumesQuery {
    pub super_type: ClassRef,
    pub sub_type: ClassRef,
}

impl SubsumesQuery {
    pub fn super_name(&self) -> &str {
        self.super_type.name()
    }

    pub fn sub_name(&self) -> &str {
        self.sub_type.name()
    }

    pub fn super_is_var(&self) -> bool {
        self.super_type.is_variable()
    }

    pub fn sub_is_var(&self) -> bool {
        self.sub_type.is_variable()
    }
}

/// Structured form of `lub(...)` and `glb(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LubGlbQuery {
    /// Variable that receives the computed bound, if the query names one.
    pub result_var: Option<String>,
    /// Classes to combine, in query order, rendered without variable markers.
    pub class_names: Vec<String>,
}

impl LubGlbQuery {
    pub fn result_var_used(&self) -> bool {
        self.result_var.is_some()
    }
}

/// A fully decomposed request for the lattice solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "predicate", rename_all = "camelCase")]
pub enum TypeQuery {
    Lub(LubGlbQuery),
    Glb(LubGlbQuery),
    Subsumes(SubsumesQuery),
    SubsumesPlus(SubsumesQuery),
}

impl TypeQuery {
    pub fn predicate(&self) -> TypePredicate {
        match self {
            TypeQuery::Lub(_) => TypePredicate::Lub,
            TypeQuery::Glb(_) => TypePredicate::Glb,
            TypeQuery::Subsumes(_) => TypePredicate::Subsumes,
            TypeQuery::SubsumesPlus(_) => TypePredicate::SubsumesPlus,
        }
    }
}

impl FromStr for TypeQuery {
    type Err = TypeQueryError;

    fn from_str(s: &str) -> Result<Self> {
        parse_and_decompose(s)
    }
}

/// Parse one query line and check that it calls a lattice predicate.
pub fn parse_type_query(text: &str) -> Result<ParsedQuery> {
    let clause = parse_query_string(text)?;
    ParsedQuery::from_clause(clause)
}

/// Parse one query line and decompose it according to its predicate.
pub fn parse_and_decompose(text: &str) -> Result<TypeQuery> {
    parse_type_query(text)?.decompose()
}

impl ParsedQuery {
    /// Validate a clause produced by the term parser.
    pub fn from_clause(clause: DefiniteClause) -> Result<Self> {
        let DefiniteClause {
            mut atoms,
            variable_names,
        } = clause;
        if atoms.len() != 1 {
            return Err(TypeQueryError::MalformedQuery { atoms: atoms.len() });
        }
        let Some(atom) = atoms.pop() else {
            return Err(TypeQueryError::MalformedQuery { atoms: 0 });
        };

        let (symbol, operands) = match atom {
            Term::Atom { predicate, args } => (predicate, args),
            other => {
                return Err(TypeQueryError::UnsupportedPredicate {
                    symbol: other.render(&variable_names, true),
                })
            }
        };
        let predicate = TypePredicate::from_symbol(&symbol)
            .ok_or(TypeQueryError::UnsupportedPredicate { symbol })?;

        tracing::debug!(
            %predicate,
            operands = operands.len().saturating_sub(FIRST_OPERAND),
            "parsed type query"
        );
        Ok(Self {
            predicate,
            operands,
            variable_names,
        })
    }

    /// Number of operands the user wrote (the oid slot is not counted).
    pub fn arity(&self) -> usize {
        self.operands.len().saturating_sub(FIRST_OPERAND)
    }

    pub fn decompose(&self) -> Result<TypeQuery> {
        Ok(match self.predicate {
            TypePredicate::Lub => TypeQuery::Lub(self.decompose_lub_glb()?),
            TypePredicate::Glb => TypeQuery::Glb(self.decompose_lub_glb()?),
            TypePredicate::Subsumes => TypeQuery::Subsumes(self.decompose_subsumes()?),
            TypePredicate::SubsumesPlus => TypeQuery::SubsumesPlus(self.decompose_subsumes()?),
        })
    }

    /// Decompose `subsumes(Super, Sub)` / `subsumesPlus(Super, Sub)`.
    pub fn decompose_subsumes(&self) -> Result<SubsumesQuery> {
        if !self.predicate.is_subsumes_family() {
            return Err(TypeQueryError::PredicateMismatch {
                expected: "subsumes or subsumesPlus",
                found: self.predicate,
            });
        }
        let [_oid, super_term, sub_term] = self.operands.as_slice() else {
            return Err(TypeQueryError::ArityMismatch {
                predicate: self.predicate,
                expected: "2",
                found: self.arity(),
            });
        };

        let super_type = self.class_ref(super_term)?;
        let sub_type = self.class_ref(sub_term)?;
        if let (ClassRef::Variable(sup), ClassRef::Variable(sub)) = (&super_type, &sub_type) {
            if sup.eq_ignore_ascii_case(sub) {
                return Err(TypeQueryError::DuplicateVariableName { name: sup.clone() });
            }
        }

        Ok(SubsumesQuery {
            super_type,
            sub_type,
        })
    }

    /// Decompose `lub(Result?, C1, C2, ...)` / `glb(...)`.
    ///
    /// A named variable in the first operand position receives the result
    /// and is excluded from the class list; an anonymous one is skipped
    /// without binding anything. Otherwise every operand is a class.
    /// Anonymous operands in the class list are dropped.
    pub fn decompose_lub_glb(&self) -> Result<LubGlbQuery> {
        if !self.predicate.is_bound_family() {
            return Err(TypeQueryError::PredicateMismatch {
                expected: "lub or glb",
                found: self.predicate,
            });
        }
        let Some(designator) = self.operands.get(FIRST_OPERAND) else {
            return Err(TypeQueryError::ArityMismatch {
                predicate: self.predicate,
                expected: "at least 1",
                found: self.arity(),
            });
        };

        let (result_var, first_class) = match designator.operand(&self.variable_names) {
            Operand::Variable(name) => (Some(name), FIRST_OPERAND + 1),
            Operand::Anonymous => (None, FIRST_OPERAND + 1),
            Operand::Literal(_) => (None, FIRST_OPERAND),
        };
        // A wildcard names no class.
        let class_names = self.operands[first_class..]
            .iter()
            .filter(|t| !matches!(t, Term::Anon))
            .map(|t| t.render(&self.variable_names, false))
            .collect();

        Ok(LubGlbQuery {
            result_var,
            class_names,
        })
    }

    fn class_ref(&self, term: &Term) -> Result<ClassRef> {
        match term.operand(&self.variable_names) {
            Operand::Anonymous => Err(TypeQueryError::AnonymousOperandNotAllowed {
                predicate: self.predicate,
            }),
            Operand::Variable(name) => Ok(ClassRef::Variable(name)),
            Operand::Literal(text) => Ok(ClassRef::Class(text)),
        }
    }
}
