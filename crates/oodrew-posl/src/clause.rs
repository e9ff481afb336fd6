use std::fmt;

use serde::{Deserialize, Serialize};

use crate::term::Term;

/// A definite clause: `head :- body1, body2.` or a fact `head.`
///
/// Queries parsed with [`crate::parse_query_string`] reuse this shape and keep
/// every atom in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefiniteClause {
    pub atoms: Vec<Term>,
    pub variable_names: Vec<String>,
}

impl DefiniteClause {
    pub fn new(atoms: Vec<Term>, variable_names: Vec<String>) -> Self {
        Self {
            atoms,
            variable_names,
        }
    }

    pub fn fact(atom: Term, variable_names: Vec<String>) -> Self {
        Self::new(vec![atom], variable_names)
    }

    pub fn is_fact(&self) -> bool {
        self.atoms.len() == 1
    }

    pub fn head(&self) -> Option<&Term> {
        self.atoms.first()
    }

    pub fn body(&self) -> &[Term] {
        self.atoms.get(1..).unwrap_or(&[])
    }

    /// Render a single atom of this clause with the clause's variable table.
    pub fn render_atom(&self, index: usize) -> Option<String> {
        self.atoms
            .get(index)
            .map(|atom| atom.render(&self.variable_names, true))
    }
}

impl fmt::Display for DefiniteClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(head) = self.head() else {
            return write!(f, ".");
        };
        write!(f, "{}", head.render(&self.variable_names, true))?;
        for (i, atom) in self.body().iter().enumerate() {
            let sep = if i == 0 { " :- " } else { ", " };
            write!(f, "{sep}{}", atom.render(&self.variable_names, true))?;
        }
        write!(f, ".")
    }
}
