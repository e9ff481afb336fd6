//! POSL terms.
//!
//! Terms are plain immutable values. Variables do not carry their names; they
//! point into the owning clause's `variable_names` table, so anything that
//! wants text (rendering, operand classification) takes that table as input.

use serde::{Deserialize, Serialize};

/// Marker written in front of a variable name (`?X`).
pub const VAR_MARKER: char = '?';

/// A POSL term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// A named free variable: `?X` or `?X:Person`.
    Var {
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<String>,
    },
    /// The anonymous variable: `?` or `_`.
    Anon,
    /// An individual, number, or string: `a`, `5:Integer`, `"two words"`.
    Const {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<String>,
    },
    /// A nested function term: `f(a, ?X)`.
    Expr { functor: String, args: Vec<Term> },
    /// A predicate call. `args[0]` is the object identifier slot.
    Atom { predicate: String, args: Vec<Term> },
}

/// Structured view of a term used as an operand.
///
/// This is what callers should match on instead of inspecting rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Anonymous,
    Variable(String),
    Literal(String),
}

impl Term {
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Const {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed_constant(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Term::Const {
            name: name.into(),
            ty: Some(ty.into()),
        }
    }

    pub fn var(index: usize) -> Self {
        Term::Var { index, ty: None }
    }

    /// Build an atom with an anonymous oid slot in front of `operands`.
    pub fn atom(predicate: impl Into<String>, operands: Vec<Term>) -> Self {
        let mut args = Vec::with_capacity(operands.len() + 1);
        args.push(Term::Anon);
        args.extend(operands);
        Term::Atom {
            predicate: predicate.into(),
            args,
        }
    }

    /// Functor, predicate, or constant name. `None` for variables.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Term::Const { name, .. } => Some(name.as_str()),
            Term::Expr { functor, .. } => Some(functor.as_str()),
            Term::Atom { predicate, .. } => Some(predicate.as_str()),
            Term::Var { .. } | Term::Anon => None,
        }
    }

    /// Arguments of an atom or expression. For atoms this includes the oid
    /// slot at index 0.
    pub fn sub_terms(&self) -> &[Term] {
        match self {
            Term::Expr { args, .. } | Term::Atom { args, .. } => args.as_slice(),
            _ => &[],
        }
    }

    /// Positional operands of an atom (the sub-terms after the oid slot).
    pub fn operands(&self) -> &[Term] {
        match self {
            Term::Atom { args, .. } => args.get(1..).unwrap_or(&[]),
            Term::Expr { args, .. } => args.as_slice(),
            _ => &[],
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var { .. } | Term::Anon => false,
            Term::Const { .. } => true,
            Term::Expr { args, .. } | Term::Atom { args, .. } => {
                args.iter().all(Term::is_ground)
            }
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            Term::Var { ty, .. } | Term::Const { ty, .. } => ty.as_deref(),
            _ => None,
        }
    }

    /// Classify this term as an operand, resolving variable names.
    pub fn operand(&self, variable_names: &[String]) -> Operand {
        match self {
            Term::Anon => Operand::Anonymous,
            Term::Var { index, .. } => match variable_names.get(*index) {
                Some(name) => Operand::Variable(name.clone()),
                None => Operand::Anonymous,
            },
            other => Operand::Literal(other.render(variable_names, false)),
        }
    }

    /// Render this term as POSL text.
    ///
    /// `include_marker` controls whether variables are written `?X` or `X`,
    /// and the anonymous variable `?` or `_`.
    pub fn render(&self, variable_names: &[String], include_marker: bool) -> String {
        let mut out = String::new();
        self.render_into(&mut out, variable_names, include_marker);
        out
    }

    fn render_into(&self, out: &mut String, variable_names: &[String], include_marker: bool) {
        match self {
            Term::Var { index, ty } => {
                if include_marker {
                    out.push(VAR_MARKER);
                }
                match variable_names.get(*index) {
                    Some(name) => out.push_str(name),
                    None => {
                        out.push('_');
                        out.push_str(&index.to_string());
                    }
                }
                push_type(out, ty.as_deref());
            }
            Term::Anon if include_marker => out.push(VAR_MARKER),
            Term::Anon => out.push('_'),
            Term::Const { name, ty } => {
                if is_plain_constant(name) {
                    out.push_str(name);
                } else {
                    push_quoted(out, name);
                }
                push_type(out, ty.as_deref());
            }
            Term::Expr { functor, args } => {
                out.push_str(functor);
                out.push('(');
                render_args(out, args, variable_names, include_marker);
                out.push(')');
            }
            Term::Atom { predicate, args } => {
                out.push_str(predicate);
                out.push('(');
                let (oid, rest) = match args.split_first() {
                    Some((oid, rest)) => (Some(oid), rest),
                    None => (None, &[][..]),
                };
                if let Some(oid) = oid.filter(|t| !matches!(t, Term::Anon)) {
                    oid.render_into(out, variable_names, include_marker);
                    out.push('^');
                }
                render_args(out, rest, variable_names, include_marker);
                out.push(')');
            }
        }
    }
}

fn render_args(out: &mut String, args: &[Term], variable_names: &[String], include_marker: bool) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        arg.render_into(out, variable_names, include_marker);
    }
}

fn push_type(out: &mut String, ty: Option<&str>) {
    if let Some(ty) = ty {
        out.push(':');
        out.push_str(ty);
    }
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Identifiers and numbers can be written bare; anything else is quoted.
pub(crate) fn is_plain_constant(name: &str) -> bool {
    is_identifier(name) || is_number(name)
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    // A lone `_` is the anonymous variable, not a constant.
    s != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub(crate) fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    !int.is_empty()
        && int.chars().all(|c| c.is_ascii_digit())
        && frac.map_or(true, |f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}
