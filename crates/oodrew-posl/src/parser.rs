//! POSL query and clause parser.
//!
//! Supported surface:
//!
//! ```text
//! fact     := atom "."
//! rule     := atom ":-" atom ("," atom)* "."
//! query    := [atom ":-"] atom ("," atom)* ["."]
//! atom     := ident [ "(" [term "^"] [term ("," term)*] ")" ]
//! term     := "?" [ident] [":" ident]            variable / anonymous
//!           | "_"                                anonymous
//!           | number [":" ident] | string [":" ident]
//!           | ident "(" term ("," term)* ")"     nested expression
//!           | ident [":" ident]                  individual
//! ```
//!
//! `%` starts a comment that runs to the end of the line.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char as pchar, digit1, multispace1, not_line_ending},
    combinator::{cut, not, opt, recognize, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::clause::DefiniteClause;
use crate::term::Term;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoslParseError {
    #[error("parse error on line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("empty input: expected at least one atom")]
    Empty,
}

// ============================================================================
// Raw syntax (variables still carry their names)
// ============================================================================

#[derive(Debug, Clone)]
enum RawTerm {
    Var(String, Option<String>),
    Anon,
    Const(String, Option<String>),
    Expr(String, Vec<RawTerm>),
}

#[derive(Debug, Clone)]
struct RawAtom {
    predicate: String,
    oid: Option<RawTerm>,
    args: Vec<RawTerm>,
}

/// Variable names of one clause, in first-occurrence order.
#[derive(Default)]
struct VarTable {
    names: Vec<String>,
}

impl VarTable {
    fn index_of(&mut self, name: &str) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        }
    }

    fn lower_term(&mut self, raw: RawTerm) -> Term {
        match raw {
            RawTerm::Var(name, ty) => Term::Var {
                index: self.index_of(&name),
                ty,
            },
            RawTerm::Anon => Term::Anon,
            RawTerm::Const(name, ty) => Term::Const { name, ty },
            RawTerm::Expr(functor, args) => Term::Expr {
                functor,
                args: args.into_iter().map(|a| self.lower_term(a)).collect(),
            },
        }
    }

    fn lower_atom(&mut self, raw: RawAtom) -> Term {
        let mut args = Vec::with_capacity(raw.args.len() + 1);
        args.push(match raw.oid {
            Some(oid) => self.lower_term(oid),
            None => Term::Anon,
        });
        for arg in raw.args {
            args.push(self.lower_term(arg));
        }
        Term::Atom {
            predicate: raw.predicate,
            args,
        }
    }

    fn into_clause(mut self, raw_atoms: Vec<RawAtom>) -> DefiniteClause {
        let atoms = raw_atoms.into_iter().map(|a| self.lower_atom(a)).collect();
        DefiniteClause::new(atoms, self.names)
    }
}

// ============================================================================
// Lexical parsers
// ============================================================================

/// Whitespace and `%` line comments.
fn sp(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            recognize(pair(pchar('%'), not_line_ending)),
        ))),
    )(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_ident_start),
        take_while(is_ident_continue),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(pchar('-')),
        digit1,
        opt(pair(pchar('.'), digit1)),
    )))(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    let (rest, _) = pchar('"')(input)?;
    let mut out = String::new();
    let mut chars = rest.char_indices();
    loop {
        match chars.next() {
            Some((i, '"')) => return Ok((&rest[i + 1..], out)),
            Some((_, '\\')) => match chars.next() {
                Some((_, c)) => out.push(c),
                None => break,
            },
            Some((_, c)) => out.push(c),
            None => break,
        }
    }
    Err(nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// `:Type` after a leaf term. A `:-` is the rule arrow, never a type.
fn type_suffix(input: &str) -> IResult<&str, Option<String>> {
    let (input, ty) = opt(preceded(
        tuple((sp, pchar(':'), not(pchar('-')), sp)),
        ident,
    ))(input)?;
    Ok((input, ty.map(str::to_string)))
}

fn comma(input: &str) -> IResult<&str, char> {
    preceded(sp, pchar(','))(input)
}

// ============================================================================
// Terms and atoms
// ============================================================================

fn variable(input: &str) -> IResult<&str, RawTerm> {
    let (input, name) = preceded(pchar('?'), opt(ident))(input)?;
    match name {
        Some(name) => {
            let (input, ty) = type_suffix(input)?;
            Ok((input, RawTerm::Var(name.to_string(), ty)))
        }
        None => Ok((input, RawTerm::Anon)),
    }
}

fn number_const(input: &str) -> IResult<&str, RawTerm> {
    let (input, n) = number(input)?;
    let (input, ty) = type_suffix(input)?;
    Ok((input, RawTerm::Const(n.to_string(), ty)))
}

fn string_const(input: &str) -> IResult<&str, RawTerm> {
    let (input, s) = quoted(input)?;
    let (input, ty) = type_suffix(input)?;
    Ok((input, RawTerm::Const(s, ty)))
}

fn term_list(input: &str) -> IResult<&str, Vec<RawTerm>> {
    separated_list0(comma, term)(input)
}

fn close_paren(input: &str) -> IResult<&str, char> {
    preceded(sp, pchar(')'))(input)
}

fn ident_term(input: &str) -> IResult<&str, RawTerm> {
    let (input, name) = ident(input)?;
    if name == "_" {
        return Ok((input, RawTerm::Anon));
    }
    let (input, args) = opt(preceded(
        pair(sp, pchar('(')),
        cut(terminated(term_list, close_paren)),
    ))(input)?;
    match args {
        Some(args) => Ok((input, RawTerm::Expr(name.to_string(), args))),
        None => {
            let (input, ty) = type_suffix(input)?;
            Ok((input, RawTerm::Const(name.to_string(), ty)))
        }
    }
}

fn term(input: &str) -> IResult<&str, RawTerm> {
    preceded(sp, alt((variable, string_const, number_const, ident_term)))(input)
}

fn atom_args(input: &str) -> IResult<&str, (Option<RawTerm>, Vec<RawTerm>)> {
    let (input, oid) = opt(terminated(term, preceded(sp, pchar('^'))))(input)?;
    let (input, args) = term_list(input)?;
    Ok((input, (oid, args)))
}

fn atom(input: &str) -> IResult<&str, RawAtom> {
    let (input, _) = sp(input)?;
    let (input, predicate) = ident(input)?;
    let (input, body) = opt(preceded(
        pair(sp, pchar('(')),
        cut(terminated(atom_args, close_paren)),
    ))(input)?;
    let (oid, args) = body.unwrap_or((None, Vec::new()));
    Ok((
        input,
        RawAtom {
            predicate: predicate.to_string(),
            oid,
            args,
        },
    ))
}

fn atom_list(input: &str) -> IResult<&str, Vec<RawAtom>> {
    separated_list1(comma, atom)(input)
}

fn rule_arrow(input: &str) -> IResult<&str, &str> {
    preceded(sp, tag(":-"))(input)
}

fn period(input: &str) -> IResult<&str, char> {
    preceded(sp, pchar('.'))(input)
}

fn query(input: &str) -> IResult<&str, Vec<RawAtom>> {
    let (input, head) = opt(terminated(atom, rule_arrow))(input)?;
    let (input, body) = atom_list(input)?;
    let (input, _) = opt(period)(input)?;
    let (input, _) = sp(input)?;
    let mut atoms = Vec::with_capacity(body.len() + 1);
    atoms.extend(head);
    atoms.extend(body);
    Ok((input, atoms))
}

fn clause(input: &str) -> IResult<&str, Vec<RawAtom>> {
    let (input, head) = atom(input)?;
    let (input, body) = opt(preceded(rule_arrow, atom_list))(input)?;
    let (input, _) = period(input)?;
    let mut atoms = vec![head];
    atoms.extend(body.unwrap_or_default());
    Ok((input, atoms))
}

// ============================================================================
// Entry points
// ============================================================================

fn syntax_error(text: &str, rest: &str, message: impl Into<String>) -> PoslParseError {
    let offset = text.len().saturating_sub(rest.len());
    let consumed = &text[..offset];
    let line = consumed.matches('\n').count() + 1;
    let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = consumed[line_start..].chars().count() + 1;
    PoslParseError::Syntax {
        line,
        column,
        message: message.into(),
    }
}

fn run<'a, T>(
    text: &'a str,
    parser: impl FnOnce(&'a str) -> IResult<&'a str, T>,
    expected: &str,
) -> Result<T, PoslParseError> {
    match parser(text) {
        Ok(("", value)) => Ok(value),
        Ok((rest, _)) => Err(syntax_error(
            text,
            rest,
            format!("unexpected input; expected {expected}"),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(syntax_error(text, e.input, format!("expected {expected}")))
        }
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(text, "", "incomplete input")),
    }
}

fn is_blank(text: &str) -> bool {
    matches!(sp(text), Ok(("", _)))
}

/// Parse a query such as `lub(?X, a, b).`
///
/// Every atom is kept, including the head of a rule, so callers can reject
/// anything that is not a single atom. The trailing period is optional.
pub fn parse_query_string(text: &str) -> Result<DefiniteClause, PoslParseError> {
    if is_blank(text) {
        return Err(PoslParseError::Empty);
    }
    let atoms = run(text, query, "a query: `pred(args).`")?;
    Ok(VarTable::default().into_clause(atoms))
}

/// Parse a single fact or rule. The trailing period is required.
pub fn parse_clause(text: &str) -> Result<DefiniteClause, PoslParseError> {
    if is_blank(text) {
        return Err(PoslParseError::Empty);
    }
    let atoms = run(
        text,
        |input| terminated(clause, sp)(input),
        "a clause: `head.` or `head :- body.`",
    )?;
    Ok(VarTable::default().into_clause(atoms))
}

/// Parse a sequence of facts and rules. Variable scopes are per clause.
pub fn parse_program(text: &str) -> Result<Vec<DefiniteClause>, PoslParseError> {
    let clauses = run(
        text,
        |input| terminated(many0(clause), sp)(input),
        "a clause: `head.` or `head :- body.`",
    )?;
    let clauses: Vec<DefiniteClause> = clauses
        .into_iter()
        .map(|atoms| VarTable::default().into_clause(atoms))
        .collect();
    tracing::debug!(clauses = clauses.len(), "parsed POSL program");
    Ok(clauses)
}
