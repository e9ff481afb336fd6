//! Line-oriented type-query serving loop.
//!
//! Each input line is one query. A bad query is reported and the loop moves
//! on; nothing a client sends can stop the loop except `--fail-fast`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use oodrew_typequery::{parse_and_decompose, ClassRef, LubGlbQuery, SubsumesQuery, TypeQuery};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per query (errors included) on stdout.
    Json,
    /// Human-readable summaries; errors go to stderr.
    Text,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub served: usize,
    pub failed: usize,
}

#[derive(Serialize)]
struct JsonReply<'a> {
    line: usize,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a TypeQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Blank lines and `%` comments are not queries.
fn is_query_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('%')
}

pub fn serve_queries(
    input: impl BufRead,
    mut out: impl Write,
    mut err: impl Write,
    format: OutputFormat,
    fail_fast: bool,
) -> Result<ServeSummary> {
    let mut summary = ServeSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read query line {line_no}"))?;
        if !is_query_line(&line) {
            continue;
        }
        let query = line.trim();
        summary.served += 1;

        let result = parse_and_decompose(query);
        match &result {
            Ok(q) => tracing::debug!(line = line_no, predicate = %q.predicate(), "query decomposed"),
            Err(e) => tracing::info!(line = line_no, error = %e, "query rejected"),
        }

        match format {
            OutputFormat::Json => {
                let reply = JsonReply {
                    line: line_no,
                    query,
                    result: result.as_ref().ok(),
                    error: result.as_ref().err().map(ToString::to_string),
                };
                serde_json::to_writer(&mut out, &reply)?;
                writeln!(out)?;
            }
            OutputFormat::Text => match &result {
                Ok(q) => writeln!(out, "{query} => {}", describe(q))?,
                Err(e) => writeln!(err, "{} line {line_no}: {e}", "error:".red().bold())?,
            },
        }

        if result.is_err() {
            summary.failed += 1;
            if fail_fast {
                break;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

fn class_ref(c: &ClassRef) -> String {
    match c {
        ClassRef::Variable(name) => format!("?{name}"),
        ClassRef::Class(name) => name.clone(),
    }
}

fn describe_bounds(q: &LubGlbQuery) -> String {
    let result = q
        .result_var
        .as_ref()
        .map(|v| format!("?{v}"))
        .unwrap_or_else(|| "unused".to_string());
    format!("result: {result}, classes: [{}]", q.class_names.join(", "))
}

fn describe_subsumes(q: &SubsumesQuery) -> String {
    format!(
        "super: {}, sub: {}",
        class_ref(&q.super_type),
        class_ref(&q.sub_type)
    )
}

/// One-line summary of a decomposed query.
pub fn describe(q: &TypeQuery) -> String {
    let body = match q {
        TypeQuery::Lub(b) | TypeQuery::Glb(b) => describe_bounds(b),
        TypeQuery::Subsumes(s) | TypeQuery::SubsumesPlus(s) => describe_subsumes(s),
    };
    format!("{}({body})", q.predicate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve(input: &str, format: OutputFormat, fail_fast: bool) -> (ServeSummary, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary =
            serve_queries(input.as_bytes(), &mut out, &mut err, format, fail_fast).unwrap();
        (
            summary,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn bad_queries_do_not_stop_the_loop() {
        let input = "lub(?X, a, b).\nfrobnicate(a).\n\n% comment\nsubsumes(a, b).\n";
        let (summary, out, _) = serve(input, OutputFormat::Json, false);
        assert_eq!(summary, ServeSummary { served: 3, failed: 1 });

        let replies: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["line"], 1);
        assert_eq!(replies[0]["result"]["predicate"], "lub");
        assert_eq!(replies[0]["result"]["result_var"], "X");
        assert!(replies[1]["error"].as_str().unwrap().contains("frobnicate"));
        assert_eq!(replies[2]["line"], 5);
        assert_eq!(replies[2]["result"]["predicate"], "subsumes");
    }

    #[test]
    fn fail_fast_stops_at_first_error() {
        let input = "glb(a, b).\nsubsumes(?X, ?X).\nlub(a, b).\n";
        let (summary, out, _) = serve(input, OutputFormat::Json, true);
        assert_eq!(summary, ServeSummary { served: 2, failed: 1 });
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn text_format_splits_results_and_errors() {
        colored::control::set_override(false);
        let input = "subsumesPlus(?S, t).\nlub(a) :- b(c).\nglb(a, b).\n";
        let (summary, out, err) = serve(input, OutputFormat::Text, false);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                "subsumesPlus(?S, t). => subsumesPlus(super: ?S, sub: t)",
                "glb(a, b). => glb(result: unused, classes: [a, b])",
            ]
        );
        assert!(err.contains("line 2"));
        assert!(err.contains("rules cannot be used"));
    }
}
