//! OO jDREW CLI
//!
//! - `typequery`: serve lattice type queries (`lub`, `glb`, `subsumes`,
//!   `subsumesPlus`) one per line, emitting solver-ready requests
//! - `builtin`: evaluate built-in calls with the standard generic built-ins
//! - `check`: parse a POSL program

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use oodrew_bottomup::BuiltinRegistry;
use oodrew_posl::{parse_program, parse_query_string, SymbolTable};
use tracing_subscriber::EnvFilter;

mod serve;

use serve::{serve_queries, OutputFormat};

#[derive(Parser)]
#[command(name = "oodrew")]
#[command(
    author,
    version,
    about = "OO jDREW: POSL type queries and bottom-up built-ins"
)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose type queries, one per line, into lattice-solver requests.
    ///
    /// Invalid queries are reported and skipped; the exit status is non-zero
    /// if any query failed.
    Typequery {
        /// File of queries (reads stdin when omitted)
        input: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Stop at the first invalid query
        #[arg(long)]
        fail_fast: bool,
    },

    /// Evaluate each built-in call in a query, e.g. `add(?Z, 1, 2).`
    Builtin {
        /// POSL query text
        query: String,
    },

    /// Parse a POSL program (facts and rules) and report what it contains.
    Check {
        /// POSL program file
        input: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // Logs share the terminal with results, so keep them on stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Typequery {
            input,
            format,
            fail_fast,
        } => cmd_typequery(input.as_deref(), format, fail_fast),
        Commands::Builtin { query } => cmd_builtin(&query),
        Commands::Check { input } => cmd_check(&input),
    }
}

fn cmd_typequery(input: Option<&Path>, format: OutputFormat, fail_fast: bool) -> Result<()> {
    let stdout = io::stdout().lock();
    let stderr = io::stderr().lock();
    let summary = match input {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("failed to open `{}`", path.display()))?;
            serve_queries(BufReader::new(file), stdout, stderr, format, fail_fast)?
        }
        None => serve_queries(io::stdin().lock(), stdout, stderr, format, fail_fast)?,
    };

    tracing::info!(
        served = summary.served,
        failed = summary.failed,
        "type queries processed"
    );
    if summary.failed > 0 {
        bail!(
            "{} of {} queries were invalid",
            summary.failed,
            summary.served
        );
    }
    Ok(())
}

fn cmd_builtin(query: &str) -> Result<()> {
    let clause = parse_query_string(query).context("invalid query")?;
    let symbols = SymbolTable::new();
    let registry = BuiltinRegistry::with_standard_builtins(&symbols);

    for index in 0..clause.atoms.len() {
        let call = clause.render_atom(index).unwrap_or_default();
        match registry.call(&symbols, &clause, index)? {
            None => println!("{call}: {}", "not a built-in".yellow()),
            Some(facts) if facts.is_empty() => println!("{call}: {}", "fails".red()),
            Some(facts) => {
                for fact in facts {
                    println!("{call}: {}", fact.to_string().green());
                }
            }
        }
    }
    Ok(())
}

fn cmd_check(input: &Path) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read `{}`", input.display()))?;
    let clauses = parse_program(&text)
        .with_context(|| format!("failed to parse `{}`", input.display()))?;
    let facts = clauses.iter().filter(|c| c.is_fact()).count();
    println!(
        "{} {} clauses ({} facts, {} rules)",
        "ok:".green().bold(),
        clauses.len(),
        facts,
        clauses.len() - facts
    );
    Ok(())
}
