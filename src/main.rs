use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use regrep::{GrepError, SearchOptions};

/// regrep: search lines with a small backtracking regex engine.
/// Supports literals, `.`, `\d`, `\w`, `[...]`, anchors, `? * + {n}`,
/// groups with `|` alternation and backreferences `\1`..`\9`.
#[derive(Parser)]
#[command(
    name = "regrep",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("REGREP_BUILD_COMMIT"), ")"),
    about
)]
struct Cli {
    /// Pattern to search for.
    #[arg(
        short = 'E',
        long = "regexp",
        value_name = "PATTERN",
        required_unless_present = "completions",
        allow_hyphen_values = true
    )]
    pattern: Option<String>,

    /// Files to search. Reads standard input when none are given.
    paths: Vec<PathBuf>,

    /// Search directories recursively.
    #[arg(short, long)]
    recursive: bool,

    /// Prefix each line with its line number.
    #[arg(short = 'n', long)]
    line_number: bool,

    /// One JSON object per matching line.
    #[arg(long)]
    json: bool,

    /// With -r, only search files whose name or relative path matches. Repeatable.
    #[arg(short, long = "glob", value_name = "GLOB")]
    globs: Vec<String>,

    /// Give up on a line after this many matcher steps.
    #[arg(long, value_name = "N")]
    step_limit: Option<u64>,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with matches.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("REGREP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "regrep", &mut io::stdout());
        return;
    }

    let Some(pattern) = cli.pattern else {
        eprintln!("usage: regrep -E PATTERN [PATH]...");
        process::exit(2);
    };

    let options = SearchOptions {
        recursive: cli.recursive,
        line_numbers: cli.line_number,
        json: cli.json,
        globs: cli.globs,
        step_limit: cli.step_limit,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = regrep::run(&pattern, &cli.paths, &options, &mut io::stdin(), &mut out);
    let flushed = out.flush();

    let code = match result.and_then(|matched| {
        flushed.map_err(GrepError::Output)?;
        Ok(matched)
    }) {
        Ok(true) => 0,
        Ok(false) => 1,
        // Downstream closed the pipe (`regrep ... | head`); nothing to report.
        Err(GrepError::Output(e)) if e.kind() == io::ErrorKind::BrokenPipe => 0,
        Err(e) => {
            eprintln!("regrep: {e}");
            e.exit_code()
        }
    };
    process::exit(code);
}
