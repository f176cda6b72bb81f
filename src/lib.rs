#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::similar_names,             // common in matcher code
    clippy::too_many_lines,            // one long test module
    clippy::missing_errors_doc,        // error enums document themselves
    clippy::missing_panics_doc,        // same
)]

pub mod error;
pub(crate) mod format;
pub(crate) mod input;
pub mod regex;
pub(crate) mod search;
pub(crate) mod types;

use std::io::{Read, Write};
use std::path::PathBuf;

use rayon::prelude::*;

pub use error::{GrepError, MatchError, PatternError};
pub use regex::{Regex, RegexBuilder, RepeatCapture, is_match};
pub use types::SearchOptions;

use types::{FileReport, Source};

/// Stack for each matcher thread. Only touched pages are committed, so the
/// size is a ceiling rather than an allocation.
const MATCHER_STACK_SIZE: usize = 512 * 1024 * 1024;

/// Open repetitions allowed on a matcher thread; sized to stay well inside
/// `MATCHER_STACK_SIZE` even in an unoptimized build.
const MATCHER_DEPTH_LIMIT: usize = 60_000;

/// Files matched per parallel batch. Each batch is printed before the next
/// starts, so output streams and only one batch of reports is held at once.
const BATCH_SIZE: usize = 64;

/// The single public entry point for the CLI. Search `paths` (or `stdin` when
/// there are none) for `pattern` and write matching lines to `out`.
///
/// Returns whether any line matched. On an error, output for the inputs
/// before the failing one has already been written.
pub fn run(
    pattern: &str,
    paths: &[PathBuf],
    options: &SearchOptions,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<bool, GrepError> {
    let regex = RegexBuilder::new(pattern)
        .step_limit(options.step_limit)
        .depth_limit(Some(MATCHER_DEPTH_LIMIT))
        .build()
        .map_err(|source| GrepError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

    let pool = rayon::ThreadPoolBuilder::new()
        .stack_size(MATCHER_STACK_SIZE)
        .thread_name(|i| format!("regrep-match-{i}"))
        .build()?;

    if paths.is_empty() {
        let buf = input::read_stdin(stdin)?;
        let report = pool.install(|| search::content::scan(&regex, Source::Stdin, &buf))?;
        return format::write_report(&report, false, options, out);
    }

    let files = search::collect_files(paths, options)?;
    let labelled = files.len() > 1 || options.recursive;
    tracing::debug!(files = files.len(), labelled, "searching");

    let mut matched = false;
    for batch in files.chunks(BATCH_SIZE) {
        // Match in parallel, print in input order.
        let reports: Vec<Result<FileReport, GrepError>> = pool.install(|| {
            batch
                .par_iter()
                .map(|path| search::content::scan_path(&regex, path))
                .collect()
        });
        for report in reports {
            let report = report.inspect_err(|e| tracing::warn!(error = %e, "search stopped"))?;
            matched |= format::write_report(&report, labelled, options, out)?;
        }
    }
    Ok(matched)
}
