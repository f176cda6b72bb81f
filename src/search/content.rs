use std::path::Path;

use crate::error::GrepError;
use crate::input;
use crate::regex::Regex;
use crate::types::{FileReport, LineMatch, Source};

/// Match `regex` against each line of `buf`. Lines are searched without
/// their terminating newline, so `$` anchors at the end of the line.
pub(crate) fn scan(regex: &Regex, source: Source, buf: &[u8]) -> Result<FileReport, GrepError> {
    let binary = input::is_binary(buf);
    let mut matches = Vec::new();

    for (i, line) in input::lines(buf).enumerate() {
        let line_number = i + 1;
        let found = regex.find(line).map_err(|source_err| GrepError::SearchLimit {
            path: source.to_string().into(),
            line: line_number,
            source: source_err,
        })?;
        let Some(span) = found else { continue };
        matches.push(LineMatch {
            line_number,
            line: line.to_vec(),
            span,
        });
        // Binary inputs are only ever summarized; one hit is enough.
        if binary {
            break;
        }
    }

    tracing::debug!(
        source = %source,
        binary,
        matches = matches.len(),
        "scanned"
    );
    Ok(FileReport {
        source,
        binary,
        matches,
    })
}

/// Read and scan one file.
pub(crate) fn scan_path(regex: &Regex, path: &Path) -> Result<FileReport, GrepError> {
    let contents = input::read_path(path)?;
    scan(regex, Source::Path(path.to_path_buf()), &contents)
}
