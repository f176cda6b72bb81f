use std::io::Write;

use serde::Serialize;

use crate::error::GrepError;
use crate::types::{FileReport, LineMatch, SearchOptions};

/// One `--json` output record.
#[derive(Debug, Serialize)]
struct JsonMatch<'a> {
    /// `null` for standard input.
    path: Option<String>,
    line_number: usize,
    /// Lossy UTF-8; the raw bytes are printed as-is in text mode.
    text: String,
    #[serde(rename = "match")]
    span: JsonSpan<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSpan<'a> {
    start: usize,
    end: usize,
    text: std::borrow::Cow<'a, str>,
}

impl<'a> JsonMatch<'a> {
    fn new(report: &FileReport, m: &'a LineMatch) -> Self {
        let span = JsonSpan {
            start: m.span.start,
            end: m.span.end,
            text: String::from_utf8_lossy(&m.line[m.span.clone()]),
        };
        Self {
            path: report.source.path().map(|p| p.display().to_string()),
            line_number: m.line_number,
            text: String::from_utf8_lossy(&m.line).into_owned(),
            span,
        }
    }
}

/// Write one input's matches. `labelled` prefixes each line with its source.
/// Returns whether anything matched.
///
/// Text: `[path:][n:]line`, or `Binary file PATH matches` for binary input.
/// JSON: one object per matching line. Binary reports carry at most one.
pub(crate) fn write_report(
    report: &FileReport,
    labelled: bool,
    options: &SearchOptions,
    out: &mut dyn Write,
) -> Result<bool, GrepError> {
    if report.matches.is_empty() {
        return Ok(false);
    }

    if options.json {
        for m in &report.matches {
            serde_json::to_writer(&mut *out, &JsonMatch::new(report, m))
                .map_err(|e| GrepError::Output(e.into()))?;
            out.write_all(b"\n").map_err(GrepError::Output)?;
        }
        return Ok(true);
    }

    if report.binary {
        writeln!(out, "Binary file {} matches", report.source).map_err(GrepError::Output)?;
        return Ok(true);
    }

    for m in &report.matches {
        if labelled {
            write!(out, "{}:", report.source).map_err(GrepError::Output)?;
        }
        if options.line_numbers {
            write!(out, "{}:", m.line_number).map_err(GrepError::Output)?;
        }
        out.write_all(&m.line).map_err(GrepError::Output)?;
        out.write_all(b"\n").map_err(GrepError::Output)?;
    }
    Ok(true)
}
