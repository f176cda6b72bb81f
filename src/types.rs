use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Knobs for one `run`. Mirrors the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Walk directories instead of treating every path as a file.
    pub recursive: bool,
    /// Prefix output lines with their 1-based line number.
    pub line_numbers: bool,
    /// Emit one JSON object per matching line.
    pub json: bool,
    /// In recursive mode, only search files matching one of these globs.
    pub globs: Vec<String>,
    /// Step budget for each line's search.
    pub step_limit: Option<u64>,
}

/// Where a buffer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdin => None,
            Self::Path(path) => Some(path),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "(standard input)"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A matching line, kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub line_number: usize,
    pub line: Vec<u8>,
    /// Leftmost match within `line`.
    pub span: Range<usize>,
}

/// Everything one input produced.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: Source,
    /// NUL byte near the start; text output summarizes instead of printing.
    pub binary: bool,
    pub matches: Vec<LineMatch>,
}
