use std::path::PathBuf;

/// Why a pattern was rejected by the compile pass. Offsets are byte offsets
/// into the pattern as the user wrote it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unterminated bracket expression starting at offset {offset}")]
    UnterminatedBracket { offset: usize },

    #[error("unterminated group starting at offset {offset}")]
    UnterminatedGroup { offset: usize },

    #[error("unmatched ')' at offset {offset}")]
    UnmatchedParen { offset: usize },

    #[error("pattern ends with a lone backslash")]
    TrailingBackslash,

    #[error("repetition count at offset {offset} is too large")]
    RepeatTooLarge { offset: usize },
}

/// A search that was cut short. Matching itself never fails otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("nesting limit of {limit} repetitions exceeded")]
    DepthLimitExceeded { limit: usize },
}

/// Every error regrep can produce. Displayed as user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum GrepError {
    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("invalid glob \"{glob}\": {reason}")]
    InvalidGlob { glob: String, reason: String },

    #[error("{}: no such file or directory", path.display())]
    NotFound { path: PathBuf },

    #[error("{} [permission denied]", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: is a directory", path.display())]
    IsADirectory { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("{}:{line}: {source}", path.display())]
    SearchLimit {
        path: PathBuf,
        line: usize,
        #[source]
        source: MatchError,
    },

    #[error("writing output: {0}")]
    Output(#[source] std::io::Error),

    #[error("starting matcher threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl GrepError {
    /// Classify an I/O failure on `path` the way the user should see it.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Process exit code. Anything that stops a search is a 2; 0 and 1 are
    /// reserved for "matched" and "did not match".
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPattern { .. }
            | Self::InvalidGlob { .. }
            | Self::NotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::IsADirectory { .. }
            | Self::Io { .. }
            | Self::Walk { .. }
            | Self::SearchLimit { .. }
            | Self::Output(_)
            | Self::ThreadPool(_) => 2,
        }
    }
}
