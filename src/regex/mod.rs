//! Backtracking regular-expression engine.
//!
//! Supported syntax: literals, `.`, `\d`, `\w`, `[...]` / `[^...]` (with
//! `a-z` ranges), `^` and `$` at the pattern edges, capturing groups with
//! top-level `|` alternation, backreferences `\1`..`\9`, and the quantifiers
//! `?`, `*`, `+` and `{n}`. Matching is byte-oriented.
//!
//! The matcher is a naive backtracker: adversarial patterns such as `(a*)*b`
//! take exponential time, and every open iteration of a repeated group or
//! backreference holds a chain of stack frames. Use
//! [`RegexBuilder::step_limit`] to bound the work of a single search and
//! [`RegexBuilder::depth_limit`] to bound its stack. The default depth
//! budget fits the stack of a spawned thread (2 MiB); callers matching long
//! lines against repeated groups should raise it and run on a larger stack.

mod backtrack;
mod captures;
mod compile;
mod cursor;
mod group;
mod program;
mod repeat;

use std::ops::Range;

use backtrack::{Limits, Outcome, Search};
use captures::Captures;
use program::Program;

use crate::error::{MatchError, PatternError};

/// Open repetitions allowed by default. Each costs at most a few KiB of
/// stack in an unoptimized build.
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// How a repeated group's capture is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatCapture {
    /// The whole span consumed by every iteration of the quantifier.
    #[default]
    Span,
    /// Only the final iteration.
    Last,
}

/// Builds a [`Regex`] with non-default options.
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    pattern: String,
    limits: Limits,
    repeat_capture: RepeatCapture,
}

impl RegexBuilder {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            limits: Limits {
                steps: None,
                depth: Some(DEFAULT_DEPTH_LIMIT),
            },
            repeat_capture: RepeatCapture::default(),
        }
    }

    /// Bound the number of matcher steps one search may take, across all
    /// start offsets. `None` (the default) means unbounded.
    #[must_use]
    pub fn step_limit(mut self, limit: Option<u64>) -> Self {
        self.limits.steps = limit;
        self
    }

    /// Bound how many repetitions of groups and backreferences may be open
    /// at once, which bounds stack use. Past it a search fails with
    /// [`MatchError::DepthLimitExceeded`] instead of overflowing the stack.
    /// `None` lifts the bound; only do that on a stack sized for the input.
    #[must_use]
    pub fn depth_limit(mut self, limit: Option<usize>) -> Self {
        self.limits.depth = limit;
        self
    }

    #[must_use]
    pub fn repeat_capture(mut self, mode: RepeatCapture) -> Self {
        self.repeat_capture = mode;
        self
    }

    pub fn build(self) -> Result<Regex, PatternError> {
        let program = compile::compile(&self.pattern)?;
        tracing::debug!(
            pattern = %self.pattern,
            groups = program.group_count,
            pieces = program.pieces.len(),
            anchor_start = program.anchor_start,
            anchor_end = program.anchor_end,
            "compiled pattern"
        );
        Ok(Regex {
            pattern: self.pattern,
            program,
            limits: self.limits,
            repeat_capture: self.repeat_capture,
        })
    }
}

/// A validated, compiled pattern. Cheap to share across threads; every
/// search owns its own capture state.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    program: Program,
    limits: Limits,
    repeat_capture: RepeatCapture,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        RegexBuilder::new(pattern).build()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Does the pattern match anywhere in `text` (subject to its anchors)?
    /// A search that runs out of steps or depth counts as no match; use
    /// [`Regex::try_is_match`] to tell the two apart.
    pub fn is_match(&self, text: impl AsRef<[u8]>) -> bool {
        self.try_is_match(text).unwrap_or(false)
    }

    pub fn try_is_match(&self, text: impl AsRef<[u8]>) -> Result<bool, MatchError> {
        Ok(self.search(text.as_ref())?.is_some())
    }

    /// Byte range of the leftmost match: earliest start offset, and for that
    /// offset the end the greedy search accepts first.
    pub fn find(&self, text: impl AsRef<[u8]>) -> Result<Option<Range<usize>>, MatchError> {
        Ok(self.search(text.as_ref())?.map(|outcome| outcome.span))
    }

    /// Top-level search driver. With a start anchor only offset 0 is tried;
    /// otherwise every offset from 0 to `text.len()` inclusive. With an end
    /// anchor a match must finish exactly at the end of the text.
    pub(crate) fn search(&self, text: &[u8]) -> Result<Option<Outcome>, MatchError> {
        let program = &self.program;
        let last_start = if program.anchor_start { 0 } else { text.len() };
        let mut search = Search::new(text, self.limits, self.repeat_capture);
        let mut result = None;
        for start in 0..=last_start {
            let found = search.sequence(
                &program.pieces,
                start,
                Captures::new(program.group_count),
                &mut |_, end, captures| {
                    if program.anchor_end && end != text.len() {
                        return Ok(None);
                    }
                    Ok(Some(Outcome {
                        span: start..end,
                        captures,
                    }))
                },
            )?;
            if found.is_some() {
                result = found;
                break;
            }
        }
        tracing::trace!(
            pattern = %self.pattern,
            steps = search.steps(),
            matched = result.is_some(),
            defined_groups = result.as_ref().map_or(0, |o: &Outcome| o.captures.defined()),
            "search finished"
        );
        Ok(result)
    }
}

/// `true` if `pattern` matches `text`. Pure and deterministic; an invalid
/// pattern never matches.
pub fn is_match(text: impl AsRef<[u8]>, pattern: &str) -> bool {
    Regex::new(pattern).is_ok_and(|regex| regex.is_match(text))
}
