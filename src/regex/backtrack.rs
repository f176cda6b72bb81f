use std::ops::Range;

use super::captures::Captures;
use super::program::{Group, Node, Piece, Repeat};
use super::RepeatCapture;
use crate::error::MatchError;

/// An accepted match: where it started and ended, and the captures along the
/// accepted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub span: Range<usize>,
    pub captures: Captures,
}

/// `Ok(None)` is an ordinary failed branch; `Err` aborts the whole search.
pub(crate) type Step = Result<Option<Outcome>, MatchError>;

/// What to do once a piece has matched: receives the end position and the
/// capture state of the branch, and decides whether the match is accepted.
///
/// The matcher is written in continuation-passing style. Every quantifier
/// and alternative tries its options in preference order and hands each one
/// to the continuation, so a failure anywhere later in the pattern backs up
/// into the most recent open choice.
pub(crate) type Continuation<'k, 't> = dyn FnMut(&mut Search<'t>, usize, Captures) -> Step + 'k;

/// Work and stack budgets for one search. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limits {
    pub steps: Option<u64>,
    /// Repetitions of a group or backreference that may be open at once.
    /// Each one holds a chain of stack frames until the rest of the pattern
    /// has been tried, so this is what bounds stack use on long texts.
    pub depth: Option<usize>,
}

/// State for one search over one text. Created per top-level call.
pub(crate) struct Search<'t> {
    pub(super) text: &'t [u8],
    pub(super) repeat_capture: RepeatCapture,
    limits: Limits,
    steps: u64,
    depth: usize,
}

impl<'t> Search<'t> {
    pub fn new(text: &'t [u8], limits: Limits, repeat_capture: RepeatCapture) -> Self {
        Self {
            text,
            repeat_capture,
            limits,
            steps: 0,
            depth: 0,
        }
    }

    /// Steps taken so far, across every start offset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Count one unit of work against the budget.
    pub(super) fn tick(&mut self) -> Result<(), MatchError> {
        self.steps += 1;
        match self.limits.steps {
            Some(limit) if self.steps > limit => Err(MatchError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    /// Run `f` one repetition deeper. The level stays open until `f`
    /// returns, which includes everything its continuation tried.
    pub(super) fn nested(&mut self, f: impl FnOnce(&mut Self) -> Step) -> Step {
        match self.limits.depth {
            Some(limit) if self.depth >= limit => {
                return Err(MatchError::DepthLimitExceeded { limit });
            }
            _ => self.depth += 1,
        }
        let step = f(self);
        self.depth -= 1;
        step
    }

    /// Match `pieces` at `pos`, then hand the end position to `accept`.
    pub fn sequence(
        &mut self,
        pieces: &[Piece],
        pos: usize,
        captures: Captures,
        accept: &mut Continuation<'_, 't>,
    ) -> Step {
        let Some((first, rest)) = pieces.split_first() else {
            return accept(self, pos, captures);
        };
        self.piece(first, pos, captures, &mut |search, end, captures| {
            search.sequence(rest, end, captures, accept)
        })
    }

    fn piece(
        &mut self,
        piece: &Piece,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        self.tick()?;
        match piece.repeat {
            Repeat::Once => self.node(&piece.node, pos, captures, next),
            Repeat::ZeroOrOne => self.optional(&piece.node, pos, captures, next),
            Repeat::ZeroOrMore => self.greedy(&piece.node, 0, pos, captures, next),
            Repeat::OneOrMore => self.greedy(&piece.node, 1, pos, captures, next),
            Repeat::Exactly(count) => self.exactly(&piece.node, count, pos, captures, next),
        }
    }

    /// Match a single occurrence of `node`.
    pub(super) fn node(
        &mut self,
        node: &Node,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        match node {
            Node::Atom(atom) => match self.text.get(pos) {
                Some(&byte) if atom.matches(byte) => next(self, pos + 1, captures),
                _ => Ok(None),
            },
            Node::Backref(index) => match self.backref_end(*index, pos, &captures) {
                Some(end) => next(self, end, captures),
                None => Ok(None),
            },
            Node::Group(group) => self.group(group, pos, &captures, next),
        }
    }

    /// Try each alternative in declaration order. Each one runs on its own
    /// copy of the captures; the group's span is recorded before moving on.
    fn group(
        &mut self,
        group: &Group,
        pos: usize,
        captures: &Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        for alternative in &group.alternatives {
            let found = self.sequence(
                alternative,
                pos,
                captures.clone(),
                &mut |search, end, mut captures| {
                    captures.set(group.index, pos..end);
                    next(search, end, captures)
                },
            )?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    /// End of a backreference match at `pos`. An undefined group fails the
    /// branch the same way a mismatch does.
    fn backref_end(&self, index: usize, pos: usize, captures: &Captures) -> Option<usize> {
        let captured = captures.bytes(index, self.text)?;
        let end = pos + captured.len();
        (self.text.get(pos..end)? == captured).then_some(end)
    }
}
