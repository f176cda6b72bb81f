//! Quantifier Engine: `?`, `*`, `+` and `{n}` over atoms, groups and
//! backreferences.
//!
//! Plain atoms take a fast path: the maximal run is measured once and the
//! continuation is tried at each length from longest to shortest. Groups
//! and backreferences repeat recursively, one iteration per frame, so every
//! iteration can still backtrack into its own internal choices. Those
//! iterations are what the depth budget counts.

use std::ops::Range;

use super::backtrack::{Continuation, Search, Step};
use super::captures::Captures;
use super::program::Node;
use super::RepeatCapture;

impl<'t> Search<'t> {
    /// Zero or one, preferring one.
    pub(super) fn optional(
        &mut self,
        node: &Node,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        let with = self.node(node, pos, captures.clone(), next)?;
        if with.is_some() {
            return Ok(with);
        }
        next(self, pos, captures)
    }

    /// `min` or more, longest first.
    pub(super) fn greedy(
        &mut self,
        node: &Node,
        min: usize,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        if let Node::Atom(atom) = node {
            let run = self.text[pos..]
                .iter()
                .take_while(|&&byte| atom.matches(byte))
                .count();
            if run < min {
                return Ok(None);
            }
            for len in (min..=run).rev() {
                self.tick()?;
                let found = next(self, pos + len, captures.clone())?;
                if found.is_some() {
                    return Ok(found);
                }
            }
            return Ok(None);
        }
        self.iterate(node, min, 0, pos, pos, captures, next)
    }

    /// One more iteration if possible, then the continuation. `done`
    /// iterations have matched so far, starting at `start`.
    #[allow(clippy::too_many_arguments)]
    fn iterate(
        &mut self,
        node: &Node,
        min: usize,
        done: usize,
        start: usize,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        self.tick()?;
        self.nested(|this| {
            let more = this.node(node, pos, captures.clone(), &mut |search, end, mut captures| {
                search.record_repeat(node, start..end, &mut captures);
                if end == pos {
                    // An empty iteration would repeat forever; stop here.
                    return if done + 1 >= min {
                        next(search, end, captures)
                    } else {
                        Ok(None)
                    };
                }
                search.iterate(node, min, done + 1, start, end, captures, next)
            })?;
            if more.is_some() {
                return Ok(more);
            }
            if done >= min {
                next(this, pos, captures)
            } else {
                Ok(None)
            }
        })
    }

    /// Exactly `count` iterations. There is no shorter or longer option: a
    /// failed iteration fails the whole quantifier.
    pub(super) fn exactly(
        &mut self,
        node: &Node,
        count: usize,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        if let Node::Atom(atom) = node {
            let end = pos + count;
            let all = self
                .text
                .get(pos..end)
                .is_some_and(|run| run.iter().all(|&byte| atom.matches(byte)));
            return if all { next(self, end, captures) } else { Ok(None) };
        }
        self.count_down(node, count, pos, pos, captures, next)
    }

    fn count_down(
        &mut self,
        node: &Node,
        remaining: usize,
        start: usize,
        pos: usize,
        captures: Captures,
        next: &mut Continuation<'_, 't>,
    ) -> Step {
        if remaining == 0 {
            return next(self, pos, captures);
        }
        self.tick()?;
        self.nested(|this| {
            this.node(node, pos, captures, &mut |search, end, mut captures| {
                search.record_repeat(node, start..end, &mut captures);
                search.count_down(node, remaining - 1, start, end, captures, next)
            })
        })
    }

    /// After an iteration of a repeated group, widen its capture to the span
    /// of every iteration so far when configured to.
    fn record_repeat(&self, node: &Node, span: Range<usize>, captures: &mut Captures) {
        if let (Node::Group(group), RepeatCapture::Span) = (node, self.repeat_capture) {
            captures.set(group.index, span);
        }
    }
}
