use std::ops::Range;

use super::cursor::{self, Element, Quantifier};
use super::group;
use super::program::{Group, Node, Piece, Program, Repeat};
use crate::error::PatternError;

/// Validate `pattern` and compile it into a `Program`.
///
/// Anchors are recognized only as the very first (`^`) and very last (`$`)
/// byte; anywhere else they are literals. Groups are numbered in order of
/// their opening parenthesis, outer before inner, so the numbering does not
/// depend on which alternative ends up matching.
pub(crate) fn compile(pattern: &str) -> Result<Program, PatternError> {
    let bytes = pattern.as_bytes();
    let (body, anchor_start, anchor_end) = anchors(bytes);
    let mut group_count = 0;
    let pieces = sequence(bytes, body, &mut group_count)?;
    Ok(Program {
        pieces,
        group_count,
        anchor_start,
        anchor_end,
    })
}

/// Strip the anchors and report which were present. A `$` preceded by an
/// odd run of backslashes is an escaped literal.
fn anchors(pattern: &[u8]) -> (Range<usize>, bool, bool) {
    let anchor_start = pattern.first() == Some(&b'^');
    let start = usize::from(anchor_start);
    let mut end = pattern.len();
    let anchor_end = end > start && pattern[end - 1] == b'$' && !is_escaped(pattern, start, end - 1);
    if anchor_end {
        end -= 1;
    }
    (start..end, anchor_start, anchor_end)
}

fn is_escaped(pattern: &[u8], floor: usize, pos: usize) -> bool {
    let backslashes = pattern[floor..pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

/// Compile the pieces in `span`. Element and quantifier scanning only see
/// bytes up to `span.end`, so nothing runs past a branch boundary.
fn sequence(
    pattern: &[u8],
    span: Range<usize>,
    group_count: &mut usize,
) -> Result<Vec<Piece>, PatternError> {
    let view = &pattern[..span.end];
    let mut pieces = Vec::new();
    let mut pos = span.start;
    while pos < span.end {
        let scanned = cursor::next_element(view, pos)?;
        let node = match scanned.element {
            Element::Atom(atom) => Node::Atom(atom),
            Element::Backref(index) => Node::Backref(index),
            Element::Group { close } => Node::Group(group(view, pos, close, group_count)?),
        };
        pos += scanned.len;

        let repeat = match cursor::quantifier_at(view, pos)? {
            Quantifier::Present { repeat, len } => {
                pos += len;
                repeat
            }
            Quantifier::Absent => Repeat::Once,
        };
        pieces.push(Piece { node, repeat });
    }
    Ok(pieces)
}

fn group(
    pattern: &[u8],
    open: usize,
    close: usize,
    group_count: &mut usize,
) -> Result<Group, PatternError> {
    *group_count += 1;
    let index = *group_count;
    let alternatives = group::split_alternatives(pattern, open + 1..close)
        .into_iter()
        .map(|branch| sequence(pattern, branch, group_count))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Group {
        index,
        alternatives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::program::Atom;

    fn lit(b: u8) -> Piece {
        Piece {
            node: Node::Atom(Atom::Literal(b)),
            repeat: Repeat::Once,
        }
    }

    /// Group ids in pre-order, with their branch counts.
    fn group_ids(pieces: &[Piece], out: &mut Vec<(usize, usize)>) {
        for piece in pieces {
            if let Node::Group(g) = &piece.node {
                out.push((g.index, g.alternatives.len()));
                for alt in &g.alternatives {
                    group_ids(alt, out);
                }
            }
        }
    }

    #[test]
    fn anchors_only_at_the_edges() {
        let p = compile("^ab$").unwrap();
        assert!(p.anchor_start && p.anchor_end);
        assert_eq!(p.pieces, vec![lit(b'a'), lit(b'b')]);

        let p = compile("a^b$c").unwrap();
        assert!(!p.anchor_start && !p.anchor_end);
        assert_eq!(p.pieces.len(), 5);
        assert_eq!(p.pieces[1], lit(b'^'));
        assert_eq!(p.pieces[3], lit(b'$'));
    }

    #[test]
    fn lone_anchors() {
        let p = compile("^").unwrap();
        assert!(p.anchor_start && !p.anchor_end && p.pieces.is_empty());
        let p = compile("$").unwrap();
        assert!(!p.anchor_start && p.anchor_end && p.pieces.is_empty());
        let p = compile("^$").unwrap();
        assert!(p.anchor_start && p.anchor_end && p.pieces.is_empty());
    }

    #[test]
    fn escaped_dollar_is_literal() {
        let p = compile(r"cost\$").unwrap();
        assert!(!p.anchor_end);
        assert_eq!(p.pieces.last(), Some(&lit(b'$')));

        let p = compile(r"a\\$").unwrap();
        assert!(p.anchor_end);
        assert_eq!(p.pieces, vec![lit(b'a'), lit(b'\\')]);
    }

    #[test]
    fn groups_are_numbered_by_opening_paren() {
        let p = compile(r"((a)|(b))(c)\3").unwrap();
        assert_eq!(p.group_count, 4);
        let mut ids = Vec::new();
        group_ids(&p.pieces, &mut ids);
        assert_eq!(ids, vec![(1, 2), (2, 1), (3, 1), (4, 1)]);
        assert_eq!(p.pieces.last().map(|piece| &piece.node), Some(&Node::Backref(3)));
    }

    #[test]
    fn quantifiers_bind_to_previous_element() {
        let p = compile("(ab)+c{2}d?").unwrap();
        let repeats: Vec<Repeat> = p.pieces.iter().map(|piece| piece.repeat).collect();
        assert_eq!(
            repeats,
            vec![Repeat::OneOrMore, Repeat::Exactly(2), Repeat::ZeroOrOne]
        );
    }

    #[test]
    fn stacked_and_leading_quantifiers_are_literals() {
        let p = compile("a**").unwrap();
        assert_eq!(p.pieces.len(), 2);
        assert_eq!(p.pieces[0].repeat, Repeat::ZeroOrMore);
        assert_eq!(p.pieces[1], lit(b'*'));

        let p = compile("?a").unwrap();
        assert_eq!(p.pieces, vec![lit(b'?'), lit(b'a')]);
    }

    #[test]
    fn malformed_brace_is_literal() {
        let p = compile("a{x}").unwrap();
        assert_eq!(
            p.pieces,
            vec![lit(b'a'), lit(b'{'), lit(b'x'), lit(b'}')]
        );
    }

    #[test]
    fn top_level_bar_is_literal() {
        let p = compile("a|b").unwrap();
        assert_eq!(p.pieces, vec![lit(b'a'), lit(b'|'), lit(b'b')]);
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert_eq!(
            compile("ab[cd").unwrap_err(),
            PatternError::UnterminatedBracket { offset: 2 }
        );
        assert_eq!(
            compile("x(a(b)").unwrap_err(),
            PatternError::UnterminatedGroup { offset: 1 }
        );
        assert_eq!(
            compile("ab)").unwrap_err(),
            PatternError::UnmatchedParen { offset: 2 }
        );
        assert_eq!(compile(r"ab\").unwrap_err(), PatternError::TrailingBackslash);
        assert_eq!(
            compile("(a[b)").unwrap_err(),
            PatternError::UnterminatedBracket { offset: 2 }
        );
    }

    #[test]
    fn brace_cannot_escape_its_group() {
        let p = compile("(a{3)}").unwrap();
        let Node::Group(g) = &p.pieces[0].node else {
            panic!("expected a group");
        };
        assert_eq!(g.alternatives[0], vec![lit(b'a'), lit(b'{'), lit(b'3')]);
        assert_eq!(p.pieces[1], lit(b'}'));
    }
}
