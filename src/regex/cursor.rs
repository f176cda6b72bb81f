use super::group;
use super::program::{Atom, ByteSet, Repeat};
use crate::error::PatternError;

/// Largest count accepted in `{n}`.
pub(crate) const MAX_REPEAT: usize = 1000;

/// The next atomic element at a pattern position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element {
    Atom(Atom),
    Backref(usize),
    /// A group; `close` is the index of its `)`.
    Group { close: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scanned {
    pub element: Element,
    /// Bytes of pattern the element occupies, quantifier excluded.
    pub len: usize,
}

/// What follows an element: a quantifier with its length, or nothing.
/// A malformed brace is `Absent`; the caller then reads `{` as a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quantifier {
    Absent,
    Present { repeat: Repeat, len: usize },
}

/// Classify the element starting at `pos`. `pos` must be in bounds.
pub(crate) fn next_element(pattern: &[u8], pos: usize) -> Result<Scanned, PatternError> {
    let scanned = match pattern[pos] {
        b'\\' => {
            let Some(&escaped) = pattern.get(pos + 1) else {
                return Err(PatternError::TrailingBackslash);
            };
            let element = match escaped {
                b'1'..=b'9' => Element::Backref(usize::from(escaped - b'0')),
                b'd' => Element::Atom(Atom::Digit),
                b'w' => Element::Atom(Atom::Word),
                other => Element::Atom(Atom::Literal(other)),
            };
            Scanned { element, len: 2 }
        }
        b'[' => {
            let close = bracket_end(pattern, pos)
                .ok_or(PatternError::UnterminatedBracket { offset: pos })?;
            Scanned {
                element: Element::Atom(Atom::Set(bracket_set(&pattern[pos + 1..close]))),
                len: close - pos + 1,
            }
        }
        b'(' => {
            let close = group::closing(pattern, pos)
                .ok_or(PatternError::UnterminatedGroup { offset: pos })?;
            Scanned {
                element: Element::Group { close },
                len: close - pos + 1,
            }
        }
        b')' => return Err(PatternError::UnmatchedParen { offset: pos }),
        b'.' => Scanned {
            element: Element::Atom(Atom::Any),
            len: 1,
        },
        other => Scanned {
            element: Element::Atom(Atom::Literal(other)),
            len: 1,
        },
    };
    Ok(scanned)
}

/// Index of the `]` closing the bracket opened at `open`. The first `]`
/// after the `[` closes it, so `[]` is the empty set.
pub(crate) fn bracket_end(pattern: &[u8], open: usize) -> Option<usize> {
    memchr::memchr(b']', pattern.get(open + 1..)?).map(|i| open + 1 + i)
}

/// Build the byte set for bracket content (without the brackets).
fn bracket_set(content: &[u8]) -> ByteSet {
    let (negate, items) = match content.split_first() {
        Some((b'^', rest)) => (true, rest),
        _ => (false, content),
    };
    let mut set = ByteSet::default();
    let mut i = 0;
    while i < items.len() {
        if i + 2 < items.len() && items[i + 1] == b'-' {
            set.insert_range(items[i], items[i + 2]);
            i += 3;
        } else {
            set.insert(items[i]);
            i += 1;
        }
    }
    if negate { set.negated() } else { set }
}

/// Read the quantifier at `pos`, if any.
pub(crate) fn quantifier_at(pattern: &[u8], pos: usize) -> Result<Quantifier, PatternError> {
    let repeat = match pattern.get(pos) {
        Some(b'?') => Repeat::ZeroOrOne,
        Some(b'*') => Repeat::ZeroOrMore,
        Some(b'+') => Repeat::OneOrMore,
        Some(b'{') => return brace(pattern, pos),
        _ => return Ok(Quantifier::Absent),
    };
    Ok(Quantifier::Present { repeat, len: 1 })
}

/// `{n}` with one or more ASCII digits.
fn brace(pattern: &[u8], open: usize) -> Result<Quantifier, PatternError> {
    let digits = pattern[open + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let close = open + 1 + digits;
    if digits == 0 || pattern.get(close) != Some(&b'}') {
        return Ok(Quantifier::Absent);
    }
    let count = pattern[open + 1..close]
        .iter()
        .try_fold(0usize, |n, &d| {
            n.checked_mul(10)?.checked_add(usize::from(d - b'0'))
        })
        .filter(|&n| n <= MAX_REPEAT)
        .ok_or(PatternError::RepeatTooLarge { offset: open })?;
    Ok(Quantifier::Present {
        repeat: Repeat::Exactly(count),
        len: close - open + 1,
    })
}
