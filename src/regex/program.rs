/// A compiled pattern: anchors stripped, groups numbered, alternation split.
/// Built once by `compile::compile` and walked by the matcher on every search.
#[derive(Debug, Clone)]
pub(crate) struct Program {
    pub pieces: Vec<Piece>,
    /// Number of capturing groups. Group ids run `1..=group_count`.
    pub group_count: usize,
    pub anchor_start: bool,
    pub anchor_end: bool,
}

/// One node plus the quantifier bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    pub node: Node,
    pub repeat: Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Atom(Atom),
    /// `\1`..`\9`. Matches the referenced group's current capture literally.
    Backref(usize),
    Group(Group),
}

/// A capturing group. `alternatives` always has at least one branch; a
/// group without `|` has exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Group {
    pub index: usize,
    pub alternatives: Vec<Vec<Piece>>,
}

/// Single-byte matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Atom {
    Literal(u8),
    Any,
    Digit,
    Word,
    Set(ByteSet),
}

impl Atom {
    #[inline]
    pub fn matches(&self, byte: u8) -> bool {
        match self {
            Self::Literal(b) => *b == byte,
            Self::Any => true,
            Self::Digit => byte.is_ascii_digit(),
            Self::Word => byte.is_ascii_alphanumeric() || byte == b'_',
            Self::Set(set) => set.contains(byte),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Repeat {
    Once,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
    Exactly(usize),
}

/// 256-bit membership table. Negated brackets are inverted at compile time,
/// so matching is a single bit test.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ByteSet([u64; 4]);

impl ByteSet {
    pub fn insert(&mut self, byte: u8) {
        self.0[usize::from(byte >> 6)] |= 1 << (byte & 63);
    }

    pub fn insert_range(&mut self, lo: u8, hi: u8) {
        for byte in lo..=hi {
            self.insert(byte);
        }
    }

    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.0[usize::from(byte >> 6)] & (1 << (byte & 63)) != 0
    }

    #[must_use]
    pub fn negated(self) -> Self {
        let [a, b, c, d] = self.0;
        Self([!a, !b, !c, !d])
    }
}

impl std::fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members: String = (0..=255u8)
            .filter(|&b| self.contains(b))
            .map(|b| std::ascii::escape_default(b).to_string())
            .collect();
        write!(f, "ByteSet[{members}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_set_membership_and_negation() {
        let mut set = ByteSet::default();
        set.insert(b'x');
        set.insert_range(b'0', b'3');
        assert!(set.contains(b'x'));
        assert!(set.contains(b'2'));
        assert!(!set.contains(b'4'));
        assert!(!set.contains(0xff));

        let neg = set.negated();
        assert!(!neg.contains(b'x'));
        assert!(neg.contains(b'4'));
        assert!(neg.contains(0xff));
    }

    #[test]
    fn word_and_digit_atoms_are_ascii_only() {
        assert!(Atom::Word.matches(b'_'));
        assert!(Atom::Word.matches(b'Z'));
        assert!(!Atom::Word.matches(b'-'));
        assert!(!Atom::Word.matches(0xc3));
        assert!(Atom::Digit.matches(b'7'));
        assert!(!Atom::Digit.matches(b'a'));
        assert!(Atom::Any.matches(b'\n'));
    }
}
