use std::ops::Range;

/// Capture Store: one slot per group, indexed by group id. Slot 0 is unused
/// so ids index directly. A `None` slot is an undefined group, which is not
/// the same as a group that captured the empty string.
///
/// Each speculative branch works on its own clone, so a branch that fails
/// never leaks values into its siblings or into the accepted result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Captures {
    slots: Vec<Option<Range<usize>>>,
}

impl Captures {
    pub fn new(group_count: usize) -> Self {
        Self {
            slots: vec![None; group_count + 1],
        }
    }

    /// Record `span` as group `index`'s capture. Ids outside the compiled
    /// group count are ignored.
    pub fn set(&mut self, index: usize, span: Range<usize>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(span);
        }
    }

    pub fn get(&self, index: usize) -> Option<Range<usize>> {
        self.slots.get(index)?.clone()
    }

    /// Number of groups currently defined.
    pub fn defined(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Captured bytes of group `index` within `text`, if the group is defined.
    pub fn bytes<'t>(&self, index: usize, text: &'t [u8]) -> Option<&'t [u8]> {
        text.get(self.get(index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_is_distinct_from_empty() {
        let mut caps = Captures::new(2);
        assert_eq!(caps.get(1), None);
        caps.set(1, 3..3);
        assert_eq!(caps.get(1), Some(3..3));
        assert_eq!(caps.bytes(1, b"abcdef"), Some(&b""[..]));
        assert_eq!(caps.bytes(2, b"abcdef"), None);
        assert_eq!(caps.defined(), 1);
    }

    #[test]
    fn clones_are_independent() {
        let mut outer = Captures::new(1);
        outer.set(1, 0..2);
        let mut branch = outer.clone();
        branch.set(1, 0..4);
        assert_eq!(outer.get(1), Some(0..2));
        assert_eq!(branch.get(1), Some(0..4));
    }

    #[test]
    fn out_of_range_ids_are_undefined() {
        let mut caps = Captures::new(1);
        caps.set(9, 0..1);
        assert_eq!(caps.get(9), None);
        assert_eq!(caps.get(0), None);
    }
}
