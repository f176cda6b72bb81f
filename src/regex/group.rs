use std::ops::Range;

use super::cursor::bracket_end;

/// Index of the `)` that closes the `(` at `open`, or `None` if the group is
/// never closed. Escaped bytes and bracket expressions don't count toward
/// the depth.
pub(crate) fn closing(pattern: &[u8], open: usize) -> Option<usize> {
    if pattern.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut i = open;
    while i < pattern.len() {
        match pattern[i] {
            b'\\' => i += 1,
            b'[' => {
                if let Some(end) = bracket_end(pattern, i) {
                    i = end;
                }
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split a group body on its top-level `|`. Nested groups stay intact.
/// Always returns at least one branch; empty branches are kept.
pub(crate) fn split_alternatives(pattern: &[u8], body: Range<usize>) -> Vec<Range<usize>> {
    let mut branches = Vec::new();
    let mut start = body.start;
    let mut depth = 0usize;
    let mut i = body.start;
    while i < body.end {
        match pattern[i] {
            b'\\' => i += 1,
            b'[' => {
                if let Some(end) = bracket_end(pattern, i) {
                    i = end.min(body.end);
                }
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => {
                branches.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    branches.push(start..body.end);
    branches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches<'a>(pattern: &'a str, body: Range<usize>) -> Vec<&'a str> {
        split_alternatives(pattern.as_bytes(), body)
            .into_iter()
            .map(|r| &pattern[r])
            .collect()
    }

    #[test]
    fn closing_tracks_depth() {
        assert_eq!(closing(b"(a(b)c)d", 0), Some(6));
        assert_eq!(closing(b"(a(b)c)d", 2), Some(4));
        assert_eq!(closing(b"(a(b", 0), None);
        assert_eq!(closing(b"abc", 0), None);
    }

    #[test]
    fn closing_skips_escapes_and_brackets() {
        assert_eq!(closing(br"(a\)b)", 0), Some(5));
        assert_eq!(closing(b"([)]x)", 0), Some(5));
    }

    #[test]
    fn closing_ignores_unterminated_bracket() {
        assert_eq!(closing(b"([a)", 0), Some(3));
    }

    #[test]
    fn split_on_top_level_bars_only() {
        let p = "(cat|d(o|u)g|cow)";
        assert_eq!(branches(p, 1..p.len() - 1), vec!["cat", "d(o|u)g", "cow"]);
    }

    #[test]
    fn split_without_bar_yields_one_branch() {
        let p = "(abc)";
        assert_eq!(branches(p, 1..4), vec!["abc"]);
    }

    #[test]
    fn split_keeps_empty_branches() {
        let p = "(a|)";
        assert_eq!(branches(p, 1..3), vec!["a", ""]);
        let p = "()";
        assert_eq!(branches(p, 1..1), vec![""]);
    }

    #[test]
    fn split_ignores_escaped_and_bracketed_bars() {
        let p = r"(a\|b|[|]c)";
        assert_eq!(branches(p, 1..p.len() - 1), vec![r"a\|b", "[|]c"]);
    }
}
