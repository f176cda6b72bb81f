use std::fs;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::GrepError;

/// File contents, memory-mapped when non-empty.
pub(crate) enum Contents {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Contents {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => &mmap[..],
            Self::Owned(buf) => &buf[..],
        }
    }
}

/// Read a file for searching. Directories are an error here; walking them is
/// the caller's job.
pub(crate) fn read_path(path: &Path) -> Result<Contents, GrepError> {
    let meta = fs::metadata(path).map_err(|e| GrepError::from_io(path.to_path_buf(), e))?;
    if meta.is_dir() {
        return Err(GrepError::IsADirectory {
            path: path.to_path_buf(),
        });
    }

    let file = fs::File::open(path).map_err(|e| GrepError::from_io(path.to_path_buf(), e))?;

    // Zero-length maps fail on some platforms, and pipes or other special
    // files report a length of 0 anyway. Read those the ordinary way.
    if meta.len() == 0 {
        let mut buf = Vec::new();
        (&file)
            .read_to_end(&mut buf)
            .map_err(|e| GrepError::from_io(path.to_path_buf(), e))?;
        return Ok(Contents::Owned(buf));
    }

    // SAFETY: the map is read-only and dropped before this search returns.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| GrepError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Contents::Mapped(mmap))
}

/// Read all of standard input (or whatever stands in for it).
pub(crate) fn read_stdin(stdin: &mut dyn Read) -> Result<Vec<u8>, GrepError> {
    let mut buf = Vec::new();
    stdin
        .read_to_end(&mut buf)
        .map_err(|e| GrepError::from_io("(standard input)".into(), e))?;
    Ok(buf)
}

/// A NUL among the first 512 bytes marks the input as binary.
pub(crate) fn is_binary(buf: &[u8]) -> bool {
    let window = &buf[..buf.len().min(512)];
    memchr::memchr(0, window).is_some()
}

/// Split on `\n`. A trailing newline does not start another (empty) line,
/// and an empty buffer has no lines at all.
pub(crate) fn lines(buf: &[u8]) -> Lines<'_> {
    let rest = (!buf.is_empty()).then(|| buf.strip_suffix(b"\n").unwrap_or(buf));
    Lines { rest }
}

pub(crate) struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        match memchr::memchr(b'\n', rest) {
            Some(i) => {
                self.rest = Some(&rest[i + 1..]);
                Some(&rest[..i])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(buf: &str) -> Vec<&str> {
        lines(buf.as_bytes())
            .map(|l| std::str::from_utf8(l).unwrap())
            .collect()
    }

    #[test]
    fn trailing_newline_is_not_a_line() {
        assert_eq!(split("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(split("a\n\nb\n\n"), vec!["a", "", "b", ""]);
        assert_eq!(split("\n"), vec![""]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(split("").is_empty());
    }

    #[test]
    fn carriage_returns_stay_in_the_line() {
        assert_eq!(split("a\r\nb\r\n"), vec!["a\r", "b\r"]);
    }

    #[test]
    fn binary_detection_looks_at_the_head() {
        assert!(is_binary(b"abc\0def"));
        assert!(!is_binary(b"plain text\n"));
        let mut late = vec![b'a'; 600];
        late.push(0);
        assert!(!is_binary(&late));
    }

    #[test]
    fn reads_files_and_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "one\ntwo\n").unwrap();
        assert_eq!(&*read_path(&file).unwrap(), b"one\ntwo\n");

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();
        assert!(read_path(&empty).unwrap().is_empty());

        assert!(matches!(
            read_path(dir.path()),
            Err(GrepError::IsADirectory { .. })
        ));
        assert!(matches!(
            read_path(&dir.path().join("missing")),
            Err(GrepError::NotFound { .. })
        ));
    }

    #[test]
    fn reads_stdin_stand_in() {
        let mut input: &[u8] = b"hello\n";
        assert_eq!(read_stdin(&mut input).unwrap(), b"hello\n");
    }
}
