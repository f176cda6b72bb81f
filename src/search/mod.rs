pub(crate) mod content;

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::GrepError;
use crate::types::SearchOptions;

// Version-control internals are never descended into. Everything else,
// hidden and ignored files included, is searched.
pub(crate) const SKIP_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Build a sequential directory walker over ALL files except VCS internals.
/// Does NOT respect .gitignore. Entries come back sorted by file name so
/// output order is stable across runs.
pub(crate) fn walker(root: &Path) -> ignore::Walk {
    WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .sort_by_file_name(std::cmp::Ord::cmp)
        .filter_entry(|entry| {
            if entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Some(name) = entry.file_name().to_str() {
                    return !SKIP_DIRS.contains(&name);
                }
            }
            true
        })
        .build()
}

/// Compile `--glob` filters. `None` when no filters were given.
pub(crate) fn glob_filter(globs: &[String]) -> Result<Option<GlobSet>, GrepError> {
    if globs.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(Glob::new(glob).map_err(|e| GrepError::InvalidGlob {
            glob: glob.clone(),
            reason: e.kind().to_string(),
        })?);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| GrepError::InvalidGlob {
            glob: globs.join(", "),
            reason: e.to_string(),
        })
}

/// Expand the path arguments into the files to search, in output order.
/// Without `recursive` the paths are taken as given; a directory then fails
/// when it is read.
pub(crate) fn collect_files(
    paths: &[PathBuf],
    options: &SearchOptions,
) -> Result<Vec<PathBuf>, GrepError> {
    if !options.recursive {
        return Ok(paths.to_vec());
    }

    let filter = glob_filter(&options.globs)?;
    let mut files = Vec::new();
    for root in paths {
        // Surface a missing root as "not found" rather than a walk error.
        std::fs::metadata(root).map_err(|e| GrepError::from_io(root.clone(), e))?;

        for entry in walker(root) {
            let entry = entry.map_err(|source| GrepError::Walk {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if let Some(filter) = &filter {
                let name = path.file_name().unwrap_or_default();
                let rel = path.strip_prefix(root).unwrap_or(path);
                if !filter.is_match(name) && !filter.is_match(rel) {
                    tracing::trace!(path = %path.display(), "skipped by glob filter");
                    continue;
                }
            }
            tracing::debug!(path = %path.display(), "walk entry");
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join(".hidden"), "h").unwrap();
        fs::write(root.join("sub/c.txt"), "c").unwrap();
        fs::write(root.join("sub/deeper/d.rs"), "d").unwrap();
        fs::write(root.join(".git/config"), "x").unwrap();
        dir
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn recursive(globs: &[&str]) -> SearchOptions {
        SearchOptions {
            recursive: true,
            globs: globs.iter().map(|g| (*g).to_string()).collect(),
            ..SearchOptions::default()
        }
    }

    #[test]
    fn plain_paths_pass_through() {
        let paths = vec![PathBuf::from("x"), PathBuf::from("y")];
        let files = collect_files(&paths, &SearchOptions::default()).unwrap();
        assert_eq!(files, paths);
    }

    #[test]
    fn recursive_walk_is_sorted_and_skips_vcs() {
        let dir = tree();
        let files = collect_files(&[dir.path().to_path_buf()], &recursive(&[])).unwrap();
        assert_eq!(
            names(&files, dir.path()),
            vec![".hidden", "a.md", "b.txt", "sub/c.txt", "sub/deeper/d.rs"]
        );
    }

    #[test]
    fn globs_filter_by_name_or_relative_path() {
        let dir = tree();
        let root = dir.path().to_path_buf();
        let files = collect_files(&[root.clone()], &recursive(&["*.txt"])).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["b.txt", "sub/c.txt"]);

        let files = collect_files(&[root], &recursive(&["sub/deeper/*", "*.md"])).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["a.md", "sub/deeper/d.rs"]);
    }

    #[test]
    fn recursive_file_root_yields_itself() {
        let dir = tree();
        let file = dir.path().join("b.txt");
        let files = collect_files(&[file.clone()], &recursive(&[])).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tree();
        let err = collect_files(&[dir.path().join("nope")], &recursive(&[])).unwrap_err();
        assert!(matches!(err, GrepError::NotFound { .. }));
    }

    #[test]
    fn bad_glob_is_reported() {
        let err = glob_filter(&["a[".to_string()]).unwrap_err();
        assert!(matches!(err, GrepError::InvalidGlob { .. }));
    }
}
