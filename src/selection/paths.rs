//! Path relationships used by selection and the mount compiler
//!
//! All comparisons are component-wise (`Path::starts_with`), so `/a/bc` is not under
//! `/a/b` and a trailing slash does not change the answer.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// `path` lies strictly below `ancestor`.
pub fn is_descendant(path: &Path, ancestor: &Path) -> bool {
    path != ancestor && path.starts_with(ancestor)
}

/// `path` equals one of `denied` or lies below one of them.
pub fn is_covered<'a>(path: &Path, denied: impl IntoIterator<Item = &'a PathBuf>) -> bool {
    denied.into_iter().any(|d| path.starts_with(d))
}

/// Reduce a path set so that no member has an ancestor also in the set.
///
/// The result is sorted and `minimal_cover(minimal_cover(s)) == minimal_cover(s)`.
pub fn minimal_cover<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Vec<PathBuf> {
    let sorted: BTreeSet<&PathBuf> = paths.into_iter().collect();
    let mut kept: Vec<PathBuf> = Vec::new();

    // Component ordering puts every descendant of a path directly after it,
    // so comparing against the last kept path is enough.
    for path in sorted {
        if kept.last().is_some_and(|last| path.starts_with(last)) {
            continue;
        }
        kept.push(path.clone());
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_is_descendant_is_component_wise() {
        assert!(is_descendant(Path::new("/a/b/c"), Path::new("/a/b")));
        assert!(!is_descendant(Path::new("/a/bc"), Path::new("/a/b")));
        assert!(!is_descendant(Path::new("/a/b"), Path::new("/a/b")));
        assert!(is_descendant(Path::new("/a/b/c"), Path::new("/a/b/")));
    }

    #[test]
    fn test_is_covered() {
        let denied = vec![p("/home/u/.ssh")];
        assert!(is_covered(Path::new("/home/u/.ssh"), &denied));
        assert!(is_covered(Path::new("/home/u/.ssh/id_rsa"), &denied));
        assert!(!is_covered(Path::new("/home/u/.sshd"), &denied));
    }

    #[test]
    fn test_minimal_cover_prunes_descendants() {
        let set = vec![
            p("/h/a/x"),
            p("/h/a"),
            p("/h/a-b"),
            p("/h/a/y/z"),
            p("/h/b/c"),
        ];
        assert_eq!(
            minimal_cover(&set),
            vec![p("/h/a"), p("/h/a-b"), p("/h/b/c")]
        );
    }

    #[test]
    fn test_minimal_cover_sibling_prefix_names() {
        // "/h/a-b" sorts between "/h/a" children in string order but not in component order
        let set = vec![p("/h/a"), p("/h/a-b/c"), p("/h/a/z")];
        assert_eq!(minimal_cover(&set), vec![p("/h/a"), p("/h/a-b/c")]);
    }

    #[test]
    fn test_minimal_cover_is_idempotent() {
        let set = vec![p("/x/1/2"), p("/x/1"), p("/y"), p("/y/z"), p("/w/v")];
        let once = minimal_cover(&set);
        let twice = minimal_cover(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_minimal_cover_deduplicates_trailing_slash() {
        let set = vec![p("/x/1/"), p("/x/1")];
        assert_eq!(minimal_cover(&set).len(), 1);
    }

    #[test]
    fn test_minimal_cover_empty() {
        let set: Vec<PathBuf> = Vec::new();
        assert!(minimal_cover(&set).is_empty());
    }
}
