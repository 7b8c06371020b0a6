//! The set of paths the user has chosen to hide from the agent

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::paths::minimal_cover;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Added(Vec<PathBuf>),
    Removed(Vec<PathBuf>),
}

/// What the most recent toggle changed, so toggling the same path again undoes it
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ToggleRecord {
    path: PathBuf,
    change: Change,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    hidden: BTreeSet<PathBuf>,
    last_toggle: Option<ToggleRecord>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &BTreeSet<PathBuf> {
        &self.hidden
    }

    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }

    /// Explicitly hidden.
    pub fn contains(&self, path: &Path) -> bool {
        self.hidden.contains(path)
    }

    /// Hidden either explicitly or through a hidden ancestor.
    pub fn is_hidden(&self, path: &Path) -> bool {
        self.hidden.iter().any(|h| path.starts_with(h))
    }

    /// Hide `path` and everything discovered below it. Used for seeding.
    pub fn hide_with_descendants(&mut self, path: &Path, descendants: &[PathBuf]) {
        self.hidden.insert(path.to_path_buf());
        self.hidden.extend(descendants.iter().cloned());
        self.last_toggle = None;
    }

    /// Flip `path`.
    ///
    /// Hiding adds the path and every known descendant. Unhiding removes the path,
    /// every hidden descendant, and any hidden ancestor (which would otherwise keep
    /// the path denied). Toggling the same path twice in a row restores the set
    /// exactly. Returns whether `path` is hidden afterwards.
    pub fn toggle(&mut self, path: &Path, descendants: &[PathBuf]) -> bool {
        if let Some(record) = self.last_toggle.take_if(|r| r.path == path) {
            let inverse = match record.change {
                Change::Added(paths) => {
                    for p in &paths {
                        self.hidden.remove(p);
                    }
                    Change::Removed(paths)
                }
                Change::Removed(paths) => {
                    self.hidden.extend(paths.iter().cloned());
                    Change::Added(paths)
                }
            };
            self.last_toggle = Some(ToggleRecord {
                path: record.path,
                change: inverse,
            });
            return self.hidden.contains(path);
        }

        let change = if self.hidden.contains(path) {
            let removed: Vec<PathBuf> = self
                .hidden
                .iter()
                .filter(|h| h.starts_with(path) || path.starts_with(h))
                .cloned()
                .collect();
            for p in &removed {
                self.hidden.remove(p);
            }
            Change::Removed(removed)
        } else {
            let added: Vec<PathBuf> = std::iter::once(path.to_path_buf())
                .chain(descendants.iter().cloned())
                .filter(|p| !self.hidden.contains(p))
                .collect();
            self.hidden.extend(added.iter().cloned());
            Change::Added(added)
        };

        self.last_toggle = Some(ToggleRecord {
            path: path.to_path_buf(),
            change,
        });
        self.hidden.contains(path)
    }

    /// The reported denied set: no member has a hidden ancestor.
    pub fn denied_paths(&self) -> Vec<PathBuf> {
        minimal_cover(&self.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn docs_descendants() -> Vec<PathBuf> {
        vec![
            p("/h/docs/a"),
            p("/h/docs/a/one.txt"),
            p("/h/docs/b"),
            p("/h/docs/c.txt"),
        ]
    }

    #[test]
    fn test_toggle_directory_adds_descendants() {
        let mut state = SelectionState::new();
        assert!(state.toggle(Path::new("/h/docs"), &docs_descendants()));
        assert_eq!(state.len(), 5);
        assert_eq!(state.denied_paths(), vec![p("/h/docs")]);
    }

    #[test]
    fn test_toggle_twice_restores_from_empty() {
        let mut state = SelectionState::new();
        state.toggle(Path::new("/h/docs"), &docs_descendants());
        state.toggle(Path::new("/h/docs"), &docs_descendants());
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_partial_subtree() {
        let mut state = SelectionState::new();
        state.hide_with_descendants(Path::new("/h/docs/a/one.txt"), &[]);
        state.hide_with_descendants(Path::new("/h/other"), &[]);
        let before = state.paths().clone();

        state.toggle(Path::new("/h/docs"), &docs_descendants());
        assert!(state.contains(Path::new("/h/docs/b")));
        state.toggle(Path::new("/h/docs"), &docs_descendants());

        assert_eq!(state.paths(), &before);
    }

    #[test]
    fn test_toggle_twice_restores_when_starting_hidden() {
        let mut state = SelectionState::new();
        state.hide_with_descendants(Path::new("/h/docs"), &docs_descendants());
        state.toggle(Path::new("/h/docs/a"), &[p("/h/docs/a/one.txt")]);
        let before = state.paths().clone();

        // /h/docs is no longer hidden but b and c.txt are
        state.toggle(Path::new("/h/docs/b"), &[]);
        state.toggle(Path::new("/h/docs/b"), &[]);
        assert_eq!(state.paths(), &before);
    }

    #[test]
    fn test_deselect_child_of_hidden_directory() {
        let mut state = SelectionState::new();
        state.toggle(Path::new("/h/docs"), &docs_descendants());
        let hidden = state.toggle(Path::new("/h/docs/a"), &[p("/h/docs/a/one.txt")]);

        assert!(!hidden);
        assert_eq!(
            state.denied_paths(),
            vec![p("/h/docs/b"), p("/h/docs/c.txt")]
        );
        assert!(!state.is_hidden(Path::new("/h/docs/a/one.txt")));
    }

    #[test]
    fn test_unhide_removes_unlisted_descendants() {
        // descendants that are no longer passed in are still removed
        let mut state = SelectionState::new();
        state.hide_with_descendants(Path::new("/h/docs"), &docs_descendants());
        state.toggle(Path::new("/h/x"), &[]);
        state.toggle(Path::new("/h/docs"), &[]);
        assert_eq!(state.paths().iter().collect::<Vec<_>>(), vec![&p("/h/x")]);
    }

    #[test]
    fn test_is_hidden_through_ancestor() {
        let mut state = SelectionState::new();
        state.hide_with_descendants(Path::new("/h/docs"), &[]);
        assert!(state.is_hidden(Path::new("/h/docs/deeper/than/scan")));
        assert!(!state.contains(Path::new("/h/docs/deeper")));
        assert!(!state.is_hidden(Path::new("/h/docsy")));
    }

    #[test]
    fn test_third_toggle_reapplies() {
        let mut state = SelectionState::new();
        state.toggle(Path::new("/h/docs"), &docs_descendants());
        state.toggle(Path::new("/h/docs"), &docs_descendants());
        state.toggle(Path::new("/h/docs"), &docs_descendants());
        assert_eq!(state.len(), 5);
    }
}
