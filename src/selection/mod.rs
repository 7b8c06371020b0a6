//! Two-phase path selection
//!
//! Phase A reviews everything the classifier flagged; Phase B browses the whole tree.
//! Both phases are plain state machines driven by [`Event`]s so they can be tested
//! without a terminal. Rendering and key mapping live in `crate::tui`.

pub mod browse;
pub mod paths;
pub mod review;
pub mod state;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use browse::{BrowseRow, BrowseState, BrowseView};
pub use paths::{is_covered, is_descendant, minimal_cover};
pub use review::{ReviewRow, ReviewState, ReviewView};
pub use state::SelectionState;

use crate::scan::{collect_sensitive, FileNode};

/// Input to either phase, already decoded from whatever the terminal sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Expand,
    Collapse,
    Toggle,
    SelectAll,
    DeselectAll,
    Confirm,
    Cancel,
}

/// Result of feeding one event to a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<T> {
    Continue,
    Cancel,
    Submit(T),
}

/// What a confirmed session produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Minimal covering set: no entry has an ancestor in the list.
    pub denied_paths: Vec<PathBuf>,
    /// Every top-level path of the scanned tree.
    pub all_paths: Vec<PathBuf>,
}

/// Cancelling is not an error and is distinct from confirming an empty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Confirmed(Selection),
    Cancelled,
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Interactive terminal unavailable: {0}")]
    IoUnavailable(#[from] io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Only sensitive nodes shallower than this are listed in the review phase.
    pub review_max_depth: Option<usize>,
    /// Also deny sensitive nodes the review phase did not list.
    pub deny_unreviewed_sensitive: bool,
}

/// Which phase a [`Session`] is in.
pub enum Phase {
    Review(ReviewState),
    Browse(BrowseState),
}

/// Drives both phases in order over one scanned tree.
pub struct Session {
    tree: Vec<FileNode>,
    options: SessionOptions,
    phase: Phase,
}

impl Session {
    pub fn new(tree: Vec<FileNode>, options: SessionOptions) -> Self {
        let items = collect_sensitive(&tree, options.review_max_depth);
        let phase = if items.is_empty() {
            tracing::debug!("No sensitive entries found, skipping review");
            Phase::Browse(Self::browse_with_seed(tree.clone(), &options, &[]))
        } else {
            Phase::Review(ReviewState::new(items))
        };

        Self {
            tree,
            options,
            phase,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_mut(&mut self) -> &mut Phase {
        &mut self.phase
    }

    /// Feed one event. Returns `Some` once the session has ended.
    pub fn handle(&mut self, event: Event) -> Option<SelectionOutcome> {
        match &mut self.phase {
            Phase::Review(review) => match review.update(event) {
                Transition::Continue => None,
                Transition::Cancel => Some(SelectionOutcome::Cancelled),
                Transition::Submit(seed) => {
                    tracing::debug!("Review confirmed with {} paths", seed.len());
                    let browse = Self::browse_with_seed(self.tree.clone(), &self.options, &seed);
                    self.phase = Phase::Browse(browse);
                    None
                }
            },
            Phase::Browse(browse) => match browse.update(event) {
                Transition::Continue => None,
                Transition::Cancel => Some(SelectionOutcome::Cancelled),
                Transition::Submit(selection) => Some(SelectionOutcome::Confirmed(selection)),
            },
        }
    }

    fn browse_with_seed(
        tree: Vec<FileNode>,
        options: &SessionOptions,
        seed: &[PathBuf],
    ) -> BrowseState {
        let mut seed = seed.to_vec();

        if options.deny_unreviewed_sensitive {
            let reviewed = options.review_max_depth;
            for root in &tree {
                root.visit(&mut |node| {
                    let unreviewed = reviewed.is_some_and(|max| node.depth >= max);
                    if node.is_sensitive && unreviewed {
                        seed.push(node.absolute_path.clone());
                    }
                });
            }
        }

        BrowseState::new(tree, &seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn node(path: &str, depth: usize, sensitive: bool, children: Option<Vec<FileNode>>) -> FileNode {
        let absolute_path = PathBuf::from(path);
        FileNode {
            name: absolute_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            relative_path: absolute_path
                .strip_prefix("/h")
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            absolute_path,
            is_directory: children.is_some(),
            depth,
            is_sensitive: sensitive,
            sensitive_reason: if sensitive { "test".into() } else { String::new() },
            children,
        }
    }

    fn tree() -> Vec<FileNode> {
        vec![
            node(
                "/h/.ssh",
                0,
                true,
                Some(vec![node("/h/.ssh/id_rsa", 1, true, None)]),
            ),
            node(
                "/h/project",
                0,
                false,
                Some(vec![
                    node("/h/project/.env", 1, true, None),
                    node("/h/project/main.rs", 1, false, None),
                ]),
            ),
            node("/h/notes.md", 0, false, None),
        ]
    }

    fn confirmed(outcome: Option<SelectionOutcome>) -> Selection {
        match outcome {
            Some(SelectionOutcome::Confirmed(selection)) => selection,
            other => panic!("expected confirmed selection, got {other:?}"),
        }
    }

    #[test]
    fn test_review_then_confirm_denies_flagged() {
        let mut session = Session::new(tree(), SessionOptions::default());
        assert!(matches!(session.phase(), Phase::Review(_)));

        assert_eq!(session.handle(Event::Confirm), None);
        assert!(matches!(session.phase(), Phase::Browse(_)));

        let selection = confirmed(session.handle(Event::Confirm));
        assert_eq!(
            selection.denied_paths,
            vec![PathBuf::from("/h/.ssh"), PathBuf::from("/h/project/.env")]
        );
        assert_eq!(
            selection.all_paths,
            vec![
                PathBuf::from("/h/.ssh"),
                PathBuf::from("/h/project"),
                PathBuf::from("/h/notes.md")
            ]
        );
    }

    #[test]
    fn test_cancel_in_review_is_distinct_from_empty() {
        let mut session = Session::new(tree(), SessionOptions::default());
        assert_eq!(
            session.handle(Event::Cancel),
            Some(SelectionOutcome::Cancelled)
        );

        let mut session = Session::new(tree(), SessionOptions::default());
        session.handle(Event::DeselectAll);
        session.handle(Event::Confirm);
        let selection = confirmed(session.handle(Event::Confirm));
        assert!(selection.denied_paths.is_empty());
        assert_eq!(selection.all_paths.len(), 3);
    }

    #[test]
    fn test_no_sensitive_skips_review() {
        let plain = vec![node("/h/notes.md", 0, false, None)];
        let session = Session::new(plain, SessionOptions::default());
        assert!(matches!(session.phase(), Phase::Browse(_)));
    }

    #[test]
    fn test_unreviewed_sensitive_seeded_when_configured() {
        let options = SessionOptions {
            review_max_depth: Some(1),
            deny_unreviewed_sensitive: true,
        };
        let mut session = Session::new(tree(), options);
        session.handle(Event::DeselectAll);
        session.handle(Event::Confirm);
        let selection = confirmed(session.handle(Event::Confirm));

        // depth-1 entries were never listed in review, so they stay denied
        assert_eq!(
            selection.denied_paths,
            vec![PathBuf::from("/h/.ssh/id_rsa"), PathBuf::from("/h/project/.env")]
        );
    }

    #[test]
    fn test_unreviewed_sensitive_left_alone_by_default() {
        let options = SessionOptions {
            review_max_depth: Some(1),
            deny_unreviewed_sensitive: false,
        };
        let mut session = Session::new(tree(), options);
        session.handle(Event::DeselectAll);
        session.handle(Event::Confirm);
        let selection = confirmed(session.handle(Event::Confirm));
        assert!(selection.denied_paths.is_empty());
    }
}
