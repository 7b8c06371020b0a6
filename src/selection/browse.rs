//! Phase B: expansion-aware browse over the whole tree

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{Event, Selection, SelectionState, Transition};
use crate::scan::{find_node, top_level_paths, FileNode};

const DEFAULT_PAGE_SIZE: usize = 10;

/// One visible line of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRow {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub is_directory: bool,
    pub expandable: bool,
    pub expanded: bool,
    pub is_sensitive: bool,
    pub reason: String,
    /// Denied explicitly or through a denied ancestor.
    pub hidden: bool,
    pub is_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView {
    pub rows: Vec<BrowseRow>,
    pub cursor: usize,
    pub hidden_count: usize,
}

pub struct BrowseState {
    tree: Vec<FileNode>,
    /// Expansion overlay; the tree itself is never mutated.
    expanded: HashSet<PathBuf>,
    rows: Vec<BrowseRow>,
    cursor: usize,
    page_size: usize,
    selection: SelectionState,
}

impl BrowseState {
    /// Start with every `seed` path (and its discovered descendants) hidden.
    pub fn new(tree: Vec<FileNode>, seed: &[PathBuf]) -> Self {
        let mut selection = SelectionState::new();
        for path in seed {
            let descendants = find_node(&tree, path)
                .map(FileNode::descendant_paths)
                .unwrap_or_default();
            selection.hide_with_descendants(path, &descendants);
        }

        let mut state = Self {
            tree,
            expanded: HashSet::new(),
            rows: Vec::new(),
            cursor: 0,
            page_size: DEFAULT_PAGE_SIZE,
            selection,
        };
        state.reflatten();
        state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rows(&self) -> &[BrowseRow] {
        &self.rows
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(path)
    }

    /// Rows moved by page up/down; the renderer sets this from the visible height.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn update(&mut self, event: Event) -> Transition<Selection> {
        let last = self.rows.len().saturating_sub(1);
        match event {
            Event::Up => self.cursor = self.cursor.saturating_sub(1),
            Event::Down => self.cursor = (self.cursor + 1).min(last),
            Event::PageUp => self.cursor = self.cursor.saturating_sub(self.page_size),
            Event::PageDown => self.cursor = (self.cursor + self.page_size).min(last),
            Event::Home => self.cursor = 0,
            Event::End => self.cursor = last,
            Event::Expand => self.expand(),
            Event::Collapse => self.collapse(),
            Event::Toggle => self.toggle_current(),
            Event::Confirm => return Transition::Submit(self.selection_result()),
            Event::Cancel => return Transition::Cancel,
            Event::SelectAll | Event::DeselectAll => {}
        }
        Transition::Continue
    }

    pub fn view(&self) -> BrowseView {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| BrowseRow {
                hidden: self.selection.is_hidden(&row.path),
                is_cursor: i == self.cursor,
                ..row.clone()
            })
            .collect();

        BrowseView {
            rows,
            cursor: self.cursor,
            hidden_count: self.selection.denied_paths().len(),
        }
    }

    fn expand(&mut self) {
        let Some(row) = self.rows.get(self.cursor) else {
            return;
        };
        if row.expandable && !row.expanded {
            self.expanded.insert(row.path.clone());
            // new rows appear below the cursor, so the index stays valid
            self.reflatten();
        }
    }

    fn collapse(&mut self) {
        let Some(row) = self.rows.get(self.cursor) else {
            return;
        };
        if row.expanded {
            self.expanded.remove(&row.path);
            self.reflatten();
            self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        }
    }

    fn toggle_current(&mut self) {
        let Some(row) = self.rows.get(self.cursor) else {
            return;
        };
        let path = row.path.clone();
        let descendants = find_node(&self.tree, &path)
            .map(FileNode::descendant_paths)
            .unwrap_or_default();
        let hidden = self.selection.toggle(&path, &descendants);
        tracing::trace!("Toggled {} (hidden: {})", path.display(), hidden);
    }

    fn selection_result(&self) -> Selection {
        Selection {
            denied_paths: self.selection.denied_paths(),
            all_paths: top_level_paths(&self.tree),
        }
    }

    fn reflatten(&mut self) {
        let mut rows = Vec::new();
        flatten(&self.tree, &self.expanded, &mut rows);
        self.rows = rows;
    }
}

/// Pre-order listing of `nodes`, descending only into expanded directories.
fn flatten(nodes: &[FileNode], expanded: &HashSet<PathBuf>, rows: &mut Vec<BrowseRow>) {
    for node in nodes {
        let is_expanded = node.is_expandable() && expanded.contains(&node.absolute_path);
        rows.push(BrowseRow {
            path: node.absolute_path.clone(),
            name: node.name.clone(),
            depth: node.depth,
            is_directory: node.is_directory,
            expandable: node.is_expandable(),
            expanded: is_expanded,
            is_sensitive: node.is_sensitive,
            reason: node.sensitive_reason.clone(),
            hidden: false,
            is_cursor: false,
        });

        if is_expanded {
            flatten(node.children(), expanded, rows);
        }
    }
}
