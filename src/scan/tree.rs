//! Depth-bounded filesystem walk
//!
//! The walk is eager up to `max_depth` so that selecting a directory in the browser
//! can propagate to everything underneath it without touching the disk again.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::classifier::{classify_entry, ENV_FILE_PREFIX};

/// Top-level clutter that is never offered to the user.
pub const NOISE_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    ".cache",
    ".npm",
    ".cargo",
    ".rustup",
    ".local",
    ".Trash",
    "Library",
    "Applications",
    "snap",
    ".vscode-server",
    "__pycache__",
    ".venv",
    "lost+found",
    ".DS_Store",
];

/// Hidden entries containing one of these are shown so they can be hidden explicitly.
pub const HIDDEN_ALLOWED_SUBSTRINGS: &[&str] = &["ssh", "aws", "config", "kube"];

pub const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_depth: usize,
    /// Escalate config-like files by scanning their content.
    pub content_scan: bool,
    /// The application's own dotted state directory (always surfaced).
    pub app_dir_name: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            content_scan: true,
            app_dir_name: crate::openclaw::STATE_DIR_NAME.to_string(),
        }
    }
}

/// One entry discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub name: String,
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub is_directory: bool,
    /// 0 for direct children of the walk root.
    pub depth: usize,
    pub is_sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sensitive_reason: String,
    /// `Some` for directories only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    /// Directories with discovered children; nodes at the depth bound are not.
    pub fn is_expandable(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Every discovered path strictly below this node, depth-first.
    pub fn descendant_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for child in self.children() {
            child.visit(&mut |node| paths.push(node.absolute_path.clone()));
        }
        paths
    }

    /// Pre-order traversal including this node.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a FileNode)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }
}

/// Flattened projection of a sensitive node, used by the review phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitiveFileItem {
    pub name: String,
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub selected: bool,
    pub reason: String,
}

impl From<&FileNode> for SensitiveFileItem {
    fn from(node: &FileNode) -> Self {
        Self {
            name: node.name.clone(),
            absolute_path: node.absolute_path.clone(),
            relative_path: node.relative_path.clone(),
            selected: true,
            reason: node.sensitive_reason.clone(),
        }
    }
}

pub struct TreeBuilder {
    root: PathBuf,
    options: ScanOptions,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn build(&self) -> Vec<FileNode> {
        tracing::debug!(
            "Scanning {} (max depth {})",
            self.root.display(),
            self.options.max_depth
        );
        self.build_tree(&self.root, 0)
    }

    /// List `directory` as nodes at `depth`, recursing until `max_depth`.
    ///
    /// Unreadable directories produce an empty list.
    pub fn build_tree(&self, directory: &Path, depth: usize) -> Vec<FileNode> {
        if depth >= self.options.max_depth {
            return Vec::new();
        }

        let Ok(entries) = fs::read_dir(directory) else {
            return Vec::new();
        };

        let mut nodes: Vec<FileNode> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if !self.should_include(&name, depth) {
                    return None;
                }

                // symlinks report as non-directories here, so the walk never follows them
                let is_directory = entry.file_type().ok()?.is_dir();
                let absolute_path = entry.path();
                Some(self.make_node(name, absolute_path, is_directory, depth))
            })
            .collect();

        sort_nodes(&mut nodes);
        nodes
    }

    fn make_node(
        &self,
        name: String,
        absolute_path: PathBuf,
        is_directory: bool,
        depth: usize,
    ) -> FileNode {
        let classification = classify_entry(
            &name,
            &absolute_path,
            is_directory,
            self.options.content_scan,
        );

        let children = is_directory.then(|| self.build_tree(&absolute_path, depth + 1));

        let relative_path = absolute_path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| absolute_path.clone());

        FileNode {
            name,
            absolute_path,
            relative_path,
            is_directory,
            depth,
            is_sensitive: classification.sensitive,
            sensitive_reason: classification.reason,
            children,
        }
    }

    fn should_include(&self, name: &str, depth: usize) -> bool {
        if depth == 0 && NOISE_NAMES.contains(&name) {
            return false;
        }

        if !name.starts_with('.') {
            return true;
        }

        let lower = name.to_lowercase();
        lower.starts_with(ENV_FILE_PREFIX)
            || name.starts_with(&self.options.app_dir_name)
            || HIDDEN_ALLOWED_SUBSTRINGS.iter().any(|s| lower.contains(s))
    }
}

/// Directories first, then by name.
pub fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// All sensitive nodes in pre-order. `max_depth` limits which depths are reported.
pub fn collect_sensitive(nodes: &[FileNode], max_depth: Option<usize>) -> Vec<SensitiveFileItem> {
    let mut items = Vec::new();
    for root in nodes {
        root.visit(&mut |node| {
            let in_range = max_depth.is_none_or(|max| node.depth < max);
            if node.is_sensitive && in_range {
                items.push(SensitiveFileItem::from(node));
            }
        });
    }
    items
}

/// Locate the node for `path`, descending only into ancestors of it.
pub fn find_node<'a>(nodes: &'a [FileNode], path: &Path) -> Option<&'a FileNode> {
    for node in nodes {
        if node.absolute_path == path {
            return Some(node);
        }
        if path.starts_with(&node.absolute_path) {
            return find_node(node.children(), path);
        }
    }
    None
}

/// Paths of the depth-0 nodes.
pub fn top_level_paths(nodes: &[FileNode]) -> Vec<PathBuf> {
    nodes.iter().map(|n| n.absolute_path.clone()).collect()
}
