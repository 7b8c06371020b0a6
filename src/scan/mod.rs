//! Host filesystem discovery: sensitivity classification and the bounded tree walk

pub mod classifier;
pub mod tree;

pub use classifier::{classify, classify_entry, Classification};
pub use tree::{
    collect_sensitive, find_node, top_level_paths, FileNode, ScanOptions, SensitiveFileItem,
    TreeBuilder, DEFAULT_MAX_DEPTH,
};
