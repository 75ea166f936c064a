use std::path::PathBuf;

use super::{CollapsibleState, TreeNode};

/// How a host view should draw a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub path: PathBuf,
    pub collapsible_state: CollapsibleState,
    /// `"folder"` or `"file"`, for host-side menus and icons.
    pub context_value: &'static str,
}

impl From<&TreeNode> for TreeItem {
    fn from(node: &TreeNode) -> Self {
        Self {
            label: node.label().to_string(),
            path: node.path().to_path_buf(),
            collapsible_state: node.collapsible_state(),
            context_value: if node.is_directory() { "folder" } else { "file" },
        }
    }
}
