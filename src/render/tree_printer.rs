use std::rc::Rc;

use colored::Colorize;

use crate::filesystem::FileSystem;
use crate::tree::{CollapsibleState, TreeItem, TreeNode, TreeProvider};

/// One printed row of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// Box-drawing guides in front of the label.
    pub guides: String,
    pub item: TreeItem,
}

impl TreeLine {
    pub fn plain(&self) -> String {
        format!("{}{}", self.guides, self.item.label)
    }

    /// Colored for a terminal. Directories that can still be opened get a
    /// trailing `/`.
    pub fn styled(&self) -> String {
        let label = if self.item.context_value == "folder" {
            self.item.label.blue().bold().to_string()
        } else {
            self.item.label.normal().to_string()
        };
        let marker = match self.item.collapsible_state {
            CollapsibleState::None => "",
            _ => "/",
        };
        format!("{}{}{}", self.guides.dimmed(), label, marker.dimmed())
    }
}

struct Pending {
    node: Rc<TreeNode>,
    depth: usize,
    indent: String,
    last: bool,
}

/// Walks the tree through the provider the way a host view would, expanding
/// directories up to `max_depth` levels below the roots.
pub async fn render_tree<F: FileSystem>(
    provider: &TreeProvider<F>,
    max_depth: usize,
) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    let mut stack: Vec<Pending> = provider
        .get_children(None)
        .await
        .into_iter()
        .rev()
        .map(|node| Pending {
            node,
            depth: 0,
            indent: String::new(),
            last: true,
        })
        .collect();

    while let Some(Pending {
        node,
        depth,
        indent,
        last,
    }) = stack.pop()
    {
        let (guides, child_indent) = match depth {
            0 => (String::new(), String::new()),
            _ if last => (format!("{indent}└── "), format!("{indent}    ")),
            _ => (format!("{indent}├── "), format!("{indent}│   ")),
        };
        lines.push(TreeLine {
            guides,
            item: provider.get_tree_item(&node),
        });

        if depth >= max_depth || !node.is_directory() {
            continue;
        }

        let children = provider.get_children(Some(&node)).await;
        let count = children.len();
        stack.extend(
            children
                .into_iter()
                .enumerate()
                .rev()
                .map(|(index, child)| Pending {
                    node: child,
                    depth: depth + 1,
                    indent: child_indent.clone(),
                    last: index + 1 == count,
                }),
        );
    }

    lines
}
