use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use derive_more::Display;

use crate::filesystem::EntryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CollapsibleState {
    #[display("collapsed")]
    Collapsed,
    #[display("expanded")]
    Expanded,
    #[display("none")]
    None,
}

impl From<EntryKind> for CollapsibleState {
    fn from(kind: EntryKind) -> Self {
        if kind.is_directory() {
            CollapsibleState::Collapsed
        } else {
            CollapsibleState::None
        }
    }
}

/// One filesystem entry in an explorer tree.
///
/// The path and the directory flag are fixed at construction. Renames and
/// moves never touch an existing node: the next listing builds new ones.
/// Two nodes denote the same entry exactly when their paths are equal.
pub struct TreeNode {
    label: String,
    path: PathBuf,
    collapsible_state: CollapsibleState,
    parent: Option<Weak<TreeNode>>,
    children: RefCell<Option<Vec<Rc<TreeNode>>>>,
}

impl TreeNode {
    pub fn new(
        label: impl Into<String>,
        path: impl Into<PathBuf>,
        collapsible_state: CollapsibleState,
        parent: Option<&Rc<TreeNode>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            label: label.into(),
            path: path.into(),
            collapsible_state,
            parent: parent.map(Rc::downgrade),
            children: RefCell::new(None),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn collapsible_state(&self) -> CollapsibleState {
        self.collapsible_state
    }

    pub fn is_directory(&self) -> bool {
        self.collapsible_state != CollapsibleState::None
    }

    /// The node this one was listed under. `None` for roots, and for nodes
    /// whose parent has already been dropped by a refresh.
    pub fn parent(&self) -> Option<Rc<TreeNode>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Children from the last expansion; `None` if the node was never expanded.
    pub fn children(&self) -> Option<Vec<Rc<TreeNode>>> {
        self.children.borrow().clone()
    }

    pub fn is_expanded(&self) -> bool {
        self.children.borrow().is_some()
    }

    pub(crate) fn set_children(&self, children: Vec<Rc<TreeNode>>) {
        *self.children.borrow_mut() = Some(children);
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for TreeNode {}

impl Hash for TreeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

// Parent and children are not printed, a node's Debug output never walks the graph.
impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("label", &self.label)
            .field("path", &self.path)
            .field("collapsible_state", &self.collapsible_state)
            .finish()
    }
}
