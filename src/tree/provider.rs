use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{CollapsibleState, SubscriptionId, TreeChangeEmitter, TreeItem, TreeNode};
use crate::ext::PathExt;
use crate::filesystem::{EntryKind, FileSystem};
use crate::host::Host;

/// Name of the version-control metadata directory hidden by default.
pub const VCS_DIRECTORY_NAME: &str = ".git";

/// Controls how directory listings are turned into children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    /// Entry names that never show up as children.
    pub exclude: Vec<String>,
    /// Stable sort of children by label; when off, the filesystem order is kept.
    pub sort: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            exclude: vec![VCS_DIRECTORY_NAME.to_string()],
            sort: true,
        }
    }
}

/// Lazily materializes the configured roots into [`TreeNode`]s for a host view.
///
/// Children are listed only when the host asks for them and cached on the
/// parent until the next [`TreeProvider::refresh`], which tells every
/// subscriber to throw the tree away and list it again from the roots.
pub struct TreeProvider<F> {
    fs: Rc<F>,
    host: Rc<dyn Host>,
    roots: Vec<PathBuf>,
    options: ListingOptions,
    changes: TreeChangeEmitter,
    root_nodes: RefCell<Vec<Rc<TreeNode>>>,
}

impl<F: FileSystem> TreeProvider<F> {
    pub fn new(
        fs: Rc<F>,
        host: Rc<dyn Host>,
        roots: Vec<PathBuf>,
        options: ListingOptions,
    ) -> Self {
        Self {
            fs,
            host,
            roots,
            options,
            changes: TreeChangeEmitter::new(),
            root_nodes: RefCell::new(Vec::new()),
        }
    }

    /// Without a node, returns one node per configured root, in order.
    /// With a directory node, lists it and caches the result as its children.
    /// Files have no children and are never listed.
    pub async fn get_children(&self, node: Option<&Rc<TreeNode>>) -> Vec<Rc<TreeNode>> {
        match node {
            None => self.list_roots().await,
            Some(node) if node.is_directory() => self.expand(node).await,
            Some(node) => {
                debug!("'{}' is a file, no children", node.path().display());
                Vec::new()
            }
        }
    }

    pub fn get_parent(&self, node: &TreeNode) -> Option<Rc<TreeNode>> {
        node.parent()
    }

    pub fn get_tree_item(&self, node: &TreeNode) -> TreeItem {
        TreeItem::from(node)
    }

    /// Signals that the entire tree may have changed.
    pub fn refresh(&self) {
        debug!("Refreshing explorer tree");
        self.changes.fire();
    }

    pub fn on_did_change_tree_data(&self, listener: impl Fn() + 'static) -> SubscriptionId {
        self.changes.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    async fn list_roots(&self) -> Vec<Rc<TreeNode>> {
        let nodes = join_all(
            self.roots
                .iter()
                .map(|root| self.build_node(root.clone(), None)),
        )
        .await;

        debug!("Listed {} root nodes", nodes.len());
        *self.root_nodes.borrow_mut() = nodes.clone();
        nodes
    }

    async fn expand(&self, node: &Rc<TreeNode>) -> Vec<Rc<TreeNode>> {
        let entries = match self.fs.list_entries(node.path()).await {
            Ok(entries) => entries,
            Err(e) => {
                self.host
                    .show_warning(&format!("Error reading directory: {}", e));
                node.set_children(Vec::new());
                return Vec::new();
            }
        };

        let mut children = join_all(
            entries
                .into_iter()
                .filter(|entry| !self.is_excluded(entry))
                .map(|entry| self.build_node(entry, Some(node))),
        )
        .await;

        if self.options.sort {
            children.sort_by(|a, b| a.label().cmp(b.label()));
        }

        debug!(
            "Expanded '{}' into {} children",
            node.path().display(),
            children.len()
        );
        node.set_children(children.clone());
        children
    }

    async fn build_node(&self, path: PathBuf, parent: Option<&Rc<TreeNode>>) -> Rc<TreeNode> {
        let kind = match self.fs.classify(&path).await {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Showing '{}' as a file: {}", path.display(), e);
                EntryKind::File
            }
        };

        TreeNode::new(path.label(), path, CollapsibleState::from(kind), parent)
    }

    fn is_excluded(&self, entry: &Path) -> bool {
        entry
            .file_name()
            .map(|name| {
                self.options
                    .exclude
                    .iter()
                    .any(|excluded| name == excluded.as_str())
            })
            .unwrap_or(false)
    }
}
