use std::cell::RefCell;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::commands::{CommandError, CommandOutcome, MutationCommands};
use crate::dnd::{DataTransfer, DragAndDropController};
use crate::ext::PathExt;
use crate::filesystem::FileSystem;
use crate::host::Host;
use crate::tree::{ListingOptions, TreeNode, TreeProvider};

/// Everything that lives for as long as one root is open in the explorer.
pub struct ExplorerSession<F> {
    root: PathBuf,
    host: Rc<dyn Host>,
    provider: Rc<TreeProvider<F>>,
    commands: MutationCommands<F>,
    drag_and_drop: DragAndDropController<F>,
    selection: RefCell<Vec<Rc<TreeNode>>>,
}

impl<F: FileSystem> ExplorerSession<F> {
    pub fn open(root: PathBuf, fs: Rc<F>, host: Rc<dyn Host>, options: ListingOptions) -> Self {
        debug!("Opening explorer session at '{}'", root.display());
        let provider = Rc::new(TreeProvider::new(
            fs.clone(),
            host.clone(),
            vec![root.clone()],
            options,
        ));
        let commands = MutationCommands::new(fs.clone(), provider.clone(), host.clone());
        let drag_and_drop = DragAndDropController::new(fs, provider.clone());

        Self {
            root,
            host,
            provider,
            commands,
            drag_and_drop,
            selection: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The view title: the root's name in capitals.
    pub fn title(&self) -> String {
        self.root.label().to_uppercase()
    }

    pub fn provider(&self) -> &Rc<TreeProvider<F>> {
        &self.provider
    }

    pub fn selection(&self) -> Vec<Rc<TreeNode>> {
        self.selection.borrow().clone()
    }

    /// Replaces the selection. Selecting a file asks the host to open it.
    pub fn select(&self, nodes: Vec<Rc<TreeNode>>) {
        if let Some(first) = nodes.first().filter(|node| !node.is_directory()) {
            self.host.open_document(first.path());
        }
        *self.selection.borrow_mut() = nodes;
    }

    pub fn refresh(&self) {
        self.provider.refresh();
    }

    pub async fn rename(
        &self,
        node: &TreeNode,
        new_name: &str,
    ) -> Result<CommandOutcome, CommandError> {
        self.commands.rename(node, new_name).await
    }

    pub async fn delete(&self, node: &TreeNode) -> Result<CommandOutcome, CommandError> {
        self.commands.delete(node).await
    }

    pub async fn new_file(&self, file_name: &str) -> Result<CommandOutcome, CommandError> {
        let selection = self.selection();
        self.commands
            .new_file(&selection, &self.root, file_name)
            .await
    }

    pub async fn new_directory(
        &self,
        directory_name: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let selection = self.selection();
        self.commands
            .new_directory(&selection, &self.root, directory_name)
            .await
    }

    /// Drags `sources` and drops them onto `target` in one go.
    pub async fn move_nodes(
        &self,
        sources: &[Rc<TreeNode>],
        target: &TreeNode,
    ) -> Result<usize, CommandError> {
        let mut transfer = DataTransfer::new();
        self.drag_and_drop.handle_drag(sources, &mut transfer);
        self.drag_and_drop.handle_drop(Some(target), &transfer).await
    }

    /// Finds the node for `path`, expanding every directory on the way down
    /// from the root. Paths outside the root or missing on disk yield `None`.
    pub async fn locate(&self, path: &Path) -> Option<Rc<TreeNode>> {
        let path = path.normalized();
        let relative = path.strip_prefix(&self.root).ok()?;

        let mut current = self.provider.get_children(None).await.into_iter().next()?;
        for component in relative.components() {
            let Component::Normal(name) = component else {
                return None;
            };
            current = self
                .provider
                .get_children(Some(&current))
                .await
                .into_iter()
                .find(|child| name == child.label())?;
        }

        Some(current)
    }

    /// Ends the session. Listeners registered on the provider go with it.
    pub fn close(self) {
        debug!("Closing explorer session at '{}'", self.root.display());
        self.selection.borrow_mut().clear();
    }
}
