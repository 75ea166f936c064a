use std::rc::Rc;

use snafu::ResultExt;
use tracing::{debug, info};

use super::{DataTransfer, TREE_MIME_TYPE, TransferItem};
use crate::commands::{CommandError, MoveSnafu};
use crate::filesystem::FileSystem;
use crate::tree::{TreeNode, TreeProvider};

/// Packs dragged nodes into a [`DataTransfer`] and moves them on drop.
pub struct DragAndDropController<F> {
    fs: Rc<F>,
    provider: Rc<TreeProvider<F>>,
    drag_mime_types: Vec<String>,
    drop_mime_types: Vec<String>,
}

impl<F: FileSystem> DragAndDropController<F> {
    pub fn new(fs: Rc<F>, provider: Rc<TreeProvider<F>>) -> Self {
        Self {
            fs,
            provider,
            drag_mime_types: vec![TREE_MIME_TYPE.to_string()],
            drop_mime_types: vec![TREE_MIME_TYPE.to_string()],
        }
    }

    /// Puts the source nodes themselves, not copies, into the transfer.
    pub fn handle_drag(&self, sources: &[Rc<TreeNode>], transfer: &mut DataTransfer) {
        debug!("Dragging {} nodes", sources.len());
        for mime_type in &self.drag_mime_types {
            transfer.set(mime_type.as_str(), TransferItem::new(sources.to_vec()));
        }
    }

    /// Moves every dragged node into `target` and returns how many were moved.
    ///
    /// Drops without a directory target or without explorer nodes in the
    /// transfer are ignored. The first failing move aborts the drop; moves
    /// done before it stay done. Each successful move refreshes the tree.
    pub async fn handle_drop(
        &self,
        target: Option<&TreeNode>,
        transfer: &DataTransfer,
    ) -> Result<usize, CommandError> {
        let Some(target) = target.filter(|target| target.is_directory()) else {
            debug!("Ignoring drop outside of a directory");
            return Ok(0);
        };
        let accepted = self
            .drop_mime_types
            .iter()
            .find_map(|mime_type| transfer.get(mime_type));
        let Some(item) = accepted else {
            debug!("Ignoring drop without explorer nodes");
            return Ok(0);
        };

        let mut moved = 0;
        for node in item.nodes() {
            let destination = target.path().join(node.label());
            self.fs
                .rename(node.path(), &destination)
                .await
                .context(MoveSnafu {
                    path: node.path(),
                    target: target.path(),
                })?;
            info!(
                "Moved '{}' to '{}'",
                node.path().display(),
                destination.display()
            );
            moved += 1;
            self.provider.refresh();
        }

        Ok(moved)
    }
}
