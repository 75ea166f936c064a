use std::rc::Rc;

use hashlink::LinkedHashMap;

use crate::tree::TreeNode;

/// Key under which dragged explorer nodes travel.
pub const TREE_MIME_TYPE: &str = "application/vnd.pinnote.tree";

/// The live nodes picked up by a drag gesture.
#[derive(Debug, Clone)]
pub struct TransferItem {
    nodes: Vec<Rc<TreeNode>>,
}

impl TransferItem {
    pub fn new(nodes: Vec<Rc<TreeNode>>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Rc<TreeNode>] {
        &self.nodes
    }
}

/// Payload carried between drag start and drop, one item per MIME type.
#[derive(Debug, Default)]
pub struct DataTransfer {
    items: LinkedHashMap<String, TransferItem>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` under `mime_type`, replacing whatever was there.
    pub fn set(&mut self, mime_type: impl Into<String>, item: TransferItem) {
        self.items.insert(mime_type.into(), item);
    }

    pub fn get(&self, mime_type: &str) -> Option<&TransferItem> {
        self.items.get(mime_type)
    }
}
