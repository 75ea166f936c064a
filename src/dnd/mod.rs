//! Moving entries by dragging them onto a directory.

mod controller;
mod transfer;

pub use controller::DragAndDropController;
pub use transfer::{DataTransfer, TREE_MIME_TYPE, TransferItem};
