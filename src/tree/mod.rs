//! The explorer's view of the filesystem: nodes, the provider that builds
//! them on demand, and the change notifications that invalidate them.

mod events;
mod node;
mod provider;
mod tree_item;

pub use events::{SubscriptionId, TreeChangeEmitter};
pub use node::{CollapsibleState, TreeNode};
pub use provider::{ListingOptions, TreeProvider, VCS_DIRECTORY_NAME};
pub use tree_item::TreeItem;
