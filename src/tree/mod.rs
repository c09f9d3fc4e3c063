//! Directory walking and tree building
//!
//! - `Walker` lazily yields filtered, sorted entries below a root
//! - `build_tree` assembles those entries into a nested `TreeNode`

mod builder;
mod config;
mod filter;
mod node;
mod utils;
mod walker;

pub use builder::{build_tree, root_name};
pub use config::{SortOrder, WalkerConfig};
pub use filter::{EntryFilter, Inclusion};
pub use node::TreeNode;
pub(crate) use node::serialize_lossy_path;
pub use utils::{extension_of, format_size, normalize_extension, relative_path};
pub use walker::{EntryKind, Walk, WalkEntry, Walker};
