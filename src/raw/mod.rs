mod arena;
mod handle;
mod node;
mod raw_veb_tree;

pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_veb_tree::RawVebTree;
