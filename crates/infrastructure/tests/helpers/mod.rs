mod archive_tree;

pub use archive_tree::*;
