//! Filesystem layer for the documentation tree normalizer.

pub mod doc_tree;
pub mod links;

pub use doc_tree::DocTree;
pub use links::{
    is_directory_alias, is_sentinel, is_staging, read_target, remove_link, replace_symlink,
    SENTINEL_PREFIX,
};
