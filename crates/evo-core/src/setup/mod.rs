//! Graph construction from edge-list files.

pub mod edge_list;

pub use edge_list::{
    load_edge_list, load_signed_edge_list, read_edge_list, read_signed_edge_list, LoadError,
};
