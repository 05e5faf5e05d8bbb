//! Graph state: node arena, signed adjacency and per-node strategies.

pub mod graph;
pub mod strategy;

pub use graph::{Edge, Graph, Sign};
pub use strategy::{Strategy, StrategyMap};

/// Node identifier as it appears in edge lists.
pub type NodeId = i64;
